pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use dchunk_core::error::Result;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compress {
            input_file,
            output_directory,
            chunk_size,
            level,
            buffer_size,
            threads,
        } => handlers::handle_compress(
            input_file,
            output_directory,
            chunk_size,
            level,
            buffer_size,
            threads,
        ),
        Commands::Decompress {
            chunks_directory,
            output_file,
            threads,
        } => handlers::handle_decompress(chunks_directory, output_file, threads),
        Commands::Verify {
            chunks_directory,
            threads,
        } => handlers::handle_verify(chunks_directory, threads),
        Commands::Inspect {
            chunks_directory,
            json,
        } => handlers::handle_inspect(chunks_directory, json),
    }
}
