//! Per-run parallel executor for independent chunk jobs.

use crate::error::{DchunkError, Result};
use rayon::prelude::*;
use std::num::NonZeroUsize;

type Job<'a, T> = Box<dyn FnOnce() -> Result<T> + Send + 'a>;

/// Collects jobs with [`WorkerPool::submit`] and runs them on a fresh rayon
/// pool in [`WorkerPool::run_to_completion`]. Nothing survives the run.
pub struct WorkerPool<'a, T> {
    threads: usize,
    jobs: Vec<Job<'a, T>>,
}

impl<'a, T: Send> WorkerPool<'a, T> {
    /// `threads: None` sizes the pool to the machine.
    pub fn new(threads: Option<usize>) -> Self {
        let threads = threads.unwrap_or_else(hardware_threads).max(1);
        Self {
            threads,
            jobs: Vec::new(),
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Queue a job. Nothing runs until `run_to_completion`.
    pub fn submit<F>(&mut self, job: F)
    where
        F: FnOnce() -> Result<T> + Send + 'a,
    {
        self.jobs.push(Box::new(job));
    }

    /// Run every queued job and block until the workers are joined.
    ///
    /// Outputs come back in submission order. When a job fails, jobs that have
    /// not started yet are skipped, running ones finish, and the first error
    /// observed is returned; partial outputs are dropped.
    pub fn run_to_completion(self) -> Result<Vec<T>> {
        if self.jobs.is_empty() {
            return Ok(Vec::new());
        }
        let threads = self.threads.min(self.jobs.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("dchunk-worker-{i}"))
            .build()
            .map_err(|e| DchunkError::Pool(e.to_string()))?;

        let jobs = self.jobs;
        pool.install(move || jobs.into_par_iter().map(|job| job()).collect())
    }
}

fn hardware_threads() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
