//! The one piece of state shared between workers: progress counters.

use std::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub done: u32,
    pub total: u32,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

pub struct Progress {
    stage: &'static str,
    state: Mutex<ProgressSnapshot>,
}

impl Progress {
    pub fn new(stage: &'static str, total: u32) -> Self {
        Self {
            stage,
            state: Mutex::new(ProgressSnapshot {
                total,
                ..Default::default()
            }),
        }
    }

    /// Record one finished chunk job. `bytes_in` / `bytes_out` are the job's
    /// input and output sizes.
    pub fn chunk_done(&self, index: u32, bytes_in: u64, bytes_out: u64) {
        let mut s = self.state.lock().unwrap_or_else(|p| p.into_inner());
        s.done += 1;
        s.bytes_in += bytes_in;
        s.bytes_out += bytes_out;
        debug!(
            "[{}/{}] chunk {} {}: {} -> {} bytes",
            s.done,
            s.total,
            u64::from(index) + 1,
            self.stage,
            bytes_in,
            bytes_out
        );
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        *self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrent_updates_are_all_counted() {
        let progress = Progress::new("compressed", 32);
        std::thread::scope(|s| {
            for i in 0..32u32 {
                let progress = &progress;
                s.spawn(move || progress.chunk_done(i, 10, 4));
            }
        });
        let snap = progress.snapshot();
        assert_eq!(snap.done, 32);
        assert_eq!(snap.bytes_in, 320);
        assert_eq!(snap.bytes_out, 128);
    }
}
