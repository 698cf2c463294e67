//! Background write pool
//!
//! Persistence runs on a small pool of detached worker threads so the
//! calling thread never waits on disk. Jobs are fire-and-forget: panics and
//! failures stop at the job boundary and are only logged.

use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Sender};
use parking_lot::{Condvar, Mutex};

pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// Count of submitted-but-unfinished jobs, for `wait_idle`.
#[derive(Default)]
struct Pending {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Pending {
    fn add(&self) {
        *self.count.lock() += 1;
    }

    fn done(&self) {
        let mut count = self.count.lock();
        *count -= 1;
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    fn wait_idle(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.idle.wait(&mut count);
        }
    }
}

pub(crate) struct WritePool {
    tx: Sender<Job>,
    pending: Arc<Pending>,
}

impl WritePool {
    /// Spawn `workers` detached writer threads (minimum 1).
    pub(crate) fn new(workers: usize) -> io::Result<Self> {
        let (tx, rx) = unbounded::<Job>();
        let pending = Arc::new(Pending::default());

        for i in 0..workers.max(1) {
            let rx = rx.clone();
            let pending = Arc::clone(&pending);
            thread::Builder::new()
                .name(format!("cache-writer-{i}"))
                .spawn(move || {
                    while let Ok(job) = rx.recv() {
                        if catch_unwind(AssertUnwindSafe(job)).is_err() {
                            tracing::error!("background cache write panicked");
                        }
                        pending.done();
                    }
                })?;
        }

        Ok(Self { tx, pending })
    }

    /// Enqueue a job and return immediately.
    pub(crate) fn submit(&self, job: Job) {
        self.pending.add();
        if self.tx.send(job).is_err() {
            // Channel closed; the write is dropped.
            self.pending.done();
        }
    }

    /// Block until every submitted job has finished.
    pub(crate) fn wait_idle(&self) {
        self.pending.wait_idle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    #[test]
    fn test_submit_does_not_block_on_slow_job() {
        let pool = WritePool::new(1).unwrap();

        let start = Instant::now();
        pool.submit(Box::new(|| thread::sleep(Duration::from_millis(400))));
        let submitted_after = start.elapsed();

        pool.wait_idle();
        let idle_after = start.elapsed();

        assert!(submitted_after < Duration::from_millis(200));
        assert!(idle_after >= Duration::from_millis(400));
    }

    #[test]
    fn test_panicking_job_does_not_poison_pool() {
        let pool = WritePool::new(1).unwrap();
        let ran = Arc::new(AtomicUsize::new(0));

        pool.submit(Box::new(|| panic!("boom")));
        let ran_clone = Arc::clone(&ran);
        pool.submit(Box::new(move || {
            ran_clone.fetch_add(1, Ordering::SeqCst);
        }));
        pool.wait_idle();

        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_wait_idle_with_no_jobs_returns() {
        let pool = WritePool::new(2).unwrap();
        pool.wait_idle();
    }

    #[test]
    fn test_jobs_drain_across_workers() {
        let pool = WritePool::new(4).unwrap();
        let ran = Arc::new(AtomicUsize::new(0));
        for _ in 0..64 {
            let ran = Arc::clone(&ran);
            pool.submit(Box::new(move || {
                ran.fetch_add(1, Ordering::SeqCst);
            }));
        }
        pool.wait_idle();
        assert_eq!(ran.load(Ordering::SeqCst), 64);
    }
}
