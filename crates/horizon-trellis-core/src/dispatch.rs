//! Owning-thread task dispatch.
//!
//! This module provides the thread-hop primitive of the bridge runtime: a
//! FIFO task queue bound to one *owning thread*. Any thread may enqueue a
//! zero-argument invocation through a [`DispatchHandle`]; the owning thread
//! drains the queue and executes every invocation in arrival order.
//!
//! Queued signal emissions and update requests both travel through this
//! queue, which is what guarantees they are observed on the owning thread,
//! strictly after all previously enqueued work, never reordered and never
//! coalesced.
//!
//! # Example
//!
//! ```
//! use horizon_trellis_core::dispatch::UiExecutor;
//!
//! let executor = UiExecutor::new();
//! let handle = executor.handle();
//!
//! // Any thread can post work...
//! std::thread::spawn(move || {
//!     handle.post(|| println!("runs on the owning thread")).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! // ...the owning thread executes it.
//! executor.process_pending();
//! ```
//!
//! # Shutdown
//!
//! Dropping the [`UiExecutor`] (or sending quit) tears down the loop; tasks
//! still queued at that point are dropped. This is not an error: the bridge
//! objects served by the loop are shutting down with it. A [`DispatchHandle`]
//! whose executor is gone reports [`DispatchError::LoopShutDown`] on `post`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

use crate::affinity::ThreadAffinity;
use crate::error::DispatchError;
use crate::logging::targets;

/// A boxed invocation posted to the owning thread.
type BoxedInvocation = Box<dyn FnOnce() + Send + 'static>;

/// A task travelling through the dispatch queue.
enum UiTask {
    /// Execute an invocation on the owning thread.
    Invoke(BoxedInvocation),
    /// Stop the executor's `run()` loop.
    Quit,
}

/// The owning thread's cooperative task executor.
///
/// Construct the executor on the thread that owns your bridge objects.
/// That thread then either calls [`run`](Self::run) to block and serve the
/// queue, or interleaves [`process_pending`](Self::process_pending) with its
/// own event loop.
///
/// # Thread Safety
///
/// The executor itself must stay on its owning thread; draining the queue
/// from any other thread is a contract violation and panics. Handles
/// produced by [`handle`](Self::handle) are freely shareable.
pub struct UiExecutor {
    /// Receiving end of the task queue.
    receiver: Receiver<UiTask>,
    /// Kept so new handles can be minted after the originals are dropped.
    sender: Sender<UiTask>,
    /// The thread that owns this executor.
    affinity: ThreadAffinity,
    /// Set once a quit task has been observed.
    quitting: Arc<AtomicBool>,
}

impl UiExecutor {
    /// Create a new executor owned by the current thread.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            receiver,
            sender,
            affinity: ThreadAffinity::current(),
            quitting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Produce a handle for posting tasks from any thread.
    pub fn handle(&self) -> DispatchHandle {
        DispatchHandle {
            sender: self.sender.clone(),
            quitting: self.quitting.clone(),
        }
    }

    /// The affinity of the owning thread.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Check whether a quit has been requested.
    pub fn should_quit(&self) -> bool {
        self.quitting.load(Ordering::SeqCst)
    }

    /// Drain and execute everything queued so far, in arrival order.
    ///
    /// Returns the number of invocations executed. A queued quit marks the
    /// executor as quitting and stops the drain; tasks queued after it stay
    /// queued.
    ///
    /// # Panics
    ///
    /// Panics if called from a thread other than the owning thread.
    pub fn process_pending(&self) -> usize {
        self.affinity
            .assert_owning_thread_with_msg("executor queue drained from a non-owning thread");

        let mut executed = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(UiTask::Invoke(invocation)) => {
                    invocation();
                    executed += 1;
                }
                Ok(UiTask::Quit) => {
                    self.quitting.store(true, Ordering::SeqCst);
                    break;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        tracing::trace!(target: targets::DISPATCH, executed, "drained pending tasks");
        executed
    }

    /// Block and serve the queue until a quit is received.
    ///
    /// Invocations are executed in arrival order. Returns once
    /// [`DispatchHandle::quit`] has been called; tasks queued after the quit
    /// are dropped when the executor is dropped.
    ///
    /// # Panics
    ///
    /// Panics if called from a thread other than the owning thread.
    pub fn run(&self) {
        self.affinity
            .assert_owning_thread_with_msg("executor loop started on a non-owning thread");

        tracing::debug!(target: targets::DISPATCH, "executor loop starting");
        while let Ok(task) = self.receiver.recv() {
            match task {
                UiTask::Invoke(invocation) => invocation(),
                UiTask::Quit => {
                    self.quitting.store(true, Ordering::SeqCst);
                    break;
                }
            }
        }
        tracing::debug!(target: targets::DISPATCH, "executor loop stopped");
    }
}

impl Default for UiExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// A cheap, clonable handle for posting work to an owning thread.
///
/// Handles are `Send + Sync`; any number of threads may post concurrently.
/// All posts to the same executor share one FIFO queue, so execution order
/// matches arrival order regardless of which thread posted.
#[derive(Clone)]
pub struct DispatchHandle {
    sender: Sender<UiTask>,
    quitting: Arc<AtomicBool>,
}

impl DispatchHandle {
    /// Enqueue an invocation to run later on the owning thread.
    ///
    /// Returns synchronously and never blocks; the invocation runs when the
    /// owning thread next drains its queue.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::LoopShutDown`] if the executor has been
    /// dropped. Callers that require the owning thread to still be live
    /// (a bridge scheduling a signal for itself) treat that as a fatal
    /// contract violation rather than a recoverable error.
    pub fn post<F>(&self, invocation: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender
            .send(UiTask::Invoke(Box::new(invocation)))
            .map_err(|_| DispatchError::LoopShutDown)
    }

    /// Ask the executor's `run()` loop to stop.
    ///
    /// Tasks already queued ahead of the quit still execute; tasks queued
    /// after it are dropped with the executor. Quitting an executor that is
    /// already gone is a no-op.
    pub fn quit(&self) {
        let _ = self.sender.send(UiTask::Quit);
    }

    /// Check whether the executor has observed a quit.
    pub fn is_quitting(&self) -> bool {
        self.quitting.load(Ordering::SeqCst)
    }
}

static_assertions::assert_impl_all!(DispatchHandle: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_post_then_drain_in_order() {
        let executor = UiExecutor::new();
        let handle = executor.handle();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let order = order.clone();
            handle.post(move || order.lock().push(i)).unwrap();
        }

        assert_eq!(executor.process_pending(), 5);
        assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_cross_thread_posts_preserve_per_thread_order() {
        let executor = UiExecutor::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let handle = executor.handle();
                let order = order.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        let order = order.clone();
                        handle.post(move || order.lock().push((t, i))).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(executor.process_pending(), 100);

        // Arrival order is execution order, so each thread's posts appear
        // as an in-order subsequence.
        let observed = order.lock();
        for t in 0..4 {
            let per_thread: Vec<i32> = observed
                .iter()
                .filter(|&&(tt, _)| tt == t)
                .map(|&(_, i)| i)
                .collect();
            let expected: Vec<i32> = (0..25).collect();
            assert_eq!(per_thread, expected, "thread {t} posts reordered");
        }
    }

    #[test]
    fn test_post_after_executor_dropped() {
        let executor = UiExecutor::new();
        let handle = executor.handle();
        drop(executor);

        let result = handle.post(|| {});
        assert_eq!(result, Err(DispatchError::LoopShutDown));
    }

    #[test]
    fn test_quit_stops_run() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let owner = std::thread::spawn(move || {
            let executor = UiExecutor::new();
            tx.send(executor.handle()).unwrap();
            executor.run();
            executor.should_quit()
        });

        let handle = rx.recv().unwrap();
        let ran = Arc::new(Mutex::new(false));
        let ran_clone = ran.clone();
        handle.post(move || *ran_clone.lock() = true).unwrap();
        handle.quit();

        assert!(owner.join().unwrap());
        assert!(*ran.lock());
        assert!(handle.is_quitting());
    }

    #[test]
    fn test_quit_mid_drain_leaves_later_tasks_queued() {
        let executor = UiExecutor::new();
        let handle = executor.handle();
        let count = Arc::new(Mutex::new(0));

        let c = count.clone();
        handle.post(move || *c.lock() += 1).unwrap();
        handle.quit();
        let c = count.clone();
        handle.post(move || *c.lock() += 1).unwrap();

        assert_eq!(executor.process_pending(), 1);
        assert!(executor.should_quit());
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_process_pending_off_thread_panics() {
        let executor = Arc::new(UiExecutor::new());
        let executor_clone = executor.clone();

        let result = std::thread::spawn(move || {
            executor_clone.process_pending();
        })
        .join();

        assert!(result.is_err(), "Expected off-thread drain to panic");
    }
}
