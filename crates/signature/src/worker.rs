//! crates/signature/src/worker.rs
//!
//! Persistent worker threads and their single-task mailboxes.
//!
//! Each slot owns a bounded(1) task channel and a bounded(1) result channel.
//! The orchestrator installs at most one task per slot per round and collects
//! its result before the next round, so neither channel ever holds more than
//! one message.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use checksums::{BlockDigest, DigestError};
use crossbeam_channel::{Receiver, Sender, bounded};
use fast_io::{BlockView, ByteSource, SourceError};

use crate::error::SignatureError;

/// Unit of work installed into a slot.
pub(crate) enum Task {
    /// Hash a block of the shared round window.
    Hash { block: u64, view: BlockView },
    /// Read the block from the worker's own source, then hash it.
    Read { block: u64, offset: u64, len: usize },
}

impl Task {
    const fn block(&self) -> u64 {
        match self {
            Self::Hash { block, .. } | Self::Read { block, .. } => *block,
        }
    }
}

/// Why a task produced no digest.
enum TaskFailure {
    Digest(DigestError),
    Source(SourceError),
    Short { expected: usize, actual: usize },
}

/// Result published by a worker for one task.
pub(crate) struct Completion {
    block: u64,
    outcome: Result<String, TaskFailure>,
}

impl Completion {
    pub(crate) const fn block(&self) -> u64 {
        self.block
    }

    /// Converts the worker's outcome into the run's error taxonomy.
    pub(crate) fn into_digest(self) -> Result<String, SignatureError> {
        let block = self.block;
        self.outcome.map_err(|failure| match failure {
            TaskFailure::Digest(source) => SignatureError::HashFailure { block, source },
            TaskFailure::Source(source) => SignatureError::SourceUnavailable(source),
            TaskFailure::Short { expected, actual } => SignatureError::ShortBlock {
                block,
                expected,
                actual,
            },
        })
    }
}

/// How a worker thread left its loop.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum WorkerExit {
    /// Woken by the shutdown protocol with the stop flag already raised.
    Stopped,
    /// Its channels closed without a stop request.
    Orphaned,
}

/// State moved into a worker thread.
struct WorkerContext {
    slot: usize,
    digest: Arc<dyn BlockDigest>,
    source: Option<Box<dyn ByteSource>>,
    stop: Arc<AtomicBool>,
    tasks: Receiver<Task>,
    results: Sender<Completion>,
}

impl WorkerContext {
    fn run(mut self) -> WorkerExit {
        logging::trace_worker!(debug, slot = self.slot, "worker started");

        // A closed task channel is the shutdown wake-up; the flag is read on
        // every wake so a task racing shutdown is discarded.
        let exit = loop {
            let Ok(task) = self.tasks.recv() else {
                break self.exit_reason();
            };
            if self.stop.load(Ordering::Acquire) {
                break WorkerExit::Stopped;
            }
            let completion = self.execute(task);
            if self.results.send(completion).is_err() {
                break self.exit_reason();
            }
        };

        logging::trace_worker!(debug, slot = self.slot, ?exit, "worker stopped");
        exit
    }

    fn exit_reason(&self) -> WorkerExit {
        if self.stop.load(Ordering::Acquire) {
            WorkerExit::Stopped
        } else {
            WorkerExit::Orphaned
        }
    }

    fn execute(&mut self, task: Task) -> Completion {
        let block = task.block();
        let outcome = match task {
            Task::Hash { view, .. } => {
                let outcome = self.digest.hash(&view).map_err(TaskFailure::Digest);
                // Release the window before the orchestrator can observe the result.
                drop(view);
                outcome
            }
            Task::Read { offset, len, .. } => self.read_and_hash(offset, len),
        };

        logging::trace_worker!(
            trace,
            slot = self.slot,
            block,
            ok = outcome.is_ok(),
            "task finished"
        );
        Completion { block, outcome }
    }

    fn read_and_hash(&mut self, offset: u64, len: usize) -> Result<String, TaskFailure> {
        let source = self
            .source
            .as_mut()
            .ok_or_else(|| {
                TaskFailure::Source(SourceError::Unsupported { kind: "per-worker" })
            })?;
        let window = source.read(offset, len).map_err(TaskFailure::Source)?;
        if window.len() != len {
            return Err(TaskFailure::Short {
                expected: len,
                actual: window.len(),
            });
        }
        self.digest
            .hash(window.as_slice())
            .map_err(TaskFailure::Digest)
    }
}

/// One persistent worker thread plus its mailbox.
pub(crate) struct WorkerSlot {
    slot: usize,
    tasks: Option<Sender<Task>>,
    results: Receiver<Completion>,
    handle: Option<JoinHandle<WorkerExit>>,
}

impl WorkerSlot {
    /// Spawns the worker thread for `slot`.
    ///
    /// `source` is the worker's private source in per-worker mode and `None`
    /// when blocks arrive as views of a shared window.
    pub(crate) fn spawn(
        slot: usize,
        digest: Arc<dyn BlockDigest>,
        source: Option<Box<dyn ByteSource>>,
        stop: Arc<AtomicBool>,
    ) -> Result<Self, SignatureError> {
        let (task_tx, task_rx) = bounded(1);
        let (result_tx, result_rx) = bounded(1);

        let context = WorkerContext {
            slot,
            digest,
            source,
            stop,
            tasks: task_rx,
            results: result_tx,
        };

        let handle = thread::Builder::new()
            .name(format!("blocksig-worker-{slot}"))
            .spawn(move || context.run())
            .map_err(|source| SignatureError::WorkerSpawn { slot, source })?;

        Ok(Self {
            slot,
            tasks: Some(task_tx),
            results: result_rx,
            handle: Some(handle),
        })
    }

    /// Installs a task and wakes the worker.
    pub(crate) fn dispatch(&self, task: Task) -> Result<(), SignatureError> {
        let terminated = || SignatureError::WorkerTerminated { slot: self.slot };
        let tasks = self.tasks.as_ref().ok_or_else(terminated)?;
        tasks.send(task).map_err(|_| terminated())
    }

    /// Blocks until the worker publishes the result of its current task.
    pub(crate) fn collect(&self) -> Result<Completion, SignatureError> {
        self.results
            .recv()
            .map_err(|_| SignatureError::WorkerTerminated { slot: self.slot })
    }

    /// Disconnects the task channel, waking a parked worker.
    pub(crate) fn close(&mut self) {
        self.tasks = None;
    }

    /// Waits for the worker thread to exit.
    ///
    /// Returns `None` when the thread panicked or was already joined.
    pub(crate) fn join(&mut self) -> Option<WorkerExit> {
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(exit) => Some(exit),
            Err(_) => {
                logging::trace_worker!(warn, slot = self.slot, "worker thread panicked");
                None
            }
        }
    }
}

impl fmt::Debug for WorkerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerSlot")
            .field("slot", &self.slot)
            .field("open", &self.tasks.is_some())
            .field("running", &self.handle.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checksums::Crc32Digest;
    use fast_io::{MemorySource, Window};

    fn spawn(source: Option<Box<dyn ByteSource>>) -> (WorkerSlot, Arc<AtomicBool>) {
        let stop = Arc::new(AtomicBool::new(false));
        let slot = WorkerSlot::spawn(0, Arc::new(Crc32Digest), source, Arc::clone(&stop))
            .expect("spawn worker");
        (slot, stop)
    }

    fn shut_down(mut slot: WorkerSlot, stop: &AtomicBool) -> Option<WorkerExit> {
        stop.store(true, Ordering::Release);
        slot.close();
        slot.join()
    }

    #[test]
    fn hashes_shared_view_and_releases_it() {
        let (slot, stop) = spawn(None);
        let window = Window::from_vec(0, b"crc".to_vec());
        let view = window.block(0, 3).unwrap();

        slot.dispatch(Task::Hash { block: 5, view }).unwrap();
        let completion = slot.collect().unwrap();
        assert_eq!(completion.block(), 5);
        assert_eq!(completion.into_digest().unwrap(), "7c6287fd");
        assert_eq!(window.holders(), 1);

        shut_down(slot, &stop);
    }

    #[test]
    fn reads_from_private_source() {
        let source: Box<dyn ByteSource> = Box::new(MemorySource::new(b"xx crc".to_vec()));
        let (slot, stop) = spawn(Some(source));

        slot.dispatch(Task::Read {
            block: 1,
            offset: 3,
            len: 3,
        })
        .unwrap();
        assert_eq!(slot.collect().unwrap().into_digest().unwrap(), "7c6287fd");

        shut_down(slot, &stop);
    }

    #[test]
    fn short_private_read_is_reported() {
        let source: Box<dyn ByteSource> = Box::new(MemorySource::new(b"abc".to_vec()));
        let (slot, stop) = spawn(Some(source));

        slot.dispatch(Task::Read {
            block: 0,
            offset: 0,
            len: 8,
        })
        .unwrap();
        let error = slot.collect().unwrap().into_digest().unwrap_err();
        assert!(matches!(
            error,
            SignatureError::ShortBlock {
                block: 0,
                expected: 8,
                actual: 3
            }
        ));

        shut_down(slot, &stop);
    }

    #[test]
    fn idle_worker_sees_stop_flag_on_wake() {
        let (slot, stop) = spawn(None);
        assert_eq!(shut_down(slot, &stop), Some(WorkerExit::Stopped));
    }

    #[test]
    fn closing_without_stop_leaves_worker_orphaned() {
        let (mut slot, _stop) = spawn(None);
        slot.close();
        assert_eq!(slot.join(), Some(WorkerExit::Orphaned));
        assert_eq!(slot.join(), None);
    }

    #[test]
    fn closed_slot_rejects_tasks() {
        let (mut slot, stop) = spawn(None);
        slot.close();
        let window = Window::from_vec(0, vec![1]);
        let view = window.block(0, 1).unwrap();
        assert!(matches!(
            slot.dispatch(Task::Hash { block: 0, view }),
            Err(SignatureError::WorkerTerminated { slot: 0 })
        ));
        stop.store(true, Ordering::Release);
        slot.join();
    }
}
