//! crates/signature/src/engine.rs
//!
//! Round-based, order-preserving signature engine.
//!
//! # Architecture
//!
//! ```text
//!  Orchestrator (caller of run)             Worker pool (one thread per slot)
//!  ┌──────────────────────────────┐         ┌─────────────────────────────┐
//!  │ read round window            │         │ slot 0: hash block r*W + 0  │
//!  │ (workers x block_size bytes) │ ──────▶ │ slot 1: hash block r*W + 1  │
//!  │                              │  tasks  │ ...                         │
//!  │ collect slot 0, 1, ... in    │ ◀────── │ slot W-1                    │
//!  │ order, save each to the sink │ results └─────────────────────────────┘
//!  │ release window, next round   │
//!  └──────────────────────────────┘
//! ```
//!
//! Workers may finish in any order; the orchestrator waits on slot 0 first,
//! then slot 1 and so on, so the sink always observes ascending block indices.
//! Rounds never overlap, which bounds peak memory to one round window.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use checksums::BlockDigest;
use fast_io::{ByteSource, SourceFactory};

use crate::config::EngineConfig;
use crate::error::SignatureError;
use crate::sink::DigestSink;
use crate::worker::{Task, WorkerSlot};

/// Lifecycle of a [`SignatureEngine`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EngineState {
    /// Workers are up; rounds may be started.
    Running,
    /// The source is exhausted; the round in flight is finishing.
    Draining,
    /// Terminal. The run completed, failed, or the engine shut down.
    Stopped,
}

/// Totals reported by a completed run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    /// Digests delivered to the sink.
    pub blocks: u64,
    /// Bytes hashed.
    pub bytes: u64,
    /// Rounds that dispatched at least one block.
    pub rounds: u64,
}

/// Where workers get block bytes from.
enum Feed {
    /// One source read by the orchestrator; workers hash views of its windows.
    Shared(Box<dyn ByteSource>),
    /// Every worker reads its own blocks from a private source.
    PerWorker,
}

/// Blocks covered by one round.
#[derive(Clone, Copy, Debug)]
struct Round {
    index: u64,
    offset: u64,
    first_block: u64,
}

/// Parallel block-signature engine.
///
/// Construct with [`SignatureEngine::builder`]. Worker threads are spawned at
/// construction and joined when the engine is dropped, whether or not
/// [`run`](Self::run) was ever called.
///
/// # Example
///
/// ```
/// use checksums::DigestAlgorithm;
/// use fast_io::MemorySource;
/// use signature::{EngineConfig, SignatureEngine};
///
/// let mut digests = Vec::new();
/// let mut engine = SignatureEngine::builder(EngineConfig::new(4))
///     .digest(DigestAlgorithm::Crc32.into_digest())
///     .source(MemorySource::new(b"abcdefghij".to_vec()))
///     .sink(|digest: &str| {
///         digests.push(digest.to_owned());
///         Ok(())
///     })
///     .build()?;
///
/// let summary = engine.run()?;
/// drop(engine);
/// assert_eq!(summary.blocks, 3);
/// assert_eq!(digests.len(), 3);
/// # Ok::<(), signature::SignatureError>(())
/// ```
pub struct SignatureEngine<'a> {
    block_size: usize,
    total_size: u64,
    digest_name: &'static str,
    feed: Feed,
    sink: Box<dyn DigestSink + 'a>,
    stop: Arc<AtomicBool>,
    workers: Vec<WorkerSlot>,
    state: EngineState,
}

impl fmt::Debug for SignatureEngine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureEngine")
            .field("block_size", &self.block_size)
            .field("total_size", &self.total_size)
            .field("digest", &self.digest_name)
            .field("workers", &self.workers.len())
            .field("per_worker", &matches!(self.feed, Feed::PerWorker))
            .field("state", &self.state)
            .finish()
    }
}

impl<'a> SignatureEngine<'a> {
    /// Starts building an engine with `config`.
    #[must_use]
    pub fn builder(config: EngineConfig) -> SignatureEngineBuilder<'a> {
        SignatureEngineBuilder::new(config)
    }

    /// Number of persistent worker threads. Fixed for the engine's lifetime.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Configured block size.
    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Size of the source in bytes, as reported at construction.
    #[must_use]
    pub const fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Number of blocks the source will be split into.
    #[must_use]
    pub fn block_count(&self) -> u64 {
        self.total_size.div_ceil(self.block_size as u64)
    }

    /// Hashes every block and delivers the digests to the sink in block order.
    ///
    /// An engine runs once. The first error aborts the run; digests already
    /// saved stay saved.
    ///
    /// # Errors
    ///
    /// - [`SignatureError::AlreadyFinished`] when called a second time
    /// - [`SignatureError::SourceUnavailable`] when a window cannot be read
    /// - [`SignatureError::HashFailure`] when a digest rejects a block
    /// - [`SignatureError::SinkFailure`] when the sink rejects a digest
    /// - [`SignatureError::WorkerTerminated`] when a worker thread died
    pub fn run(&mut self) -> Result<RunSummary, SignatureError> {
        if self.state != EngineState::Running {
            return Err(SignatureError::AlreadyFinished);
        }

        logging::trace_engine!(
            info,
            workers = self.workers.len(),
            block_size = self.block_size,
            total_size = self.total_size,
            digest = self.digest_name,
            "signature run started"
        );

        let result = self.run_rounds();
        self.state = EngineState::Stopped;

        match &result {
            Ok(summary) => logging::trace_engine!(
                info,
                blocks = summary.blocks,
                bytes = summary.bytes,
                rounds = summary.rounds,
                "signature run finished"
            ),
            Err(error) => logging::trace_engine!(warn, %error, "signature run aborted"),
        }
        result
    }

    fn round_len(&self) -> usize {
        // Bounded at construction: workers * block_size never overflows.
        self.workers.len() * self.block_size
    }

    fn run_rounds(&mut self) -> Result<RunSummary, SignatureError> {
        let mut summary = RunSummary::default();
        let mut round = Round {
            index: 0,
            offset: 0,
            first_block: 0,
        };

        while self.state == EngineState::Running {
            let dispatched = match self.feed {
                Feed::Shared(_) => self.shared_round(round, &mut summary)?,
                Feed::PerWorker => self.per_worker_round(round, &mut summary)?,
            };
            if dispatched == 0 {
                break;
            }
            round.index += 1;
            round.offset += self.round_len() as u64;
            round.first_block += dispatched as u64;
        }

        self.state = EngineState::Draining;
        logging::trace_engine!(debug, rounds = summary.rounds, "source exhausted");
        Ok(summary)
    }

    /// Reads one window and hashes its blocks. Returns the number of blocks
    /// dispatched; zero once the source is exhausted.
    fn shared_round(
        &mut self,
        round: Round,
        summary: &mut RunSummary,
    ) -> Result<usize, SignatureError> {
        let requested = self.round_len();
        let Feed::Shared(source) = &mut self.feed else {
            return Ok(0);
        };

        // Past the end this returns an empty window, which ends the run.
        let window = source.read(round.offset, requested)?;
        if window.is_empty() {
            self.state = EngineState::Draining;
            return Ok(0);
        }

        let returned = window.len();
        let blocks = returned.div_ceil(self.block_size);
        logging::trace_round!(
            debug,
            round = round.index,
            offset = round.offset,
            bytes = returned,
            blocks,
            "dispatching round"
        );

        for slot in 0..blocks {
            let block = round.first_block + slot as u64;
            let start = slot * self.block_size;
            let len = self.block_len(round.offset + start as u64);
            let view = window
                .block(start, len)
                .ok_or_else(|| SignatureError::ShortBlock {
                    block,
                    expected: len,
                    actual: returned.saturating_sub(start),
                })?;
            self.workers[slot].dispatch(Task::Hash { block, view })?;
        }

        self.deliver(round, blocks, summary)?;

        // Every worker dropped its view before publishing its result.
        debug_assert_eq!(window.holders(), 1, "round window still shared");
        drop(window);
        logging::trace_round!(trace, round = round.index, "released round window");

        summary.bytes += returned as u64;
        summary.rounds += 1;
        if blocks < self.workers.len() || returned < requested {
            self.state = EngineState::Draining;
        }
        Ok(blocks)
    }

    /// Dispatches read tasks to workers that own their sources.
    fn per_worker_round(
        &mut self,
        round: Round,
        summary: &mut RunSummary,
    ) -> Result<usize, SignatureError> {
        if round.offset >= self.total_size {
            self.state = EngineState::Draining;
            return Ok(0);
        }

        let requested = self.round_len();
        let remaining = self.total_size - round.offset;
        let bytes = usize::try_from(remaining).map_or(requested, |r| r.min(requested));
        let blocks = bytes.div_ceil(self.block_size);
        logging::trace_round!(
            debug,
            round = round.index,
            offset = round.offset,
            bytes,
            blocks,
            "dispatching per-worker round"
        );

        for slot in 0..blocks {
            let block = round.first_block + slot as u64;
            let offset = round.offset + (slot * self.block_size) as u64;
            let len = self.block_len(offset);
            self.workers[slot].dispatch(Task::Read { block, offset, len })?;
        }

        self.deliver(round, blocks, summary)?;

        summary.bytes += bytes as u64;
        summary.rounds += 1;
        if blocks < self.workers.len() || bytes < requested {
            self.state = EngineState::Draining;
        }
        Ok(blocks)
    }

    /// Length of the block starting at `block_start`, derived from the total
    /// size rather than the window so the final block is never overcounted.
    fn block_len(&self, block_start: u64) -> usize {
        let remaining = self.total_size.saturating_sub(block_start);
        usize::try_from(remaining).map_or(self.block_size, |r| r.min(self.block_size))
    }

    /// Waits on slots `0..blocks` in ascending order and saves each digest.
    fn deliver(
        &mut self,
        round: Round,
        blocks: usize,
        summary: &mut RunSummary,
    ) -> Result<(), SignatureError> {
        for slot in 0..blocks {
            let completion = self.workers[slot].collect()?;
            let block = completion.block();
            debug_assert_eq!(block, round.first_block + slot as u64);

            let digest = completion.into_digest()?;
            self.sink
                .save(&digest)
                .map_err(|source| SignatureError::SinkFailure { block, source })?;
            summary.blocks += 1;
        }
        Ok(())
    }

    /// Stops and joins every worker. Idempotent.
    fn shutdown(&mut self) {
        // The flag is visible before any worker observes its closed channel.
        self.stop.store(true, Ordering::Release);
        for worker in &mut self.workers {
            worker.close();
        }
        for worker in &mut self.workers {
            worker.join();
        }
        if !self.workers.is_empty() {
            logging::trace_engine!(debug, workers = self.workers.len(), "workers joined");
        }
        self.workers.clear();
        self.state = EngineState::Stopped;
    }
}

impl Drop for SignatureEngine<'_> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Collects the collaborators of a [`SignatureEngine`].
///
/// Exactly one of [`source`](Self::source) or
/// [`source_factory`](Self::source_factory) must be supplied, along with a
/// digest and a sink.
pub struct SignatureEngineBuilder<'a> {
    config: EngineConfig,
    digest: Option<Arc<dyn BlockDigest>>,
    sink: Option<Box<dyn DigestSink + 'a>>,
    source: Option<Box<dyn ByteSource>>,
    factory: Option<Box<dyn SourceFactory + 'a>>,
}

impl fmt::Debug for SignatureEngineBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureEngineBuilder")
            .field("config", &self.config)
            .field("digest", &self.digest)
            .field("sink", &self.sink.is_some())
            .field("source", &self.source.is_some())
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

impl<'a> SignatureEngineBuilder<'a> {
    /// Creates a builder with no collaborators.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            digest: None,
            sink: None,
            source: None,
            factory: None,
        }
    }

    /// Configuration the engine will be built with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Digest shared by every worker.
    #[must_use]
    pub fn digest(mut self, digest: Arc<dyn BlockDigest>) -> Self {
        self.digest = Some(digest);
        self
    }

    /// Sink receiving digests in block order.
    #[must_use]
    pub fn sink(mut self, sink: impl DigestSink + 'a) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Single source read by the orchestrator; workers hash shared views.
    #[must_use]
    pub fn source(mut self, source: impl ByteSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Factory producing one private source per worker.
    #[must_use]
    pub fn source_factory(mut self, factory: impl SourceFactory + 'a) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Validates the collaborators, sizes the pool and spawns the workers.
    ///
    /// # Errors
    ///
    /// - [`SignatureError::InvalidConfig`] for a missing collaborator, both a
    ///   source and a factory, zero block size or zero parallelism
    /// - [`SignatureError::SourceUnavailable`] when the factory cannot open a source
    /// - [`SignatureError::WorkerSpawn`] when a thread cannot be started
    pub fn build(self) -> Result<SignatureEngine<'a>, SignatureError> {
        let digest = self
            .digest
            .ok_or_else(|| SignatureError::invalid_config("no digest configured"))?;
        let sink = self
            .sink
            .ok_or_else(|| SignatureError::invalid_config("no sink configured"))?;

        let (feed, mut private_sources, total_size) = match (self.source, self.factory) {
            (Some(source), None) => {
                let total_size = source.total_size();
                (Feed::Shared(source), Vec::new(), total_size)
            }
            (None, Some(factory)) => {
                // The first source doubles as the size probe and slot 0's source.
                let first = factory.create()?;
                let total_size = first.total_size();
                let workers = self.config.worker_count(total_size)?;
                let mut sources = Vec::with_capacity(workers);
                sources.push(first);
                for _ in 1..workers {
                    sources.push(factory.create()?);
                }
                (Feed::PerWorker, sources, total_size)
            }
            (None, None) => {
                return Err(SignatureError::invalid_config(
                    "no byte source or source factory configured",
                ));
            }
            (Some(_), Some(_)) => {
                return Err(SignatureError::invalid_config(
                    "configure either a byte source or a source factory, not both",
                ));
            }
        };

        let block_size = self.config.block_size();
        let workers = self.config.worker_count(total_size)?;
        if workers.checked_mul(block_size).is_none() {
            return Err(SignatureError::invalid_config(format!(
                "{workers} workers of {block_size}-byte blocks overflow the address space"
            )));
        }

        let mut engine = SignatureEngine {
            block_size,
            total_size,
            digest_name: digest.name(),
            feed,
            sink,
            stop: Arc::new(AtomicBool::new(false)),
            workers: Vec::with_capacity(workers),
            state: EngineState::Running,
        };

        // Private sources are consumed in slot order; shared mode has none.
        private_sources.reverse();
        for slot in 0..workers {
            // On error the partially built engine drops and joins what was spawned.
            let worker = WorkerSlot::spawn(
                slot,
                Arc::clone(&digest),
                private_sources.pop(),
                Arc::clone(&engine.stop),
            )?;
            engine.workers.push(worker);
        }

        logging::trace_engine!(
            debug,
            workers,
            block_size,
            total_size,
            per_worker = matches!(engine.feed, Feed::PerWorker),
            "engine constructed"
        );
        Ok(engine)
    }
}
