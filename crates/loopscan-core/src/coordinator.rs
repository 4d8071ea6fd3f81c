/// Bulk-synchronous superstep engine.
///
/// The [`Coordinator`] owns every [`VertexState`] and two message buffers.
/// Each round it takes the whole inbound buffer, runs the vertex program for
/// every vertex that has mail (plus the source while it is unseeded), and
/// only then routes the emitted messages into a fresh buffer for the next
/// round. Nothing sent in superstep `n` is visible before superstep `n + 1`,
/// so a token's path length always equals its depth in rounds since seeding.
///
/// # Parallel rounds
///
/// With `workers > 1` the invocations of one round run on a dedicated
/// `rayon` pool. Outputs come back in vertex-key order and are merged at the
/// barrier on the calling thread, so the result is identical to a
/// single-threaded run.
///
/// # Termination
///
/// Checked after every round, in order:
/// - the stop flag was raised → [`Termination::Cancelled`] (checked at the
///   top of the next round, never mid-round);
/// - no messages are pending → [`Termination::Converged`];
/// - this call has executed `max_supersteps` rounds →
///   [`Termination::SuperstepLimitReached`].
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::collector::{CycleCollector, CycleSink};
use crate::config::RunConfiguration;
use crate::dataset::{Dataset, VertexId};
use crate::error::DetectError;
use crate::graph::{CycleGraph, build_graph};
use crate::program::{ComputeOutput, VertexContext, VertexState, compute, needs_seed};
use crate::token::PathToken;

// ---------------------------------------------------------------------------
// Run outcome
// ---------------------------------------------------------------------------

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// No vertex had pending work: the search space is exhausted.
    Converged,
    /// `max_supersteps` rounds ran with messages still pending.
    SuperstepLimitReached,
    /// The stop flag was raised between rounds.
    Cancelled,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Converged => "converged",
            Self::SuperstepLimitReached => "superstep limit reached",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Counters describing a finished run.
///
/// Every counter covers the one call to [`Coordinator::run`] that returned
/// it, so a resumed run starts again from zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Rounds executed by this call.
    pub supersteps: u64,
    /// Why the run stopped.
    pub termination: Termination,
    /// Messages emitted by this call.
    pub messages_sent: u64,
    /// Distinct cycles handed to the sink.
    pub cycles_reported: usize,
    /// Closed tokens dropped by deduplication.
    pub duplicates_suppressed: usize,
}

// ---------------------------------------------------------------------------
// StopHandle
// ---------------------------------------------------------------------------

/// Cloneable flag that aborts a run at the next round boundary.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Requests cancellation.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`StopHandle::stop`] has been called.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

type Mailbox = BTreeMap<VertexId, Vec<PathToken>>;

/// One vertex invocation, borrowed from the coordinator for a single round.
struct Work<'a> {
    id: &'a VertexId,
    state: &'a VertexState,
    out_edges: &'a [VertexId],
    inbox: &'a [PathToken],
}

/// Drives one detection run over a [`CycleGraph`].
///
/// After a converged run the source is seeded and the buffers are empty, so
/// calling [`Coordinator::run`] again reports nothing. After a run cut short
/// by the superstep bound, calling it again resumes with the pending
/// messages and a fresh bound.
pub struct Coordinator {
    config: RunConfiguration,
    states: HashMap<VertexId, VertexState>,
    out_edges: HashMap<VertexId, Vec<VertexId>>,
    inbox: Mailbox,
    superstep: u64,
    messages_sent: u64,
    stop: StopHandle,
    pool: Option<rayon::ThreadPool>,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("config", &self.config)
            .field("vertices", &self.states.len())
            .field("superstep", &self.superstep)
            .field("pending", &self.inbox.len())
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Validates `config` against `graph` and initialises every vertex.
    ///
    /// # Errors
    ///
    /// - [`DetectError::Config`]: a bound is out of range.
    /// - [`DetectError::UnknownSource`]: the source is not a vertex.
    /// - [`DetectError::WorkerPool`]: the thread pool could not start.
    pub fn new(graph: &CycleGraph, config: RunConfiguration) -> Result<Self, DetectError> {
        config.validate()?;
        if graph.index_of(&config.source).is_none() {
            return Err(DetectError::UnknownSource(config.source));
        }

        let mut states = HashMap::with_capacity(graph.vertex_count());
        let mut out_edges = HashMap::with_capacity(graph.vertex_count());
        for idx in graph.vertex_indices() {
            let Some(id) = graph.vertex_id(idx) else {
                continue;
            };
            let targets: Vec<VertexId> = graph
                .successors(idx)
                .into_iter()
                .filter_map(|t| graph.vertex_id(t).cloned())
                .collect();
            states.insert(id.clone(), VertexState::new(&config.source));
            out_edges.insert(id.clone(), targets);
        }

        let pool = if config.workers > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.workers)
                    .thread_name(|i| format!("loopscan-worker-{i}"))
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self {
            config,
            states,
            out_edges,
            inbox: Mailbox::new(),
            superstep: 0,
            messages_sent: 0,
            stop: StopHandle::default(),
            pool,
        })
    }

    /// Returns a handle that cancels this run between rounds.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Current round counter.
    pub fn superstep(&self) -> u64 {
        self.superstep
    }

    /// The configuration in force.
    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    /// State of vertex `id`, if it exists.
    pub fn state(&self, id: &str) -> Option<&VertexState> {
        self.states.get(id)
    }

    /// Runs rounds until termination, feeding closed tokens to `collector`.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::Internal`] if a message is addressed to a
    /// vertex that has no state.
    pub fn run<S: CycleSink>(
        &mut self,
        collector: &mut CycleCollector<S>,
    ) -> Result<RunSummary, DetectError> {
        let superstep_before = self.superstep;
        let sent_before = self.messages_sent;
        let reported_before = collector.reported();
        let suppressed_before = collector.suppressed();

        let termination = loop {
            if self.stop.is_stopped() {
                break Termination::Cancelled;
            }
            if !self.has_work() {
                break Termination::Converged;
            }

            self.step(collector)?;

            if self.inbox.is_empty() {
                break Termination::Converged;
            }
            if self.superstep - superstep_before >= self.config.max_supersteps {
                warn!(
                    supersteps = self.superstep,
                    pending = self.inbox.len(),
                    "superstep limit reached with messages pending"
                );
                break Termination::SuperstepLimitReached;
            }
        };

        let summary = RunSummary {
            supersteps: self.superstep - superstep_before,
            termination,
            messages_sent: self.messages_sent - sent_before,
            cycles_reported: collector.reported() - reported_before,
            duplicates_suppressed: collector.suppressed() - suppressed_before,
        };
        info!(
            source = %self.config.source,
            supersteps = summary.supersteps,
            termination = %summary.termination,
            cycles = summary.cycles_reported,
            "detection run finished"
        );
        Ok(summary)
    }

    fn source_needs_seed(&self) -> bool {
        self.states
            .get(&self.config.source)
            .is_some_and(|s| needs_seed(&self.config.source, s, &self.config))
    }

    fn has_work(&self) -> bool {
        !self.inbox.is_empty() || self.source_needs_seed()
    }

    /// Executes one superstep: swap buffers, compute, merge at the barrier.
    fn step<S: CycleSink>(&mut self, collector: &mut CycleCollector<S>) -> Result<(), DetectError> {
        let mut current = std::mem::take(&mut self.inbox);
        if self.source_needs_seed() {
            current.entry(self.config.source.clone()).or_default();
        }
        let delivered: usize = current.values().map(Vec::len).sum();

        let (ids, outputs) = {
            let mut work = Vec::with_capacity(current.len());
            for (id, tokens) in &current {
                let (Some(state), Some(out_edges)) = (self.states.get(id), self.out_edges.get(id))
                else {
                    return Err(DetectError::Internal {
                        superstep: self.superstep,
                        detail: format!("message addressed to unknown vertex {id:?}"),
                    });
                };
                work.push(Work {
                    id,
                    state,
                    out_edges,
                    inbox: tokens,
                });
            }
            let outputs = self.execute(&work);
            let ids: Vec<VertexId> = work.iter().map(|w| w.id.clone()).collect();
            (ids, outputs)
        };

        let active = ids.len();
        let mut next = Mailbox::new();
        let mut emitted = 0usize;
        let mut closed = 0usize;
        for (id, output) in ids.into_iter().zip(outputs) {
            self.states.insert(id, output.state);
            emitted += output.messages.len();
            for message in output.messages {
                next.entry(message.target).or_default().push(message.payload);
            }
            for token in output.cycles {
                closed += 1;
                collector.collect(token);
            }
        }

        self.messages_sent += emitted as u64;
        self.inbox = next;
        self.superstep += 1;

        debug!(
            superstep = self.superstep,
            active,
            delivered,
            emitted,
            closed,
            "superstep complete"
        );
        Ok(())
    }

    fn execute(&self, work: &[Work<'_>]) -> Vec<ComputeOutput> {
        let config = &self.config;
        let run_one = |w: &Work<'_>| {
            compute(
                VertexContext {
                    id: w.id,
                    out_edges: w.out_edges,
                },
                w.state,
                w.inbox,
                config,
            )
        };
        match &self.pool {
            Some(pool) => pool.install(|| work.par_iter().map(run_one).collect()),
            None => work.iter().map(run_one).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience entry point
// ---------------------------------------------------------------------------

/// Builds the graph, runs detection, and returns the summary with the sink.
///
/// Configuration is validated before the dataset is inspected.
///
/// # Errors
///
/// Any [`DetectError`]; on error nothing has been sent to `sink`.
pub fn detect_cycles<S: CycleSink>(
    dataset: &Dataset,
    config: RunConfiguration,
    sink: S,
) -> Result<(RunSummary, S), DetectError> {
    config.validate()?;
    let graph = build_graph(dataset)?;
    let mut coordinator = Coordinator::new(&graph, config)?;
    let mut collector = CycleCollector::new(sink);
    let summary = coordinator.run(&mut collector)?;
    Ok((summary, collector.into_sink()))
}
