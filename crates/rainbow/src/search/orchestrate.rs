//! Parallel multi-start runner.
//!
//! One scoped thread per selected start node. Workers share the read-only
//! graph and the [`FoundCycleSet`]; everything else (path, label usage,
//! frontier cursors) is private to each worker. The run returns once every
//! worker has either succeeded or exhausted its search space; there is no
//! cancellation.

use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use tracing::{debug, info, info_span};

use super::canon::{CycleSink, FoundCycleSet};
use super::dfs::{search_each, SearchStats};
use crate::flip_graph::{Cycle, FlipGraph, LabelId, NodeId};

/// How start nodes are chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartPolicy {
    /// `count` nodes spread evenly over the node order.
    EvenlySpaced(usize),
    /// The smallest set of nodes entered by arcs of one common label. Every
    /// rainbow cycle passes through this set, so an empty set (a label
    /// with no arcs) yields a run without workers and without cycles.
    SharedLabel,
    /// Every node.
    All,
    /// Exactly these nodes, in this order.
    Explicit(Vec<NodeId>),
}

/// What a worker does after its first success.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Stop after the first rainbow cycle.
    #[default]
    FirstFound,
    /// Keep going until the search space from the start is exhausted.
    Exhaustive,
}

/// Run configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunCfg {
    /// Required multiplicity of every label; must be positive.
    pub r: usize,
    pub starts: StartPolicy,
    pub mode: SearchMode,
}

impl Default for RunCfg {
    fn default() -> Self {
        Self {
            r: 1,
            starts: StartPolicy::EvenlySpaced(5),
            mode: SearchMode::FirstFound,
        }
    }
}

/// Errors rejected before any worker starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// `r` must be at least 1.
    InvalidMultiplicity { r: usize },
    /// An explicit start id is not a node of the graph.
    UnknownStart { node: NodeId },
    /// The policy selected no start nodes.
    NoStarts,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMultiplicity { r } => {
                write!(f, "label multiplicity r must be positive (got {r})")
            }
            Self::UnknownStart { node } => write!(f, "start node {node} is not in the graph"),
            Self::NoStarts => write!(f, "start policy selected no nodes"),
        }
    }
}

impl std::error::Error for RunError {}

/// Per-worker outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: usize,
    pub start: NodeId,
    /// Cycles this worker handed to the result set that were new.
    pub accepted: usize,
    pub stats: SearchStats,
}

/// Result of a run: accepted cycles in acceptance order plus worker reports
/// ordered by worker index.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub cycles: Vec<Cycle>,
    pub workers: Vec<WorkerReport>,
}

impl RunReport {
    pub fn stats(&self) -> SearchStats {
        self.workers
            .iter()
            .fold(SearchStats::default(), |acc, w| acc.merge(w.stats))
    }
}

/// Run-scoped worker counters.
#[derive(Default)]
struct RunContext {
    started: AtomicUsize,
    running: AtomicUsize,
}

/// Resolve a start policy against `graph`.
///
/// Fails with [`RunError::NoStarts`] when the policy selects nothing, except
/// for [`StartPolicy::SharedLabel`] on a non-empty graph, where an empty
/// selection means no rainbow cycle exists.
pub fn select_starts<N, L>(
    graph: &FlipGraph<N, L>,
    policy: &StartPolicy,
) -> Result<Vec<NodeId>, RunError> {
    let n = graph.node_count();
    let starts = match policy {
        StartPolicy::EvenlySpaced(count) => {
            let count = (*count).min(n);
            let mut ids: Vec<NodeId> = (0..count).map(|i| NodeId(i * n / count)).collect();
            ids.dedup();
            ids
        }
        StartPolicy::SharedLabel => {
            let mut best: Option<Vec<NodeId>> = None;
            for l in 0..graph.label_count() {
                let entered = graph.nodes_entered_by(LabelId(l));
                if best.as_ref().map_or(true, |b| entered.len() < b.len()) {
                    best = Some(entered);
                }
            }
            // A label without arcs rules out every rainbow cycle: nothing to
            // search, but the selection itself is valid.
            if n > 0 {
                return Ok(best.unwrap_or_default());
            }
            Vec::new()
        }
        StartPolicy::All => graph.node_ids().collect(),
        StartPolicy::Explicit(ids) => {
            if let Some(&node) = ids.iter().find(|id| id.0 >= n) {
                return Err(RunError::UnknownStart { node });
            }
            ids.clone()
        }
    };
    if starts.is_empty() {
        return Err(RunError::NoStarts);
    }
    Ok(starts)
}

/// Search for rainbow cycles from several start nodes in parallel.
///
/// Accepted cycles are canonicalized and deduplicated (rotation and reverse
/// traversal); `sink`, if given, sees each accepted cycle once, inside the
/// result-set lock. Of several equivalent cycles, the first one inserted
/// survives.
pub fn find_rainbow_cycles<N, L>(
    graph: &FlipGraph<N, L>,
    cfg: &RunCfg,
    sink: Option<&mut dyn CycleSink>,
) -> Result<RunReport, RunError>
where
    N: Sync,
    L: Sync,
{
    if cfg.r == 0 {
        return Err(RunError::InvalidMultiplicity { r: cfg.r });
    }
    let starts = select_starts(graph, &cfg.starts)?;
    let found = FoundCycleSet::from_sink(sink);
    let ctx = RunContext::default();
    let total = starts.len();
    info!(
        workers = total,
        r = cfg.r,
        labels = graph.label_count(),
        nodes = graph.node_count(),
        "starting rainbow cycle search"
    );

    let workers = thread::scope(|scope| {
        let handles: Vec<_> = starts
            .iter()
            .enumerate()
            .map(|(worker, &start)| {
                let (found, ctx) = (&found, &ctx);
                scope.spawn(move || run_worker(graph, cfg, found, ctx, worker, start, total))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect::<Vec<_>>()
    });

    let cycles = found.into_cycles();
    info!(accepted = cycles.len(), "rainbow cycle search finished");
    Ok(RunReport { cycles, workers })
}

fn run_worker<N, L>(
    graph: &FlipGraph<N, L>,
    cfg: &RunCfg,
    found: &FoundCycleSet<'_>,
    ctx: &RunContext,
    worker: usize,
    start: NodeId,
    total: usize,
) -> WorkerReport {
    let _span = info_span!("worker", worker, start = start.0).entered();
    let started = ctx.started.fetch_add(1, Ordering::Relaxed) + 1;
    ctx.running.fetch_add(1, Ordering::Relaxed);
    debug!(started, total, "worker started");

    let mut accepted = 0;
    let stats = search_each(graph, start, cfg.r, |cycle| {
        if found.canonicalize_and_insert(graph, &cycle) {
            accepted += 1;
        }
        match cfg.mode {
            SearchMode::FirstFound => ControlFlow::Break(()),
            SearchMode::Exhaustive => ControlFlow::Continue(()),
        }
    });

    let running = ctx.running.fetch_sub(1, Ordering::Relaxed) - 1;
    debug!(
        running,
        emitted = stats.emitted,
        accepted,
        arcs_tried = stats.arcs_tried,
        "worker finished"
    );
    WorkerReport {
        worker,
        start,
        accepted,
        stats,
    }
}
