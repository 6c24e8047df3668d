//! Canonical cycle form and the shared set of accepted cycles.
//!
//! A cycle is stored rotated to start at its smallest arc (arcs order by
//! endpoints, then label, then id). Two cycles are the same physical cycle
//! when their canonical forms agree, or when one is the canonical form of the
//! other walked backwards over partner arcs.

use std::collections::HashSet;
use std::io;
use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

use crate::flip_graph::{Cycle, FlipGraph};

/// Rotate `cycle` so it begins at its minimal arc.
pub fn canonical_rotation(cycle: &Cycle) -> Cycle {
    let offset = cycle
        .arcs()
        .iter()
        .enumerate()
        .min_by_key(|(_, a)| **a)
        .map_or(0, |(i, _)| i);
    cycle.rotated(offset)
}

/// Receives each accepted cycle while the result set is locked.
///
/// `ordinal` is the 1-based acceptance index. A failing sink is logged and
/// does not undo the acceptance.
pub trait CycleSink: Send {
    fn accept(&mut self, ordinal: usize, cycle: &Cycle) -> io::Result<()>;
}

struct Accepted<'s> {
    ordered: Vec<Cycle>,
    keys: HashSet<Cycle>,
    sink: Option<&'s mut dyn CycleSink>,
}

/// Cycles accepted during one run, in acceptance order.
///
/// All reads and writes go through one mutex; duplicate check, insertion and
/// the sink call happen under the same lock.
pub struct FoundCycleSet<'s> {
    inner: Mutex<Accepted<'s>>,
}

impl Default for FoundCycleSet<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'s> FoundCycleSet<'s> {
    pub fn new() -> Self {
        Self::from_sink(None)
    }

    pub fn with_sink(sink: &'s mut dyn CycleSink) -> Self {
        Self::from_sink(Some(sink))
    }

    pub(crate) fn from_sink(sink: Option<&'s mut dyn CycleSink>) -> Self {
        Self {
            inner: Mutex::new(Accepted {
                ordered: Vec::new(),
                keys: HashSet::new(),
                sink,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Accepted<'s>> {
        // A panicking sink cannot leave `ordered`/`keys` half-updated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert `cycle` unless it, a rotation of it, or its reverse traversal is
    /// already present. Returns `true` if the cycle was new.
    pub fn canonicalize_and_insert<N, L>(&self, graph: &FlipGraph<N, L>, cycle: &Cycle) -> bool {
        let canonical = canonical_rotation(cycle);
        let mirrored = canonical_rotation(&graph.reverse_cycle(cycle));

        let mut acc = self.lock();
        if acc.keys.contains(&canonical) || acc.keys.contains(&mirrored) {
            return false;
        }
        acc.keys.insert(canonical.clone());
        acc.ordered.push(canonical);
        let ordinal = acc.ordered.len();
        info!(ordinal, len = cycle.len(), "rainbow cycle accepted");

        let Accepted { ordered, sink, .. } = &mut *acc;
        if let (Some(sink), Some(last)) = (sink.as_mut(), ordered.last()) {
            if let Err(err) = sink.accept(ordinal, last) {
                warn!(ordinal, %err, "cycle sink failed");
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.lock().ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the accepted cycles in acceptance order.
    pub fn snapshot(&self) -> Vec<Cycle> {
        self.lock().ordered.clone()
    }

    pub fn into_cycles(self) -> Vec<Cycle> {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .ordered
    }
}
