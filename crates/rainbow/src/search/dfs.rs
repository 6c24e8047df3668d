//! Rainbow-cycle search from one start node, as an explicit state machine.
//!
//! State
//! - `path`: the arcs chosen so far (the stack).
//! - `usage[l]`: how often label `l` occurs on `path`; never exceeds `r`.
//! - `cursor[n]`: how far node `n`'s outgoing list has been consumed.
//!
//! Frontier policy
//! - Arriving at a node by a forward step resets its cursor to zero, so the
//!   node offers all of its arcs again in the new context.
//! - Returning to a node by backtracking keeps its cursor, so options already
//!   tried from that node in the current context are not retried.
//!
//! The loop halts: every step either consumes a frontier entry or pops the
//! path, and the path length is bounded by `|L| * r`.

use std::ops::ControlFlow;

use crate::flip_graph::{Arc, Cycle, FlipGraph, NodeId};

/// Counters for one search run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Frontier entries consumed.
    pub arcs_tried: u64,
    /// Forward steps onto a new node.
    pub advances: u64,
    /// Arcs popped after a node ran out of options.
    pub backtracks: u64,
    /// Complete rainbow cycles handed to the visitor.
    pub emitted: usize,
}

impl SearchStats {
    pub fn merge(self, other: SearchStats) -> SearchStats {
        SearchStats {
            arcs_tried: self.arcs_tried + other.arcs_tried,
            advances: self.advances + other.advances,
            backtracks: self.backtracks + other.backtracks,
            emitted: self.emitted + other.emitted,
        }
    }
}

/// First rainbow cycle through `start` in exploration order, if any.
///
/// Every label of `graph` is used exactly `r` times; no node repeats except
/// the start closing the walk. A `start` outside the graph has no cycle.
pub fn search<N, L>(graph: &FlipGraph<N, L>, start: NodeId, r: usize) -> Option<Cycle> {
    let mut found = None;
    search_each(graph, start, r, |cycle| {
        found = Some(cycle);
        ControlFlow::Break(())
    });
    found
}

/// Hand every rainbow cycle through `start` to `visit`, in exploration order,
/// until the search space is exhausted or `visit` breaks.
///
/// After a cycle is visited with `Continue`, its closing arc is undone and the
/// search resumes as if that arc had been rejected. A `start` outside the
/// graph visits nothing and returns zeroed stats.
pub fn search_each<N, L, F>(
    graph: &FlipGraph<N, L>,
    start: NodeId,
    r: usize,
    visit: F,
) -> SearchStats
where
    F: FnMut(Cycle) -> ControlFlow<()>,
{
    if start.0 >= graph.node_count() {
        return SearchStats::default();
    }
    Runner::new(graph, start, r).run(visit)
}

/// Outcome of a single step of the state machine.
enum Step {
    Continue,
    Closed,
    Exhausted,
}

struct Runner<'a, N, L> {
    g: &'a FlipGraph<N, L>,
    start: NodeId,
    r: usize,
    target_len: usize,
    current: NodeId,
    path: Vec<Arc>,
    usage: Vec<usize>,
    cursor: Vec<usize>,
    on_path: Vec<bool>,
    stats: SearchStats,
}

impl<'a, N, L> Runner<'a, N, L> {
    fn new(g: &'a FlipGraph<N, L>, start: NodeId, r: usize) -> Self {
        let target_len = g.label_count() * r;
        Self {
            g,
            start,
            r,
            target_len,
            current: start,
            path: Vec::with_capacity(target_len),
            usage: vec![0; g.label_count()],
            cursor: vec![0; g.node_count()],
            on_path: vec![false; g.node_count()],
            stats: SearchStats::default(),
        }
    }

    fn run<F>(mut self, mut visit: F) -> SearchStats
    where
        F: FnMut(Cycle) -> ControlFlow<()>,
    {
        loop {
            match self.step() {
                Step::Continue => {}
                Step::Exhausted => return self.stats,
                Step::Closed => {
                    self.stats.emitted += 1;
                    if visit(Cycle::from_path(self.path.clone())).is_break() {
                        return self.stats;
                    }
                    self.undo_closing_arc();
                }
            }
        }
    }

    fn step(&mut self) -> Step {
        let g = self.g;
        let Some(&arc) = g.outgoing(self.current).get(self.cursor[self.current.0]) else {
            return self.backtrack();
        };
        self.cursor[self.current.0] += 1;
        self.stats.arcs_tried += 1;

        let closes = arc.to == self.start;
        if !closes && self.on_path[arc.to.0] {
            return Step::Continue;
        }
        if self.usage[arc.label.0] >= self.r {
            return Step::Continue;
        }
        self.usage[arc.label.0] += 1;
        self.path.push(arc);

        if closes {
            if self.path.len() == self.target_len {
                return Step::Closed;
            }
            // Premature return to the start: reject and keep scanning.
            self.undo_closing_arc();
            return Step::Continue;
        }

        self.on_path[arc.to.0] = true;
        self.current = arc.to;
        self.cursor[self.current.0] = 0;
        self.stats.advances += 1;
        Step::Continue
    }

    /// Current node has no options left: retreat one arc, or stop at the start.
    fn backtrack(&mut self) -> Step {
        let Some(p) = self.path.pop() else {
            return Step::Exhausted;
        };
        self.usage[p.label.0] -= 1;
        self.on_path[p.to.0] = false;
        self.current = p.from;
        self.stats.backtracks += 1;
        Step::Continue
    }

    fn undo_closing_arc(&mut self) {
        if let Some(p) = self.path.pop() {
            self.usage[p.label.0] -= 1;
        }
    }
}
