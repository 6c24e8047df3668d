//! Data types for the flip graph and the cycles found on it.
//!
//! Kept small and explicit so `build` and the search modules stay easy to read.
//! Nodes and labels are stored once by value; everything downstream works on
//! dense ordinal ids.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Identifier types for clarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArcId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Directed, labeled arc `from → to`.
///
/// Field order is the total order used for canonical rotation: endpoints
/// first, then label, then the arc id as a final tie-break between parallel arcs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Arc {
    pub from: NodeId,
    pub to: NodeId,
    pub label: LabelId,
    pub id: ArcId,
}

/// Closed walk given as its arc sequence; arc `i` ends where arc `i+1` starts
/// and the last arc returns to the first arc's origin.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cycle {
    arcs: Vec<Arc>,
}

impl Cycle {
    /// Wrap an arc sequence, checking that it is a non-empty closed walk.
    pub fn closed(arcs: Vec<Arc>) -> Option<Self> {
        let first = arcs.first()?;
        let chained = arcs.windows(2).all(|w| w[0].to == w[1].from);
        let last = arcs[arcs.len() - 1];
        (chained && last.to == first.from).then_some(Self { arcs })
    }

    /// Search-internal constructor: the path stack is closed by construction.
    pub(crate) fn from_path(arcs: Vec<Arc>) -> Self {
        debug_assert!(Self::closed(arcs.clone()).is_some(), "path is not closed");
        Self { arcs }
    }

    #[inline]
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Node the walk starts (and ends) at.
    pub fn start(&self) -> NodeId {
        self.arcs[0].from
    }

    /// Visited nodes in walk order; the closing return to the start is not repeated.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.arcs.iter().map(|a| a.from)
    }

    pub fn labels(&self) -> impl Iterator<Item = LabelId> + '_ {
        self.arcs.iter().map(|a| a.label)
    }

    /// Same walk started `k` arcs later.
    pub fn rotated(&self, k: usize) -> Self {
        let mut arcs = self.arcs.clone();
        arcs.rotate_left(k % self.arcs.len().max(1));
        Self { arcs }
    }
}

/// Labeled flip graph.
///
/// # Invariants
/// - `nodes[i]` is the payload of `NodeId(i)`; payloads are pairwise distinct.
/// - `arcs[i].id == ArcId(i)` and both endpoints are valid node ids.
/// - `reverse[i]` is the partner arc of the same flip traversed the other way.
/// - `outgoing[n]` lists the arcs leaving `n` in search order.
/// - The label set (`labels`) is fixed once built.
#[derive(Clone, Debug)]
pub struct FlipGraph<N, L> {
    pub(super) nodes: Vec<N>,
    pub(super) labels: Vec<L>,
    pub(super) arcs: Vec<Arc>,
    pub(super) reverse: Vec<ArcId>,
    pub(super) outgoing: Vec<Vec<Arc>>,
    pub(super) node_index: HashMap<N, NodeId>,
    pub(super) label_index: HashMap<L, LabelId>,
}

impl<N, L> FlipGraph<N, L> {
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
    #[inline]
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
    #[inline]
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn node(&self, id: NodeId) -> &N {
        &self.nodes[id.0]
    }
    pub fn label(&self, id: LabelId) -> &L {
        &self.labels[id.0]
    }
    pub fn arc(&self, id: ArcId) -> Arc {
        self.arcs[id.0]
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }
    pub fn labels(&self) -> &[L] {
        &self.labels
    }
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    /// Arcs leaving `node`, in the fixed order the search consumes them.
    #[inline]
    pub fn outgoing(&self, node: NodeId) -> &[Arc] {
        &self.outgoing[node.0]
    }

    /// Partner arc: the same flip traversed in the opposite direction.
    #[inline]
    pub fn reverse(&self, arc: Arc) -> Arc {
        self.arcs[self.reverse[arc.id.0].0]
    }

    /// The cycle walked backwards over partner arcs.
    pub fn reverse_cycle(&self, cycle: &Cycle) -> Cycle {
        let arcs = cycle.arcs().iter().rev().map(|&a| self.reverse(a)).collect();
        Cycle::from_path(arcs)
    }

    /// Nodes entered by at least one arc carrying `label`, ascending by id.
    ///
    /// Every cycle that uses `label` passes through one of these nodes.
    pub fn nodes_entered_by(&self, label: LabelId) -> Vec<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        for a in self.arcs.iter().filter(|a| a.label == label) {
            seen[a.to.0] = true;
        }
        self.node_ids().filter(|n| seen[n.0]).collect()
    }

    /// Payloads of the nodes a cycle visits, in walk order.
    pub fn cycle_nodes(&self, cycle: &Cycle) -> Vec<&N> {
        cycle.nodes().map(|n| self.node(n)).collect()
    }
}

impl<N: Eq + Hash, L: Eq + Hash> FlipGraph<N, L> {
    /// Lookup by value equality.
    pub fn node_id(&self, node: &N) -> Option<NodeId> {
        self.node_index.get(node).copied()
    }
    pub fn label_id(&self, label: &L) -> Option<LabelId> {
        self.label_index.get(label).copied()
    }
}
