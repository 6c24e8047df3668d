//! Graph construction with fail-fast validation.
//!
//! Collaborators describe a graph by node payloads and flips (one flip = the
//! two arcs `a → b` and `b → a`, each with its own label). `build` checks the
//! whole description before any search can see it.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::types::{Arc, ArcId, FlipGraph, LabelId, NodeId};

/// Errors surfaced while building a flip graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The builder has no nodes.
    Empty,
    /// Node payload `node` (insertion ordinal) equals an earlier payload.
    DuplicateNode { node: usize },
    /// Flip `flip` (insertion ordinal) names an endpoint that is not a node.
    UnknownNode { flip: usize },
    /// Flip `flip` connects a node to itself.
    SelfLoop { flip: usize },
    /// Flip `flip` uses a label outside the declared label set.
    UnknownLabel { flip: usize },
    /// Two arcs share endpoints and label.
    DuplicateArc {
        from: NodeId,
        to: NodeId,
        label: LabelId,
    },
    /// Domain generator parameters are out of range.
    InvalidParams { reason: String },
}

impl GraphError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "flip graph has no nodes"),
            Self::DuplicateNode { node } => {
                write!(f, "node {node} duplicates an earlier node (value equality)")
            }
            Self::UnknownNode { flip } => {
                write!(f, "flip {flip} references a node outside the node set")
            }
            Self::SelfLoop { flip } => write!(f, "flip {flip} connects a node to itself"),
            Self::UnknownLabel { flip } => {
                write!(f, "flip {flip} uses a label outside the declared label set")
            }
            Self::DuplicateArc { from, to, label } => write!(
                f,
                "duplicate arc {from} -> {to} with label {}",
                label.0
            ),
            Self::InvalidParams { reason } => write!(f, "invalid graph params: {reason}"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Order in which each node's outgoing arcs are handed to the search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArcOrder {
    /// Flip insertion order.
    #[default]
    Insertion,
    /// A reproducible permutation of every outgoing list.
    Shuffled { seed: u64 },
}

struct Flip<N, L> {
    a: N,
    b: N,
    label_ab: L,
    label_ba: L,
}

/// Collects nodes and flips, then validates them into a [`FlipGraph`].
pub struct FlipGraphBuilder<N, L> {
    nodes: Vec<N>,
    declared_labels: Option<Vec<L>>,
    flips: Vec<Flip<N, L>>,
    order: ArcOrder,
}

impl<N, L> Default for FlipGraphBuilder<N, L> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            declared_labels: None,
            flips: Vec::new(),
            order: ArcOrder::Insertion,
        }
    }
}

impl<N, L> FlipGraphBuilder<N, L>
where
    N: Clone + Eq + Hash,
    L: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the label set up front. Flips using other labels fail the build.
    /// Declared labels take the first indices, in the given order.
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = L>) -> Self {
        self.declared_labels = Some(labels.into_iter().collect());
        self
    }

    pub fn with_arc_order(mut self, order: ArcOrder) -> Self {
        self.order = order;
        self
    }

    pub fn add_node(&mut self, node: N) {
        self.nodes.push(node);
    }

    /// Record the flip `a ↔ b`: arc `a → b` labeled `label_ab` and arc
    /// `b → a` labeled `label_ba`.
    pub fn add_flip(&mut self, a: N, b: N, label_ab: L, label_ba: L) {
        self.flips.push(Flip {
            a,
            b,
            label_ab,
            label_ba,
        });
    }

    pub fn build(self) -> Result<FlipGraph<N, L>, GraphError> {
        if self.nodes.is_empty() {
            return Err(GraphError::Empty);
        }
        let mut node_index: HashMap<N, NodeId> = HashMap::with_capacity(self.nodes.len());
        for (i, n) in self.nodes.iter().enumerate() {
            if node_index.insert(n.clone(), NodeId(i)).is_some() {
                return Err(GraphError::DuplicateNode { node: i });
            }
        }

        let strict = self.declared_labels.is_some();
        let mut labels: Vec<L> = Vec::new();
        let mut label_index: HashMap<L, LabelId> = HashMap::new();
        for l in self.declared_labels.into_iter().flatten() {
            if !label_index.contains_key(&l) {
                label_index.insert(l.clone(), LabelId(labels.len()));
                labels.push(l);
            }
        }
        let mut intern = |l: &L, flip: usize| -> Result<LabelId, GraphError> {
            if let Some(&id) = label_index.get(l) {
                return Ok(id);
            }
            if strict {
                return Err(GraphError::UnknownLabel { flip });
            }
            let id = LabelId(labels.len());
            labels.push(l.clone());
            label_index.insert(l.clone(), id);
            Ok(id)
        };

        let mut arcs: Vec<Arc> = Vec::with_capacity(2 * self.flips.len());
        let mut reverse: Vec<ArcId> = Vec::with_capacity(2 * self.flips.len());
        let mut seen: HashSet<(NodeId, NodeId, LabelId)> = HashSet::new();
        for (i, flip) in self.flips.iter().enumerate() {
            let (Some(&a), Some(&b)) = (node_index.get(&flip.a), node_index.get(&flip.b)) else {
                return Err(GraphError::UnknownNode { flip: i });
            };
            if a == b {
                return Err(GraphError::SelfLoop { flip: i });
            }
            let l_ab = intern(&flip.label_ab, i)?;
            let l_ba = intern(&flip.label_ba, i)?;
            for (from, to, label) in [(a, b, l_ab), (b, a, l_ba)] {
                if !seen.insert((from, to, label)) {
                    return Err(GraphError::DuplicateArc { from, to, label });
                }
            }
            let fwd = ArcId(arcs.len());
            let bwd = ArcId(arcs.len() + 1);
            arcs.push(Arc {
                from: a,
                to: b,
                label: l_ab,
                id: fwd,
            });
            arcs.push(Arc {
                from: b,
                to: a,
                label: l_ba,
                id: bwd,
            });
            reverse.push(bwd);
            reverse.push(fwd);
        }

        let mut outgoing: Vec<Vec<Arc>> = vec![Vec::new(); self.nodes.len()];
        for a in &arcs {
            outgoing[a.from.0].push(*a);
        }
        if let ArcOrder::Shuffled { seed } = self.order {
            let mut rng = StdRng::seed_from_u64(seed);
            for out in outgoing.iter_mut() {
                out.shuffle(&mut rng);
            }
        }

        Ok(FlipGraph {
            nodes: self.nodes,
            labels,
            arcs,
            reverse,
            outgoing,
            node_index,
            label_index,
        })
    }
}
