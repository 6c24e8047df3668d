//! k-subset flip graphs.
//!
//! Nodes are the k-element subsets of `{1..n}`; two subsets are one flip
//! apart when they share `k-1` elements. The flip swapping `a` out for `b`
//! is labeled by the transposition `(a b)`, the same in both directions.
//! All `n(n-1)/2` transpositions form the label set.

use std::fmt;

use crate::flip_graph::{ArcOrder, FlipGraph, FlipGraphBuilder, GraphError};
use crate::validate::FlipRule;

/// Sorted set of distinct elements from `1..=n`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subset(Vec<u32>);

impl Subset {
    /// Build from any element order; duplicates collapse.
    pub fn new(mut elems: Vec<u32>) -> Self {
        elems.sort_unstable();
        elems.dedup();
        Self(elems)
    }

    pub fn elements(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, x: u32) -> bool {
        self.0.binary_search(&x).is_ok()
    }

    /// `(left, entered)` if `other` differs from `self` by exactly one swapped element.
    fn swap_with(&self, other: &Subset) -> Option<(u32, u32)> {
        if self.len() != other.len() {
            return None;
        }
        let mut left = self.0.iter().filter(|x| !other.contains(**x));
        let mut entered = other.0.iter().filter(|x| !self.contains(**x));
        match (left.next(), left.next(), entered.next(), entered.next()) {
            (Some(&a), None, Some(&b), None) => Some((a, b)),
            _ => None,
        }
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, x) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{x}")?;
        }
        write!(f, "}}")
    }
}

/// Unordered pair `(a b)`, stored with `a < b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Transposition(u32, u32);

impl Transposition {
    pub fn new(a: u32, b: u32) -> Self {
        Self(a.min(b), a.max(b))
    }

    pub fn pair(self) -> (u32, u32) {
        (self.0, self.1)
    }
}

impl fmt::Display for Transposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.0, self.1)
    }
}

/// All k-subsets of `{1..n}` in lexicographic order.
pub fn combinations(n: u32, k: u32) -> Vec<Subset> {
    if k > n {
        return Vec::new();
    }
    let k = k as usize;
    let mut out = Vec::new();
    let mut cur: Vec<u32> = (1..=k as u32).collect();
    loop {
        out.push(Subset(cur.clone()));
        // rightmost position that can still move up
        let Some(t) = (0..k).rev().find(|&t| cur[t] < n - (k - 1 - t) as u32) else {
            return out;
        };
        cur[t] += 1;
        for i in t + 1..k {
            cur[i] = cur[i - 1] + 1;
        }
    }
}

/// Flip graph on the k-subsets of `{1..n}`.
///
/// Nodes follow [`combinations`] order; flips are added for node pairs
/// `i < j` in that order, so outgoing lists are ascending by target under
/// [`ArcOrder::Insertion`].
pub fn subset_flip_graph(
    n: u32,
    k: u32,
    order: ArcOrder,
) -> Result<FlipGraph<Subset, Transposition>, GraphError> {
    if n < 2 {
        return Err(GraphError::invalid("n must be at least 2"));
    }
    if k == 0 || k >= n {
        return Err(GraphError::invalid(format!("k must lie in 1..{n} (got {k})")));
    }
    let nodes = combinations(n, k);
    let labels = combinations(n, 2)
        .into_iter()
        .map(|p| Transposition::new(p.0[0], p.0[1]));
    let mut b = FlipGraphBuilder::new()
        .with_labels(labels)
        .with_arc_order(order);
    for node in &nodes {
        b.add_node(node.clone());
    }
    for (i, u) in nodes.iter().enumerate() {
        for v in &nodes[i + 1..] {
            if let Some((a, c)) = u.swap_with(v) {
                let t = Transposition::new(a, c);
                b.add_flip(u.clone(), v.clone(), t, t);
            }
        }
    }
    b.build()
}

/// Flip rule for the k-subset domain, used by the validator.
#[derive(Clone, Copy, Debug)]
pub struct KSubsetRule {
    pub n: u32,
    pub k: u32,
}

impl FlipRule for KSubsetRule {
    type Node = Subset;
    type Label = Transposition;

    fn labels(&self) -> Vec<Transposition> {
        combinations(self.n, 2)
            .into_iter()
            .map(|p| Transposition::new(p.0[0], p.0[1]))
            .collect()
    }

    fn flip_label(&self, from: &Subset, to: &Subset) -> Option<Transposition> {
        let in_range = |s: &Subset| {
            s.len() == self.k as usize && s.0.iter().all(|&x| (1..=self.n).contains(&x))
        };
        if !in_range(from) || !in_range(to) {
            return None;
        }
        from.swap_with(to).map(|(a, b)| Transposition::new(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flip_graph::NodeId;

    fn s(elems: &[u32]) -> Subset {
        Subset::new(elems.to_vec())
    }

    #[test]
    fn combinations_are_lexicographic() {
        let c = combinations(4, 2);
        let want = [[1, 2], [1, 3], [1, 4], [2, 3], [2, 4], [3, 4]];
        assert_eq!(c.len(), want.len());
        for (got, w) in c.iter().zip(want) {
            assert_eq!(got.elements(), &w);
        }
        assert_eq!(combinations(5, 3).len(), 10);
        assert_eq!(combinations(3, 3), vec![s(&[1, 2, 3])]);
        assert!(combinations(2, 3).is_empty());
    }

    #[test]
    fn subset_graph_shape() {
        let g = subset_flip_graph(5, 2, ArcOrder::Insertion).unwrap();
        assert_eq!(g.node_count(), 10);
        assert_eq!(g.label_count(), 10);
        // J(5,2): every node has 2*(5-2) = 6 neighbours
        for n in g.node_ids() {
            assert_eq!(g.outgoing(n).len(), 6);
        }
        let out: Vec<&Subset> = g.outgoing(NodeId(0)).iter().map(|a| g.node(a.to)).collect();
        assert_eq!(out[0], &s(&[1, 3]));
        assert_eq!(out[1], &s(&[1, 4]));
        let first = g.outgoing(NodeId(0))[0];
        assert_eq!(g.label(first.label), &Transposition::new(3, 2));
        assert_eq!(first.label, g.reverse(first).label);
    }

    #[test]
    fn subset_graph_rejects_bad_params() {
        assert!(matches!(
            subset_flip_graph(4, 0, ArcOrder::Insertion),
            Err(GraphError::InvalidParams { .. })
        ));
        assert!(matches!(
            subset_flip_graph(4, 4, ArcOrder::Insertion),
            Err(GraphError::InvalidParams { .. })
        ));
        assert!(subset_flip_graph(1, 1, ArcOrder::Insertion).is_err());
    }

    #[test]
    fn rule_labels_single_swaps_only() {
        let rule = KSubsetRule { n: 5, k: 3 };
        assert_eq!(
            rule.flip_label(&s(&[1, 2, 3]), &s(&[1, 2, 5])),
            Some(Transposition::new(3, 5))
        );
        assert_eq!(rule.flip_label(&s(&[1, 2, 3]), &s(&[1, 4, 5])), None);
        assert_eq!(rule.flip_label(&s(&[1, 2, 3]), &s(&[1, 2, 3])), None);
        assert_eq!(rule.flip_label(&s(&[1, 2, 3]), &s(&[1, 2, 9])), None);
        assert_eq!(rule.labels().len(), 10);
        assert_eq!(s(&[3, 1, 2]).to_string(), "{1,2,3}");
        assert_eq!(Transposition::new(4, 2).to_string(), "(2 4)");
    }
}
