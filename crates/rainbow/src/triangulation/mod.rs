//! Triangulation flip graphs over a fixed planar point set.
//!
//! Purpose
//! - Nodes are triangulations (edge sets over shared point indices); a flip
//!   removes one diagonal `d1` and inserts the crossing diagonal `d2`.
//! - The arc `T1 → T2` is labeled by the entering diagonal `d2`, the arc
//!   `T2 → T1` by `d1`. The labels of a flip therefore differ by direction.
//!
//! Conventions
//! - Triangulation equality is edge-set equality on point indices. Coordinates
//!   are only used for the crossing predicates, so coincident points under
//!   different indices stay distinct nodes.
//!
//! Layout: `geometry.rs` (points, segments, crossing test), `parse.rs`
//! (text input).

mod geometry;
mod parse;

use std::collections::BTreeSet;
use std::fmt;

use crate::flip_graph::{ArcOrder, FlipGraph, FlipGraphBuilder, GraphError};
use crate::validate::FlipRule;

pub use geometry::{convex_polygon, segments_intersect, Point, Segment};
pub use parse::{parse_triangulations, ParseError};

/// Triangulation as its full edge set (hull edges included).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triangulation {
    edges: BTreeSet<Segment>,
}

impl Triangulation {
    pub fn from_edges(edges: impl IntoIterator<Item = Segment>) -> Self {
        Self {
            edges: edges.into_iter().collect(),
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        self.edges.iter().copied()
    }

    pub fn contains(&self, s: Segment) -> bool {
        self.edges.contains(&s)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl fmt::Display for Triangulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.edges.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{e}")?;
        }
        write!(f, "]")
    }
}

/// `(d1, d2)` if `to` arises from `from` by flipping `d1` out and `d2` in.
///
/// Requires exactly one edge swapped, `d1` and `d2` crossing, and `d2`
/// crossing no other edge of `from`. Edges naming missing points never flip.
pub fn flip_between(
    points: &[Point],
    from: &Triangulation,
    to: &Triangulation,
) -> Option<(Segment, Segment)> {
    let in_range = |t: &Triangulation| t.edges().all(|s| s.endpoints().1 < points.len());
    if !in_range(from) || !in_range(to) {
        return None;
    }
    let mut removed = from.edges.difference(&to.edges);
    let mut added = to.edges.difference(&from.edges);
    let (Some(&d1), None, Some(&d2), None) =
        (removed.next(), removed.next(), added.next(), added.next())
    else {
        return None;
    };
    if !segments_intersect(points, d1, d2) {
        return None;
    }
    let blocked = from
        .edges()
        .filter(|&e| e != d1)
        .any(|e| segments_intersect(points, d2, e));
    (!blocked).then_some((d1, d2))
}

/// All triangulations of the convex polygon `0..n` (hull edges included).
///
/// Order: apex `k` of the triangle on the base edge `(0, n-1)` ascending,
/// then left sub-polygon, then right sub-polygon.
pub fn convex_triangulations(n: usize) -> Vec<Triangulation> {
    if n < 3 {
        return Vec::new();
    }
    let verts: Vec<usize> = (0..n).collect();
    let hull: Vec<Segment> = (0..n).map(|i| Segment::new(i, (i + 1) % n)).collect();
    triangulate(&verts)
        .into_iter()
        .map(|mut diagonals| {
            diagonals.extend(hull.iter().copied());
            Triangulation { edges: diagonals }
        })
        .collect()
}

/// Diagonal sets triangulating the convex chain `vs` closed by `(first, last)`.
fn triangulate(vs: &[usize]) -> Vec<BTreeSet<Segment>> {
    if vs.len() <= 3 {
        return vec![BTreeSet::new()];
    }
    let (first, last) = (vs[0], vs[vs.len() - 1]);
    let mut out = Vec::new();
    for i in 1..vs.len() - 1 {
        let apex = vs[i];
        let left = triangulate(&vs[..=i]);
        let right = triangulate(&vs[i..]);
        for l in &left {
            for r in &right {
                let mut e: BTreeSet<Segment> = l.union(r).copied().collect();
                if i > 1 {
                    e.insert(Segment::new(first, apex));
                }
                if i < vs.len() - 2 {
                    e.insert(Segment::new(apex, last));
                }
                out.push(e);
            }
        }
    }
    out
}

/// Flip graph over `triangulations` of `points`.
///
/// Triangulations become nodes in the given order. Each new triangulation is
/// compared with all earlier ones; a flip `earlier → new` gets the entering
/// diagonal as label and the reverse arc the leaving one. Labels are indexed
/// by first appearance.
pub fn triangulation_flip_graph(
    points: &[Point],
    triangulations: &[Triangulation],
    order: ArcOrder,
) -> Result<FlipGraph<Triangulation, Segment>, GraphError> {
    if let Some(bad) = triangulations
        .iter()
        .flat_map(|t| t.edges())
        .find(|s| s.endpoints().1 >= points.len())
    {
        return Err(GraphError::invalid(format!(
            "segment {bad} references a missing point"
        )));
    }
    let mut b = FlipGraphBuilder::new().with_arc_order(order);
    for (j, g) in triangulations.iter().enumerate() {
        for v in &triangulations[..j] {
            if let Some((d1, d2)) = flip_between(points, v, g) {
                b.add_flip(v.clone(), g.clone(), d2, d1);
            }
        }
        b.add_node(g.clone());
    }
    b.build()
}

/// Flip rule over a fixed set of triangulations of one point set.
///
/// The label set is every diagonal that leaves or enters some flip between
/// two of the given triangulations, in the order [`triangulation_flip_graph`]
/// assigns label ids.
#[derive(Clone, Debug)]
pub struct TriangulationRule {
    points: Vec<Point>,
    labels: Vec<Segment>,
}

impl TriangulationRule {
    pub fn new(points: Vec<Point>, triangulations: &[Triangulation]) -> Self {
        let mut labels = Vec::new();
        let mut seen = BTreeSet::new();
        for (j, g) in triangulations.iter().enumerate() {
            for v in &triangulations[..j] {
                if let Some((d1, d2)) = flip_between(&points, v, g) {
                    for d in [d2, d1] {
                        if seen.insert(d) {
                            labels.push(d);
                        }
                    }
                }
            }
        }
        Self { points, labels }
    }
}

impl FlipRule for TriangulationRule {
    type Node = Triangulation;
    type Label = Segment;

    fn labels(&self) -> Vec<Segment> {
        self.labels.clone()
    }

    fn flip_label(&self, from: &Triangulation, to: &Triangulation) -> Option<Segment> {
        flip_between(&self.points, from, to).map(|(_, entering)| entering)
    }
}
