//! Curated surface for the CLI and benches.
//!
//! Re-exports only; everything here is also reachable through its module.

// Graph model
pub use crate::flip_graph::{
    Arc, ArcId, ArcOrder, Cycle, FlipGraph, FlipGraphBuilder, GraphError, LabelId, NodeId,
};
// Search engine
pub use crate::search::{
    canonical_rotation, find_rainbow_cycles, search, search_each, select_starts, CycleSink,
    FoundCycleSet, RunCfg, RunError, RunReport, SearchMode, SearchStats, StartPolicy,
    WorkerReport,
};
// Domains
pub use crate::subsets::{combinations, subset_flip_graph, KSubsetRule, Subset, Transposition};
pub use crate::triangulation::{
    convex_polygon, convex_triangulations, flip_between, parse_triangulations,
    triangulation_flip_graph, ParseError, Point, Segment, Triangulation, TriangulationRule,
};
// Validation
pub use crate::validate::{check_rainbow_cycle, is_rainbow_cycle, FlipRule, Violation};
