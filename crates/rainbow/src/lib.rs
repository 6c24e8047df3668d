//! Rainbow cycles in labeled flip graphs.
//!
//! A rainbow cycle is a closed walk that visits no node twice and uses every
//! label of the graph exactly `r` times. The engine (graph, search,
//! deduplication, parallel runner) is domain-agnostic; the k-subset and
//! triangulation modules build concrete graphs and supply flip rules for the
//! independent validator.
//!
//! Layout
//! - `flip_graph`: graph model and fail-fast builder.
//! - `search`: single-start DFS, canonical dedup, multi-start runner.
//! - `validate`: checker that re-derives labels from a domain rule.
//! - `subsets`, `triangulation`: collaborator domains.

pub mod api;
pub mod flip_graph;
pub mod search;
pub mod subsets;
pub mod triangulation;
pub mod validate;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::flip_graph::{ArcOrder, Cycle, FlipGraph, FlipGraphBuilder, NodeId};
    pub use crate::search::{find_rainbow_cycles, RunCfg, SearchMode, StartPolicy};
    pub use crate::validate::{check_rainbow_cycle, FlipRule};
}
