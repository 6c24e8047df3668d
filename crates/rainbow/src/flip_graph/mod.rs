//! Flip graph: nodes, labeled arcs, and the indices the search reads.
//!
//! Purpose
//! - Hold the read-only graph every search worker shares: node payloads by
//!   value, labels interned to dense ids, arcs paired with their reverse, and
//!   the per-node outgoing order that fixes the exploration order.
//!
//! Why this design
//! - Value equality everywhere: payloads are interned once, so two
//!   structurally equal nodes can never coexist under different ids.
//! - Malformed input is rejected in `build`, never inside the search loop.
//!
//! Layout: `types.rs` (ids, arcs, cycles, the graph), `build.rs` (builder
//! and validation).

mod build;
mod types;

pub use build::{ArcOrder, FlipGraphBuilder, GraphError};
pub use types::{Arc, ArcId, Cycle, FlipGraph, LabelId, NodeId};

#[cfg(test)]
mod tests;
