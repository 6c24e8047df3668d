//! Rainbow-cycle search: single-start DFS, canonical deduplication, and the
//! parallel multi-start runner.
//!
//! Purpose
//! - Find closed walks that use every label exactly `r` times and visit no
//!   node twice (apart from returning to the start).
//!
//! Why this design
//! - The DFS is an explicit loop over a path stack and per-node frontier
//!   cursors rather than recursion: the forward-reset / backtrack-keep
//!   asymmetry of the frontier stays visible in one place, and deep label
//!   sets cannot overflow the call stack.
//! - The only state shared between workers is the result set, behind a
//!   single mutex that also covers the output sink.
//!
//! Layout: `dfs.rs` (state machine), `canon.rs` (canonical form, result set,
//! sinks), `orchestrate.rs` (start selection, threads, reports).

mod canon;
mod dfs;
mod orchestrate;

pub use canon::{canonical_rotation, CycleSink, FoundCycleSet};
pub use dfs::{search, search_each, SearchStats};
pub use orchestrate::{
    find_rainbow_cycles, select_starts, RunCfg, RunError, RunReport, SearchMode, StartPolicy,
    WorkerReport,
};
