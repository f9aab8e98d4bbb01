//! # Dimera Graph
//!
//! The protein-interaction graph and the shared store that owns it.
//!
//! [`interaction::InteractionGraph`] is an immutable, build-once graph:
//! typed protein nodes in a petgraph arena, an id index for O(1) lookup,
//! and interaction edges filtered by confidence at build time.
//! [`store::GraphStore`] shares the current graph across concurrent
//! requests and replaces it wholesale on reload:
//! readers always see a fully-old or fully-new graph, never a partial
//! one.

pub mod interaction;
pub mod store;

pub use interaction::{GraphStats, InteractionEdge, InteractionGraph, DEFAULT_MIN_CONFIDENCE};
pub use store::{GraphSnapshot, GraphStore};
