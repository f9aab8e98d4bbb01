//! # Dimera Rank
//!
//! The ranking pipeline: pair scoring, ordering policy, prediction heads,
//! and the engine that orchestrates them over a graph snapshot.
//!
//! One request flows through five stages:
//! 1. Snapshot the interaction graph (immutable for the whole request)
//! 2. Encode node embeddings (cached per graph version)
//! 3. Score candidate pairs symmetrically, isolating per-pair failures
//! 4. Sort descending with deterministic tie-breaks, truncate to top-k
//! 5. Run the mechanism, biomarker, and toxicity heads per retained pair
//!
//! Narrative text is optional: `rank` attaches the selector's deterministic
//! rationale, `rank_with_narratives` additionally fans out to an explanation
//! backend with a timeout and a fallback, never failing the request.

pub mod atlas;
pub mod engine;
pub mod heads;
pub mod policy;
pub mod scorer;

pub use atlas::{Pathway, PathwayAssociation, PathwayAtlas};
pub use engine::RankingEngine;
pub use heads::{BiomarkerPredictor, MechanismSelector, ToxicityPredictor};
pub use policy::{order, score_candidates};
pub use scorer::PairScorer;
