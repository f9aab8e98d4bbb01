//! Convenient imports for the common types.
//!
//! ```rust
//! use dimera_core::prelude::*;
//! ```

pub use crate::config::{EncoderConfig, EngineConfig, HeadConfig, ScorerConfig};
pub use crate::error::{EngineError, Result};
pub use crate::types::{
    BiomarkerPrediction, CandidatePool, ExplanationPayload, InteractionRecord, NarrativeSource,
    PathwaySelection, ProteinNode, RankingOutcome, RankingRequest, RequestId, ScoredPair,
    SkippedCandidate, TargetId, TargetPair, TargetRecommendation, TargetingStrategy,
    TissueContribution, ToxicityEstimate,
};
