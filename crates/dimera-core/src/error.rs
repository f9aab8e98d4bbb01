//! Error types for engine operations.
//!
//! Structural and numeric failures abort the affected request or pair;
//! upstream-collaborator failures are recovered into fallbacks by the
//! engine and surface here only as the variants it maps them through.

use thiserror::Error;

use crate::types::TargetId;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by the ranking engine and its components.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Unknown target referenced by a pair or a lookup.
    #[error("target not found: {0}")]
    TargetNotFound(String),

    /// Interaction references a target outside the node set.
    #[error("invalid edge {source_id} -- {target_id}: endpoint is not a known target")]
    InvalidEdge {
        source_id: String,
        target_id: String,
    },

    /// The same target id was supplied more than once at graph build.
    #[error("duplicate target: {0}")]
    DuplicateTarget(String),

    /// Node feature vectors disagree in length.
    #[error("feature width mismatch for {id}: expected {expected}, got {got}")]
    FeatureWidthMismatch {
        id: String,
        expected: usize,
        got: usize,
    },

    /// Both endpoints of a pair name the same target.
    #[error("pair endpoints are identical: {0}")]
    IdenticalTargets(String),

    /// Input width disagrees with the model weights.
    #[error("dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        got: usize,
    },

    /// A computed embedding or score contained NaN or infinity.
    #[error("numerical instability in {context}")]
    NumericalInstability { context: String },

    /// Operation requires a non-empty graph.
    #[error("graph is empty")]
    EmptyGraph,

    /// Explanation collaborator exceeded its deadline.
    #[error("narrative generation timed out after {seconds}s")]
    UpstreamTimeout { seconds: u64 },

    /// Explanation collaborator failed.
    #[error("narrative generation failed: {0}")]
    UpstreamFailure(String),

    /// I/O failure while loading or saving an artifact.
    #[error("i/o error: {0}")]
    Io(String),

    /// Serialization failure for an artifact.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Serialization(e.to_string())
    }
}

// Convenience constructors
impl EngineError {
    pub fn target_not_found(id: &TargetId) -> Self {
        EngineError::TargetNotFound(id.as_str().to_string())
    }

    pub fn instability(context: impl Into<String>) -> Self {
        EngineError::NumericalInstability {
            context: context.into(),
        }
    }

    pub fn dimension_mismatch(context: impl Into<String>, expected: usize, got: usize) -> Self {
        EngineError::DimensionMismatch {
            context: context.into(),
            expected,
            got,
        }
    }

    /// Whether this error aborts only the candidate it occurred on, as
    /// opposed to the whole request.
    pub fn is_per_pair(&self) -> bool {
        matches!(
            self,
            EngineError::TargetNotFound(_)
                | EngineError::IdenticalTargets(_)
                | EngineError::NumericalInstability { .. }
        )
    }
}
