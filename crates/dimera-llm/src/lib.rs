//! # Dimera LLM
//!
//! Narrative generation for target pair explanations.
//!
//! This crate provides the async backend trait the ranking engine fans
//! narrative requests out to, plus a scripted mock for tests and a
//! deterministic fallback builder used whenever a backend fails or times
//! out. Narrative text is advisory prose; it never feeds back into scores.
//!
//! ## Features
//!
//! - `local`: Ollama HTTP backend for local inference
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dimera_llm::{ExplanationBackend, OllamaBackend};
//!
//! let backend = OllamaBackend::localhost();
//! let narrative = backend.generate(&request).await?;
//! ```

mod backend;
mod prompt;

pub use backend::{
    ExplanationBackend, ExplanationRequest, MockBackend, NarrativeConfig, NarrativeError,
    NarrativeResult,
};
pub use prompt::{fallback_narrative, tidy_narrative, MechanismPrompt, PromptTemplate};

#[cfg(feature = "local")]
mod ollama;
#[cfg(feature = "local")]
pub use ollama::OllamaBackend;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ExplanationBackend, ExplanationRequest, NarrativeConfig, NarrativeError};
    pub use crate::{fallback_narrative, MechanismPrompt, PromptTemplate};

    #[cfg(feature = "local")]
    pub use crate::OllamaBackend;
}
