//! Core explanation backend trait.

use dimera_core::types::{RankingRequest, TargetPair, TargetingStrategy};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Narrative-generation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NarrativeError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u32),
}

/// Result type for narrative operations.
pub type NarrativeResult<T> = Result<T, NarrativeError>;

/// Configuration for narrative requests.
#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    /// Model name/identifier.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Temperature (0.0 = deterministic, higher = more varied prose).
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u32,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            model: "default".to_string(),
            max_tokens: 512,
            temperature: 0.2,
            timeout_secs: 30,
        }
    }
}

impl NarrativeConfig {
    /// Create config for Ollama.
    pub fn ollama() -> Self {
        Self {
            model: "llama3.2".to_string(),
            max_tokens: 512,
            temperature: 0.2,
            timeout_secs: 60, // Local models can be slower
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set timeout.
    pub fn with_timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Everything a backend needs to narrate one recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct ExplanationRequest {
    /// The candidate pair being explained.
    pub pair: TargetPair,
    /// Disease indication from the originating request.
    pub indication: String,
    /// Patient population from the originating request.
    pub patient_population: String,
    /// Clinical phenotype from the originating request.
    pub clinical_phenotype: String,
    /// Targeting strategy in effect (already defaulted if unrecognized).
    pub strategy: TargetingStrategy,
    /// Pathway names the mechanism selector attached to this pair.
    pub pathways: Vec<String>,
}

impl ExplanationRequest {
    /// Build a narrative request for one pair from the ranking request.
    pub fn new(pair: TargetPair, request: &RankingRequest) -> Self {
        Self {
            pair,
            indication: request.indication.clone(),
            patient_population: request.patient_population.clone(),
            clinical_phenotype: request.clinical_phenotype.clone(),
            strategy: request.strategy.clone(),
            pathways: Vec::new(),
        }
    }

    /// Attach the selected pathway names.
    pub fn with_pathways(mut self, pathways: Vec<String>) -> Self {
        self.pathways = pathways;
        self
    }
}

/// Core trait for narrative backends.
///
/// Implementors turn an [`ExplanationRequest`] into a short free-text
/// mechanistic narrative. Failures are expected and recoverable; callers
/// substitute [`crate::fallback_narrative`] and carry on.
#[async_trait]
pub trait ExplanationBackend: Send + Sync {
    /// Get the backend name.
    fn name(&self) -> &str;

    /// Get the current configuration.
    fn config(&self) -> &NarrativeConfig;

    /// Generate a narrative for one candidate pair.
    async fn generate(&self, request: &ExplanationRequest) -> NarrativeResult<String>;

    /// Check if the backend is available.
    ///
    /// Backends with a cheap liveness probe should override this.
    async fn health_check(&self) -> NarrativeResult<bool> {
        Ok(true)
    }
}

/// A mock backend for testing.
pub struct MockBackend {
    config: NarrativeConfig,
    responses: std::collections::HashMap<String, String>,
    failure: Option<NarrativeError>,
}

impl MockBackend {
    /// Create a new mock backend.
    pub fn new() -> Self {
        Self {
            config: NarrativeConfig::default(),
            responses: std::collections::HashMap::new(),
            failure: None,
        }
    }

    /// Add a canned narrative for requests whose content matches a pattern.
    pub fn with_response(mut self, pattern: &str, response: &str) -> Self {
        self.responses.insert(pattern.to_string(), response.to_string());
        self
    }

    /// Script every call to fail with the given error.
    pub fn fail_with(mut self, error: NarrativeError) -> Self {
        self.failure = Some(error);
        self
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExplanationBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    async fn generate(&self, request: &ExplanationRequest) -> NarrativeResult<String> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        // Match patterns against the request content, not the rendered
        // prompt, so tests stay readable.
        let haystack = format!(
            "{} {} {} {} {} {}",
            request.pair,
            request.indication,
            request.patient_population,
            request.clinical_phenotype,
            request.strategy,
            request.pathways.join(" "),
        );

        for (pattern, response) in &self.responses {
            if haystack.contains(pattern) {
                return Ok(response.clone());
            }
        }
        Ok("Mock narrative".to_string())
    }
}
