//! Ollama backend for local narrative generation.
//!
//! Requires the `local` feature and a running Ollama instance.

use crate::backend::{
    ExplanationBackend, ExplanationRequest, NarrativeConfig, NarrativeError, NarrativeResult,
};
use crate::prompt::{tidy_narrative, MechanismPrompt, PromptTemplate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Ollama API request.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama API response.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    #[serde(default)]
    done: bool,
}

/// Ollama backend for local narrative generation.
///
/// # Example
///
/// ```rust,ignore
/// use dimera_llm::{ExplanationBackend, OllamaBackend};
///
/// let backend = OllamaBackend::new("http://localhost:11434");
/// let narrative = backend.generate(&request).await?;
/// ```
pub struct OllamaBackend {
    endpoint: String,
    config: NarrativeConfig,
    client: reqwest::Client,
}

impl OllamaBackend {
    /// Create a new Ollama backend.
    pub fn new(endpoint: &str) -> Self {
        Self::with_config(endpoint, NarrativeConfig::ollama())
    }

    /// Create with custom config.
    pub fn with_config(endpoint: &str, config: NarrativeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            config,
            client,
        }
    }

    /// Create with default localhost endpoint.
    pub fn localhost() -> Self {
        Self::new("http://localhost:11434")
    }

    /// Set the model.
    pub fn with_model(mut self, model: &str) -> Self {
        self.config.model = model.to_string();
        self
    }

    /// Make a request to Ollama.
    async fn request(&self, prompt: &str, system: Option<&str>) -> NarrativeResult<String> {
        let request = OllamaRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            system: system.map(|s| s.to_string()),
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.endpoint);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    NarrativeError::ConnectionFailed(format!(
                        "Cannot connect to Ollama at {}. Is Ollama running?",
                        self.endpoint
                    ))
                } else if e.is_timeout() {
                    NarrativeError::Timeout(self.config.timeout_secs)
                } else {
                    NarrativeError::ApiError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 404 {
                return Err(NarrativeError::ModelNotFound(format!(
                    "Model '{}' not found. Run: ollama pull {}",
                    self.config.model, self.config.model
                )));
            }

            return Err(NarrativeError::ApiError(format!(
                "Ollama error {}: {}",
                status, body
            )));
        }

        let resp: OllamaResponse = response
            .json()
            .await
            .map_err(|e| NarrativeError::InvalidResponse(e.to_string()))?;

        // With stream=false a well-formed reply is always final.
        if !resp.done {
            return Err(NarrativeError::InvalidResponse(
                "response was truncated".to_string(),
            ));
        }

        Ok(resp.response)
    }
}

#[async_trait]
impl ExplanationBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    async fn generate(&self, request: &ExplanationRequest) -> NarrativeResult<String> {
        let prompt = MechanismPrompt::new(request);
        let system = prompt.system_prompt();
        let raw = self.request(&prompt.render(), system.as_deref()).await?;

        let narrative = tidy_narrative(&raw);
        if narrative.is_empty() {
            return Err(NarrativeError::InvalidResponse(
                "backend returned an empty narrative".to_string(),
            ));
        }
        Ok(narrative)
    }

    async fn health_check(&self) -> NarrativeResult<bool> {
        let url = format!("{}/api/tags", self.endpoint);

        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}
