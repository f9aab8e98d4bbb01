//! Configuration for the encoder, scorer, prediction heads, and engine.
//!
//! All configuration is explicit and immutable once the engine is built.
//! There is no process-global model state: weights derive from a config
//! plus a seed (or a loaded artifact), and a reload swaps in a whole new
//! instance.

use serde::{Deserialize, Serialize};

/// Graph encoder hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Width of raw node feature vectors (default: 128).
    pub input_dim: usize,
    /// Width of intermediate layers (default: 256).
    pub hidden_dim: usize,
    /// Width of the final node embeddings (default: 128).
    pub output_dim: usize,
    /// Number of message-passing layers (default: 3).
    pub layers: usize,
    /// Dropout rate, applied only in training mode (default: 0.2).
    pub dropout: f32,
    /// Training mode. Inference leaves this off so outputs stay
    /// deterministic (default: false).
    pub training: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            input_dim: 128,
            hidden_dim: 256,
            output_dim: 128,
            layers: 3,
            dropout: 0.2,
            training: false,
        }
    }
}

impl EncoderConfig {
    pub fn with_input_dim(mut self, input_dim: usize) -> Self {
        self.input_dim = input_dim;
        self
    }

    pub fn with_layers(mut self, layers: usize) -> Self {
        self.layers = layers;
        self
    }

    /// (in, out) widths for each message-passing layer. A single-layer
    /// encoder maps input straight to output width.
    pub fn layer_dims(&self) -> Vec<(usize, usize)> {
        let layers = self.layers.max(1);
        if layers == 1 {
            return vec![(self.input_dim, self.output_dim)];
        }
        let mut dims = Vec::with_capacity(layers);
        dims.push((self.input_dim, self.hidden_dim));
        for _ in 1..layers - 1 {
            dims.push((self.hidden_dim, self.hidden_dim));
        }
        dims.push((self.hidden_dim, self.output_dim));
        dims
    }
}

/// Pair scorer hyperparameters.
///
/// The scorer consumes a symmetric combination of two node embeddings
/// (sum and absolute difference, `2 * output_dim` wide) and projects it
/// down to a latent pair representation and a scalar score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Width of the pair projection's hidden layer (default: 256).
    pub hidden_dim: usize,
    /// Width of the latent pair representation (default: 128).
    pub latent_dim: usize,
    /// Dropout rate, applied only in training mode (default: 0.2).
    pub dropout: f32,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            hidden_dim: 256,
            latent_dim: 128,
            dropout: 0.2,
        }
    }
}

/// Prediction head tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadConfig {
    /// Blend between the latent baseline and tissue co-expression in the
    /// toxicity score: 0 ignores tissue data, 1 ignores the baseline
    /// (default: 0.5).
    pub tissue_influence: f64,
    /// Maximum biomarker candidates returned per pair (default: 8).
    pub max_biomarkers: usize,
}

impl Default for HeadConfig {
    fn default() -> Self {
        Self {
            tissue_influence: 0.5,
            max_biomarkers: 8,
        }
    }
}

/// Engine-level configuration, shared read-only across requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub encoder: EncoderConfig,
    pub scorer: ScorerConfig,
    pub heads: HeadConfig,
    /// Seed for deterministic weight initialization (default: 42).
    pub seed: u64,
    /// Deadline for one explanation backend call, in seconds
    /// (default: 10).
    pub narrative_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            encoder: EncoderConfig::default(),
            scorer: ScorerConfig::default(),
            heads: HeadConfig::default(),
            seed: 42,
            narrative_timeout_secs: 10,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_narrative_timeout_secs(mut self, secs: u64) -> Self {
        self.narrative_timeout_secs = secs;
        self
    }

    pub fn with_encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }
}
