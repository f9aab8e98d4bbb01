//! Model weights: explicit, immutable, serde round-trippable.
//!
//! There is no process-global model instance. Weights are built once
//! (seeded, or loaded from a JSON artifact), shared read-only behind an
//! `Arc`, and replaced wholesale when a new model lands. Every request
//! reads the same instance it started with.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use dimera_core::config::{EncoderConfig, ScorerConfig};
use dimera_core::error::{EngineError, Result};

use crate::linalg::{Lcg, LinearLayer};

/// Full weight set for the encoder, the pair scorer, and the toxicity
/// readout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelWeights {
    /// One linear transform per message-passing layer.
    pub encoder_layers: Vec<LinearLayer>,
    /// First projection of the combined pair vector (2 x embedding width).
    pub pair_hidden: LinearLayer,
    /// Projection down to the latent pair representation.
    pub pair_latent: LinearLayer,
    /// Latent to scalar ranking score.
    pub score_head: LinearLayer,
    /// Latent to toxicity logit.
    pub toxicity_head: LinearLayer,
}

impl ModelWeights {
    /// Deterministic weights for a configuration: the same seed always
    /// yields the same model, on every platform.
    pub fn seeded(encoder: &EncoderConfig, scorer: &ScorerConfig, seed: u64) -> Self {
        let mut rng = Lcg::new(seed);
        let encoder_layers = encoder
            .layer_dims()
            .into_iter()
            .map(|(in_dim, out_dim)| LinearLayer::seeded(in_dim, out_dim, &mut rng))
            .collect::<Vec<_>>();
        let combined = encoder.output_dim * 2;
        let pair_hidden = LinearLayer::seeded(combined, scorer.hidden_dim, &mut rng);
        let pair_latent = LinearLayer::seeded(scorer.hidden_dim, scorer.latent_dim, &mut rng);
        let score_head = LinearLayer::seeded(scorer.latent_dim, 1, &mut rng);
        let toxicity_head = LinearLayer::seeded(scorer.latent_dim, 1, &mut rng);
        Self {
            encoder_layers,
            pair_hidden,
            pair_latent,
            score_head,
            toxicity_head,
        }
    }

    /// Width of the node embeddings these weights produce.
    pub fn embedding_dim(&self) -> usize {
        self.encoder_layers
            .last()
            .map(|layer| layer.out_dim)
            .unwrap_or(0)
    }

    /// Width of the raw features these weights expect.
    pub fn input_dim(&self) -> usize {
        self.encoder_layers
            .first()
            .map(|layer| layer.in_dim)
            .unwrap_or(0)
    }

    pub fn latent_dim(&self) -> usize {
        self.pair_latent.out_dim
    }

    /// Check that the layer widths line up end to end. Run on every
    /// loaded artifact before it serves traffic.
    pub fn validate(&self) -> Result<()> {
        if self.encoder_layers.is_empty() {
            return Err(EngineError::dimension_mismatch("encoder layers", 1, 0));
        }
        for window in self.encoder_layers.windows(2) {
            if window[1].in_dim != window[0].out_dim {
                return Err(EngineError::dimension_mismatch(
                    "encoder layer chain",
                    window[0].out_dim,
                    window[1].in_dim,
                ));
            }
        }
        let combined = self.embedding_dim() * 2;
        if self.pair_hidden.in_dim != combined {
            return Err(EngineError::dimension_mismatch(
                "pair projection input",
                combined,
                self.pair_hidden.in_dim,
            ));
        }
        if self.pair_latent.in_dim != self.pair_hidden.out_dim {
            return Err(EngineError::dimension_mismatch(
                "latent projection input",
                self.pair_hidden.out_dim,
                self.pair_latent.in_dim,
            ));
        }
        for (name, head) in [("score head", &self.score_head), ("toxicity head", &self.toxicity_head)] {
            if head.in_dim != self.latent_dim() {
                return Err(EngineError::dimension_mismatch(
                    name,
                    self.latent_dim(),
                    head.in_dim,
                ));
            }
            if head.out_dim != 1 {
                return Err(EngineError::dimension_mismatch(name, 1, head.out_dim));
            }
        }
        Ok(())
    }

    /// Write the weights as a JSON artifact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a JSON artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let weights: Self = serde_json::from_str(&json)?;
        weights.validate()?;
        Ok(weights)
    }
}
