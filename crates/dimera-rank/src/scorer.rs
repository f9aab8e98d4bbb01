//! Pair scoring: symmetric combination of two node embeddings.
//!
//! The combination step carries the order-independence: elementwise sum
//! concatenated with elementwise absolute difference is identical for
//! (a,b) and (b,a), so the projection that follows cannot break symmetry
//! no matter what its weights are.

use std::sync::Arc;

use dimera_core::config::ScorerConfig;
use dimera_core::error::{EngineError, Result};
use dimera_core::types::{ScoredPair, TargetPair};
use dimera_encoder::linalg::{all_finite, relu};
use dimera_encoder::ModelWeights;

/// Scores one candidate pair from two node embeddings.
pub struct PairScorer {
    weights: Arc<ModelWeights>,
}

impl PairScorer {
    /// Build a scorer over validated weights.
    pub fn new(config: &ScorerConfig, weights: Arc<ModelWeights>) -> Result<Self> {
        weights.validate()?;
        if weights.pair_hidden.out_dim != config.hidden_dim {
            return Err(EngineError::dimension_mismatch(
                "scorer hidden width",
                config.hidden_dim,
                weights.pair_hidden.out_dim,
            ));
        }
        if weights.latent_dim() != config.latent_dim {
            return Err(EngineError::dimension_mismatch(
                "scorer latent width",
                config.latent_dim,
                weights.latent_dim(),
            ));
        }
        Ok(Self { weights })
    }

    /// Width of the latent pair representation.
    pub fn latent_dim(&self) -> usize {
        self.weights.latent_dim()
    }

    /// Width of the node embeddings this scorer accepts.
    pub fn embedding_dim(&self) -> usize {
        self.weights.embedding_dim()
    }

    /// Symmetric combination: `[a + b ; |a - b|]`, twice the embedding
    /// width.
    fn combine(a: &[f32], b: &[f32]) -> Vec<f32> {
        let mut combined = Vec::with_capacity(a.len() * 2);
        for (x, y) in a.iter().zip(b.iter()) {
            combined.push(x + y);
        }
        for (x, y) in a.iter().zip(b.iter()) {
            combined.push((x - y).abs());
        }
        combined
    }

    /// Score a pair. The score is unbounded; higher ranks earlier.
    ///
    /// Fails with `DimensionMismatch` when the embeddings disagree with
    /// each other or the weights, and `NumericalInstability` when the
    /// latent or the score goes non-finite.
    pub fn score(&self, pair: &TargetPair, emb1: &[f32], emb2: &[f32]) -> Result<ScoredPair> {
        if emb1.len() != emb2.len() {
            return Err(EngineError::dimension_mismatch(
                "pair embedding widths",
                emb1.len(),
                emb2.len(),
            ));
        }

        let combined = Self::combine(emb1, emb2);
        let mut hidden = self.weights.pair_hidden.forward(&combined)?;
        relu(&mut hidden);
        let latent = self.weights.pair_latent.forward(&hidden)?;
        if !all_finite(&latent) {
            return Err(EngineError::instability(format!(
                "latent representation for {pair}"
            )));
        }

        let score = self.weights.score_head.forward(&latent)?[0] as f64;
        if !score.is_finite() {
            return Err(EngineError::instability(format!("score for {pair}")));
        }

        Ok(ScoredPair {
            pair: pair.clone(),
            score,
            latent,
        })
    }
}
