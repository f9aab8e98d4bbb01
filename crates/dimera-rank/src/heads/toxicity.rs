//! Toxicity estimation: latent baseline blended with tissue co-expression.

use std::sync::Arc;

use dimera_core::config::HeadConfig;
use dimera_core::error::Result;
use dimera_core::types::{RankingRequest, ScoredPair, TissueContribution, ToxicityEstimate};
use dimera_encoder::{sigmoid, ModelWeights};
use dimera_graph::InteractionGraph;

/// Estimates co-inhibition toxicity for a pair.
///
/// The baseline comes from the toxicity head applied to the pair latent.
/// When the request weights tissues, the baseline is blended with the
/// pair's co-expression in those tissues: high joint expression in a
/// tissue the requester cares about pushes the estimate up.
pub struct ToxicityPredictor {
    weights: Arc<ModelWeights>,
    config: HeadConfig,
}

impl ToxicityPredictor {
    pub fn new(weights: Arc<ModelWeights>, config: HeadConfig) -> Self {
        Self { weights, config }
    }

    /// Estimate toxicity for one scored pair.
    ///
    /// With no tissue weighting the estimate is the baseline alone and
    /// the breakdown is empty. Fails only when the latent width does not
    /// match the toxicity head.
    pub fn predict(
        &self,
        scored: &ScoredPair,
        request: &RankingRequest,
        graph: &InteractionGraph,
    ) -> Result<ToxicityEstimate> {
        let logit = self.weights.toxicity_head.forward(&scored.latent)?[0];
        let baseline = sigmoid(logit);

        if request.tissue_specificity.is_empty() {
            return Ok(ToxicityEstimate {
                score: baseline,
                baseline,
                breakdown: Vec::new(),
            });
        }

        let mut tissues: Vec<&String> = request.tissue_specificity.keys().collect();
        tissues.sort();

        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        let mut breakdown = Vec::with_capacity(tissues.len());
        for tissue in tissues {
            let weight = request.tissue_specificity[tissue];
            let first = expression(graph, scored, Endpoint::First, tissue);
            let second = expression(graph, scored, Endpoint::Second, tissue);
            // Geometric mean: both endpoints must express for co-toxicity.
            let contribution = (squash(first) * squash(second)).sqrt();

            weighted += weight * contribution;
            total_weight += weight;
            breakdown.push(TissueContribution {
                tissue: tissue.clone(),
                weight,
                contribution,
            });
        }

        let tissue_term = if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        };
        let kappa = self.config.tissue_influence;
        let score = ((1.0 - kappa) * baseline + kappa * tissue_term).clamp(0.0, 1.0);

        Ok(ToxicityEstimate {
            score,
            baseline,
            breakdown,
        })
    }
}

enum Endpoint {
    First,
    Second,
}

fn expression(graph: &InteractionGraph, scored: &ScoredPair, end: Endpoint, tissue: &str) -> f64 {
    let id = match end {
        Endpoint::First => scored.pair.first(),
        Endpoint::Second => scored.pair.second(),
    };
    graph.tissue_expression(id, tissue).unwrap_or(0.0)
}

/// Map a non-negative expression level into [0, 1).
fn squash(x: f64) -> f64 {
    let x = x.max(0.0);
    x / (1.0 + x)
}
