//! Biomarker prediction: candidate markers scored against the pair latent.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use dimera_core::config::HeadConfig;
use dimera_core::types::{BiomarkerPrediction, ScoredPair};
use dimera_encoder::{cosine, Lcg};
use dimera_graph::InteractionGraph;

use crate::atlas::PathwayAtlas;

/// Scores candidate biomarkers for a pair.
///
/// Candidates come from the atlas pathways of both endpoints, plus a
/// generic expression readout for any endpoint that has tissue data.
/// Confidence compares the pair latent against a fixed per-marker
/// prototype, so the same pair and marker always score the same.
pub struct BiomarkerPredictor {
    atlas: Arc<PathwayAtlas>,
    config: HeadConfig,
}

impl BiomarkerPredictor {
    pub fn new(atlas: Arc<PathwayAtlas>, config: HeadConfig) -> Self {
        Self { atlas, config }
    }

    /// Predict biomarkers for one scored pair.
    ///
    /// Returns at most `max_biomarkers` predictions, strongest first,
    /// ties broken by marker name. Empty when neither endpoint has
    /// curated markers or tissue data.
    pub fn predict(&self, scored: &ScoredPair, graph: &InteractionGraph) -> Vec<BiomarkerPrediction> {
        let mut candidates: Vec<String> = Vec::new();
        for endpoint in [scored.pair.first(), scored.pair.second()] {
            for marker in self.atlas.markers_for(endpoint) {
                if !candidates.contains(&marker) {
                    candidates.push(marker);
                }
            }
            let has_expression = graph
                .get(endpoint)
                .map(|node| !node.tissue_expression.is_empty())
                .unwrap_or(false);
            if has_expression {
                let readout = format!("{} expression", endpoint);
                if !candidates.contains(&readout) {
                    candidates.push(readout);
                }
            }
        }

        let mut predictions: Vec<BiomarkerPrediction> = candidates
            .into_iter()
            .map(|marker| {
                let prototype = marker_prototype(&marker, scored.latent.len());
                let similarity = cosine(&scored.latent, &prototype) as f64;
                BiomarkerPrediction {
                    marker,
                    confidence: ((similarity + 1.0) / 2.0).clamp(0.0, 1.0),
                }
            })
            .collect();

        predictions.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.marker.cmp(&b.marker))
        });
        predictions.truncate(self.config.max_biomarkers);
        predictions
    }
}

/// Fixed unit-scale prototype vector for a marker, derived from its name.
fn marker_prototype(marker: &str, dim: usize) -> Vec<f32> {
    let mut hasher = DefaultHasher::new();
    marker.hash(&mut hasher);
    let mut rng = Lcg::new(hasher.finish());
    (0..dim).map(|_| rng.next_symmetric(1.0)).collect()
}
