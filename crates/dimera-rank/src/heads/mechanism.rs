//! Mechanism selection: atlas pathways plus a deterministic rationale.

use std::sync::Arc;

use dimera_core::types::{
    ExplanationPayload, NarrativeSource, PathwaySelection, RankingRequest, ScoredPair,
};

use crate::atlas::PathwayAtlas;

/// How many pathways a single explanation carries at most.
const MAX_PATHWAYS: usize = 3;

/// Relevance for a pathway containing both endpoints.
const BOTH_ENDPOINTS: f64 = 0.8;
/// Relevance for a pathway containing one endpoint.
const ONE_ENDPOINT: f64 = 0.5;
/// Bonus when the pathway is also implicated in the request indication.
const INDICATION_BONUS: f64 = 0.2;

/// Selects mechanistic context for a pair from the pathway atlas.
///
/// Output is fully determined by the atlas, the pair, and the request;
/// two calls with the same inputs produce identical payloads.
pub struct MechanismSelector {
    atlas: Arc<PathwayAtlas>,
}

impl MechanismSelector {
    pub fn new(atlas: Arc<PathwayAtlas>) -> Self {
        Self { atlas }
    }

    pub fn atlas(&self) -> &PathwayAtlas {
        &self.atlas
    }

    /// Pick the pathways most relevant to the pair and compose the
    /// template rationale.
    pub fn select(&self, scored: &ScoredPair, request: &RankingRequest) -> ExplanationPayload {
        let first = scored.pair.first();
        let second = scored.pair.second();

        let indication_hits: Vec<String> = self
            .atlas
            .associations_for(&request.indication)
            .into_iter()
            .map(|assoc| assoc.pathway_id)
            .collect();

        let mut selections: Vec<PathwaySelection> = Vec::new();
        for pathway in self.atlas.pathways() {
            let hits_first = pathway_contains(pathway, first.as_str());
            let hits_second = pathway_contains(pathway, second.as_str());
            let base = match (hits_first, hits_second) {
                (true, true) => BOTH_ENDPOINTS,
                (true, false) | (false, true) => ONE_ENDPOINT,
                (false, false) => continue,
            };
            let bonus = if indication_hits.contains(&pathway.id) {
                INDICATION_BONUS
            } else {
                0.0
            };
            selections.push(PathwaySelection {
                pathway_id: pathway.id.clone(),
                name: pathway.name.clone(),
                relevance: (base + bonus).min(1.0),
            });
        }

        selections.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.pathway_id.cmp(&b.pathway_id))
        });
        selections.truncate(MAX_PATHWAYS);

        let narrative = compose_rationale(scored, request, &selections);

        ExplanationPayload {
            pathways: selections,
            narrative,
            source: NarrativeSource::Selector,
        }
    }
}

fn pathway_contains(pathway: &crate::atlas::Pathway, symbol: &str) -> bool {
    pathway
        .genes
        .iter()
        .any(|gene| gene.eq_ignore_ascii_case(symbol))
}

fn compose_rationale(
    scored: &ScoredPair,
    request: &RankingRequest,
    selections: &[PathwaySelection],
) -> String {
    match selections.first() {
        Some(top) => format!(
            "Co-targeting {} and {} as a {} strategy converges on {} in {}.",
            scored.pair.first(),
            scored.pair.second(),
            request.strategy,
            top.name,
            request.indication,
        ),
        None => format!(
            "Co-targeting {} and {} is ranked as a {} candidate for {}; \
             no curated pathway covers both targets.",
            scored.pair.first(),
            scored.pair.second(),
            request.strategy,
            request.indication,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimera_core::types::{TargetPair, TargetingStrategy};

    fn scored(a: &str, b: &str) -> ScoredPair {
        ScoredPair {
            pair: TargetPair::new(a, b).unwrap(),
            score: 1.0,
            latent: vec![0.1, 0.2],
        }
    }

    fn request(indication: &str) -> RankingRequest {
        RankingRequest::new(indication).with_strategy(TargetingStrategy::Synergism)
    }

    #[test]
    fn shared_pathway_outranks_single_endpoint() {
        let selector = MechanismSelector::new(Arc::new(PathwayAtlas::curated()));
        // BRAF and MAP2K1 share mapk_erk; CDK4 sits in cell_cycle alone.
        let payload = selector.select(&scored("BRAF", "MAP2K1"), &request("melanoma"));

        assert_eq!(payload.pathways[0].pathway_id, "mapk_erk");
        // Both endpoints plus indication match saturates the relevance.
        assert!((payload.pathways[0].relevance - 1.0).abs() < 1e-12);
        assert_eq!(payload.source, NarrativeSource::Selector);
    }

    #[test]
    fn indication_bonus_lifts_matching_pathway() {
        let selector = MechanismSelector::new(Arc::new(PathwayAtlas::curated()));
        let on_label = selector.select(&scored("BRAF", "CDK4"), &request("melanoma"));
        let off_label = selector.select(&scored("BRAF", "CDK4"), &request("myelofibrosis"));

        let relevance_of = |payload: &ExplanationPayload, id: &str| {
            payload
                .pathways
                .iter()
                .find(|p| p.pathway_id == id)
                .map(|p| p.relevance)
                .unwrap()
        };
        assert!(
            relevance_of(&on_label, "mapk_erk") > relevance_of(&off_label, "mapk_erk"),
            "indication match should raise mapk_erk relevance"
        );
    }

    #[test]
    fn no_pathway_match_still_produces_narrative() {
        let selector = MechanismSelector::new(Arc::new(PathwayAtlas::curated()));
        let payload = selector.select(&scored("FAKE1", "FAKE2"), &request("melanoma"));

        assert!(payload.pathways.is_empty());
        assert!(payload.narrative.contains("FAKE1"));
        assert!(payload.narrative.contains("no curated pathway"));
    }

    #[test]
    fn at_most_three_pathways_selected() {
        let selector = MechanismSelector::new(Arc::new(PathwayAtlas::curated()));
        // EGFR (mapk_erk) with PTEN (pi3k) and friends would multiply, but
        // a two-gene pair can still touch several axes via shared members.
        let payload = selector.select(&scored("BRCA1", "CDK4"), &request("breast cancer"));
        assert!(payload.pathways.len() <= 3);
    }

    #[test]
    fn selection_is_deterministic() {
        let selector = MechanismSelector::new(Arc::new(PathwayAtlas::curated()));
        let a = selector.select(&scored("BRAF", "PTEN"), &request("melanoma"));
        let b = selector.select(&scored("BRAF", "PTEN"), &request("melanoma"));

        assert_eq!(a.narrative, b.narrative);
        assert_eq!(a.pathways.len(), b.pathways.len());
        for (x, y) in a.pathways.iter().zip(&b.pathways) {
            assert_eq!(x.pathway_id, y.pathway_id);
            assert_eq!(x.relevance, y.relevance);
        }
    }
}
