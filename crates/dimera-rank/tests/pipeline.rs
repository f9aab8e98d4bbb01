//! End-to-end integration tests for the ranking pipeline.
//!
//! Builds a small interaction graph, runs the full snapshot → encode →
//! score → rank → heads flow, and verifies the acceptance scenarios:
//! isolated nodes, symmetry, determinism, bounded head outputs, and
//! graceful degradation of the narrative path.

use std::sync::Arc;

use async_trait::async_trait;
use dimera_core::config::{EncoderConfig, EngineConfig, ScorerConfig};
use dimera_core::types::{
    CandidatePool, InteractionRecord, NarrativeSource, ProteinNode, RankingRequest, TargetPair,
    TargetingStrategy,
};
use dimera_graph::GraphStore;
use dimera_llm::{
    ExplanationBackend, ExplanationRequest, MockBackend, NarrativeConfig, NarrativeError,
    NarrativeResult,
};
use dimera_rank::RankingEngine;

/// Helper: engine config small enough to rank in microseconds.
fn small_config() -> EngineConfig {
    EngineConfig {
        encoder: EncoderConfig {
            input_dim: 4,
            hidden_dim: 8,
            output_dim: 6,
            layers: 2,
            ..EncoderConfig::default()
        },
        scorer: ScorerConfig {
            hidden_dim: 10,
            latent_dim: 5,
            ..ScorerConfig::default()
        },
        ..EngineConfig::default()
    }
}

/// Helper: the ABCD graph. Edge (CCC, DDD) sits below the confidence
/// threshold, so DDD ends up isolated.
fn abcd_store() -> Arc<GraphStore> {
    let nodes = vec![
        ProteinNode::new("AAA", vec![0.2, 0.1, -0.2, 0.3])
            .with_expression("liver", 0.8)
            .with_expression("cardiac", 0.4),
        ProteinNode::new("BBB", vec![0.4, 0.2, -0.4, 0.3]).with_expression("liver", 0.6),
        ProteinNode::new("CCC", vec![0.6, 0.3, -0.6, 0.3]),
        ProteinNode::new("DDD", vec![0.8, 0.4, -0.8, 0.3]),
    ];
    let records = vec![
        InteractionRecord::new("AAA", "BBB", 0.9),
        InteractionRecord::new("BBB", "CCC", 0.6),
        InteractionRecord::new("CCC", "DDD", 0.3),
    ];
    Arc::new(GraphStore::from_records(nodes, &records, 0.5).unwrap())
}

/// Helper: engine over the ABCD graph.
fn abcd_engine() -> RankingEngine {
    RankingEngine::from_config(small_config(), abcd_store()).unwrap()
}

fn pair(a: &str, b: &str) -> TargetPair {
    TargetPair::new(a, b).unwrap()
}

/// Backend that never answers within any reasonable deadline.
struct SlowBackend {
    config: NarrativeConfig,
}

#[async_trait]
impl ExplanationBackend for SlowBackend {
    fn name(&self) -> &str {
        "slow"
    }

    fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    async fn generate(&self, _request: &ExplanationRequest) -> NarrativeResult<String> {
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        Ok("too late".to_string())
    }
}

#[test]
fn test_abcd_scenario_isolated_pair_still_ranks() {
    let store = abcd_store();
    let engine = RankingEngine::from_config(small_config(), Arc::clone(&store)).unwrap();
    let snapshot = store.snapshot();

    // The 0.3-confidence edge was dropped at build, leaving DDD isolated.
    let isolated = snapshot.graph.isolated_targets();
    assert_eq!(isolated.len(), 1);
    assert_eq!(isolated[0].as_str(), "DDD");

    let pool = CandidatePool::Pairs(vec![pair("AAA", "BBB"), pair("CCC", "DDD")]);
    let outcome = engine
        .rank(&RankingRequest::new("melanoma"), &pool, None)
        .unwrap();

    assert_eq!(outcome.recommendations.len(), 2);
    assert!(outcome.skipped.is_empty());
    for rec in &outcome.recommendations {
        assert!(rec.score.is_finite(), "score for {} not finite", rec.pair);
    }
}

#[test]
fn test_full_graph_pool_covers_retained_edges() {
    let outcome = abcd_engine()
        .rank(
            &RankingRequest::new("melanoma"),
            &CandidatePool::FullGraph,
            None,
        )
        .unwrap();

    // Two retained edges, two candidates; the dropped edge contributes none.
    assert_eq!(outcome.recommendations.len(), 2);
}

#[test]
fn test_ranking_is_deterministic_across_calls() {
    let engine = abcd_engine();
    let request = RankingRequest::new("melanoma").with_tissue_weight("liver", 0.7);
    let pool = CandidatePool::FullGraph;

    let first = engine.rank(&request, &pool, None).unwrap();
    let second = engine.rank(&request, &pool, None).unwrap();

    assert_eq!(first.recommendations.len(), second.recommendations.len());
    for (a, b) in first
        .recommendations
        .iter()
        .zip(&second.recommendations)
    {
        assert_eq!(a.pair, b.pair);
        assert_eq!(a.score.to_bits(), b.score.to_bits());
        assert_eq!(a.explanation.narrative, b.explanation.narrative);
        assert_eq!(a.toxicity.score, b.toxicity.score);
    }
}

#[test]
fn test_scores_symmetric_under_endpoint_order() {
    let engine = abcd_engine();
    let request = RankingRequest::new("melanoma").with_tissue_weight("liver", 1.0);

    let forward = CandidatePool::Pairs(vec![pair("AAA", "BBB")]);
    let reversed = CandidatePool::Pairs(vec![pair("BBB", "AAA")]);

    let a = engine.rank(&request, &forward, None).unwrap();
    let b = engine.rank(&request, &reversed, None).unwrap();

    let (ra, rb) = (&a.recommendations[0], &b.recommendations[0]);
    assert_eq!(ra.score.to_bits(), rb.score.to_bits());
    assert_eq!(ra.toxicity.score, rb.toxicity.score);
    assert_eq!(ra.biomarkers.len(), rb.biomarkers.len());
    for (x, y) in ra.biomarkers.iter().zip(&rb.biomarkers) {
        assert_eq!(x.marker, y.marker);
        assert_eq!(x.confidence, y.confidence);
    }
}

#[test]
fn test_scores_non_increasing_and_bounded_heads() {
    let engine = abcd_engine();
    let request = RankingRequest::new("melanoma")
        .with_tissue_weight("liver", 0.8)
        .with_tissue_weight("cardiac", 0.2);
    let outcome = engine
        .rank(&request, &CandidatePool::FullGraph, None)
        .unwrap();

    for window in outcome.recommendations.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
    for rec in &outcome.recommendations {
        assert!((0.0..=1.0).contains(&rec.toxicity.score));
        assert!((0.0..=1.0).contains(&rec.toxicity.baseline));
        for prediction in rec.biomarkers.windows(2) {
            assert!(prediction[0].confidence >= prediction[1].confidence);
        }
        for prediction in &rec.biomarkers {
            assert!((0.0..=1.0).contains(&prediction.confidence));
        }
    }
}

#[test]
fn test_top_k_truncates_ranking() {
    let outcome = abcd_engine()
        .rank(
            &RankingRequest::new("melanoma"),
            &CandidatePool::FullGraph,
            Some(1),
        )
        .unwrap();
    assert_eq!(outcome.recommendations.len(), 1);
}

#[test]
fn test_unknown_strategy_completes_degraded() {
    let request = RankingRequest::new("melanoma")
        .with_strategy(TargetingStrategy::parse("unknown_strategy_xyz"));
    let outcome = abcd_engine()
        .rank(&request, &CandidatePool::FullGraph, None)
        .unwrap();

    assert!(outcome.degraded);
    assert_eq!(outcome.recommendations.len(), 2);
    assert_eq!(outcome.strategy.as_str(), "unknown_strategy_xyz");
}

#[test]
fn test_empty_tissue_override_falls_back_to_baseline() {
    let outcome = abcd_engine()
        .rank(
            &RankingRequest::new("melanoma"),
            &CandidatePool::FullGraph,
            None,
        )
        .unwrap();

    for rec in &outcome.recommendations {
        assert_eq!(rec.toxicity.score, rec.toxicity.baseline);
        assert!(rec.toxicity.breakdown.is_empty());
    }
}

#[test]
fn test_unknown_target_is_skipped_not_fatal() {
    let engine = abcd_engine();
    let pool = CandidatePool::Pairs(vec![pair("AAA", "BBB"), pair("AAA", "ZZZ")]);
    let outcome = engine
        .rank(&RankingRequest::new("melanoma"), &pool, None)
        .unwrap();

    assert_eq!(outcome.recommendations.len(), 1);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].pair, pair("AAA", "ZZZ"));
    assert!(outcome.skipped[0].reason.contains("ZZZ"));
}

#[tokio::test]
async fn test_no_backend_keeps_selector_narratives() {
    let engine = abcd_engine();
    let outcome = engine
        .rank_with_narratives(
            &RankingRequest::new("melanoma"),
            &CandidatePool::FullGraph,
            None,
        )
        .await
        .unwrap();

    assert!(!outcome.degraded);
    for rec in &outcome.recommendations {
        assert_eq!(rec.explanation.source, NarrativeSource::Selector);
        assert!(!rec.explanation.narrative.is_empty());
    }
}

#[tokio::test]
async fn test_generated_narratives_replace_selector_text() {
    let backend = MockBackend::new().with_response("melanoma", "Generated rationale.");
    let engine = abcd_engine().with_backend(Arc::new(backend));

    let outcome = engine
        .rank_with_narratives(
            &RankingRequest::new("melanoma"),
            &CandidatePool::FullGraph,
            None,
        )
        .await
        .unwrap();

    assert!(!outcome.degraded);
    for rec in &outcome.recommendations {
        assert_eq!(rec.explanation.source, NarrativeSource::Generated);
        assert_eq!(rec.explanation.narrative, "Generated rationale.");
        assert!(!rec.degraded);
    }
}

#[tokio::test]
async fn test_failing_backend_degrades_to_fallback() {
    let backend =
        MockBackend::new().fail_with(NarrativeError::ConnectionFailed("refused".to_string()));
    let engine = abcd_engine().with_backend(Arc::new(backend));

    let outcome = engine
        .rank_with_narratives(
            &RankingRequest::new("melanoma"),
            &CandidatePool::FullGraph,
            None,
        )
        .await
        .unwrap();

    // The ranked set survives; only the narratives degrade.
    assert!(outcome.degraded);
    assert_eq!(outcome.recommendations.len(), 2);
    for rec in &outcome.recommendations {
        assert_eq!(rec.explanation.source, NarrativeSource::Fallback);
        assert!(rec.degraded);
        assert!(rec.explanation.narrative.contains("melanoma"));
        assert!(rec
            .explanation
            .narrative
            .contains(rec.pair.first().as_str()));
    }
}

#[tokio::test]
async fn test_slow_backend_times_out_to_fallback() {
    let config = small_config().with_narrative_timeout_secs(1);
    let backend = SlowBackend {
        config: NarrativeConfig::default(),
    };
    let engine = RankingEngine::with_weights(
        config.clone(),
        abcd_store(),
        Arc::new(dimera_encoder::ModelWeights::seeded(
            &config.encoder,
            &config.scorer,
            config.seed,
        )),
    )
    .unwrap()
    .with_backend(Arc::new(backend));

    let outcome = engine
        .rank_with_narratives(
            &RankingRequest::new("melanoma"),
            &CandidatePool::FullGraph,
            Some(1),
        )
        .await
        .unwrap();

    assert!(outcome.degraded);
    let rec = &outcome.recommendations[0];
    assert_eq!(rec.explanation.source, NarrativeSource::Fallback);
    assert!(!rec.explanation.narrative.is_empty());
}
