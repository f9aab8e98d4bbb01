//! Engine orchestration: snapshot, encode, score, rank, attach heads.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures::future;
use tracing::{info, instrument, warn};

use dimera_core::config::EngineConfig;
use dimera_core::error::{EngineError, Result};
use dimera_core::types::{
    CandidatePool, NarrativeSource, RankingOutcome, RankingRequest, RequestId,
    TargetRecommendation,
};
use dimera_encoder::{GraphEncoder, MeanAggregationEncoder, ModelWeights, NodeEmbeddings};
use dimera_graph::{GraphSnapshot, GraphStore};
use dimera_llm::{fallback_narrative, ExplanationBackend, ExplanationRequest, NarrativeError};

use crate::atlas::PathwayAtlas;
use crate::heads::{BiomarkerPredictor, MechanismSelector, ToxicityPredictor};
use crate::policy::{order, score_candidates};
use crate::scorer::PairScorer;

/// The ranking pipeline, assembled once and shared across requests.
///
/// Every call works against an immutable graph snapshot, so concurrent
/// rankings and graph reloads never interfere. Node embeddings are
/// cached per snapshot version and recomputed only after a reload.
pub struct RankingEngine {
    config: EngineConfig,
    store: Arc<GraphStore>,
    encoder: Box<dyn GraphEncoder>,
    scorer: PairScorer,
    atlas: Arc<PathwayAtlas>,
    mechanism: MechanismSelector,
    biomarkers: BiomarkerPredictor,
    toxicity: ToxicityPredictor,
    backend: Option<Arc<dyn ExplanationBackend>>,
    embedding_cache: RwLock<Option<(u64, Arc<NodeEmbeddings>)>>,
}

impl RankingEngine {
    /// Build an engine with weights seeded from the config.
    pub fn from_config(config: EngineConfig, store: Arc<GraphStore>) -> Result<Self> {
        let weights = Arc::new(ModelWeights::seeded(
            &config.encoder,
            &config.scorer,
            config.seed,
        ));
        Self::with_weights(config, store, weights)
    }

    /// Build an engine over externally trained weights. Fails when the
    /// weight stack does not match the configured widths.
    pub fn with_weights(
        config: EngineConfig,
        store: Arc<GraphStore>,
        weights: Arc<ModelWeights>,
    ) -> Result<Self> {
        let encoder = MeanAggregationEncoder::new(config.encoder.clone(), Arc::clone(&weights))?;
        let scorer = PairScorer::new(&config.scorer, Arc::clone(&weights))?;
        let atlas = Arc::new(PathwayAtlas::curated());
        let mechanism = MechanismSelector::new(Arc::clone(&atlas));
        let biomarkers = BiomarkerPredictor::new(Arc::clone(&atlas), config.heads.clone());
        let toxicity = ToxicityPredictor::new(weights, config.heads.clone());

        Ok(Self {
            config,
            store,
            encoder: Box::new(encoder),
            scorer,
            atlas,
            mechanism,
            biomarkers,
            toxicity,
            backend: None,
            embedding_cache: RwLock::new(None),
        })
    }

    /// Attach an explanation backend for [`RankingEngine::rank_with_narratives`].
    pub fn with_backend(mut self, backend: Arc<dyn ExplanationBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Replace the built-in pathway catalog.
    pub fn with_atlas(mut self, atlas: Arc<PathwayAtlas>) -> Self {
        self.mechanism = MechanismSelector::new(Arc::clone(&atlas));
        self.biomarkers = BiomarkerPredictor::new(Arc::clone(&atlas), self.config.heads.clone());
        self.atlas = atlas;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<GraphStore> {
        &self.store
    }

    pub fn atlas(&self) -> &PathwayAtlas {
        &self.atlas
    }

    /// Rank candidate pairs for a request, attaching all three head
    /// outputs. Narratives come from the deterministic selector; use
    /// [`RankingEngine::rank_with_narratives`] for generated text.
    #[instrument(skip(self, request, pool), fields(indication = %request.indication, strategy = %request.strategy))]
    pub fn rank(
        &self,
        request: &RankingRequest,
        pool: &CandidatePool,
        top_k: Option<usize>,
    ) -> Result<RankingOutcome> {
        let request_id = RequestId::new();
        let snapshot = self.store.snapshot();

        let mut degraded = false;
        if !request.strategy.is_recognized() {
            warn!(
                strategy = %request.strategy,
                "unrecognized targeting strategy, scoring with the default policy"
            );
            degraded = true;
        }

        let embeddings = self.embeddings(&snapshot)?;
        let candidates = match pool {
            CandidatePool::FullGraph => snapshot.graph.interacting_pairs(),
            CandidatePool::Pairs(pairs) => pairs.clone(),
        };
        let candidate_count = candidates.len();

        let (mut scored, skipped) = score_candidates(&self.scorer, &embeddings, &candidates)?;
        order(&mut scored, top_k);

        let mut recommendations = Vec::with_capacity(scored.len());
        for pair in &scored {
            let explanation = self.mechanism.select(pair, request);
            let biomarkers = self.biomarkers.predict(pair, &snapshot.graph);
            let toxicity = self.toxicity.predict(pair, request, &snapshot.graph)?;
            recommendations.push(TargetRecommendation {
                pair: pair.pair.clone(),
                score: pair.score,
                explanation,
                biomarkers,
                toxicity,
                degraded: false,
            });
        }

        info!(
            request_id = %request_id.0,
            graph_version = snapshot.version,
            candidates = candidate_count,
            ranked = recommendations.len(),
            skipped = skipped.len(),
            "ranking complete"
        );

        Ok(RankingOutcome {
            request_id,
            strategy: request.strategy.clone(),
            graph_version: snapshot.version,
            recommendations,
            skipped,
            degraded,
        })
    }

    /// Rank, then replace each selector narrative with generated text
    /// from the explanation backend.
    ///
    /// Backend calls run concurrently, one per retained pair, each
    /// bounded by the configured timeout. A failed or slow call degrades
    /// only its own row: the deterministic fallback narrative is
    /// substituted and the row (and outcome) are flagged. With no
    /// backend attached the selector narratives stand unchanged.
    pub async fn rank_with_narratives(
        &self,
        request: &RankingRequest,
        pool: &CandidatePool,
        top_k: Option<usize>,
    ) -> Result<RankingOutcome> {
        let mut outcome = self.rank(request, pool, top_k)?;
        let Some(backend) = &self.backend else {
            return Ok(outcome);
        };

        let timeout_secs = self.config.narrative_timeout_secs;
        let deadline = Duration::from_secs(timeout_secs);
        let calls = outcome.recommendations.iter().map(|rec| {
            let backend = Arc::clone(backend);
            let explanation_request = narrative_request(rec, request);
            async move {
                match tokio::time::timeout(deadline, backend.generate(&explanation_request)).await
                {
                    Ok(Ok(text)) if !text.trim().is_empty() => Ok(text),
                    Ok(Ok(_)) => Err(EngineError::UpstreamFailure(
                        "backend returned an empty narrative".to_string(),
                    )),
                    Ok(Err(NarrativeError::Timeout(secs))) => Err(EngineError::UpstreamTimeout {
                        seconds: secs as u64,
                    }),
                    Ok(Err(err)) => Err(EngineError::UpstreamFailure(err.to_string())),
                    Err(_) => Err(EngineError::UpstreamTimeout {
                        seconds: timeout_secs,
                    }),
                }
            }
        });
        let narratives = future::join_all(calls).await;

        for (rec, narrative) in outcome.recommendations.iter_mut().zip(narratives) {
            match narrative {
                Ok(text) => {
                    rec.explanation.narrative = text;
                    rec.explanation.source = NarrativeSource::Generated;
                }
                Err(err) => {
                    warn!(
                        pair = %rec.pair,
                        error = %err,
                        "narrative generation failed, substituting fallback"
                    );
                    rec.explanation.narrative =
                        fallback_narrative(&narrative_request(rec, request));
                    rec.explanation.source = NarrativeSource::Fallback;
                    rec.degraded = true;
                    outcome.degraded = true;
                }
            }
        }

        Ok(outcome)
    }

    /// Node embeddings for a snapshot, cached per graph version.
    fn embeddings(&self, snapshot: &GraphSnapshot) -> Result<Arc<NodeEmbeddings>> {
        {
            let cache = self.embedding_cache.read().unwrap();
            if let Some((version, embeddings)) = cache.as_ref() {
                if *version == snapshot.version {
                    return Ok(Arc::clone(embeddings));
                }
            }
        }

        let embeddings = Arc::new(self.encoder.encode(&snapshot.graph)?);
        // A racing request for the same version computes the same value.
        let mut cache = self.embedding_cache.write().unwrap();
        *cache = Some((snapshot.version, Arc::clone(&embeddings)));
        Ok(embeddings)
    }
}

fn narrative_request(rec: &TargetRecommendation, request: &RankingRequest) -> ExplanationRequest {
    let pathways = rec
        .explanation
        .pathways
        .iter()
        .map(|p| p.name.clone())
        .collect();
    ExplanationRequest::new(rec.pair.clone(), request).with_pathways(pathways)
}
