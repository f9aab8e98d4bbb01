//! # Dimera
//!
//! Graph-based target pair ranking engine for therapeutic discovery.
//!
//! Dimera ranks pairs of co-targetable proteins for a disease indication.
//! A message-passing encoder turns a protein-interaction graph into node
//! embeddings, a symmetric scorer turns embedding pairs into ranking
//! scores, and three prediction heads attach mechanistic pathways,
//! biomarker candidates, and a toxicity estimate to every ranked pair.
//!
//! ## Quick Start
//!
//! ```rust
//! use dimera::prelude::*;
//! use std::sync::Arc;
//!
//! // Ingest a small interaction graph
//! let nodes = vec![
//!     ProteinNode::new("BRAF", vec![0.2; 128]),
//!     ProteinNode::new("MAP2K1", vec![0.4; 128]),
//!     ProteinNode::new("PTEN", vec![0.6; 128]),
//! ];
//! let records = vec![
//!     InteractionRecord::new("BRAF", "MAP2K1", 0.92),
//!     InteractionRecord::new("MAP2K1", "PTEN", 0.61),
//! ];
//! let store = Arc::new(GraphStore::from_records(nodes, &records, 0.5).unwrap());
//!
//! // Rank every interacting pair for an indication
//! let engine = RankingEngine::from_config(EngineConfig::default(), store).unwrap();
//! let outcome = engine
//!     .rank(
//!         &RankingRequest::new("melanoma"),
//!         &CandidatePool::FullGraph,
//!         Some(10),
//!     )
//!     .unwrap();
//!
//! for rec in &outcome.recommendations {
//!     println!("{} (score: {:.3})", rec.pair, rec.score);
//! }
//! ```
//!
//! ## Architecture
//!
//! Dimera is organized into several crates:
//!
//! - [`dimera_core`] - Shared types, configuration, and the error taxonomy
//! - [`dimera_graph`] - The interaction graph and the copy-on-write store
//! - [`dimera_encoder`] - Linear algebra, model weights, graph encoder
//! - [`dimera_llm`] - Narrative generation backends with fallback
//! - [`dimera_rank`] - Scorer, ranking policy, prediction heads, engine
//!
//! ## Key Guarantees
//!
//! | Property | What It Means |
//! |----------|---------------|
//! | Symmetry | `score(a, b) == score(b, a)`, bit for bit |
//! | Determinism | Same weights, graph, and request give the same ranking |
//! | Isolation | A failed candidate is skipped, never aborts the batch |
//! | Degradation | Narrative backend failures fall back, never error out |
//!
//! ## Generated Narratives
//!
//! Attach an explanation backend to replace the deterministic selector
//! text with generated prose. Failures and timeouts degrade to a
//! fallback narrative per pair:
//!
//! ```rust
//! use dimera::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn demo(store: Arc<GraphStore>) {
//! let backend = Arc::new(MockBackend::new().with_response("melanoma", "..."));
//! let engine = RankingEngine::from_config(EngineConfig::default(), store)
//!     .unwrap()
//!     .with_backend(backend);
//!
//! let outcome = engine
//!     .rank_with_narratives(
//!         &RankingRequest::new("melanoma"),
//!         &CandidatePool::FullGraph,
//!         Some(10),
//!     )
//!     .await
//!     .unwrap();
//! # let _ = outcome;
//! # }
//! ```

// Re-export all subcrates
pub use dimera_core as core;
pub use dimera_encoder as encoder;
pub use dimera_graph as graph;
pub use dimera_llm as llm;
pub use dimera_rank as rank;

/// Prelude module for convenient imports.
///
/// ```rust
/// use dimera::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use dimera_core::types::{
        BiomarkerPrediction, CandidatePool, ExplanationPayload, InteractionRecord,
        NarrativeSource, PathwaySelection, ProteinNode, RankingOutcome, RankingRequest,
        RequestId, ScoredPair, SkippedCandidate, TargetId, TargetPair, TargetRecommendation,
        TargetingStrategy, TissueContribution, ToxicityEstimate,
    };

    // Configuration
    pub use dimera_core::config::{EncoderConfig, EngineConfig, HeadConfig, ScorerConfig};

    // Error types
    pub use dimera_core::error::{EngineError, Result};

    // Graph and store
    pub use dimera_graph::{
        GraphSnapshot, GraphStore, InteractionGraph, DEFAULT_MIN_CONFIDENCE,
    };

    // Encoder and weights
    pub use dimera_encoder::{
        GraphEncoder, MeanAggregationEncoder, ModelWeights, NodeEmbeddings,
    };

    // Ranking
    pub use dimera_rank::{
        BiomarkerPredictor, MechanismSelector, PairScorer, Pathway, PathwayAssociation,
        PathwayAtlas, RankingEngine, ToxicityPredictor,
    };

    // Narrative generation
    pub use dimera_llm::{
        fallback_narrative, ExplanationBackend, ExplanationRequest, MechanismPrompt,
        MockBackend, NarrativeConfig, NarrativeError, NarrativeResult, PromptTemplate,
    };

    #[cfg(feature = "local")]
    pub use dimera_llm::OllamaBackend;
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
