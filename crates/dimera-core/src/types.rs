//! Shared types used across all Dimera crates.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, Result};

/// Stable identifier for a protein target (gene symbol or accession).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TargetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TargetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Unique identifier for one ranking call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

/// A protein in the interaction graph.
///
/// Immutable after load; owned exclusively by the graph store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProteinNode {
    pub id: TargetId,
    /// Raw feature vector (sequence/structure derived). Fixed length
    /// across all nodes of one graph.
    pub features: Vec<f32>,
    /// Expression level per tissue name. Empty when no data exists.
    #[serde(default)]
    pub tissue_expression: HashMap<String, f64>,
}

impl ProteinNode {
    pub fn new(id: impl Into<TargetId>, features: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            features,
            tissue_expression: HashMap::new(),
        }
    }

    pub fn with_expression(mut self, tissue: impl Into<String>, level: f64) -> Self {
        self.tissue_expression.insert(tissue.into(), level);
        self
    }
}

/// A raw protein-protein interaction supplied by the ingestion layer.
///
/// Direction carries no meaning; the graph is undirected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub source: TargetId,
    pub target: TargetId,
    /// Interaction confidence in [0, 1].
    pub confidence: f64,
}

impl InteractionRecord {
    pub fn new(source: impl Into<TargetId>, target: impl Into<TargetId>, confidence: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            confidence,
        }
    }
}

/// An unordered pair of distinct targets, the unit being ranked.
///
/// Endpoints are stored in lexicographic order, so `(a, b)` and `(b, a)`
/// construct the same value and derived equality, hashing, and ordering
/// all respect the symmetry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TargetPair {
    first: TargetId,
    second: TargetId,
}

impl TargetPair {
    /// Build a canonical pair. Fails when both endpoints name the same
    /// target.
    pub fn new(a: impl Into<TargetId>, b: impl Into<TargetId>) -> Result<Self> {
        let a = a.into();
        let b = b.into();
        if a == b {
            return Err(EngineError::IdenticalTargets(a.0));
        }
        if a < b {
            Ok(Self { first: a, second: b })
        } else {
            Ok(Self { first: b, second: a })
        }
    }

    /// Lexicographically smaller endpoint.
    pub fn first(&self) -> &TargetId {
        &self.first
    }

    /// Lexicographically larger endpoint.
    pub fn second(&self) -> &TargetId {
        &self.second
    }

    pub fn contains(&self, id: &TargetId) -> bool {
        &self.first == id || &self.second == id
    }
}

impl fmt::Display for TargetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.first, self.second)
    }
}

/// Targeting strategy requested for a ranking call.
///
/// Unknown strategies parse successfully and are preserved verbatim; the
/// engine falls back to the default scorer for them and flags the outcome
/// as degraded instead of rejecting the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetingStrategy {
    /// Two targets inhibited together for a synergistic effect.
    Synergism,
    /// One target recruits effector cells against the other (e.g. bispecific engagers).
    Engager,
    /// One target is degraded via proximity to the other (e.g. bifunctional degraders).
    Degrader,
    /// Anything else. Recorded, warned about, scored with the default policy.
    Unknown(String),
}

impl TargetingStrategy {
    /// Parse a raw strategy string. Never fails; unrecognized input
    /// becomes [`TargetingStrategy::Unknown`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "synergism" => TargetingStrategy::Synergism,
            "engager" => TargetingStrategy::Engager,
            "degrader" => TargetingStrategy::Degrader,
            _ => TargetingStrategy::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TargetingStrategy::Synergism => "synergism",
            TargetingStrategy::Engager => "engager",
            TargetingStrategy::Degrader => "degrader",
            TargetingStrategy::Unknown(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, TargetingStrategy::Unknown(_))
    }
}

impl Default for TargetingStrategy {
    fn default() -> Self {
        TargetingStrategy::Synergism
    }
}

impl fmt::Display for TargetingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for TargetingStrategy {
    fn from(raw: String) -> Self {
        TargetingStrategy::parse(&raw)
    }
}

impl From<TargetingStrategy> for String {
    fn from(strategy: TargetingStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

/// Context for one ranking call. Immutable, no identity beyond the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRequest {
    pub indication: String,
    pub patient_population: String,
    pub clinical_phenotype: String,
    pub strategy: TargetingStrategy,
    /// Tissue name to weight. When non-empty this overrides node
    /// expression data for the toxicity head.
    #[serde(default)]
    pub tissue_specificity: HashMap<String, f64>,
}

impl RankingRequest {
    pub fn new(indication: impl Into<String>) -> Self {
        Self {
            indication: indication.into(),
            patient_population: "unspecified".to_string(),
            clinical_phenotype: "unspecified".to_string(),
            strategy: TargetingStrategy::default(),
            tissue_specificity: HashMap::new(),
        }
    }

    pub fn with_population(mut self, population: impl Into<String>) -> Self {
        self.patient_population = population.into();
        self
    }

    pub fn with_phenotype(mut self, phenotype: impl Into<String>) -> Self {
        self.clinical_phenotype = phenotype.into();
        self
    }

    pub fn with_strategy(mut self, strategy: TargetingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_tissue_weight(mut self, tissue: impl Into<String>, weight: f64) -> Self {
        self.tissue_specificity.insert(tissue.into(), weight);
        self
    }
}

/// Candidate pool for one ranking call.
#[derive(Debug, Clone, Default)]
pub enum CandidatePool {
    /// Rank every interacting pair in the graph snapshot.
    #[default]
    FullGraph,
    /// Rank exactly these pairs.
    Pairs(Vec<TargetPair>),
}

/// A scored pair plus its latent representation, consumed by the
/// prediction heads. Ephemeral, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPair {
    pub pair: TargetPair,
    /// Unbounded ranking score; higher is better.
    pub score: f64,
    /// Latent pair representation from the scorer projection.
    pub latent: Vec<f32>,
}

/// Where a recommendation's narrative text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NarrativeSource {
    /// Deterministic template from the mechanism selector.
    Selector,
    /// Generated by the explanation backend.
    Generated,
    /// Backend failed or timed out; deterministic fallback substituted.
    Fallback,
}

/// A pathway chosen by the mechanism selector.
#[derive(Debug, Clone, Serialize)]
pub struct PathwaySelection {
    pub pathway_id: String,
    pub name: String,
    /// Relevance weight in [0, 1].
    pub relevance: f64,
}

/// Structured mechanistic explanation for one pair.
#[derive(Debug, Clone, Serialize)]
pub struct ExplanationPayload {
    /// Pathways relevant to the pair, strongest first.
    pub pathways: Vec<PathwaySelection>,
    pub narrative: String,
    pub source: NarrativeSource,
}

/// A biomarker candidate with prediction confidence.
#[derive(Debug, Clone, Serialize)]
pub struct BiomarkerPrediction {
    pub marker: String,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

/// Contribution of one tissue to a toxicity estimate.
#[derive(Debug, Clone, Serialize)]
pub struct TissueContribution {
    pub tissue: String,
    /// Weight the request assigned to this tissue.
    pub weight: f64,
    /// Co-expression contribution in [0, 1].
    pub contribution: f64,
}

/// Toxicity estimate for one pair.
#[derive(Debug, Clone, Serialize)]
pub struct ToxicityEstimate {
    /// Blended toxicity score in [0, 1].
    pub score: f64,
    /// Latent-only baseline in [0, 1].
    pub baseline: f64,
    /// Per-tissue breakdown, sorted by tissue name. Empty when no tissue
    /// weighting applied.
    pub breakdown: Vec<TissueContribution>,
}

/// One ranked pair with all head outputs attached.
#[derive(Debug, Clone, Serialize)]
pub struct TargetRecommendation {
    pub pair: TargetPair,
    pub score: f64,
    pub explanation: ExplanationPayload,
    pub biomarkers: Vec<BiomarkerPrediction>,
    pub toxicity: ToxicityEstimate,
    /// True when this row carries a fallback produced after an upstream
    /// failure.
    pub degraded: bool,
}

/// A candidate dropped during scoring, with the reason.
///
/// Skips never abort the batch; the remaining candidates rank normally.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedCandidate {
    pub pair: TargetPair,
    pub reason: String,
}

/// Outcome of one ranking call.
#[derive(Debug, Clone, Serialize)]
pub struct RankingOutcome {
    pub request_id: RequestId,
    /// Strategy as recorded from the request, unknown values included.
    pub strategy: TargetingStrategy,
    /// Version of the graph snapshot that served this call.
    pub graph_version: u64,
    /// Ranked recommendations, best first.
    pub recommendations: Vec<TargetRecommendation>,
    /// Candidates dropped by per-pair failures.
    pub skipped: Vec<SkippedCandidate>,
    /// True when any fallback path was taken (unknown strategy or
    /// upstream narrative failure).
    pub degraded: bool,
}
