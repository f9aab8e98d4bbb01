//! # Dimera Encoder
//!
//! Message-passing encoder that turns the interaction graph into
//! per-node contextual embeddings, plus the model weights shared by the
//! encoder and the downstream pair scorer.
//!
//! The architecture is deliberately small and explicit: a stack of dense
//! layers with mean aggregation over each node's neighborhood (self
//! included), ReLU between layers, and dropout only in training mode.
//! Weights are deterministic given a seed and round-trip through JSON,
//! so a trained artifact can replace the seeded initialization without
//! touching any code.

pub mod encoder;
pub mod linalg;
pub mod weights;

pub use encoder::{GraphEncoder, MeanAggregationEncoder, NodeEmbeddings};
pub use linalg::{cosine, sigmoid, Lcg, LinearLayer};
pub use weights::ModelWeights;
