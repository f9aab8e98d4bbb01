//! Message-passing encoder over the interaction graph.
//!
//! Each layer linearly transforms every node vector once, then replaces
//! each node's vector with the mean of its own transformed vector and
//! its neighbors' (a self-loop is always counted, so an isolated node
//! averages over itself alone and never divides by zero). ReLU follows
//! each layer; dropout only in training mode. Any non-finite component
//! aborts the encode rather than propagating a corrupted vector.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use dimera_core::config::EncoderConfig;
use dimera_core::error::{EngineError, Result};
use dimera_core::types::TargetId;
use dimera_graph::InteractionGraph;

use crate::linalg::{all_finite, dropout, relu, Lcg};
use crate::weights::ModelWeights;

/// Seed for the training-mode dropout stream. Fixed so training runs
/// are reproducible; inference never draws from it.
const DROPOUT_STREAM_SEED: u64 = 0x9e3779b97f4a7c15;

/// Node embeddings computed from one graph snapshot.
///
/// Derived data: recomputed whenever the graph or the weights change,
/// never mutated in place.
#[derive(Debug, Clone)]
pub struct NodeEmbeddings {
    dim: usize,
    vectors: HashMap<TargetId, Vec<f32>>,
}

impl NodeEmbeddings {
    pub fn get(&self, id: &TargetId) -> Option<&[f32]> {
        self.vectors.get(id).map(|v| v.as_slice())
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Mean-pooled graph-level embedding, for batch-level signals.
    /// Summed in id order so the result is reproducible across runs.
    /// Pair ranking never reads this; it works on node embeddings.
    pub fn pooled(&self) -> Option<Vec<f32>> {
        if self.vectors.is_empty() {
            return None;
        }
        let mut ids: Vec<&TargetId> = self.vectors.keys().collect();
        ids.sort();
        let mut sum = vec![0.0f32; self.dim];
        for id in ids {
            for (acc, x) in sum.iter_mut().zip(&self.vectors[id]) {
                *acc += x;
            }
        }
        let n = self.vectors.len() as f32;
        for acc in &mut sum {
            *acc /= n;
        }
        Some(sum)
    }
}

/// Maps a graph snapshot to per-node contextual embeddings.
///
/// Implementations must be pure: same graph, same weights, same output.
pub trait GraphEncoder: Send + Sync {
    fn encode(&self, graph: &InteractionGraph) -> Result<NodeEmbeddings>;

    /// Width of the embeddings [`GraphEncoder::encode`] produces.
    fn embedding_dim(&self) -> usize;
}

/// Mean-aggregation message-passing encoder.
pub struct MeanAggregationEncoder {
    config: EncoderConfig,
    weights: Arc<ModelWeights>,
}

impl MeanAggregationEncoder {
    /// Build an encoder over shared weights. Fails when the weight
    /// stack does not match the configured layer widths.
    pub fn new(config: EncoderConfig, weights: Arc<ModelWeights>) -> Result<Self> {
        weights.validate()?;
        let expected = config.layer_dims();
        if weights.encoder_layers.len() != expected.len() {
            return Err(EngineError::dimension_mismatch(
                "encoder layer count",
                expected.len(),
                weights.encoder_layers.len(),
            ));
        }
        for (layer, (in_dim, out_dim)) in weights.encoder_layers.iter().zip(expected) {
            if layer.in_dim != in_dim || layer.out_dim != out_dim {
                return Err(EngineError::dimension_mismatch(
                    "encoder layer widths",
                    out_dim,
                    layer.out_dim,
                ));
            }
        }
        Ok(Self { config, weights })
    }
}

impl GraphEncoder for MeanAggregationEncoder {
    fn encode(&self, graph: &InteractionGraph) -> Result<NodeEmbeddings> {
        if graph.is_empty() {
            return Err(EngineError::EmptyGraph);
        }
        if graph.feature_dim() != self.config.input_dim {
            return Err(EngineError::dimension_mismatch(
                "encoder input features",
                self.config.input_dim,
                graph.feature_dim(),
            ));
        }

        let mut current: HashMap<TargetId, Vec<f32>> = graph
            .nodes()
            .map(|node| (node.id.clone(), node.features.clone()))
            .collect();
        let mut rng = Lcg::new(DROPOUT_STREAM_SEED);

        for (layer_idx, layer) in self.weights.encoder_layers.iter().enumerate() {
            let mut transformed: HashMap<TargetId, Vec<f32>> =
                HashMap::with_capacity(current.len());
            for (id, vector) in &current {
                transformed.insert(id.clone(), layer.forward(vector)?);
            }

            let mut next = HashMap::with_capacity(transformed.len());
            for node in graph.nodes() {
                let mut sum = transformed[&node.id].clone();
                let neighbors = graph.neighbors(&node.id)?;
                for neighbor in &neighbors {
                    for (acc, x) in sum.iter_mut().zip(&transformed[neighbor]) {
                        *acc += x;
                    }
                }
                // Self-loop counts once, so an isolated node divides by one.
                let count = (neighbors.len() + 1) as f32;
                for acc in &mut sum {
                    *acc /= count;
                }

                relu(&mut sum);
                if self.config.training {
                    dropout(&mut sum, self.config.dropout, &mut rng);
                }

                if !all_finite(&sum) {
                    return Err(EngineError::instability(format!(
                        "layer {layer_idx} embedding for {}",
                        node.id
                    )));
                }
                next.insert(node.id.clone(), sum);
            }
            current = next;
        }

        debug!(
            nodes = current.len(),
            dim = self.config.output_dim,
            layers = self.weights.encoder_layers.len(),
            "encoded graph snapshot"
        );

        Ok(NodeEmbeddings {
            dim: self.config.output_dim,
            vectors: current,
        })
    }

    fn embedding_dim(&self) -> usize {
        self.config.output_dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimera_core::config::ScorerConfig;
    use dimera_core::types::{InteractionRecord, ProteinNode};

    fn small_config() -> EncoderConfig {
        EncoderConfig {
            input_dim: 4,
            hidden_dim: 8,
            output_dim: 6,
            layers: 3,
            dropout: 0.2,
            training: false,
        }
    }

    fn encoder_for(config: &EncoderConfig) -> MeanAggregationEncoder {
        let weights = Arc::new(ModelWeights::seeded(
            config,
            &ScorerConfig::default(),
            42,
        ));
        MeanAggregationEncoder::new(config.clone(), weights).unwrap()
    }

    fn node(id: &str, features: [f32; 4]) -> ProteinNode {
        ProteinNode::new(id, features.to_vec())
    }

    fn abcd_graph() -> InteractionGraph {
        let nodes = vec![
            node("A", [1.0, 0.0, 0.5, -0.5]),
            node("B", [0.0, 1.0, 0.5, 0.5]),
            node("C", [0.5, 0.5, 0.0, 1.0]),
            node("D", [1.0, 1.0, 1.0, 1.0]),
        ];
        let records = vec![
            InteractionRecord::new("A", "B", 0.9),
            InteractionRecord::new("B", "C", 0.6),
            InteractionRecord::new("C", "D", 0.3),
        ];
        InteractionGraph::build(nodes, &records, 0.5).unwrap()
    }

    #[test]
    fn isolated_node_embeds_finite() {
        let config = small_config();
        let graph = abcd_graph();
        assert_eq!(graph.neighbors(&"D".into()).unwrap().len(), 0);

        let embeddings = encoder_for(&config).encode(&graph).unwrap();
        let d = embeddings.get(&"D".into()).unwrap();
        assert_eq!(d.len(), 6);
        assert!(all_finite(d));
    }

    #[test]
    fn inference_encoding_is_deterministic() {
        let config = small_config();
        let encoder = encoder_for(&config);
        let graph = abcd_graph();

        let first = encoder.encode(&graph).unwrap();
        let second = encoder.encode(&graph).unwrap();
        for id in graph.targets() {
            assert_eq!(first.get(id).unwrap(), second.get(id).unwrap());
        }
    }

    #[test]
    fn neighbors_change_the_embedding() {
        let config = small_config();
        let encoder = encoder_for(&config);

        let connected = abcd_graph();
        let lone = InteractionGraph::build(
            vec![node("A", [1.0, 0.0, 0.5, -0.5])],
            &[],
            0.5,
        )
        .unwrap();

        let with_neighbors = encoder.encode(&connected).unwrap();
        let alone = encoder.encode(&lone).unwrap();
        assert_ne!(
            with_neighbors.get(&"A".into()).unwrap(),
            alone.get(&"A".into()).unwrap()
        );
    }

    #[test]
    fn feature_width_mismatch_rejected() {
        let config = small_config();
        let encoder = encoder_for(&config);
        let graph =
            InteractionGraph::build(vec![ProteinNode::new("A", vec![1.0, 2.0])], &[], 0.5)
                .unwrap();
        let err = encoder.encode(&graph).unwrap_err();
        assert_eq!(
            err,
            EngineError::dimension_mismatch("encoder input features", 4, 2)
        );
    }

    #[test]
    fn empty_graph_rejected() {
        let config = small_config();
        let encoder = encoder_for(&config);
        let graph = InteractionGraph::build(Vec::new(), &[], 0.5).unwrap();
        assert_eq!(encoder.encode(&graph).unwrap_err(), EngineError::EmptyGraph);
    }

    #[test]
    fn mismatched_weights_rejected_at_construction() {
        let config = small_config();
        let other = EncoderConfig {
            input_dim: 9,
            ..small_config()
        };
        let weights = Arc::new(ModelWeights::seeded(&other, &ScorerConfig::default(), 42));
        assert!(MeanAggregationEncoder::new(config, weights).is_err());
    }

    #[test]
    fn pooled_embedding_averages_nodes() {
        let config = small_config();
        let encoder = encoder_for(&config);

        let lone = InteractionGraph::build(
            vec![node("A", [1.0, 0.0, 0.5, -0.5])],
            &[],
            0.5,
        )
        .unwrap();
        let embeddings = encoder.encode(&lone).unwrap();
        // One node: pooled equals that node's embedding.
        assert_eq!(
            embeddings.pooled().unwrap(),
            embeddings.get(&"A".into()).unwrap().to_vec()
        );

        let graph = abcd_graph();
        let pooled = encoder.encode(&graph).unwrap().pooled().unwrap();
        assert_eq!(pooled.len(), 6);
        assert!(all_finite(&pooled));
    }
}
