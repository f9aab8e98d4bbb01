//! Protein-interaction graph built from ingestion records.
//!
//! Backed by petgraph's undirected `Graph` with a HashMap index for O(1)
//! node lookup by target id. Edges below the minimum confidence are
//! dropped at build time, never filtered per query, so neighbor counts
//! stay stable for every request that reads the same graph.

use std::collections::HashMap;

use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Undirected;
use serde::Serialize;
use tracing::debug;

use dimera_core::error::{EngineError, Result};
use dimera_core::types::{InteractionRecord, ProteinNode, TargetId, TargetPair};

/// Confidence threshold applied when the caller does not configure one.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

/// A retained interaction between two targets.
#[derive(Debug, Clone)]
pub struct InteractionEdge {
    /// Confidence in [0, 1], at or above the build threshold.
    pub confidence: f64,
}

/// Immutable protein-interaction graph.
///
/// Built once from ingestion data, read by many requests, replaced as a
/// whole on reload (see [`crate::store::GraphStore`]). There is no
/// mutation API.
#[derive(Debug)]
pub struct InteractionGraph {
    graph: Graph<ProteinNode, InteractionEdge, Undirected>,
    /// Map from target id to petgraph's internal index.
    index: HashMap<TargetId, NodeIndex>,
    min_confidence: f64,
    feature_dim: usize,
}

impl InteractionGraph {
    /// Build a graph from ingestion data.
    ///
    /// Validates graph-structural invariants only: unique target ids,
    /// consistent feature widths, and no edge endpoint outside the node
    /// set. Records below `min_confidence` are dropped here, permanently.
    /// Parallel records for the same endpoints collapse to the strongest.
    /// Self-interactions are dropped; pairs require distinct targets.
    pub fn build(
        nodes: Vec<ProteinNode>,
        records: &[InteractionRecord],
        min_confidence: f64,
    ) -> Result<Self> {
        let feature_dim = nodes.first().map(|n| n.features.len()).unwrap_or(0);

        let mut graph = Graph::new_undirected();
        let mut index = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if index.contains_key(&node.id) {
                return Err(EngineError::DuplicateTarget(node.id.0));
            }
            if node.features.len() != feature_dim {
                return Err(EngineError::FeatureWidthMismatch {
                    id: node.id.0,
                    expected: feature_dim,
                    got: node.features.len(),
                });
            }
            let id = node.id.clone();
            let idx = graph.add_node(node);
            index.insert(id, idx);
        }

        let mut below_threshold = 0usize;
        let mut self_interactions = 0usize;

        for record in records {
            let Some(&source_idx) = index.get(&record.source) else {
                return Err(EngineError::InvalidEdge {
                    source_id: record.source.0.clone(),
                    target_id: record.target.0.clone(),
                });
            };
            let Some(&target_idx) = index.get(&record.target) else {
                return Err(EngineError::InvalidEdge {
                    source_id: record.source.0.clone(),
                    target_id: record.target.0.clone(),
                });
            };

            if record.source == record.target {
                self_interactions += 1;
                continue;
            }
            if record.confidence < min_confidence {
                below_threshold += 1;
                continue;
            }

            if let Some(edge_idx) = graph.find_edge(source_idx, target_idx) {
                let existing: &mut InteractionEdge = &mut graph[edge_idx];
                if record.confidence > existing.confidence {
                    existing.confidence = record.confidence;
                }
            } else {
                graph.add_edge(
                    source_idx,
                    target_idx,
                    InteractionEdge {
                        confidence: record.confidence,
                    },
                );
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            below_threshold,
            self_interactions,
            min_confidence,
            "built interaction graph"
        );

        Ok(Self {
            graph,
            index,
            min_confidence,
            feature_dim,
        })
    }

    pub fn get(&self, id: &TargetId) -> Result<&ProteinNode> {
        self.index
            .get(id)
            .map(|idx| &self.graph[*idx])
            .ok_or_else(|| EngineError::target_not_found(id))
    }

    pub fn contains(&self, id: &TargetId) -> bool {
        self.index.contains_key(id)
    }

    /// Ids adjacent to `id` via retained edges, in insertion order.
    pub fn neighbors(&self, id: &TargetId) -> Result<Vec<TargetId>> {
        let &idx = self
            .index
            .get(id)
            .ok_or_else(|| EngineError::target_not_found(id))?;

        Ok(self
            .graph
            .edges(idx)
            .map(|edge| {
                let other = if edge.source() == idx {
                    edge.target()
                } else {
                    edge.source()
                };
                self.graph[other].id.clone()
            })
            .collect())
    }

    /// Confidence of the retained edge between two targets, if any.
    pub fn confidence(&self, a: &TargetId, b: &TargetId) -> Option<f64> {
        let a_idx = self.index.get(a)?;
        let b_idx = self.index.get(b)?;
        let edge_idx = self.graph.find_edge(*a_idx, *b_idx)?;
        Some(self.graph[edge_idx].confidence)
    }

    /// Expression level of one target in one tissue, when known.
    pub fn tissue_expression(&self, id: &TargetId, tissue: &str) -> Option<f64> {
        let idx = self.index.get(id)?;
        self.graph[*idx].tissue_expression.get(tissue).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ProteinNode> + '_ {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    pub fn targets(&self) -> impl Iterator<Item = &TargetId> + '_ {
        self.nodes().map(|node| &node.id)
    }

    /// One canonical pair per retained edge, the default candidate pool.
    pub fn interacting_pairs(&self) -> Vec<TargetPair> {
        self.graph
            .edge_indices()
            .filter_map(|idx| {
                let (a, b) = self.graph.edge_endpoints(idx)?;
                // Endpoints are distinct: self-interactions were dropped at build.
                TargetPair::new(self.graph[a].id.clone(), self.graph[b].id.clone()).ok()
            })
            .collect()
    }

    pub fn degree(&self, id: &TargetId) -> Result<usize> {
        let &idx = self
            .index
            .get(id)
            .ok_or_else(|| EngineError::target_not_found(id))?;
        Ok(self.graph.edges(idx).count())
    }

    /// Targets with no retained edges. They still embed (self-loop only).
    pub fn isolated_targets(&self) -> Vec<TargetId> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.edges(idx).next().is_none())
            .map(|idx| self.graph[idx].id.clone())
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn feature_dim(&self) -> usize {
        self.feature_dim
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn stats(&self) -> GraphStats {
        let nodes = self.node_count();
        let edges = self.edge_count();
        GraphStats {
            nodes,
            edges,
            feature_dim: self.feature_dim,
            min_confidence: self.min_confidence,
            isolated: self.isolated_targets().len(),
            mean_degree: if nodes > 0 {
                2.0 * edges as f64 / nodes as f64
            } else {
                0.0
            },
        }
    }
}

/// Summary statistics for one graph build.
#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub feature_dim: usize,
    pub min_confidence: f64,
    pub isolated: usize,
    pub mean_degree: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_node(id: &str) -> ProteinNode {
        ProteinNode::new(id, vec![1.0, 0.5, -0.5, 0.25])
    }

    fn abcd_graph() -> InteractionGraph {
        // D's only edge sits below the threshold, leaving it isolated.
        let nodes = vec![make_node("A"), make_node("B"), make_node("C"), make_node("D")];
        let records = vec![
            InteractionRecord::new("A", "B", 0.9),
            InteractionRecord::new("B", "C", 0.6),
            InteractionRecord::new("C", "D", 0.3),
        ];
        InteractionGraph::build(nodes, &records, DEFAULT_MIN_CONFIDENCE).unwrap()
    }

    #[test]
    fn low_confidence_edges_dropped_at_build() {
        let graph = abcd_graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.isolated_targets(), vec![TargetId::new("D")]);
        assert!(graph.confidence(&"C".into(), &"D".into()).is_none());
    }

    #[test]
    fn neighbors_reflect_retained_edges_only() {
        let graph = abcd_graph();
        let b_neighbors = graph.neighbors(&"B".into()).unwrap();
        assert_eq!(b_neighbors.len(), 2);
        assert!(b_neighbors.contains(&TargetId::new("A")));
        assert!(b_neighbors.contains(&TargetId::new("C")));
        assert!(graph.neighbors(&"D".into()).unwrap().is_empty());
    }

    #[test]
    fn dangling_edge_rejected() {
        let nodes = vec![make_node("A")];
        let records = vec![InteractionRecord::new("A", "GHOST1", 0.9)];
        let err = InteractionGraph::build(nodes, &records, 0.5).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidEdge {
                source_id: "A".into(),
                target_id: "GHOST1".into(),
            }
        );
    }

    #[test]
    fn duplicate_target_rejected() {
        let nodes = vec![make_node("A"), make_node("A")];
        let err = InteractionGraph::build(nodes, &[], 0.5).unwrap_err();
        assert_eq!(err, EngineError::DuplicateTarget("A".into()));
    }

    #[test]
    fn inconsistent_feature_width_rejected() {
        let nodes = vec![make_node("A"), ProteinNode::new("B", vec![1.0])];
        let err = InteractionGraph::build(nodes, &[], 0.5).unwrap_err();
        assert_eq!(
            err,
            EngineError::FeatureWidthMismatch {
                id: "B".into(),
                expected: 4,
                got: 1,
            }
        );
    }

    #[test]
    fn parallel_records_keep_strongest_confidence() {
        let nodes = vec![make_node("A"), make_node("B")];
        let records = vec![
            InteractionRecord::new("A", "B", 0.6),
            InteractionRecord::new("B", "A", 0.8),
            InteractionRecord::new("A", "B", 0.7),
        ];
        let graph = InteractionGraph::build(nodes, &records, 0.5).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.confidence(&"A".into(), &"B".into()), Some(0.8));
    }

    #[test]
    fn self_interactions_dropped() {
        let nodes = vec![make_node("A"), make_node("B")];
        let records = vec![
            InteractionRecord::new("A", "A", 0.9),
            InteractionRecord::new("A", "B", 0.9),
        ];
        let graph = InteractionGraph::build(nodes, &records, 0.5).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degree(&"A".into()).unwrap(), 1);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let first = abcd_graph();
        let second = abcd_graph();
        assert_eq!(first.node_count(), second.node_count());
        assert_eq!(first.edge_count(), second.edge_count());
        for id in first.targets() {
            assert_eq!(
                first.neighbors(id).unwrap(),
                second.neighbors(id).unwrap()
            );
        }
    }

    #[test]
    fn interacting_pairs_are_canonical() {
        let graph = abcd_graph();
        let mut pairs = graph.interacting_pairs();
        pairs.sort();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], TargetPair::new("A", "B").unwrap());
        assert_eq!(pairs[1], TargetPair::new("B", "C").unwrap());
    }

    #[test]
    fn tissue_lookup() {
        let nodes = vec![
            make_node("A"),
            ProteinNode::new("B", vec![0.0, 0.0, 0.0, 0.0]).with_expression("liver", 2.5),
        ];
        let graph = InteractionGraph::build(nodes, &[], 0.5).unwrap();
        assert_eq!(graph.tissue_expression(&"B".into(), "liver"), Some(2.5));
        assert_eq!(graph.tissue_expression(&"B".into(), "heart"), None);
        assert_eq!(graph.tissue_expression(&"A".into(), "liver"), None);
    }

    #[test]
    fn unknown_target_lookup_fails() {
        let graph = abcd_graph();
        let err = graph.get(&"GHOST1".into()).unwrap_err();
        assert_eq!(err, EngineError::TargetNotFound("GHOST1".into()));
    }
}
