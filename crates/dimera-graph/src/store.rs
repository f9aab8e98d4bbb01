//! Shared graph store with copy-on-write replacement.
//!
//! Requests take an immutable snapshot at entry and work against it for
//! their whole lifetime. A reload builds the new graph off to the side
//! and installs it with a single pointer swap: readers holding the old
//! `Arc` keep a consistent view, new readers see the new graph. No
//! partially-updated state is ever observable.

use std::sync::{Arc, RwLock};

use tracing::info;

use dimera_core::error::Result;
use dimera_core::types::{InteractionRecord, ProteinNode};

use crate::interaction::InteractionGraph;

/// An immutable view of the graph taken at the start of a request.
#[derive(Clone)]
pub struct GraphSnapshot {
    pub graph: Arc<InteractionGraph>,
    /// Monotonic install counter. Embedding caches key off this.
    pub version: u64,
}

/// Owner of the current interaction graph.
///
/// Many concurrent readers; writers replace the whole graph atomically.
pub struct GraphStore {
    current: RwLock<GraphSnapshot>,
}

impl GraphStore {
    pub fn new(graph: InteractionGraph) -> Self {
        Self {
            current: RwLock::new(GraphSnapshot {
                graph: Arc::new(graph),
                version: 1,
            }),
        }
    }

    /// Build the initial graph from ingestion data and wrap it in a store.
    pub fn from_records(
        nodes: Vec<ProteinNode>,
        records: &[InteractionRecord],
        min_confidence: f64,
    ) -> Result<Self> {
        Ok(Self::new(InteractionGraph::build(
            nodes,
            records,
            min_confidence,
        )?))
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.current.read().unwrap().clone()
    }

    /// Replace the graph wholesale. Returns the new version.
    pub fn install(&self, graph: InteractionGraph) -> u64 {
        let mut current = self.current.write().unwrap();
        let version = current.version + 1;
        info!(
            version,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "installing new interaction graph"
        );
        *current = GraphSnapshot {
            graph: Arc::new(graph),
            version,
        };
        version
    }

    /// Build a new graph from ingestion data and install it. The build
    /// happens outside the lock; a failed build leaves the current graph
    /// untouched.
    pub fn reload(
        &self,
        nodes: Vec<ProteinNode>,
        records: &[InteractionRecord],
        min_confidence: f64,
    ) -> Result<u64> {
        let graph = InteractionGraph::build(nodes, records, min_confidence)?;
        Ok(self.install(graph))
    }

    pub fn version(&self) -> u64 {
        self.current.read().unwrap().version
    }
}
