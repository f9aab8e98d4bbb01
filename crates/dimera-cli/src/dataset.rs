//! Dataset file format for ingestion.
//!
//! A dataset is a single JSON document holding the node and edge lists the
//! engine needs. Tissue expression maps are optional per protein.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use dimera::prelude::{InteractionRecord, ProteinNode};

/// On-disk ingestion format.
#[derive(Debug, Serialize, Deserialize)]
pub struct Dataset {
    pub proteins: Vec<ProteinNode>,
    #[serde(default)]
    pub interactions: Vec<InteractionRecord>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading dataset {}", path.display()))?;
        let dataset: Dataset = serde_json::from_str(&raw)
            .with_context(|| format!("parsing dataset {}", path.display()))?;
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_dataset_with_optional_expression() {
        let json = r#"{
            "proteins": [
                {"id": "BRAF", "features": [0.1, 0.2], "tissue_expression": {"liver": 0.8}},
                {"id": "MAP2K1", "features": [0.3, 0.4]}
            ],
            "interactions": [
                {"source": "BRAF", "target": "MAP2K1", "confidence": 0.92}
            ]
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.proteins.len(), 2);
        assert_eq!(dataset.interactions.len(), 1);
        assert_eq!(dataset.proteins[0].tissue_expression["liver"], 0.8);
        assert!(dataset.proteins[1].tissue_expression.is_empty());
    }

    #[test]
    fn missing_interactions_default_to_empty() {
        let json = r#"{"proteins": [{"id": "BRAF", "features": [0.1]}]}"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let dataset = Dataset::load(file.path()).unwrap();
        assert!(dataset.interactions.is_empty());
    }
}
