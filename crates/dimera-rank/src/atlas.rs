//! Curated pathway catalog backing the mechanism and biomarker heads.
//!
//! The atlas is a small in-memory reference: pathway membership, canonical
//! biomarkers, and indication affinity terms for the major signalling axes.
//! Gene symbol lookup is case-insensitive. A custom catalog deserializes
//! from the same `Pathway` records the built-in one is made of.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use dimera_core::types::TargetId;

/// One curated signalling pathway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pathway {
    /// Stable identifier, e.g. `mapk_erk`.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Member gene symbols.
    pub genes: Vec<String>,
    /// Canonical biomarkers read out for this pathway.
    pub biomarkers: Vec<String>,
    /// Lowercase indication terms this pathway is implicated in.
    pub indications: Vec<String>,
}

/// A pathway matched to an indication, with affinity in (0, 1].
#[derive(Debug, Clone, Serialize)]
pub struct PathwayAssociation {
    pub pathway_id: String,
    pub name: String,
    /// Fraction of the pathway's indication terms matching the query.
    pub affinity: f64,
}

/// In-memory pathway catalog with a gene symbol index.
pub struct PathwayAtlas {
    pathways: Vec<Pathway>,
    gene_index: HashMap<String, Vec<usize>>,
}

impl PathwayAtlas {
    /// Build an atlas from pathway records, indexing gene symbols
    /// case-insensitively.
    pub fn new(pathways: Vec<Pathway>) -> Self {
        let mut gene_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, pathway) in pathways.iter().enumerate() {
            for gene in &pathway.genes {
                gene_index.entry(gene.to_lowercase()).or_default().push(idx);
            }
        }
        Self {
            pathways,
            gene_index,
        }
    }

    /// The built-in catalog: eight major signalling axes with their
    /// canonical members, readouts, and indications.
    pub fn curated() -> Self {
        Self::new(vec![
            Pathway {
                id: "mapk_erk".to_string(),
                name: "MAPK/ERK signaling".to_string(),
                genes: str_vec(&[
                    "EGFR", "KRAS", "NRAS", "BRAF", "RAF1", "MAP2K1", "MAP2K2", "MAPK1", "MAPK3",
                ]),
                biomarkers: str_vec(&[
                    "phospho-ERK1/2",
                    "BRAF V600E",
                    "KRAS mutation status",
                    "DUSP6 expression",
                ]),
                indications: str_vec(&[
                    "melanoma",
                    "colorectal cancer",
                    "non-small cell lung cancer",
                    "thyroid cancer",
                ]),
            },
            Pathway {
                id: "pi3k_akt_mtor".to_string(),
                name: "PI3K/AKT/mTOR signaling".to_string(),
                genes: str_vec(&[
                    "PIK3CA", "PIK3R1", "PTEN", "AKT1", "AKT2", "MTOR", "RPTOR", "RICTOR", "TSC1",
                    "TSC2",
                ]),
                biomarkers: str_vec(&[
                    "phospho-AKT S473",
                    "PTEN loss",
                    "PIK3CA mutation status",
                    "phospho-S6",
                ]),
                indications: str_vec(&[
                    "breast cancer",
                    "endometrial cancer",
                    "prostate cancer",
                    "renal cell carcinoma",
                ]),
            },
            Pathway {
                id: "jak_stat".to_string(),
                name: "JAK/STAT signaling".to_string(),
                genes: str_vec(&[
                    "JAK1", "JAK2", "JAK3", "TYK2", "STAT1", "STAT3", "STAT5A", "STAT5B",
                ]),
                biomarkers: str_vec(&[
                    "phospho-STAT3",
                    "JAK2 V617F",
                    "interferon gene signature",
                ]),
                indications: str_vec(&[
                    "myelofibrosis",
                    "polycythemia vera",
                    "rheumatoid arthritis",
                    "lymphoma",
                ]),
            },
            Pathway {
                id: "dna_damage_response".to_string(),
                name: "DNA damage response".to_string(),
                genes: str_vec(&[
                    "BRCA1", "BRCA2", "ATM", "ATR", "CHEK1", "CHEK2", "PARP1", "RAD51", "TP53BP1",
                ]),
                biomarkers: str_vec(&[
                    "HRD score",
                    "BRCA mutation status",
                    "gamma-H2AX foci",
                    "RAD51 foci",
                ]),
                indications: str_vec(&[
                    "ovarian cancer",
                    "breast cancer",
                    "pancreatic cancer",
                    "prostate cancer",
                ]),
            },
            Pathway {
                id: "apoptosis".to_string(),
                name: "Intrinsic apoptosis".to_string(),
                genes: str_vec(&[
                    "BCL2", "BCL2L1", "MCL1", "BAX", "BAK1", "CASP3", "CASP8", "CASP9", "XIAP",
                ]),
                biomarkers: str_vec(&[
                    "BCL2 expression",
                    "BH3 profiling",
                    "caspase-3 cleavage",
                ]),
                indications: str_vec(&[
                    "chronic lymphocytic leukemia",
                    "acute myeloid leukemia",
                    "lymphoma",
                ]),
            },
            Pathway {
                id: "immune_checkpoint".to_string(),
                name: "Immune checkpoint signaling".to_string(),
                genes: str_vec(&[
                    "PDCD1", "CD274", "PDCD1LG2", "CTLA4", "LAG3", "HAVCR2", "TIGIT",
                ]),
                biomarkers: str_vec(&[
                    "PD-L1 TPS",
                    "tumor mutational burden",
                    "MSI status",
                    "CD8+ TIL density",
                ]),
                indications: str_vec(&[
                    "melanoma",
                    "non-small cell lung cancer",
                    "renal cell carcinoma",
                    "bladder cancer",
                ]),
            },
            Pathway {
                id: "angiogenesis".to_string(),
                name: "VEGF angiogenesis".to_string(),
                genes: str_vec(&[
                    "VEGFA", "KDR", "FLT1", "FLT4", "ANGPT1", "ANGPT2", "TEK", "PDGFRB",
                ]),
                biomarkers: str_vec(&[
                    "circulating VEGF-A",
                    "microvessel density",
                    "soluble VEGFR2",
                ]),
                indications: str_vec(&[
                    "renal cell carcinoma",
                    "hepatocellular carcinoma",
                    "colorectal cancer",
                ]),
            },
            Pathway {
                id: "cell_cycle".to_string(),
                name: "Cell cycle checkpoint".to_string(),
                genes: str_vec(&[
                    "CDK4", "CDK6", "CCND1", "CDKN2A", "RB1", "CDK2", "CCNE1", "AURKA", "PLK1",
                ]),
                biomarkers: str_vec(&[
                    "Rb phosphorylation",
                    "CDKN2A deletion",
                    "Ki-67 index",
                    "cyclin E1 amplification",
                ]),
                indications: str_vec(&[
                    "breast cancer",
                    "liposarcoma",
                    "mantle cell lymphoma",
                ]),
            },
        ])
    }

    /// Pathways containing the target, in catalog order.
    pub fn pathways_for(&self, target: &TargetId) -> Vec<&Pathway> {
        self.gene_index
            .get(&target.as_str().to_lowercase())
            .map(|indices| indices.iter().map(|&i| &self.pathways[i]).collect())
            .unwrap_or_default()
    }

    /// Biomarkers curated for the target's pathways, deduplicated in
    /// catalog order.
    pub fn markers_for(&self, target: &TargetId) -> Vec<String> {
        let mut seen = Vec::new();
        for pathway in self.pathways_for(target) {
            for marker in &pathway.biomarkers {
                if !seen.contains(marker) {
                    seen.push(marker.clone());
                }
            }
        }
        seen
    }

    /// Pathways whose indication terms appear in the query indication,
    /// strongest affinity first (ties broken by pathway id).
    pub fn associations_for(&self, indication: &str) -> Vec<PathwayAssociation> {
        let needle = indication.to_lowercase();
        let mut matches: Vec<PathwayAssociation> = self
            .pathways
            .iter()
            .filter_map(|pathway| {
                let hits = pathway
                    .indications
                    .iter()
                    .filter(|term| needle.contains(term.as_str()))
                    .count();
                if hits == 0 {
                    return None;
                }
                Some(PathwayAssociation {
                    pathway_id: pathway.id.clone(),
                    name: pathway.name.clone(),
                    affinity: hits as f64 / pathway.indications.len() as f64,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.affinity
                .partial_cmp(&a.affinity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.pathway_id.cmp(&b.pathway_id))
        });
        matches
    }

    pub fn pathways(&self) -> &[Pathway] {
        &self.pathways
    }

    pub fn len(&self) -> usize {
        self.pathways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pathways.is_empty()
    }
}

impl Default for PathwayAtlas {
    fn default() -> Self {
        Self::curated()
    }
}

fn str_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gene_lookup_is_case_insensitive() {
        let atlas = PathwayAtlas::curated();
        let upper = atlas.pathways_for(&TargetId::new("BRAF"));
        let lower = atlas.pathways_for(&TargetId::new("braf"));

        assert_eq!(upper.len(), 1);
        assert_eq!(upper[0].id, "mapk_erk");
        assert_eq!(lower[0].id, "mapk_erk");
    }

    #[test]
    fn unknown_gene_yields_no_pathways() {
        let atlas = PathwayAtlas::curated();
        assert!(atlas.pathways_for(&TargetId::new("NOTAGENE")).is_empty());
    }

    #[test]
    fn markers_dedup_across_pathways() {
        let atlas = PathwayAtlas::new(vec![
            Pathway {
                id: "p1".into(),
                name: "One".into(),
                genes: str_vec(&["TP53"]),
                biomarkers: str_vec(&["marker-a", "marker-b"]),
                indications: vec![],
            },
            Pathway {
                id: "p2".into(),
                name: "Two".into(),
                genes: str_vec(&["TP53"]),
                biomarkers: str_vec(&["marker-b", "marker-c"]),
                indications: vec![],
            },
        ]);

        let markers = atlas.markers_for(&TargetId::new("tp53"));
        assert_eq!(markers, vec!["marker-a", "marker-b", "marker-c"]);
    }

    #[test]
    fn associations_match_indication_terms() {
        let atlas = PathwayAtlas::curated();
        let hits = atlas.associations_for("metastatic melanoma");

        let ids: Vec<&str> = hits.iter().map(|a| a.pathway_id.as_str()).collect();
        assert!(ids.contains(&"mapk_erk"));
        assert!(ids.contains(&"immune_checkpoint"));
        for assoc in &hits {
            assert!(assoc.affinity > 0.0 && assoc.affinity <= 1.0);
        }
    }

    #[test]
    fn associations_empty_for_unmatched_indication() {
        let atlas = PathwayAtlas::curated();
        assert!(atlas.associations_for("seasonal allergies").is_empty());
    }

    #[test]
    fn pathway_records_deserialize() {
        let json = r#"{
            "id": "custom",
            "name": "Custom axis",
            "genes": ["GENE1"],
            "biomarkers": ["marker-x"],
            "indications": ["test disease"]
        }"#;
        let pathway: Pathway = serde_json::from_str(json).unwrap();
        let atlas = PathwayAtlas::new(vec![pathway]);
        assert_eq!(atlas.len(), 1);
        assert_eq!(atlas.pathways_for(&TargetId::new("gene1")).len(), 1);
    }
}
