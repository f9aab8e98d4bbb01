//! Ranking policy: score every candidate, order, truncate.
//!
//! Per-pair failures never abort the batch: a candidate with a missing
//! endpoint or a non-finite score lands in the skipped list and the rest
//! rank as if it had never been submitted.

use std::cmp::Ordering;

use tracing::warn;

use dimera_core::error::{EngineError, Result};
use dimera_core::types::{ScoredPair, SkippedCandidate, TargetPair};
use dimera_encoder::NodeEmbeddings;

use crate::scorer::PairScorer;

/// Score a candidate set, splitting per-pair failures out into a skip
/// list. Errors that indict the whole batch (weight/width disagreements)
/// propagate instead.
pub fn score_candidates(
    scorer: &PairScorer,
    embeddings: &NodeEmbeddings,
    candidates: &[TargetPair],
) -> Result<(Vec<ScoredPair>, Vec<SkippedCandidate>)> {
    let mut scored = Vec::with_capacity(candidates.len());
    let mut skipped = Vec::new();

    for pair in candidates {
        match score_one(scorer, embeddings, pair) {
            Ok(result) => scored.push(result),
            Err(error) if error.is_per_pair() => {
                warn!(pair = %pair, %error, "skipping candidate");
                skipped.push(SkippedCandidate {
                    pair: pair.clone(),
                    reason: error.to_string(),
                });
            }
            Err(error) => return Err(error),
        }
    }

    Ok((scored, skipped))
}

fn score_one(
    scorer: &PairScorer,
    embeddings: &NodeEmbeddings,
    pair: &TargetPair,
) -> Result<ScoredPair> {
    let emb1 = embeddings
        .get(pair.first())
        .ok_or_else(|| EngineError::target_not_found(pair.first()))?;
    let emb2 = embeddings
        .get(pair.second())
        .ok_or_else(|| EngineError::target_not_found(pair.second()))?;
    scorer.score(pair, emb1, emb2)
}

/// Sort descending by score, break ties by canonical pair id, truncate.
///
/// The tie-break makes the full ordering deterministic: two runs over the
/// same snapshot produce byte-identical output.
pub fn order(scored: &mut Vec<ScoredPair>, top_k: Option<usize>) {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.pair.cmp(&b.pair))
    });
    if let Some(k) = top_k {
        scored.truncate(k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(first: &str, second: &str, score: f64) -> ScoredPair {
        ScoredPair {
            pair: TargetPair::new(first, second).unwrap(),
            score,
            latent: vec![0.0; 4],
        }
    }

    #[test]
    fn orders_descending_by_score() {
        let mut rows = vec![
            scored("A", "B", 0.2),
            scored("C", "D", 1.5),
            scored("E", "F", -0.3),
        ];
        order(&mut rows, None);

        let scores: Vec<f64> = rows.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![1.5, 0.2, -0.3]);
    }

    #[test]
    fn equal_scores_break_ties_lexicographically() {
        let mut rows = vec![
            scored("KRAS", "TP53", 1.0),
            scored("BRAF", "KRAS", 1.0),
            scored("AKT1", "MTOR", 1.0),
        ];
        order(&mut rows, None);

        let labels: Vec<String> = rows.iter().map(|r| r.pair.to_string()).collect();
        assert_eq!(
            labels,
            vec!["AKT1 + MTOR", "BRAF + KRAS", "KRAS + TP53"]
        );
    }

    #[test]
    fn truncates_to_top_k() {
        let mut rows = vec![
            scored("A", "B", 3.0),
            scored("C", "D", 2.0),
            scored("E", "F", 1.0),
        ];
        order(&mut rows, Some(2));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].pair.to_string(), "C + D");
    }

    #[test]
    fn top_k_larger_than_set_keeps_everything() {
        let mut rows = vec![scored("A", "B", 3.0)];
        order(&mut rows, Some(10));
        assert_eq!(rows.len(), 1);
    }
}
