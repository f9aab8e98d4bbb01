//! Rank target pairs from a dataset file.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use dimera::prelude::*;

use crate::dataset::Dataset;

pub struct RankArgs {
    pub dataset: String,
    pub indication: String,
    pub population: String,
    pub phenotype: String,
    pub strategy: String,
    pub top_k: Option<usize>,
    pub tissues: Vec<String>,
    pub pairs: Vec<String>,
    pub min_confidence: f64,
    pub seed: u64,
}

pub fn run(args: RankArgs) -> Result<()> {
    let dataset = Dataset::load(Path::new(&args.dataset))?;
    if dataset.proteins.is_empty() {
        bail!("Dataset has no proteins: {}", args.dataset);
    }

    let tissues = parse_tissues(&args.tissues)?;
    let pool = if args.pairs.is_empty() {
        CandidatePool::FullGraph
    } else {
        CandidatePool::Pairs(parse_pairs(&args.pairs)?)
    };

    let store = Arc::new(GraphStore::from_records(
        dataset.proteins,
        &dataset.interactions,
        args.min_confidence,
    )?);
    let feature_dim = store.snapshot().graph.feature_dim();

    let config = EngineConfig::default()
        .with_seed(args.seed)
        .with_encoder(EncoderConfig::default().with_input_dim(feature_dim));
    let engine = RankingEngine::from_config(config, store)?;

    let mut request = RankingRequest::new(args.indication)
        .with_population(args.population)
        .with_phenotype(args.phenotype)
        .with_strategy(TargetingStrategy::parse(&args.strategy));
    for (tissue, weight) in tissues {
        request = request.with_tissue_weight(tissue, weight);
    }

    let outcome = engine.rank(&request, &pool, args.top_k)?;
    print_outcome(&outcome, &request);
    Ok(())
}

fn parse_tissues(flags: &[String]) -> Result<HashMap<String, f64>> {
    let mut map = HashMap::new();
    for flag in flags {
        let (name, weight) = flag
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid --tissue '{}': expected NAME=WEIGHT", flag))?;
        let weight: f64 = weight
            .parse()
            .with_context(|| format!("invalid weight in --tissue '{}'", flag))?;
        map.insert(name.to_string(), weight);
    }
    Ok(map)
}

fn parse_pairs(flags: &[String]) -> Result<Vec<TargetPair>> {
    flags
        .iter()
        .map(|flag| {
            let (a, b) = flag
                .split_once(':')
                .ok_or_else(|| anyhow!("invalid --pair '{}': expected A:B", flag))?;
            TargetPair::new(a, b).map_err(|e| anyhow!("invalid --pair '{}': {}", flag, e))
        })
        .collect()
}

fn print_outcome(outcome: &RankingOutcome, request: &RankingRequest) {
    if outcome.recommendations.is_empty() {
        println!(
            "{} No pairs ranked for: {}",
            "•".yellow(),
            request.indication.cyan()
        );
        print_skipped(outcome);
        return;
    }

    println!(
        "{} Ranked pairs for {} (strategy: {}):",
        "→".blue(),
        request.indication.cyan().bold(),
        outcome.strategy
    );
    println!();

    for (i, rec) in outcome.recommendations.iter().enumerate() {
        let rank = format!("{}.", i + 1);
        let score = format!("({:.3})", rec.score);
        let flag = if rec.degraded {
            format!(" {}", "[degraded]".yellow())
        } else {
            String::new()
        };

        println!(
            "  {} {} {}{}",
            rank.blue(),
            rec.pair.to_string().white().bold(),
            score.dimmed(),
            flag
        );
        println!(
            "      Toxicity: {:.3} (baseline {:.3})",
            rec.toxicity.score, rec.toxicity.baseline
        );

        if !rec.explanation.pathways.is_empty() {
            let pathways: Vec<String> = rec
                .explanation
                .pathways
                .iter()
                .map(|p| format!("{} ({:.2})", p.name, p.relevance))
                .collect();
            println!("      Pathways: {}", pathways.join(", "));
        }
        if !rec.biomarkers.is_empty() {
            let markers: Vec<String> = rec
                .biomarkers
                .iter()
                .take(3)
                .map(|b| format!("{} ({:.2})", b.marker, b.confidence))
                .collect();
            println!("      Biomarkers: {}", markers.join(", "));
        }
        println!("      {}", rec.explanation.narrative.dimmed());
    }

    println!();
    print_skipped(outcome);

    let status = if outcome.degraded {
        "degraded".yellow().to_string()
    } else {
        "complete".green().to_string()
    };
    println!(
        "{} {} ranked, {} skipped ({})",
        "✓".green(),
        outcome.recommendations.len().to_string().cyan(),
        outcome.skipped.len().to_string().cyan(),
        status
    );
}

fn print_skipped(outcome: &RankingOutcome) {
    for skip in &outcome.skipped {
        println!("{} Skipped {}: {}", "•".yellow(), skip.pair, skip.reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tissue_flags_parse_into_weights() {
        let flags = vec!["liver=0.8".to_string(), "cardiac=0.2".to_string()];
        let map = parse_tissues(&flags).unwrap();
        assert_eq!(map["liver"], 0.8);
        assert_eq!(map["cardiac"], 0.2);
    }

    #[test]
    fn malformed_tissue_flag_is_rejected() {
        assert!(parse_tissues(&["liver".to_string()]).is_err());
        assert!(parse_tissues(&["liver=high".to_string()]).is_err());
    }

    #[test]
    fn pair_flags_parse_into_canonical_pairs() {
        let flags = vec!["MAP2K1:BRAF".to_string()];
        let pairs = parse_pairs(&flags).unwrap();
        assert_eq!(pairs[0].to_string(), "BRAF + MAP2K1");
    }

    #[test]
    fn identical_endpoints_are_rejected() {
        assert!(parse_pairs(&["BRAF:BRAF".to_string()]).is_err());
        assert!(parse_pairs(&["BRAF".to_string()]).is_err());
    }
}
