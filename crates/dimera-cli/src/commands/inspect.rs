//! Show graph statistics for a dataset file.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use dimera::prelude::*;

use crate::dataset::Dataset;

pub fn run(dataset_path: &str, min_confidence: f64) -> Result<()> {
    let dataset = Dataset::load(Path::new(dataset_path))?;
    let supplied_interactions = dataset.interactions.len();
    let graph = InteractionGraph::build(dataset.proteins, &dataset.interactions, min_confidence)?;
    let stats = graph.stats();

    println!("{}", "Dimera Graph Statistics".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "Structure".blue().bold());
    println!("  Proteins:          {}", stats.nodes.to_string().cyan());
    println!(
        "  Interactions kept: {} of {}",
        stats.edges.to_string().cyan(),
        supplied_interactions
    );
    println!(
        "  Feature width:     {}",
        stats.feature_dim.to_string().cyan()
    );
    println!("  Min confidence:    {}", stats.min_confidence);
    println!();

    println!("{}", "Connectivity".blue().bold());
    println!("  Mean degree:       {:.2}", stats.mean_degree);
    let max_degree = graph
        .targets()
        .map(|id| graph.degree(id).unwrap_or(0))
        .max()
        .unwrap_or(0);
    println!("  Max degree:        {}", max_degree.to_string().cyan());

    let isolated = graph.isolated_targets();
    println!(
        "  Isolated targets:  {}",
        isolated.len().to_string().cyan()
    );
    if !isolated.is_empty() {
        let names: Vec<&str> = isolated.iter().map(|id| id.as_str()).collect();
        println!("      {}", names.join(", ").dimmed());
    }

    Ok(())
}
