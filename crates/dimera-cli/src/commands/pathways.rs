//! List the curated pathway atlas.

use anyhow::Result;
use colored::Colorize;
use dimera::prelude::*;

pub fn run(target: Option<&str>) -> Result<()> {
    let atlas = PathwayAtlas::curated();

    let listed: Vec<&Pathway> = match target {
        Some(symbol) => {
            let hits = atlas.pathways_for(&TargetId::new(symbol));
            if hits.is_empty() {
                println!(
                    "{} No curated pathway contains: {}",
                    "•".yellow(),
                    symbol.cyan()
                );
                return Ok(());
            }
            println!(
                "{} Pathways containing {}:",
                "→".blue(),
                symbol.cyan().bold()
            );
            hits
        }
        None => {
            println!(
                "{} Curated pathway atlas ({} pathways):",
                "→".blue(),
                atlas.len().to_string().cyan()
            );
            atlas.pathways().iter().collect()
        }
    };
    println!();

    for pathway in listed {
        println!("  {} {}", pathway.id.blue(), pathway.name.white().bold());
        println!("      Genes: {}", pathway.genes.join(", ").dimmed());
        println!(
            "      Biomarkers: {}",
            pathway.biomarkers.join(", ").dimmed()
        );
        println!(
            "      Indications: {}",
            pathway.indications.join(", ").dimmed()
        );
        println!();
    }

    Ok(())
}
