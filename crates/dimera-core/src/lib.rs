//! # Dimera Core
//!
//! Core types, configuration, and errors for the Dimera target pair
//! ranking engine.
//!
//! Dimera ranks candidate pairs of protein targets for a disease
//! indication and attaches mechanistic, biomarker, and toxicity
//! predictions to each ranked pair. This crate defines the shared data
//! model the other crates operate on:
//!
//! - **Identity**: [`types::TargetId`], [`types::TargetPair`] (unordered,
//!   canonicalized so swapped endpoints are the same value)
//! - **Inputs**: [`types::ProteinNode`], [`types::InteractionRecord`],
//!   [`types::RankingRequest`], [`types::CandidatePool`]
//! - **Outputs**: [`types::ScoredPair`], [`types::TargetRecommendation`],
//!   [`types::RankingOutcome`]
//! - **Configuration**: [`config::EncoderConfig`], [`config::ScorerConfig`],
//!   [`config::EngineConfig`]
//! - **Errors**: [`error::EngineError`]
//!
//! ## Quick Start
//!
//! ```rust
//! use dimera_core::prelude::*;
//!
//! let pair = TargetPair::new("MAP2K1", "BRAF").unwrap();
//! assert_eq!(pair.first().as_str(), "BRAF");
//!
//! let request = RankingRequest::new("melanoma")
//!     .with_strategy(TargetingStrategy::parse("synergism"));
//! assert!(request.strategy.is_recognized());
//! ```

pub mod config;
pub mod error;
pub mod prelude;
pub mod types;
