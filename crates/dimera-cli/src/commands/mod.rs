//! CLI command implementations.

pub mod inspect;
pub mod pathways;
pub mod rank;
