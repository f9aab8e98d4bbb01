//! Prediction heads attached to each retained pair.
//!
//! Each head reads the scored pair (and whatever reference data it needs)
//! and produces one section of the recommendation. Heads do not read each
//! other's output, so they can run in any order.

mod biomarker;
mod mechanism;
mod toxicity;

pub use biomarker::BiomarkerPredictor;
pub use mechanism::MechanismSelector;
pub use toxicity::ToxicityPredictor;
