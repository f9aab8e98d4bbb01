//! Small dense linear algebra for the encoder and scorer.
//!
//! The models here are a handful of small matrices, so the math is
//! hand-rolled on `Vec<f32>`: no BLAS, no graph autodiff, and every
//! operation is deterministic and easy to audit.

use serde::{Deserialize, Serialize};

use dimera_core::error::{EngineError, Result};

/// Deterministic pseudo-random generator for weight initialization and
/// training-mode dropout. Linear congruential, same stream for the same
/// seed on every platform.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        self.state
    }

    /// Uniform in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits give full f32 mantissa coverage.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform in [-scale, scale).
    pub fn next_symmetric(&mut self, scale: f32) -> f32 {
        (self.next_f32() * 2.0 - 1.0) * scale
    }
}

/// A dense linear layer: `y = W x + b`, weights stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearLayer {
    pub in_dim: usize,
    pub out_dim: usize,
    /// Row-major weight matrix, `out_dim * in_dim` entries.
    pub weights: Vec<f32>,
    pub bias: Vec<f32>,
}

impl LinearLayer {
    /// Initialize uniformly in ±1/sqrt(in_dim) from the caller's
    /// generator, so a whole model derives from one seed.
    pub fn seeded(in_dim: usize, out_dim: usize, rng: &mut Lcg) -> Self {
        let scale = 1.0 / (in_dim.max(1) as f32).sqrt();
        let weights = (0..in_dim * out_dim)
            .map(|_| rng.next_symmetric(scale))
            .collect();
        let bias = (0..out_dim).map(|_| rng.next_symmetric(scale)).collect();
        Self {
            in_dim,
            out_dim,
            weights,
            bias,
        }
    }

    pub fn forward(&self, input: &[f32]) -> Result<Vec<f32>> {
        if input.len() != self.in_dim {
            return Err(EngineError::dimension_mismatch(
                "linear layer input",
                self.in_dim,
                input.len(),
            ));
        }
        let mut output = Vec::with_capacity(self.out_dim);
        for row in 0..self.out_dim {
            let offset = row * self.in_dim;
            let mut acc = self.bias[row];
            for (w, x) in self.weights[offset..offset + self.in_dim].iter().zip(input) {
                acc += w * x;
            }
            output.push(acc);
        }
        Ok(output)
    }
}

/// In-place ReLU.
pub fn relu(v: &mut [f32]) {
    for x in v.iter_mut() {
        if *x < 0.0 {
            *x = 0.0;
        }
    }
}

/// Inverted dropout driven by a deterministic generator. Identity when
/// `rate` is zero or negative; callers gate it on training mode.
pub fn dropout(v: &mut [f32], rate: f32, rng: &mut Lcg) {
    if rate <= 0.0 {
        return;
    }
    let keep = 1.0 - rate;
    for x in v.iter_mut() {
        if rng.next_f32() < rate {
            *x = 0.0;
        } else {
            *x /= keep;
        }
    }
}

/// Logistic sigmoid in f64, strictly inside (0, 1) for finite input.
pub fn sigmoid(x: f32) -> f64 {
    1.0 / (1.0 + (-(x as f64)).exp())
}

/// Cosine similarity of two equal-length vectors. Zero-norm input
/// scores zero.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Whether every component is finite (no NaN, no infinity).
pub fn all_finite(v: &[f32]) -> bool {
    v.iter().all(|x| x.is_finite())
}
