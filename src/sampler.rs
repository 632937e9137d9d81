//! Weighted sampling with Vose's alias method.
//!
//! The table layout and draw order are part of the wire contract: both ends
//! of a transfer must pick the same degree for the same generator state.

use crate::xoshiro::Xoshiro256;

/// Constant-time sampler over a fixed discrete distribution.
#[derive(Clone, Debug)]
pub struct AliasSampler {
    probs: Vec<f64>,
    aliases: Vec<usize>,
}

impl AliasSampler {
    /// Build a sampler for the given non-negative `weights`.
    ///
    /// Weights need not sum to one; they are normalised internally.
    ///
    /// # Panics
    ///
    /// Panics if `weights` is empty, contains a negative value, or sums to
    /// zero.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "degree tables are far smaller than 2^52 entries"
    )]
    pub fn new(weights: &[f64]) -> Self {
        assert!(!weights.is_empty(), "alias sampler needs at least one weight");
        assert!(
            weights.iter().all(|weight| *weight >= 0.0),
            "alias sampler weights must be non-negative"
        );
        let total: f64 = weights.iter().sum();
        assert!(total > 0.0, "alias sampler weights must not sum to zero");

        let n = weights.len();
        let mut scaled: Vec<f64> = weights
            .iter()
            .map(|weight| weight * n as f64 / total)
            .collect();

        let mut small = Vec::new();
        let mut large = Vec::new();
        for (index, value) in scaled.iter().enumerate().rev() {
            if *value < 1.0 {
                small.push(index);
            } else {
                large.push(index);
            }
        }

        let mut probs = vec![0.0; n];
        let mut aliases = vec![0; n];

        while !small.is_empty() && !large.is_empty() {
            let (Some(less), Some(more)) = (small.pop(), large.pop()) else {
                break;
            };
            probs[less] = scaled[less];
            aliases[less] = more;
            scaled[more] += scaled[less] - 1.0;
            if scaled[more] < 1.0 {
                small.push(more);
            } else {
                large.push(more);
            }
        }

        for index in large.into_iter().chain(small) {
            probs[index] = 1.0;
        }

        Self { probs, aliases }
    }

    /// Draw an index, consuming two doubles from `rng`.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the column is the scaled draw truncated toward zero"
    )]
    pub fn next(&self, rng: &mut Xoshiro256) -> usize {
        let r1 = rng.next_double();
        let r2 = rng.next_double();
        let column = (self.probs.len() as f64 * r1) as usize;
        if r2 < self.probs[column] {
            column
        } else {
            self.aliases[column]
        }
    }
}
