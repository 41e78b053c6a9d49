//! Weighted random selection.

use rand::Rng;

use crate::error::{PacingError, Result};

/// One uniform draw in `[0, 1)`.
pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..1.0)
}

/// Index drawn with probability proportional to its weight.
///
/// Draws uniformly in `[0, total)` and subtracts weights in order until the
/// remainder drops to zero or below; rounding leftovers land on the last
/// entry.
///
/// # Errors
/// Returns [`PacingError::InvalidWeights`] when `weights` is empty or its sum
/// is not a positive finite number.
pub fn pick_weighted<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Result<usize> {
    let total: f64 = weights.iter().sum();
    if weights.is_empty() || !total.is_finite() || total <= 0.0 {
        return Err(PacingError::InvalidWeights { total });
    }

    let mut remainder = rng.gen_range(0.0..total);
    for (index, weight) in weights.iter().enumerate() {
        remainder -= weight;
        if remainder <= 0.0 {
            return Ok(index);
        }
    }
    Ok(weights.len() - 1)
}
