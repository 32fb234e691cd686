use nalgebra::DVector;

use crate::error::{check_len, Result};

/// Scores how far the mass ratios of `counts` are from the target ratios.
///
/// Returns the sum over varieties of the squared difference between the
/// actual mass share and the ideal share `target_weights[i] / Σ target_weights`.
/// Zero is a perfect match. An allocation with no mass at all, or whose
/// total mass overflows, scores `f64::INFINITY`. The three slices are read
/// in lockstep, so they must have equal lengths.
pub fn score(counts: &[usize], block_weights: &[f64], target_weights: &[f64]) -> f64 {
    debug_assert_eq!(counts.len(), block_weights.len());
    debug_assert_eq!(counts.len(), target_weights.len());

    let total_mass: f64 = counts.iter().zip(block_weights).map(|(&c, &w)| c as f64 * w).sum();
    if total_mass == 0.0 || !total_mass.is_finite() {
        return f64::INFINITY;
    }

    let target_total: f64 = target_weights.iter().sum();
    let mut error = 0.0;
    for ((&c, &w), &t) in counts.iter().zip(block_weights).zip(target_weights) {
        let ratio = (c as f64 * w) / total_mass;
        let ideal_ratio = t / target_total;
        error += (ratio - ideal_ratio).powi(2);
    }
    error
}

/// Error model with the ideal ratios worked out up front, for scoring many
/// candidates against the same weight tables.
#[derive(Debug, Clone)]
pub struct ErrorModel {
    block_weights: DVector<f64>,
    ideal_ratios: DVector<f64>,
}

impl ErrorModel {
    pub fn new(block_weights: &[f64], target_weights: &[f64]) -> Result<Self> {
        check_len("target weights", block_weights.len(), target_weights.len())?;
        let target_total: f64 = target_weights.iter().sum();
        let ideal_ratios = DVector::from_iterator(target_weights.len(), target_weights.iter().map(|&t| t / target_total));
        Ok(Self { block_weights: DVector::from_column_slice(block_weights), ideal_ratios })
    }

    /// Same value as [`score`] for this model's weight tables.
    pub fn score(&self, counts: &[usize]) -> f64 {
        let total_mass: f64 = counts.iter().zip(self.block_weights.iter()).map(|(&c, &w)| c as f64 * w).sum();
        if total_mass == 0.0 || !total_mass.is_finite() {
            return f64::INFINITY;
        }

        let mut error = 0.0;
        for ((&c, &w), &ideal_ratio) in counts.iter().zip(self.block_weights.iter()).zip(self.ideal_ratios.iter()) {
            let ratio = (c as f64 * w) / total_mass;
            error += (ratio - ideal_ratio).powi(2);
        }
        error
    }
}
