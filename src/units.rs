use crate::error::{check_len, Result};
use crate::group_array::GroupArray;
use crate::variety::{check_non_negative, check_positive};

/// Grams per kilogram; block weights are in kilograms, target weights in grams.
pub const GRAMS_PER_KG: f64 = 1000.0;

/// Number of whole units each variety yields.
///
/// `units[i] = floor(counts[i] * block_weights[i] * 1000 / target_weights[i])`,
/// i.e. block weights are kilograms and target weights are grams per unit.
///
/// # Errors
///
/// Returns an error if the tables differ in length, a target weight is not a
/// positive finite number, or a block weight is negative or not finite.
pub fn compute_yield(counts: &[usize], block_weights: &[f64], target_weights: &[f64]) -> Result<Vec<u64>> {
    check_len("block weights", counts.len(), block_weights.len())?;
    check_len("target weights", counts.len(), target_weights.len())?;
    check_positive("target weight", target_weights)?;
    check_non_negative("block weight", block_weights)?;

    let units = counts
        .iter()
        .zip(block_weights)
        .zip(target_weights)
        .map(|((&c, &w), &t)| {
            let mass_grams = c as f64 * w * GRAMS_PER_KG;
            // saturating float-to-int cast
            (mass_grams / t).floor() as u64
        })
        .collect();
    Ok(units)
}

/// Runs [`compute_yield`] on every group, one yield row per group.
pub fn compute_group_yield(groups: &GroupArray, block_weights: &[f64], target_weights: &[f64]) -> Result<Vec<Vec<u64>>> {
    groups
        .groups()
        .map(|group| compute_yield(group.as_slice(), block_weights, target_weights))
        .collect()
}
