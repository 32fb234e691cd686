use tracing::debug;

use crate::allocation::Allocation;
use crate::error::{check_len, PlanError, Result};
use crate::error_model::ErrorModel;
use crate::odometer::Odometer;
use crate::variety::check_positive;

/// Result of an exhaustive search.
///
/// # Fields
///
/// * `allocation` - The first allocation, in row-major order, reaching the lowest error score
/// * `score` - Its error score
/// * `evaluated` - Number of candidate allocations scored
#[derive(Debug, Clone)]
pub struct Optimum {
    pub allocation: Allocation,
    pub score: f64,
    pub evaluated: u64,
}

/// Number of candidates in the search space, `max_blocks_per_variety ^ varieties`,
/// or `None` when that does not fit in a `u64`. With no varieties there is
/// nothing to enumerate, so the size is zero.
pub fn search_space_size(varieties: usize, max_blocks_per_variety: usize) -> Option<u64> {
    if varieties == 0 {
        return Some(0);
    }
    let base = u64::try_from(max_blocks_per_variety).ok()?;
    let exp = u32::try_from(varieties).ok()?;
    base.checked_pow(exp)
}

fn validate(block_weights: &[f64], target_weights: &[f64], max_blocks_per_variety: usize) -> Result<()> {
    check_len("target weights", block_weights.len(), target_weights.len())?;
    if block_weights.is_empty() {
        return Err(PlanError::EmptySearchSpace);
    }
    if max_blocks_per_variety < 1 {
        return Err(PlanError::InvalidBound(max_blocks_per_variety));
    }
    check_positive("block weight", block_weights)?;
    check_positive("target weight", target_weights)?;
    Ok(())
}

/// Finds the block counts whose mass ratios best match the target ratios.
///
/// Every allocation with `1..=max_blocks_per_variety` blocks per variety is
/// scored; the lowest score wins and ties go to the allocation met first.
///
/// # Errors
///
/// Returns an error if the weight tables differ in length, are empty, hold a
/// weight that is not a positive finite number, or if `max_blocks_per_variety`
/// is zero.
pub fn optimize(block_weights: &[f64], target_weights: &[f64], max_blocks_per_variety: usize) -> Result<Allocation> {
    search(block_weights, target_weights, max_blocks_per_variety, |_, _| {}).map(|optimum| optimum.allocation)
}

/// Runs the same search as [`optimize`], calling `on_improve` with the candidate
/// and its score each time the incumbent is replaced.
pub fn search<F>(block_weights: &[f64], target_weights: &[f64], max_blocks_per_variety: usize, mut on_improve: F) -> Result<Optimum>
    where
        F: FnMut(&[usize], f64),
{
    validate(block_weights, target_weights, max_blocks_per_variety)?;
    let model = ErrorModel::new(block_weights, target_weights)?;

    let n = block_weights.len();
    let mut best_allocation = Allocation::ones(n);
    let mut best_score = f64::INFINITY;
    let mut evaluated: u64 = 0;

    let mut odometer = Odometer::new(n, max_blocks_per_variety);
    while let Some(counts) = odometer.current() {
        evaluated += 1;
        let current = model.score(counts);
        if current < best_score {
            best_score = current;
            best_allocation = Allocation::from_counts(counts);
            debug!(candidate = ?counts, score = current, evaluated, "new best allocation");
            on_improve(counts, current);
        }
        odometer.advance();
    }

    if !best_score.is_finite() {
        return Err(PlanError::Unscorable);
    }

    debug!(evaluated, score = best_score, "search finished");
    Ok(Optimum { allocation: best_allocation, score: best_score, evaluated })
}
