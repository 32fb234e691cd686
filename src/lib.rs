mod odometer;

pub mod allocation;
pub mod error;
pub mod error_model;
pub mod group_array;
pub mod optimizer;
pub mod partition;
pub mod plan;
pub mod units;
pub mod variety;

pub use allocation::Allocation;
pub use error::{PlanError, Result};
pub use error_model::{score, ErrorModel};
pub use group_array::GroupArray;
pub use optimizer::{optimize, search, search_space_size, Optimum};
pub use partition::partition;
pub use plan::{plan, GroupPlan, PlanRequest, PlanRequestBuilder, PlanResult};
pub use units::{compute_group_yield, compute_yield};
pub use variety::Variety;

use error::check_len;

/// Plans block usage from flat per-variety tables.
///
/// # Arguments
///
/// * `variety_count` - Number of varieties; every table must have exactly this many entries
/// * `max_blocks_per_variety` - Upper bound on blocks of any single variety
/// * `max_total_per_group` - Blocks allowed per batch before the plan is split; zero or less never splits
/// * `block_weights` - Mass of one block of each variety, in kilograms
/// * `target_weights` - Grams of each variety consumed per produced unit
/// * `names` - Display labels, passed through to the result unchanged
///
/// # Returns
///
/// The optimal block counts, the units they yield and, when the plan is too
/// large for one batch, its split into groups with the yield of each group.
///
/// # Errors
///
/// Returns an error if a table has the wrong length, a weight is not a
/// positive finite number, `max_blocks_per_variety` is zero or
/// `variety_count` is zero.
pub fn plan_from_parts<S>(
    variety_count: usize,
    max_blocks_per_variety: usize,
    max_total_per_group: i64,
    block_weights: &[f64],
    target_weights: &[f64],
    names: &[S],
) -> Result<PlanResult>
    where
        S: AsRef<str>,
{
    check_len("block weights", variety_count, block_weights.len())?;
    check_len("target weights", variety_count, target_weights.len())?;
    check_len("names", variety_count, names.len())?;

    let varieties = names
        .iter()
        .zip(block_weights.iter().zip(target_weights))
        .map(|(name, (&block_weight, &target_weight))| Variety::new(name.as_ref(), block_weight, target_weight))
        .collect();

    let request = PlanRequestBuilder::default()
        .varieties(varieties)
        .max_blocks_per_variety(max_blocks_per_variety)
        .max_total_per_group(max_total_per_group)
        .build()?;
    plan(&request)
}
