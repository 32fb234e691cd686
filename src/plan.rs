use derive_builder::Builder;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{PlanError, Result};
use crate::group_array::GroupArray;
use crate::optimizer::{search, search_space_size};
use crate::partition::partition;
use crate::units::{compute_group_yield, compute_yield};
use crate::variety::{weight_tables, Variety};

/// Inputs to one planning run.
///
/// # Fields
///
/// * `varieties` - Ingredient varieties in display order
/// * `max_blocks_per_variety` - Upper bound on blocks of any single variety
/// * `max_total_per_group` - Blocks allowed per batch before the plan is split; zero or less never splits
/// * `search_limit` - Refuse to search more than this many candidate allocations
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(error = "PlanError"))]
pub struct PlanRequest {
    pub varieties: Vec<Variety>,

    pub max_blocks_per_variety: usize,

    #[builder(default = "0")]
    pub max_total_per_group: i64,

    #[builder(default, setter(strip_option))]
    pub search_limit: Option<u64>,
}

impl PlanRequestBuilder {
    /// Appends one variety after those already set.
    pub fn variety(&mut self, variety: Variety) -> &mut Self {
        self.varieties.get_or_insert_with(Vec::new).push(variety);
        self
    }
}

/// How the plan is spread over several batches.
///
/// # Fields
///
/// * `group_allocations` - Blocks per variety for each group
/// * `yield_per_group` - Units per variety each group produces
/// * `group_array` - The same allocations as a group-by-variety matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupPlan {
    pub group_allocations: Vec<Vec<usize>>,
    pub yield_per_group: Vec<Vec<u64>>,
    #[serde(skip)]
    pub group_array: GroupArray,
}

/// Outcome of a planning run.
///
/// # Fields
///
/// * `names` - Variety names, unchanged and in input order
/// * `optimal_counts` - Blocks to use per variety
/// * `yield_per_variety` - Units those blocks produce per variety
/// * `score` - Error score of `optimal_counts` against the target ratios
/// * `evaluated` - Candidate allocations the search scored
/// * `groups` - Batch split, present only when the plan exceeds `max_total_per_group`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResult {
    pub names: Vec<String>,
    pub optimal_counts: Vec<usize>,
    pub yield_per_variety: Vec<u64>,
    pub score: f64,
    pub evaluated: u64,
    pub groups: Option<GroupPlan>,
}

/// Runs the whole pipeline: search for the best allocation, work out its
/// yield, then split it into groups if it is too large for one batch.
pub fn plan(request: &PlanRequest) -> Result<PlanResult> {
    let varieties = request.varieties.len();
    let max_blocks = request.max_blocks_per_variety;

    if let Some(limit) = request.search_limit {
        let fits = search_space_size(varieties, max_blocks).is_some_and(|size| size <= limit);
        if !fits {
            warn!(varieties, max_blocks, limit, "search space too large, rejecting request");
            return Err(PlanError::SearchSpaceTooLarge { varieties, max_blocks, limit });
        }
    }

    let (block_weights, target_weights) = weight_tables(&request.varieties);
    let block_weights = block_weights.as_slice();
    let target_weights = target_weights.as_slice();

    let optimum = search(block_weights, target_weights, max_blocks, |_, _| {})?;
    let yield_per_variety = compute_yield(optimum.allocation.as_slice(), block_weights, target_weights)?;

    let groups = match partition(&optimum.allocation, request.max_total_per_group) {
        Some(group_array) => {
            let yield_per_group = compute_group_yield(&group_array, block_weights, target_weights)?;
            Some(GroupPlan { group_allocations: group_array.to_rows(), yield_per_group, group_array })
        }
        None => None,
    };

    info!(
        counts = ?optimum.allocation.as_slice(),
        score = optimum.score,
        evaluated = optimum.evaluated,
        groups = groups.as_ref().map_or(0, |g| g.group_allocations.len()),
        "plan ready"
    );

    Ok(PlanResult {
        names: request.varieties.iter().map(|v| v.name.clone()).collect(),
        optimal_counts: optimum.allocation.to_vec(),
        yield_per_variety,
        score: optimum.score,
        evaluated: optimum.evaluated,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheese_request() -> PlanRequestBuilder {
        let mut builder = PlanRequestBuilder::default();
        builder
            .variety(Variety::new("mozzarella", 2.5, 120.0))
            .variety(Variety::new("cheddar", 1.0, 40.0))
            .max_blocks_per_variety(10);
        builder
    }

    #[test]
    fn test_builder_defaults() {
        let request = cheese_request().build().unwrap();
        assert_eq!(request.varieties.len(), 2);
        assert_eq!(request.max_total_per_group, 0);
        assert_eq!(request.search_limit, None);
    }

    #[test]
    fn test_builder_missing_bound() {
        let result = PlanRequestBuilder::default().variety(Variety::new("a", 1.0, 1.0)).build();
        assert_eq!(result, Err(PlanError::MissingField("max_blocks_per_variety".to_string())));
    }

    #[test]
    fn test_plan_without_split() {
        let request = cheese_request().build().unwrap();
        let result = plan(&request).unwrap();
        assert_eq!(result.names, vec!["mozzarella", "cheddar"]);
        // 2.5kg against 1kg blocks for a 3:1 mass target, so 6 mozzarella to 5 cheddar
        assert_eq!(result.optimal_counts, vec![6, 5]);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.yield_per_variety, vec![125, 125]);
        assert_eq!(result.evaluated, 100);
        assert!(result.groups.is_none());
    }

    #[test]
    fn test_plan_with_split() {
        let request = cheese_request().max_total_per_group(4).build().unwrap();
        let result = plan(&request).unwrap();
        let groups = result.groups.unwrap();
        // 11 blocks over ceil(11 / 4) = 3 groups
        assert_eq!(groups.group_allocations, vec![vec![2, 2], vec![2, 2], vec![2, 1]]);
        assert_eq!(groups.yield_per_group, vec![vec![41, 50], vec![41, 50], vec![41, 25]]);
        assert_eq!(groups.group_array.variety_totals().to_vec(), result.optimal_counts);
    }

    #[test]
    fn test_search_limit() {
        let request = cheese_request().search_limit(99).build().unwrap();
        assert_eq!(
            plan(&request),
            Err(PlanError::SearchSpaceTooLarge { varieties: 2, max_blocks: 10, limit: 99 })
        );
        let request = cheese_request().search_limit(100).build().unwrap();
        assert!(plan(&request).is_ok());
    }

    #[test]
    fn test_plan_rejects_empty_request() {
        let request = PlanRequestBuilder::default().varieties(vec![]).max_blocks_per_variety(3).build().unwrap();
        assert_eq!(plan(&request), Err(PlanError::EmptySearchSpace));
    }
}
