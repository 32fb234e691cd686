use nalgebra::DMatrix;
use tracing::debug;

use crate::allocation::Allocation;
use crate::group_array::GroupArray;

/// Splits `counts` into the fewest groups of at most `max_total_per_group`
/// blocks (on average), keeping every variety's share as even as possible.
///
/// Returns `None` when no split is needed: the bound is not positive, or the
/// whole allocation already fits in one group.
///
/// With `g = ceil(total / max_total_per_group)` groups, each variety puts
/// `counts[i] / g` blocks in every group and the first `counts[i] % g`
/// groups get one more, so the groups add back up to `counts` exactly and
/// differ by at most one block per variety.
pub fn partition(counts: &Allocation, max_total_per_group: i64) -> Option<GroupArray> {
    let total = counts.total();
    let max_total = usize::try_from(max_total_per_group).ok().filter(|&m| m > 0)?;
    if total <= max_total {
        return None;
    }

    let num_groups = total.div_ceil(max_total);
    let group_array = DMatrix::from_fn(num_groups, counts.len(), |g, i| {
        let base = counts[i] / num_groups;
        let remainder = counts[i] % num_groups;
        if g < remainder {
            base + 1
        } else {
            base
        }
    });

    debug!(total, max_total, num_groups, "split allocation into groups");
    Some(GroupArray::from_group_array(&group_array))
}
