use nalgebra::{DMatrix, DVector};

use crate::allocation::Allocation;

/// Represents a split of an allocation into batches, which is a matrix where each row represents a group and each column represents a variety.
///
/// # Fields
///
/// * `group_array` - The matrix of block counts, `group_array[(g, i)]` blocks of variety `i` in group `g`
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct GroupArray {
    pub group_array: DMatrix<usize>,
}

impl GroupArray {
    pub fn from_group_array(group_array: &DMatrix<usize>) -> Self {
        Self { group_array: group_array.clone() }
    }

    pub fn num_groups(&self) -> usize {
        self.group_array.nrows()
    }

    pub fn num_varieties(&self) -> usize {
        self.group_array.ncols()
    }

    /// The allocation of a single group.
    pub fn group(&self, g: usize) -> Allocation {
        let row = self.group_array.row(g);
        Allocation { counts: DVector::from_iterator(row.len(), row.iter().copied()) }
    }

    pub fn groups(&self) -> impl Iterator<Item = Allocation> + '_ {
        (0..self.num_groups()).map(|g| self.group(g))
    }

    /// Blocks of each variety summed over all groups.
    pub fn variety_totals(&self) -> Allocation {
        let totals = self.group_array.column_iter().map(|column| column.iter().sum());
        Allocation { counts: DVector::from_iterator(self.num_varieties(), totals) }
    }

    /// Largest minus smallest group count, per variety.
    pub fn spread(&self) -> Vec<usize> {
        self.group_array
            .column_iter()
            .map(|column| {
                let max = column.iter().copied().max().unwrap_or(0);
                let min = column.iter().copied().min().unwrap_or(0);
                max - min
            })
            .collect()
    }

    pub fn to_rows(&self) -> Vec<Vec<usize>> {
        self.groups().map(|group| group.to_vec()).collect()
    }
}
