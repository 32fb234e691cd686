use std::ops::Index;

use nalgebra::DVector;

/// Number of blocks used per variety, in variety order.
///
/// # Fields
///
/// * `counts` - One entry per variety; the optimizer only ever produces entries in `1..=max_blocks_per_variety`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub counts: DVector<usize>,
}

impl Allocation {
    /// The all-ones allocation, used as the optimizer's starting incumbent.
    pub fn ones(n: usize) -> Self {
        Self { counts: DVector::from_element(n, 1) }
    }

    pub fn from_counts(counts: &[usize]) -> Self {
        Self { counts: DVector::from_column_slice(counts) }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of blocks across all varieties.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn as_slice(&self) -> &[usize] {
        self.counts.as_slice()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.counts.iter().copied().collect()
    }
}

impl From<Vec<usize>> for Allocation {
    fn from(counts: Vec<usize>) -> Self {
        Self { counts: DVector::from_vec(counts) }
    }
}

impl Index<usize> for Allocation {
    type Output = usize;

    fn index(&self, variety: usize) -> &usize {
        &self.counts[variety]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ones() {
        let allocation = Allocation::ones(3);
        assert_eq!(allocation.as_slice(), &[1, 1, 1]);
        assert_eq!(allocation.total(), 3);
    }

    #[test]
    fn test_index_and_slice() {
        let allocation = Allocation::from(vec![2, 3]);
        assert_eq!(allocation[1], 3);
        assert_eq!(allocation.to_vec(), vec![2, 3]);
        assert_eq!(Allocation::from_counts(&[2, 3]), allocation);
    }
}
