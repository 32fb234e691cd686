use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// One ingredient kind taking part in a plan.
///
/// # Fields
///
/// * `name` - Opaque display label, carried through untouched
/// * `block_weight` - Mass of one block, in kilograms
/// * `target_weight` - Mass consumed per produced unit, in grams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variety {
    #[serde(default)]
    pub name: String,
    pub block_weight: f64,
    pub target_weight: f64,
}

impl Variety {
    pub fn new(name: impl Into<String>, block_weight: f64, target_weight: f64) -> Self {
        Self { name: name.into(), block_weight, target_weight }
    }
}

/// Splits an ordered list of varieties into parallel weight vectors.
pub fn weight_tables(varieties: &[Variety]) -> (DVector<f64>, DVector<f64>) {
    let block_weights = DVector::from_iterator(varieties.len(), varieties.iter().map(|v| v.block_weight));
    let target_weights = DVector::from_iterator(varieties.len(), varieties.iter().map(|v| v.target_weight));
    (block_weights, target_weights)
}

/// Rejects the first weight that is not a finite, strictly positive number.
pub(crate) fn check_positive(what: &'static str, weights: &[f64]) -> Result<()> {
    match weights.iter().position(|&w| !(w.is_finite() && w > 0.0)) {
        Some(variety) => Err(PlanError::DegenerateWeights { what, variety, value: weights[variety] }),
        None => Ok(()),
    }
}

/// Like [`check_positive`] but lets zero through.
pub(crate) fn check_non_negative(what: &'static str, weights: &[f64]) -> Result<()> {
    match weights.iter().position(|&w| !(w.is_finite() && w >= 0.0)) {
        Some(variety) => Err(PlanError::DegenerateWeights { what, variety, value: weights[variety] }),
        None => Ok(()),
    }
}
