use derive_builder::UninitializedFieldError;
use thiserror::Error;

/// Reasons a planning request is rejected.
///
/// Every variant is an input-validation failure: the same input always
/// produces the same error, so none of them are worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("{what} has {actual} entries, expected {expected}")]
    InvalidDimension {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("max blocks per variety must be at least 1, got {0}")]
    InvalidBound(usize),

    #[error("{what} of variety {variety} is {value}, which cannot be used")]
    DegenerateWeights {
        what: &'static str,
        variety: usize,
        value: f64,
    },

    #[error("at least one variety is required")]
    EmptySearchSpace,

    #[error("search space of {max_blocks}^{varieties} candidates exceeds the limit of {limit}")]
    SearchSpaceTooLarge {
        varieties: usize,
        max_blocks: usize,
        limit: u64,
    },

    #[error("no candidate allocation produced a finite error score")]
    Unscorable,

    #[error("missing field `{0}`")]
    MissingField(String),
}

impl From<UninitializedFieldError> for PlanError {
    fn from(e: UninitializedFieldError) -> Self {
        PlanError::MissingField(e.field_name().to_string())
    }
}

pub type Result<T, E = PlanError> = std::result::Result<T, E>;

/// Checks that a per-variety table has exactly `expected` entries.
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(PlanError::InvalidDimension { what, expected, actual });
    }
    Ok(())
}
