//! Planner error types

use thiserror::Error;

use crate::catalog::CatalogError;

/// Planner error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    /// Column reference does not match any column of the input schema
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// Unqualified column reference matches more than one column
    #[error("Column '{0}' is ambiguous")]
    AmbiguousColumn(String),

    /// Plan tree was built or driven inconsistently by the planner
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    /// Catalog lookup failed (e.g. target table absent)
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl PlannerError {
    /// Build an [`PlannerError::InvalidPlan`] for a pass run out of order
    pub fn out_of_order(pass: &str, requires: &str) -> Self {
        PlannerError::InvalidPlan(format!("{} requires {} to run first", pass, requires))
    }
}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
