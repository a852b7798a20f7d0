//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod school;
pub mod search;
pub mod pagination;

pub use validation::ValidationError;
pub use school::{NewSchool, Patch, SchoolChanges, SchoolDraft, SchoolPatch};
pub use search::{ListQuery, SearchTerm};
pub use pagination::{Pagination, Paginated};

/// Validate a raw path id: must be a positive integer.
pub fn parse_school_id(raw: &str) -> Result<i64, ValidationError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidId),
    }
}
