//! Query criteria
//!
//! A criterion turns caller input (a name, or a list of names) plus matching
//! options into a comparison value that is ready to test candidates with.
//! All validation happens when the criterion is set, so testing a candidate
//! never fails.
//!
//! - [`NameCriterion`]: exact or regular expression match on a single name
//! - [`SetCriterion`]: equality, intersection, or regular expression match on
//!   a set of component references

mod name;
mod options;
mod set;

pub use name::NameCriterion;
pub use options::{NameOptions, SetOptions};
pub use set::SetCriterion;

pub(crate) use options::parse_json;

use crate::error::{QueryError, Result};
use regex::Regex;

/// Compile a criterion pattern
pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| QueryError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
