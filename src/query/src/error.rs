//! Error types for query configuration

use policyq_core::PolicyError;
use thiserror::Error;

/// Query configuration errors
///
/// All of these are raised while a criterion is being set. Producing
/// results from a configured query cannot fail.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Unrecognized option key or malformed option value
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Regular expression failed to compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A literal criterion name is not in the policy
    #[error(transparent)]
    UnknownComponent(#[from] PolicyError),
}

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;
