//! # policyq query engine
//!
//! Criteria-matching queries over policy components.
//!
//! A query holds a set of criteria and lazily yields the components of a
//! policy that satisfy all of them. Criteria are validated when they are
//! set: an invalid pattern, an unknown component name or an unknown option
//! is reported by the setter, and producing results never fails.
//!
//! ## Criteria
//!
//! - **Name**: exact comparison, or an unanchored regular expression search
//! - **Set**: intersection (default), equality, or a regular expression
//!   matched against each member's name
//!
//! ## Example
//!
//! ```rust
//! use policyq_core::{MemoryPolicy, TypeDef};
//! use policyq_query::{ComponentQuery, NameOptions, RoleQuery, SetOptions};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = MemoryPolicy::builder()
//!     .add_type(TypeDef::new("user_t"))
//!     .add_type(TypeDef::new("staff_t"))
//!     .role("user_r", ["user_t"])
//!     .role("staff_r", ["user_t", "staff_t"])
//!     .build()?;
//!
//! let mut query = RoleQuery::new(&policy);
//! query.set_name(Some("^staff"), NameOptions::regex())?;
//! query.set_types(["user_t"], SetOptions::intersect())?;
//!
//! for role in query.results() {
//!     println!("{}", role);
//! }
//! # Ok(())
//! # }
//! ```

pub mod criteria;
pub mod error;
pub mod query;
pub mod role;
pub mod type_query;
pub mod user;

pub use criteria::{NameCriterion, NameOptions, SetCriterion, SetOptions};
pub use error::{QueryError, Result};
pub use query::ComponentQuery;
pub use role::{RoleQuery, RoleQueryConfig};
pub use type_query::{TypeQuery, TypeQueryConfig};
pub use user::{UserQuery, UserQueryConfig};
