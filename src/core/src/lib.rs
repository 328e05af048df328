//! # policyq core
//!
//! Policy model traits consumed by the query engine, and an in-memory
//! reference policy that implements them.

pub mod error;
pub mod memory;
pub mod model;

pub use error::{ComponentKind, PolicyError, Result};
pub use memory::{
    Attribute, MemoryPolicy, MemoryPolicyBuilder, PolicyDocument, Role, RoleDef, Type, TypeDef,
    User, UserDef,
};
pub use model::{Component, PolicyModel, RoleComponent, TypeComponent, UserComponent, OBJECT_R};
