//! Policy model traits
//!
//! Queries never touch policy storage directly. They read components through
//! these traits, so any policy representation that can enumerate its
//! components and resolve names can be queried.

use crate::error::Result;
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// A named policy component
///
/// Implementations are cheap handles: cloning one must not copy the
/// underlying policy data, and equality/hashing identify the component.
pub trait Component: Clone + Eq + Hash + Debug {
    /// Unique name of the component within its kind
    fn name(&self) -> &str;
}

/// A role and the types it is associated with
pub trait RoleComponent: Component {
    type Type: Component;

    /// Types associated with the role
    fn types(&self) -> HashSet<Self::Type>;
}

/// A type, its aliases and the attributes it belongs to
pub trait TypeComponent: Component {
    type Attribute: Component;

    /// Type attributes the type is a member of
    fn attributes(&self) -> HashSet<Self::Attribute>;

    /// Alternate names for the type
    fn aliases(&self) -> Vec<&str>;

    /// Whether the type is permissive
    fn is_permissive(&self) -> bool;
}

/// A user and the roles it is authorized for
pub trait UserComponent: Component {
    type Role: Component;

    /// Roles the user may enter
    fn roles(&self) -> HashSet<Self::Role>;
}

/// Read-only view of a policy
///
/// Collections must iterate in a stable order so that repeated queries over
/// the same policy yield the same sequence.
pub trait PolicyModel {
    type Role: RoleComponent<Type = Self::Type>;
    type Type: TypeComponent<Attribute = Self::Attribute>;
    type Attribute: Component;
    type User: UserComponent<Role = Self::Role>;

    /// All roles in the policy
    fn roles(&self) -> impl Iterator<Item = Self::Role> + '_;

    /// All types in the policy
    fn types(&self) -> impl Iterator<Item = Self::Type> + '_;

    /// All users in the policy
    fn users(&self) -> impl Iterator<Item = Self::User> + '_;

    /// Resolve a role by name
    fn lookup_role(&self, name: &str) -> Result<Self::Role>;

    /// Resolve a type by name or alias
    fn lookup_type(&self, name: &str) -> Result<Self::Type>;

    /// Resolve a type attribute by name
    fn lookup_attribute(&self, name: &str) -> Result<Self::Attribute>;

    /// Resolve a user by name
    fn lookup_user(&self, name: &str) -> Result<Self::User>;
}

/// Role the policy compiler implicitly associates with every type
///
/// It is a real member of the role collection but never an authored one.
pub const OBJECT_R: &str = "object_r";
