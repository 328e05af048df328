//! In-memory policy model
//!
//! `MemoryPolicy` is a fully linked, immutable policy built from a
//! [`PolicyDocument`]. Every cross reference (role → type, type → attribute,
//! user → role) is resolved while loading, so a loaded policy never holds a
//! dangling name.
//!
//! # Example
//!
//! ```rust
//! use policyq_core::{MemoryPolicy, PolicyModel, RoleComponent, TypeDef};
//!
//! # fn example() -> policyq_core::Result<()> {
//! let policy = MemoryPolicy::builder()
//!     .attribute("domain")
//!     .add_type(TypeDef::new("httpd_t").with_attributes(["domain"]))
//!     .role("system_r", ["httpd_t"])
//!     .build()?;
//!
//! let role = policy.lookup_role("system_r")?;
//! assert_eq!(role.types().len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::error::{ComponentKind, PolicyError, Result};
use crate::model::{
    Component, PolicyModel, RoleComponent, TypeComponent, UserComponent, OBJECT_R,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Serialized form of a policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyDocument {
    /// Type attribute names
    #[serde(default)]
    pub attributes: Vec<String>,

    /// Type definitions
    #[serde(default)]
    pub types: Vec<TypeDef>,

    /// Role definitions
    #[serde(default)]
    pub roles: Vec<RoleDef>,

    /// User definitions
    #[serde(default)]
    pub users: Vec<UserDef>,
}

/// Type definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDef {
    pub name: String,

    #[serde(default)]
    pub aliases: Vec<String>,

    /// Attribute names the type belongs to
    #[serde(default)]
    pub attributes: Vec<String>,

    #[serde(default)]
    pub permissive: bool,
}

impl TypeDef {
    /// Create a type with no aliases or attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            attributes: Vec::new(),
            permissive: false,
        }
    }

    /// Set the attributes the type belongs to
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the aliases of the type
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the type permissive
    pub fn permissive(mut self) -> Self {
        self.permissive = true;
        self
    }
}

/// Role definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleDef {
    pub name: String,

    /// Type names (or aliases) associated with the role
    #[serde(default)]
    pub types: Vec<String>,
}

/// User definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserDef {
    pub name: String,

    /// Role names the user is authorized for
    #[serde(default)]
    pub roles: Vec<String>,
}

// Handles compare and hash by name; names are unique per kind within a policy.
macro_rules! named_handle {
    ($handle:ident) => {
        impl PartialEq for $handle {
            fn eq(&self, other: &Self) -> bool {
                self.0.name == other.0.name
            }
        }

        impl Eq for $handle {}

        impl Hash for $handle {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.name.hash(state);
            }
        }

        impl Component for $handle {
            fn name(&self) -> &str {
                &self.0.name
            }
        }

        impl fmt::Display for $handle {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0.name)
            }
        }
    };
}

#[derive(Debug)]
struct AttributeData {
    name: String,
}

/// Type attribute handle
#[derive(Debug, Clone)]
pub struct Attribute(Arc<AttributeData>);

named_handle!(Attribute);

#[derive(Debug)]
struct TypeData {
    name: String,
    aliases: Vec<String>,
    attributes: Vec<Attribute>,
    permissive: bool,
}

/// Type handle
#[derive(Debug, Clone)]
pub struct Type(Arc<TypeData>);

named_handle!(Type);

impl TypeComponent for Type {
    type Attribute = Attribute;

    fn attributes(&self) -> HashSet<Attribute> {
        self.0.attributes.iter().cloned().collect()
    }

    fn aliases(&self) -> Vec<&str> {
        self.0.aliases.iter().map(String::as_str).collect()
    }

    fn is_permissive(&self) -> bool {
        self.0.permissive
    }
}

#[derive(Debug)]
struct RoleData {
    name: String,
    types: Vec<Type>,
}

/// Role handle
#[derive(Debug, Clone)]
pub struct Role(Arc<RoleData>);

named_handle!(Role);

impl RoleComponent for Role {
    type Type = Type;

    fn types(&self) -> HashSet<Type> {
        self.0.types.iter().cloned().collect()
    }
}

#[derive(Debug)]
struct UserData {
    name: String,
    roles: Vec<Role>,
}

/// User handle
#[derive(Debug, Clone)]
pub struct User(Arc<UserData>);

named_handle!(User);

impl UserComponent for User {
    type Role = Role;

    fn roles(&self) -> HashSet<Role> {
        self.0.roles.iter().cloned().collect()
    }
}

/// Ordered collection with a name index
#[derive(Debug)]
struct Table<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
    kind: ComponentKind,
}

impl<T: Clone> Table<T> {
    fn new(kind: ComponentKind) -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            kind,
        }
    }

    fn insert(&mut self, names: &[&str], item: T) -> Result<()> {
        let mut seen = HashSet::with_capacity(names.len());
        for name in names {
            if self.index.contains_key(*name) || !seen.insert(*name) {
                return Err(PolicyError::duplicate(self.kind, *name));
            }
        }

        let position = self.items.len();
        self.items.push(item);
        for name in names {
            self.index.insert((*name).to_string(), position);
        }

        Ok(())
    }

    fn get(&self, name: &str) -> Result<T> {
        self.index
            .get(name)
            .map(|&position| self.items[position].clone())
            .ok_or_else(|| PolicyError::unknown(self.kind, name))
    }

    fn resolve_all(&self, names: &[String]) -> Result<Vec<T>> {
        names.iter().map(|name| self.get(name)).collect()
    }
}

/// Immutable, fully linked in-memory policy
#[derive(Debug)]
pub struct MemoryPolicy {
    attributes: Table<Attribute>,
    types: Table<Type>,
    roles: Table<Role>,
    users: Table<User>,
}

impl MemoryPolicy {
    /// Start building a policy programmatically
    pub fn builder() -> MemoryPolicyBuilder {
        MemoryPolicyBuilder::default()
    }

    /// Link a policy document
    ///
    /// If the document does not define `object_r`, it is added as the first
    /// role and associated with every type, the way the policy compiler does.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced component does not exist or a name
    /// is defined twice.
    pub fn from_document(document: PolicyDocument) -> Result<Self> {
        let mut attributes = Table::new(ComponentKind::Attribute);
        for name in &document.attributes {
            let attribute = Attribute(Arc::new(AttributeData { name: name.clone() }));
            attributes.insert(&[name.as_str()], attribute)?;
        }

        let mut types = Table::new(ComponentKind::Type);
        for def in document.types {
            let names: Vec<&str> = std::iter::once(def.name.as_str())
                .chain(def.aliases.iter().map(String::as_str))
                .collect();
            let linked = Type(Arc::new(TypeData {
                attributes: attributes.resolve_all(&def.attributes)?,
                name: def.name.clone(),
                aliases: def.aliases.clone(),
                permissive: def.permissive,
            }));
            types.insert(&names, linked)?;
        }

        let mut roles = Table::new(ComponentKind::Role);
        if !document.roles.iter().any(|role| role.name == OBJECT_R) {
            debug!("Adding implicit {} with {} types", OBJECT_R, types.items.len());
            let object_r = Role(Arc::new(RoleData {
                name: OBJECT_R.to_string(),
                types: types.items.clone(),
            }));
            roles.insert(&[OBJECT_R], object_r)?;
        }
        for def in document.roles {
            let linked = Role(Arc::new(RoleData {
                types: types.resolve_all(&def.types)?,
                name: def.name,
            }));
            let name = linked.0.name.clone();
            roles.insert(&[name.as_str()], linked)?;
        }

        let mut users = Table::new(ComponentKind::User);
        for def in document.users {
            let linked = User(Arc::new(UserData {
                roles: roles.resolve_all(&def.roles)?,
                name: def.name,
            }));
            let name = linked.0.name.clone();
            users.insert(&[name.as_str()], linked)?;
        }

        let policy = Self {
            attributes,
            types,
            roles,
            users,
        };
        info!("Loaded {}", policy);

        Ok(policy)
    }

    /// Parse and link a JSON policy document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: PolicyDocument = serde_json::from_str(content)?;
        Self::from_document(document)
    }

    /// Read, parse and link a JSON policy document
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Type attributes in definition order
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.attributes.items.iter().cloned()
    }
}

impl fmt::Display for MemoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "policy ({} attributes, {} types, {} roles, {} users)",
            self.attributes.items.len(),
            self.types.items.len(),
            self.roles.items.len(),
            self.users.items.len()
        )
    }
}

impl PolicyModel for MemoryPolicy {
    type Role = Role;
    type Type = Type;
    type Attribute = Attribute;
    type User = User;

    fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.items.iter().cloned()
    }

    fn types(&self) -> impl Iterator<Item = Type> + '_ {
        self.types.items.iter().cloned()
    }

    fn users(&self) -> impl Iterator<Item = User> + '_ {
        self.users.items.iter().cloned()
    }

    fn lookup_role(&self, name: &str) -> Result<Role> {
        self.roles.get(name)
    }

    fn lookup_type(&self, name: &str) -> Result<Type> {
        self.types.get(name)
    }

    fn lookup_attribute(&self, name: &str) -> Result<Attribute> {
        self.attributes.get(name)
    }

    fn lookup_user(&self, name: &str) -> Result<User> {
        self.users.get(name)
    }
}

/// Builder for [`MemoryPolicy`]
#[derive(Debug, Clone, Default)]
pub struct MemoryPolicyBuilder {
    document: PolicyDocument,
}

impl MemoryPolicyBuilder {
    /// Add a type attribute
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.document.attributes.push(name.into());
        self
    }

    /// Add a type
    pub fn add_type(mut self, def: TypeDef) -> Self {
        self.document.types.push(def);
        self
    }

    /// Add a role associated with the named types
    pub fn role<I, S>(mut self, name: impl Into<String>, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document.roles.push(RoleDef {
            name: name.into(),
            types: types.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add a user authorized for the named roles
    pub fn user<I, S>(mut self, name: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document.users.push(UserDef {
            name: name.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Link the accumulated definitions
    pub fn build(self) -> Result<MemoryPolicy> {
        MemoryPolicy::from_document(self.document)
    }
}
