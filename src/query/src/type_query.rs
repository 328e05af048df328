//! Type query

use crate::criteria::{parse_json, NameCriterion, NameOptions, SetCriterion, SetOptions};
use crate::error::Result;
use crate::query::ComponentQuery;
use policyq_core::{Component, PolicyModel, TypeComponent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Type query configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeQueryConfig {
    /// Type name to match
    pub name: Option<String>,

    /// Match type names with a regular expression
    pub name_regex: bool,

    /// Alias to match
    pub alias: Option<String>,

    /// Match aliases with a regular expression
    pub alias_regex: bool,

    /// Attributes to match (patterns when `attrs_regex` is set)
    pub attrs: Vec<String>,

    /// Require the type's attribute set to equal `attrs`
    pub attrs_equal: bool,

    /// Match attribute names with a regular expression instead of set logic
    pub attrs_regex: bool,

    /// Match only permissive (`true`) or enforcing (`false`) types
    pub permissive: Option<bool>,
}

impl TypeQueryConfig {
    /// Parse a configuration from JSON, rejecting unknown keys
    pub fn from_json(value: &Value) -> Result<Self> {
        parse_json("type query", value)
    }
}

/// Query policy types
#[derive(Debug)]
pub struct TypeQuery<'p, P: PolicyModel> {
    policy: &'p P,
    name: NameCriterion,
    alias: NameCriterion,
    attrs: SetCriterion<P::Attribute>,
    permissive: Option<bool>,
}

impl<'p, P: PolicyModel> TypeQuery<'p, P> {
    /// Create a query with every criterion disabled
    pub fn new(policy: &'p P) -> Self {
        Self {
            policy,
            name: NameCriterion::new(),
            alias: NameCriterion::new(),
            attrs: SetCriterion::new(),
            permissive: None,
        }
    }

    /// Create a query from a configuration record
    pub fn from_config(policy: &'p P, config: &TypeQueryConfig) -> Result<Self> {
        let mut query = Self::new(policy);
        query.set_name(
            config.name.as_deref(),
            NameOptions {
                regex: Some(config.name_regex),
            },
        )?;
        query.set_alias(
            config.alias.as_deref(),
            NameOptions {
                regex: Some(config.alias_regex),
            },
        )?;
        query.set_attrs(
            config.attrs.iter().map(String::as_str),
            SetOptions {
                regex: Some(config.attrs_regex),
                equal: Some(config.attrs_equal),
            },
        )?;
        query.set_permissive(config.permissive);
        Ok(query)
    }

    /// Set the alias criterion
    ///
    /// A type passes when any one of its aliases matches. With the criterion
    /// enabled, types without aliases never pass.
    pub fn set_alias(&mut self, alias: Option<&str>, options: NameOptions) -> Result<()> {
        self.alias.set(alias, options)?;
        debug!("Type alias criterion set to {:?}", self.alias.raw());
        Ok(())
    }

    /// Set the criteria for the type's attributes
    ///
    /// An empty `attrs` disables attribute matching.
    pub fn set_attrs<I, S>(&mut self, attrs: I, options: SetOptions) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let policy = self.policy;
        self.attrs
            .set(attrs, options, |name| policy.lookup_attribute(name))?;
        debug!("Type attribute criterion set to {:?}", self.attrs.raw());
        Ok(())
    }

    /// Match only permissive or only enforcing types; `None` disables
    pub fn set_permissive(&mut self, permissive: Option<bool>) {
        self.permissive = permissive;
    }

    /// Alias criterion
    pub fn alias_criterion(&self) -> &NameCriterion {
        &self.alias
    }

    /// Attribute criterion
    pub fn attrs_criterion(&self) -> &SetCriterion<P::Attribute> {
        &self.attrs
    }
}

impl<'p, P: PolicyModel> ComponentQuery for TypeQuery<'p, P> {
    type Item = P::Type;

    const KIND: &'static str = "type";

    fn name_criterion(&self) -> &NameCriterion {
        &self.name
    }

    fn name_criterion_mut(&mut self) -> &mut NameCriterion {
        &mut self.name
    }

    fn candidates(&self) -> impl Iterator<Item = P::Type> + '_ {
        self.policy.types()
    }

    fn matches(&self, ty: &P::Type) -> bool {
        if !self.name.matches(ty.name()) {
            return false;
        }

        if self.alias.is_enabled() && !self.alias.matches_any(ty.aliases()) {
            return false;
        }

        if self.attrs.is_enabled() && !self.attrs.matches(&ty.attributes()) {
            return false;
        }

        if let Some(permissive) = self.permissive {
            if ty.is_permissive() != permissive {
                return false;
            }
        }

        true
    }

    fn log_criteria(&self) {
        debug!(
            "Name: {:?}, regex: {}",
            self.name.raw(),
            self.name.is_regex()
        );
        debug!(
            "Alias: {:?}, regex: {}",
            self.alias.raw(),
            self.alias.is_regex()
        );
        debug!(
            "Attrs: {:?}, regex: {}, eq: {}",
            self.attrs.raw(),
            self.attrs.is_regex(),
            self.attrs.is_equal()
        );
        debug!("Permissive: {:?}", self.permissive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use policyq_core::{MemoryPolicy, TypeDef};

    fn policy() -> MemoryPolicy {
        MemoryPolicy::builder()
            .attribute("domain")
            .attribute("file_type")
            .attribute("exec_type")
            .add_type(TypeDef::new("init_t").with_attributes(["domain"]))
            .add_type(
                TypeDef::new("httpd_t")
                    .with_attributes(["domain"])
                    .with_aliases(["apache_t", "web_t"])
                    .permissive(),
            )
            .add_type(TypeDef::new("httpd_exec_t").with_attributes(["file_type", "exec_type"]))
            .add_type(TypeDef::new("unlabeled_t"))
            .build()
            .unwrap()
    }

    fn names<Q: ComponentQuery>(query: &Q) -> Vec<String> {
        query.results().map(|c| c.name().to_string()).collect()
    }

    #[test]
    fn test_unconfigured_yields_all() {
        let policy = policy();
        let query = TypeQuery::new(&policy);

        assert_eq!(
            names(&query),
            vec!["init_t", "httpd_t", "httpd_exec_t", "unlabeled_t"]
        );
    }

    #[test]
    fn test_alias() {
        let policy = policy();
        let mut query = TypeQuery::new(&policy);

        query.set_alias(Some("web_t"), NameOptions::exact()).unwrap();
        assert_eq!(names(&query), vec!["httpd_t"]);

        query.set_alias(Some("^nothing"), NameOptions::regex()).unwrap();
        assert!(names(&query).is_empty());
    }

    #[test]
    fn test_attrs_modes() {
        let policy = policy();
        let mut query = TypeQuery::new(&policy);

        query.set_attrs(["exec_type"], SetOptions::default()).unwrap();
        assert_eq!(names(&query), vec!["httpd_exec_t"]);

        query.set_attrs(["file_type"], SetOptions::equal()).unwrap();
        assert!(names(&query).is_empty());

        query.set_attrs(["^dom"], SetOptions::regex()).unwrap();
        assert_eq!(names(&query), vec!["init_t", "httpd_t"]);
    }

    #[test]
    fn test_permissive() {
        let policy = policy();
        let mut query = TypeQuery::new(&policy);

        query.set_permissive(Some(true));
        assert_eq!(names(&query), vec!["httpd_t"]);

        query.set_permissive(Some(false));
        assert_eq!(names(&query), vec!["init_t", "httpd_exec_t", "unlabeled_t"]);
    }

    #[test]
    fn test_from_config() {
        let policy = policy();
        let config = TypeQueryConfig::from_json(&serde_json::json!({
            "name": "^httpd",
            "name_regex": true,
            "attrs": ["domain"],
            "permissive": true
        }))
        .unwrap();

        let query = TypeQuery::from_config(&policy, &config).unwrap();
        assert_eq!(names(&query), vec!["httpd_t"]);
        assert!(!query.alias_criterion().is_enabled());
        assert!(query.attrs_criterion().is_enabled());
    }
}
