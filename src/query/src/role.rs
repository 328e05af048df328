//! Role query

use crate::criteria::{parse_json, NameCriterion, NameOptions, SetCriterion, SetOptions};
use crate::error::Result;
use crate::query::ComponentQuery;
use policyq_core::{Component, PolicyModel, RoleComponent, OBJECT_R};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Role query configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoleQueryConfig {
    /// Role name to match
    pub name: Option<String>,

    /// Match role names with a regular expression
    pub name_regex: bool,

    /// Types to match (patterns when `types_regex` is set)
    pub types: Vec<String>,

    /// Require the role's type set to equal `types`
    pub types_equal: bool,

    /// Match type names with a regular expression instead of set logic
    pub types_regex: bool,
}

impl RoleQueryConfig {
    /// Parse a configuration from JSON, rejecting unknown keys
    pub fn from_json(value: &Value) -> Result<Self> {
        parse_json("role query", value)
    }
}

/// Query policy roles
///
/// `object_r` is never yielded. The compiler associates every type with it,
/// so it would trivially satisfy most type criteria.
///
/// # Example
///
/// ```rust
/// use policyq_core::{MemoryPolicy, TypeDef};
/// use policyq_query::{ComponentQuery, RoleQuery, SetOptions};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let policy = MemoryPolicy::builder()
///     .add_type(TypeDef::new("httpd_t"))
///     .add_type(TypeDef::new("sshd_t"))
///     .role("system_r", ["httpd_t", "sshd_t"])
///     .role("web_r", ["httpd_t"])
///     .build()?;
///
/// let mut query = RoleQuery::new(&policy);
/// query.set_types(["httpd_t"], SetOptions::equal())?;
///
/// let names: Vec<String> = query.results().map(|r| r.to_string()).collect();
/// assert_eq!(names, ["web_r"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RoleQuery<'p, P: PolicyModel> {
    policy: &'p P,
    name: NameCriterion,
    types: SetCriterion<P::Type>,
}

impl<'p, P: PolicyModel> RoleQuery<'p, P> {
    /// Create a query with every criterion disabled
    pub fn new(policy: &'p P) -> Self {
        Self {
            policy,
            name: NameCriterion::new(),
            types: SetCriterion::new(),
        }
    }

    /// Create a query from a configuration record
    pub fn from_config(policy: &'p P, config: &RoleQueryConfig) -> Result<Self> {
        let mut query = Self::new(policy);
        query.set_name(
            config.name.as_deref(),
            NameOptions {
                regex: Some(config.name_regex),
            },
        )?;
        query.set_types(
            config.types.iter().map(String::as_str),
            SetOptions {
                regex: Some(config.types_regex),
                equal: Some(config.types_equal),
            },
        )?;
        Ok(query)
    }

    /// Set the criteria for the role's types
    ///
    /// An empty `types` disables type matching.
    ///
    /// # Errors
    ///
    /// - `QueryError::InvalidPattern` in regex mode if a pattern is invalid
    /// - `QueryError::UnknownComponent` if a type name is not in the policy
    pub fn set_types<I, S>(&mut self, types: I, options: SetOptions) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let policy = self.policy;
        self.types
            .set(types, options, |name| policy.lookup_type(name))?;
        debug!("Role types criterion set to {:?}", self.types.raw());
        Ok(())
    }

    /// Type criterion
    pub fn types_criterion(&self) -> &SetCriterion<P::Type> {
        &self.types
    }
}

impl<'p, P: PolicyModel> ComponentQuery for RoleQuery<'p, P> {
    type Item = P::Role;

    const KIND: &'static str = "role";

    fn name_criterion(&self) -> &NameCriterion {
        &self.name
    }

    fn name_criterion_mut(&mut self) -> &mut NameCriterion {
        &mut self.name
    }

    fn candidates(&self) -> impl Iterator<Item = P::Role> + '_ {
        self.policy.roles().filter(|role| role.name() != OBJECT_R)
    }

    fn matches(&self, role: &P::Role) -> bool {
        if !self.name.matches(role.name()) {
            return false;
        }

        if self.types.is_enabled() && !self.types.matches(&role.types()) {
            return false;
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
            "Types: {:?}, regex: {}, eq: {}",
            self.types.raw(),
            self.types.is_regex(),
            self.types.is_equal()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use policyq_core::{MemoryPolicy, TypeDef};
    use serde_json::json;

    fn policy() -> MemoryPolicy {
        MemoryPolicy::builder()
            .add_type(TypeDef::new("a_t"))
            .add_type(TypeDef::new("b_t"))
            .add_type(TypeDef::new("c_t"))
            .role("ab_r", ["a_t", "b_t"])
            .role("a_r", ["a_t"])
            .role("abc_r", ["a_t", "b_t", "c_t"])
            .role("empty_r", Vec::<String>::new())
            .build()
            .unwrap()
    }

    fn names<Q: ComponentQuery>(query: &Q) -> Vec<String> {
        query.results().map(|c| c.name().to_string()).collect()
    }

    #[test]
    fn test_unconfigured_yields_all_but_object_r() {
        let policy = policy();
        let query = RoleQuery::new(&policy);

        assert_eq!(names(&query), vec!["ab_r", "a_r", "abc_r", "empty_r"]);
    }

    #[test]
    fn test_types_equal() {
        let policy = policy();
        let mut query = RoleQuery::new(&policy);
        query.set_types(["a_t", "b_t"], SetOptions::equal()).unwrap();

        assert_eq!(names(&query), vec!["ab_r"]);
    }

    #[test]
    fn test_types_intersect() {
        let policy = policy();
        let mut query = RoleQuery::new(&policy);
        query.set_types(["b_t", "c_t"], SetOptions::default()).unwrap();

        assert_eq!(names(&query), vec!["ab_r", "abc_r"]);
    }

    #[test]
    fn test_types_regex() {
        let policy = policy();
        let mut query = RoleQuery::new(&policy);
        query.set_types(["^c"], SetOptions::regex()).unwrap();

        assert_eq!(names(&query), vec!["abc_r"]);
    }

    #[test]
    fn test_empty_types_pattern_keeps_roles_without_types() {
        let policy = policy();
        let mut query = RoleQuery::new(&policy);
        query.set_types(["^c"], SetOptions::regex()).unwrap();
        query.set_types([""], SetOptions::regex()).unwrap();

        assert!(!query.types_criterion().is_enabled());
        assert_eq!(names(&query), vec!["ab_r", "a_r", "abc_r", "empty_r"]);
    }

    #[test]
    fn test_name_and_types_are_conjunctive() {
        let policy = policy();
        let mut query = RoleQuery::new(&policy);
        query.set_name(Some("^ab"), NameOptions::regex()).unwrap();
        query.set_types(["c_t"], SetOptions::default()).unwrap();

        assert_eq!(names(&query), vec!["abc_r"]);
    }

    #[test]
    fn test_object_r_excluded_even_when_named() {
        let policy = policy();
        let mut query = RoleQuery::new(&policy);
        query.set_name(Some(OBJECT_R), NameOptions::exact()).unwrap();

        assert!(names(&query).is_empty());
    }

    #[test]
    fn test_unknown_type() {
        let policy = policy();
        let mut query = RoleQuery::new(&policy);
        let err = query.set_types(["zzz_t"], SetOptions::default()).unwrap_err();

        assert!(matches!(err, QueryError::UnknownComponent(_)));
        assert!(!query.types_criterion().is_enabled());
    }

    #[test]
    fn test_from_config() {
        let policy = policy();
        let config = RoleQueryConfig::from_json(&json!({
            "name": "_r$",
            "name_regex": true,
            "types": ["a_t"],
            "types_equal": true
        }))
        .unwrap();

        let query = RoleQuery::from_config(&policy, &config).unwrap();
        assert_eq!(names(&query), vec!["a_r"]);
    }

    #[test]
    fn test_config_rejects_unknown_keys() {
        let err = RoleQueryConfig::from_json(&json!({ "types_bogus": true })).unwrap_err();
        assert!(matches!(err, QueryError::InvalidConfiguration(_)));
    }
}
