//! User query

use crate::criteria::{parse_json, NameCriterion, NameOptions, SetCriterion, SetOptions};
use crate::error::Result;
use crate::query::ComponentQuery;
use policyq_core::{Component, PolicyModel, UserComponent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// User query configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserQueryConfig {
    pub name: Option<String>,
    pub name_regex: bool,
    pub roles: Vec<String>,
    pub roles_equal: bool,
    pub roles_regex: bool,
}

impl UserQueryConfig {
    /// Parse a configuration from JSON, rejecting unknown keys
    pub fn from_json(value: &Value) -> Result<Self> {
        parse_json("user query", value)
    }
}

/// Query policy users
#[derive(Debug)]
pub struct UserQuery<'p, P: PolicyModel> {
    policy: &'p P,
    name: NameCriterion,
    roles: SetCriterion<P::Role>,
}

impl<'p, P: PolicyModel> UserQuery<'p, P> {
    pub fn new(policy: &'p P) -> Self {
        Self {
            policy,
            name: NameCriterion::new(),
            roles: SetCriterion::new(),
        }
    }

    pub fn from_config(policy: &'p P, config: &UserQueryConfig) -> Result<Self> {
        let mut query = Self::new(policy);
        query.set_name(
            config.name.as_deref(),
            NameOptions {
                regex: Some(config.name_regex),
            },
        )?;
        query.set_roles(
            config.roles.iter().map(String::as_str),
            SetOptions {
                regex: Some(config.roles_regex),
                equal: Some(config.roles_equal),
            },
        )?;
        Ok(query)
    }

    /// Set the criteria for the user's roles
    pub fn set_roles<I, S>(&mut self, roles: I, options: SetOptions) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let policy = self.policy;
        self.roles
            .set(roles, options, |name| policy.lookup_role(name))?;
        debug!("User roles criterion set to {:?}", self.roles.raw());
        Ok(())
    }

    pub fn roles_criterion(&self) -> &SetCriterion<P::Role> {
        &self.roles
    }
}

impl<'p, P: PolicyModel> ComponentQuery for UserQuery<'p, P> {
    type Item = P::User;

    const KIND: &'static str = "user";

    fn name_criterion(&self) -> &NameCriterion {
        &self.name
    }

    fn name_criterion_mut(&mut self) -> &mut NameCriterion {
        &mut self.name
    }

    fn candidates(&self) -> impl Iterator<Item = P::User> + '_ {
        self.policy.users()
    }

    fn matches(&self, user: &P::User) -> bool {
        self.name.matches(user.name())
            && (!self.roles.is_enabled() || self.roles.matches(&user.roles()))
    }

    fn log_criteria(&self) {
        debug!(
            "Name: {:?}, regex: {}",
            self.name.raw(),
            self.name.is_regex()
        );
        debug!(
            "Roles: {:?}, regex: {}, eq: {}",
            self.roles.raw(),
            self.roles.is_regex(),
            self.roles.is_equal()
        );
    }
}
