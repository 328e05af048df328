//! Name criterion

use super::{compile, NameOptions};
use crate::error::Result;
use regex::Regex;

#[derive(Debug, Clone, Default)]
enum NameMatcher {
    #[default]
    Disabled,
    Exact(String),
    Pattern(Regex),
}

/// Criterion on a single name
///
/// Disabled until a non-empty name is set.
#[derive(Debug, Clone, Default)]
pub struct NameCriterion {
    /// Name as supplied by the caller
    raw: Option<String>,
    regex: bool,
    matcher: NameMatcher,
}

impl NameCriterion {
    /// Create a disabled criterion
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name to match
    ///
    /// `None` or an empty name disables the criterion. Options left unset
    /// keep their previous value.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidPattern` if regex mode is active and the
    /// name does not compile. The criterion is left unchanged on error.
    pub fn set(&mut self, name: Option<&str>, options: NameOptions) -> Result<()> {
        let regex = options.regex.unwrap_or(self.regex);

        let matcher = match name {
            None | Some("") => NameMatcher::Disabled,
            Some(pattern) if regex => NameMatcher::Pattern(compile(pattern)?),
            Some(literal) => NameMatcher::Exact(literal.to_string()),
        };

        self.raw = name.map(str::to_string);
        self.regex = regex;
        self.matcher = matcher;

        Ok(())
    }

    /// Whether the criterion filters anything
    pub fn is_enabled(&self) -> bool {
        !matches!(self.matcher, NameMatcher::Disabled)
    }

    /// Name as supplied by the caller
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Whether regex mode is active
    pub fn is_regex(&self) -> bool {
        self.regex
    }

    /// Test a candidate name
    ///
    /// Regex mode searches anywhere in the name; anchors must be part of the
    /// pattern.
    pub fn matches(&self, name: &str) -> bool {
        match &self.matcher {
            NameMatcher::Disabled => true,
            NameMatcher::Exact(literal) => literal == name,
            NameMatcher::Pattern(pattern) => pattern.is_match(name),
        }
    }

    /// Test several candidate names; passes if any one matches
    ///
    /// A disabled criterion passes even when there are no names.
    pub fn matches_any<'a, I>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        if !self.is_enabled() {
            return true;
        }

        names.into_iter().any(|name| self.matches(name))
    }
}
