//! Set criterion

use super::{compile, SetOptions};
use crate::error::Result;
use policyq_core::Component;
use regex::Regex;
use std::collections::HashSet;
use tracing::warn;

#[derive(Debug, Clone)]
enum SetMatcher<R> {
    Disabled,
    Pattern(Regex),
    Members(HashSet<R>),
}

/// Criterion on a set of component references
///
/// Three matching modes, checked in this order:
///
/// 1. **regex**: passes if any member's name matches the pattern
/// 2. **equal**: passes if the candidate set equals the resolved criterion set
/// 3. **intersect** (default): passes if the sets share at least one member
///
/// `equal` has no effect while `regex` is on.
#[derive(Debug, Clone)]
pub struct SetCriterion<R> {
    /// Values as supplied by the caller
    raw: Vec<String>,
    regex: bool,
    equal: bool,
    matcher: SetMatcher<R>,
}

impl<R> Default for SetCriterion<R> {
    fn default() -> Self {
        Self {
            raw: Vec::new(),
            regex: false,
            equal: false,
            matcher: SetMatcher::Disabled,
        }
    }
}

impl<R: Component> SetCriterion<R> {
    /// Create a disabled criterion
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the values to match
    ///
    /// An empty `values` disables the criterion, as do only empty patterns in
    /// regex mode. In regex mode the values are patterns; more than one is
    /// combined as an alternation. Otherwise
    /// each value is a component name resolved through `resolve`.
    ///
    /// # Errors
    ///
    /// - `QueryError::InvalidPattern` if a pattern does not compile
    /// - `QueryError::UnknownComponent` if a name does not resolve
    ///
    /// The criterion is left unchanged on error.
    pub fn set<I, S, F>(&mut self, values: I, options: SetOptions, mut resolve: F) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(&str) -> policyq_core::Result<R>,
    {
        let raw: Vec<String> = values.into_iter().map(Into::into).collect();
        let regex = options.regex.unwrap_or(self.regex);
        let equal = options.equal.unwrap_or(self.equal);

        let matcher = if raw.is_empty() || (regex && raw.iter().all(String::is_empty)) {
            SetMatcher::Disabled
        } else if regex {
            if equal {
                warn!("Set equality is ignored for regex criterion {:?}", raw);
            }
            SetMatcher::Pattern(compile(&alternation(&raw))?)
        } else {
            let members = raw
                .iter()
                .map(|name| resolve(name.as_str()))
                .collect::<policyq_core::Result<HashSet<R>>>()?;
            SetMatcher::Members(members)
        };

        self.raw = raw;
        self.regex = regex;
        self.equal = equal;
        self.matcher = matcher;

        Ok(())
    }

    /// Whether the criterion filters anything
    pub fn is_enabled(&self) -> bool {
        !matches!(self.matcher, SetMatcher::Disabled)
    }

    /// Values as supplied by the caller
    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    /// Whether regex mode is active
    pub fn is_regex(&self) -> bool {
        self.regex
    }

    /// Whether equality mode is requested
    pub fn is_equal(&self) -> bool {
        self.equal
    }

    /// Test a candidate set
    pub fn matches(&self, candidate: &HashSet<R>) -> bool {
        match &self.matcher {
            SetMatcher::Disabled => true,
            SetMatcher::Pattern(pattern) => {
                candidate.iter().any(|member| pattern.is_match(member.name()))
            }
            SetMatcher::Members(target) if self.equal => candidate == target,
            SetMatcher::Members(target) => !candidate.is_disjoint(target),
        }
    }
}

fn alternation(patterns: &[String]) -> String {
    match patterns {
        [single] => single.clone(),
        _ => patterns
            .iter()
            .map(|p| format!("(?:{})", p))
            .collect::<Vec<_>>()
            .join("|"),
    }
}
