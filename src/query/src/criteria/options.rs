//! Matching options for criteria
//!
//! Options are partial updates: a field left as `None` keeps whatever the
//! criterion was using before. A freshly created criterion starts with every
//! flag off.

use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options for a name criterion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameOptions {
    /// Match names with a regular expression instead of exact comparison
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<bool>,
}

impl NameOptions {
    /// Exact name comparison
    pub fn exact() -> Self {
        Self { regex: Some(false) }
    }

    /// Regular expression search
    pub fn regex() -> Self {
        Self { regex: Some(true) }
    }

    /// Build options from `(key, value)` pairs
    ///
    /// `criterion` names the criterion being configured and only appears in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidConfiguration` for any key other than
    /// `regex`.
    pub fn from_pairs<'a, I>(criterion: &str, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            match key {
                "regex" => options.regex = Some(value),
                other => return Err(invalid_option(criterion, other)),
            }
        }
        Ok(options)
    }

    /// Build options from a JSON object
    pub fn from_json(criterion: &str, value: &Value) -> Result<Self> {
        parse_json(criterion, value)
    }
}

/// Options for a set criterion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetOptions {
    /// Match member names with a regular expression instead of set logic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<bool>,

    /// Require set equality instead of intersection; ignored in regex mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equal: Option<bool>,
}

impl SetOptions {
    /// Any shared member passes
    pub fn intersect() -> Self {
        Self {
            regex: Some(false),
            equal: Some(false),
        }
    }

    /// Sets must be equal
    pub fn equal() -> Self {
        Self {
            regex: Some(false),
            equal: Some(true),
        }
    }

    /// Any member name matching a regular expression passes
    pub fn regex() -> Self {
        Self {
            regex: Some(true),
            equal: None,
        }
    }

    /// Build options from `(key, value)` pairs
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidConfiguration` for any key other than
    /// `regex` or `equal`.
    pub fn from_pairs<'a, I>(criterion: &str, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            match key {
                "regex" => options.regex = Some(value),
                "equal" => options.equal = Some(value),
                other => return Err(invalid_option(criterion, other)),
            }
        }
        Ok(options)
    }

    /// Build options from a JSON object
    pub fn from_json(criterion: &str, value: &Value) -> Result<Self> {
        parse_json(criterion, value)
    }
}

fn invalid_option(criterion: &str, key: &str) -> QueryError {
    QueryError::InvalidConfiguration(format!("Invalid {} option: {}", criterion, key))
}

/// Deserialize a configuration record, reporting failures as configuration errors
pub(crate) fn parse_json<T>(context: &str, value: &Value) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    T::deserialize(value).map_err(|e| {
        QueryError::InvalidConfiguration(format!("Invalid {} options: {}", context, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_leave_flags_unset() {
        assert_eq!(NameOptions::default().regex, None);
        assert_eq!(SetOptions::default(), SetOptions { regex: None, equal: None });
    }

    #[test]
    fn test_from_pairs() {
        let options = SetOptions::from_pairs("types", [("equal", true)]).unwrap();
        assert_eq!(options.equal, Some(true));
        assert_eq!(options.regex, None);

        let options = NameOptions::from_pairs("name", [("regex", true)]).unwrap();
        assert_eq!(options, NameOptions::regex());
    }

    #[test]
    fn test_unknown_pair_is_rejected() {
        let err = SetOptions::from_pairs("types", [("regex", true), ("bogus", true)]).unwrap_err();
        match err {
            QueryError::InvalidConfiguration(msg) => {
                assert_eq!(msg, "Invalid types option: bogus");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(NameOptions::from_pairs("name", [("equal", true)]).is_err());
    }

    #[test]
    fn test_from_json() {
        let options = SetOptions::from_json("types", &json!({ "regex": true })).unwrap();
        assert_eq!(options, SetOptions::regex());

        let err = SetOptions::from_json("types", &json!({ "bogus": true })).unwrap_err();
        assert!(matches!(err, QueryError::InvalidConfiguration(ref msg) if msg.contains("bogus")));

        let err = NameOptions::from_json("name", &json!({ "regex": "yes" })).unwrap_err();
        assert!(matches!(err, QueryError::InvalidConfiguration(_)));
    }
}
