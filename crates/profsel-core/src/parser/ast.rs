//! AST types for parsed selectors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParseError;

/// Synthetic label key carrying the profile name
pub const PROFILE_NAME_LABEL: &str = "__name__";

/// Label matcher operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatcherOperator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "=~")]
    RegexMatch,
    #[serde(rename = "!~")]
    RegexNotMatch,
}

impl MatcherOperator {
    pub const ALL: [MatcherOperator; 4] = [
        MatcherOperator::Equal,
        MatcherOperator::NotEqual,
        MatcherOperator::RegexMatch,
        MatcherOperator::RegexNotMatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatcherOperator::Equal => "=",
            MatcherOperator::NotEqual => "!=",
            MatcherOperator::RegexMatch => "=~",
            MatcherOperator::RegexNotMatch => "!~",
        }
    }
}

impl fmt::Display for MatcherOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatcherOperator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ParseError::UnknownOperator(s.to_string()))
    }
}

/// A single `key<op>"value"` constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matcher {
    pub key: String,
    pub operator: MatcherOperator,
    pub value: String,
}

impl Matcher {
    pub fn new(key: impl Into<String>, operator: MatcherOperator, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator,
            value: value.into(),
        }
    }

    /// The equality matcher on `__name__` that stands in for a profile name
    pub fn profile_name(name: impl Into<String>) -> Self {
        Self::new(PROFILE_NAME_LABEL, MatcherOperator::Equal, name)
    }

    pub fn is_profile_name(&self) -> bool {
        self.key == PROFILE_NAME_LABEL && self.operator == MatcherOperator::Equal
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}\"{}\"", self.key, self.operator, self.value)
    }
}

/// Structured view of a `name:sample_type:sample_unit:period_type:period_unit[:delta]`
/// profile name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileType {
    pub name: String,
    pub sample_type: String,
    pub sample_unit: String,
    pub period_type: String,
    pub period_unit: String,
    pub delta: bool,
}

impl FromStr for ProfileType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ParseError::InvalidProfileType {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split(':').collect();
        let delta = match parts.len() {
            5 => false,
            6 if parts[5] == "delta" => true,
            6 => return Err(invalid("sixth segment must be 'delta'")),
            _ => return Err(invalid("expected 5 or 6 ':'-separated segments")),
        };
        if parts[..5].iter().any(|p| p.is_empty()) {
            return Err(invalid("empty segment"));
        }

        Ok(Self {
            name: parts[0].to_string(),
            sample_type: parts[1].to_string(),
            sample_unit: parts[2].to_string(),
            period_type: parts[3].to_string(),
            period_unit: parts[4].to_string(),
            delta,
        })
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}",
            self.name, self.sample_type, self.sample_unit, self.period_type, self.period_unit
        )?;
        if self.delta {
            write!(f, ":delta")?;
        }
        Ok(())
    }
}
