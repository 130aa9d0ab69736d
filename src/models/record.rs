use crate::constants::{KEY_LENGTH, RECORD_SEPARATOR};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How a password was composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Medium,
    Weak,
    Custom,
}

impl Strength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Strong => "strong",
            Strength::Medium => "medium",
            Strength::Weak => "weak",
            Strength::Custom => "custom",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid strength '{0}', must be one of: strong, medium, weak, custom")]
pub struct ParseStrengthError(pub String);

impl FromStr for Strength {
    type Err = ParseStrengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strong" => Ok(Strength::Strong),
            "medium" => Ok(Strength::Medium),
            "weak" => Ok(Strength::Weak),
            "custom" => Ok(Strength::Custom),
            other => Err(ParseStrengthError(other.to_string())),
        }
    }
}

/// A key is exactly four characters with no whitespace, so it survives the
/// space-delimited line format.
pub fn validate_key(key: &str) -> Result<(), String> {
    if key.chars().count() != KEY_LENGTH {
        return Err(format!("Please enter a {} character key", KEY_LENGTH));
    }
    if key.chars().any(char::is_whitespace) {
        return Err("key cannot contain whitespace".into());
    }
    Ok(())
}

/// One stored password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub key: String,
    pub password: String,
    pub strength: Strength,
}

impl Record {
    pub fn new(key: impl Into<String>, password: impl Into<String>, strength: Strength) -> Self {
        Self {
            key: key.into(),
            password: password.into(),
            strength,
        }
    }

    /// Render the record as a store line, newline included.
    pub fn to_line(&self) -> String {
        format!(
            "{}{}{} ({}) \n",
            self.key, RECORD_SEPARATOR, self.password, self.strength
        )
    }

    /// Parse a single store line (without its newline).
    ///
    /// The password may itself contain parentheses, so the strength suffix
    /// is taken from the last ` (` in the line.
    pub fn parse_line(line: &str) -> Result<Self, String> {
        let (key, rest) = line
            .split_once(RECORD_SEPARATOR)
            .ok_or_else(|| format!("missing '{}' separator", RECORD_SEPARATOR.trim()))?;
        let rest = rest.trim_end();
        let body = rest
            .strip_suffix(')')
            .ok_or_else(|| "missing strength suffix".to_string())?;
        let (password, strength) = body
            .rsplit_once(" (")
            .ok_or_else(|| "missing strength suffix".to_string())?;
        let strength = strength.parse::<Strength>().map_err(|e| e.to_string())?;
        Ok(Self::new(key.trim_start(), password, strength))
    }

    /// Key field of a store line, if the line carries one.
    pub fn key_of(line: &str) -> Option<&str> {
        line.split_once(RECORD_SEPARATOR)
            .map(|(key, _)| key.trim_start())
    }
}
