//! Pass format validation

use regex::Regex;

use crate::error::{AppError, AppResult};

/// Rejection for a scanned string that is not a pass of this event
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{raw}' is not a {prefix} pass")]
pub struct MalformedPass {
    pub raw: String,
    pub prefix: String,
}

/// Expected pass grammar: the event's series prefix followed by one or more
/// ASCII digits, nothing else.
#[derive(Debug, Clone)]
pub struct PassFormat {
    prefix: String,
    pattern: Regex,
}

impl PassFormat {
    pub fn new(prefix: &str) -> AppResult<Self> {
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::InvalidConfig(format!(
                "Pass prefix '{}' must be non-empty and alphanumeric",
                prefix
            )));
        }

        let pattern = Regex::new(&format!("^{}[0-9]+$", regex::escape(prefix)))
            .map_err(|e| AppError::Internal(format!("Invalid pass pattern: {}", e)))?;

        Ok(Self {
            prefix: prefix.to_string(),
            pattern,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_valid(&self, raw: &str) -> bool {
        self.pattern.is_match(raw)
    }

    /// Returns the pass id when well-formed
    pub fn validate<'a>(&self, raw: &'a str) -> Result<&'a str, MalformedPass> {
        if self.is_valid(raw) {
            Ok(raw)
        } else {
            Err(MalformedPass {
                raw: raw.to_string(),
                prefix: self.prefix.clone(),
            })
        }
    }
}
