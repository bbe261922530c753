//! Ordered validation messages with error and warning tallies.

use std::fmt;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultLevel {
    Error,
    Warning,
    Information,
    Success,
}

impl ResultLevel {
    pub fn name(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Information => "INFORMATION",
            Self::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for ResultLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Messages in the order they were reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub messages: Vec<(ResultLevel, String)>,
    pub error_count: usize,
    pub warning_count: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, level: ResultLevel, message: impl Into<String>) {
        match level {
            ResultLevel::Error => self.error_count += 1,
            ResultLevel::Warning => self.warning_count += 1,
            ResultLevel::Information | ResultLevel::Success => {}
        }
        self.messages.push((level, message.into()));
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.add(ResultLevel::Error, message);
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.add(ResultLevel::Warning, message);
    }

    pub fn add_information(&mut self, message: impl Into<String>) {
        self.add(ResultLevel::Information, message);
    }

    pub fn add_success(&mut self, message: impl Into<String>) {
        self.add(ResultLevel::Success, message);
    }

    /// Errors plus warnings.
    pub fn issue_count(&self) -> usize {
        self.error_count + self.warning_count
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, level: ResultLevel, message: &str) -> bool {
        self.messages
            .iter()
            .any(|(l, m)| *l == level && m == message)
    }

    pub fn messages_at(&self, level: ResultLevel) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(move |(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
    }
}

impl AddAssign for ValidationResult {
    fn add_assign(&mut self, other: Self) {
        self.messages.extend(other.messages);
        self.error_count += other.error_count;
        self.warning_count += other.warning_count;
    }
}

impl Extend<ValidationResult> for ValidationResult {
    fn extend<I: IntoIterator<Item = ValidationResult>>(&mut self, iter: I) {
        for other in iter {
            *self += other;
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (level, message) in &self.messages {
            writeln!(f, "{level}: {message}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_follow_levels() {
        let mut result = ValidationResult::new();
        result.add_error("e");
        result.add_warning("w");
        result.add_information("i");
        result.add_success("s");
        assert_eq!(result.error_count, 1);
        assert_eq!(result.warning_count, 1);
        assert_eq!(result.issue_count(), 2);
        assert_eq!(result.messages.len(), 4);
        assert!(result.contains(ResultLevel::Information, "i"));
        assert!(!result.contains(ResultLevel::Error, "i"));
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut a = ValidationResult::new();
        a.add_warning("first");
        let mut b = ValidationResult::new();
        b.add_error("second");
        a += b;
        assert_eq!(
            a.messages,
            vec![
                (ResultLevel::Warning, "first".to_string()),
                (ResultLevel::Error, "second".to_string())
            ]
        );
        assert_eq!(a.issue_count(), 2);
    }

    #[test]
    fn test_serializes_level_names() {
        let mut result = ValidationResult::new();
        result.add_error("bad");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["messages"][0][0], "ERROR");
        assert_eq!(json["error_count"], 1);
        assert_eq!(result.to_string(), "ERROR: bad\n");
    }
}
