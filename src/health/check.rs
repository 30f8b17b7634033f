//! Check trait and result types

use std::time::Duration;

use colored::Colorize;

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    /// Usable, but something deserves attention
    Warn,
    Fail,
}

impl CheckStatus {
    /// Pass or Warn
    pub fn is_ok(&self) -> bool {
        !self.is_fail()
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, CheckStatus::Fail)
    }

    /// Status label colored for terminal output
    pub fn as_colored_str(&self) -> String {
        match self {
            CheckStatus::Pass => "PASS".green().to_string(),
            CheckStatus::Warn => "WARN".yellow().to_string(),
            CheckStatus::Fail => "FAIL".red().to_string(),
        }
    }
}

/// Result of a check, with an optional multi-line detail block
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub status: CheckStatus,
    pub message: String,
    pub details: Option<String>,
    pub duration: Duration,
}

impl CheckResult {
    fn with_status(status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
            duration: Duration::ZERO,
        }
    }

    pub fn pass(message: impl Into<String>) -> Self {
        Self::with_status(CheckStatus::Pass, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::with_status(CheckStatus::Warn, message)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::with_status(CheckStatus::Fail, message)
    }

    /// Attaches detail lines, one entry per line
    pub fn with_details(mut self, lines: Vec<String>) -> Self {
        if !lines.is_empty() {
            self.details = Some(lines.join("\n"));
        }
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// One diagnostic step
pub trait SystemCheck {
    /// Name shown in the report
    fn name(&self) -> &'static str;

    fn check(&self) -> CheckResult;

    fn description(&self) -> Option<&'static str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicates() {
        assert!(CheckStatus::Pass.is_ok());
        assert!(CheckStatus::Warn.is_ok());
        assert!(!CheckStatus::Fail.is_ok());
        assert!(CheckStatus::Fail.is_fail());
    }

    #[test]
    fn test_empty_details_are_dropped() {
        let result = CheckResult::pass("ok").with_details(Vec::new());
        assert!(result.details.is_none());

        let result = CheckResult::warn("hm").with_details(vec!["a".into(), "b".into()]);
        assert_eq!(result.details.as_deref(), Some("a\nb"));
    }
}
