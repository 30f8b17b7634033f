//! Runs checks and tallies their outcomes

use std::time::Instant;

use tracing::debug;

use super::check::{CheckResult, CheckStatus, SystemCheck};

/// Results from running a set of checks
#[derive(Debug, Default)]
pub struct HealthCheckReport {
    /// Individual results, in the order the checks ran
    pub results: Vec<(String, CheckResult)>,
    pub total: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
}

impl HealthCheckReport {
    fn push(&mut self, name: String, result: CheckResult) {
        match result.status {
            CheckStatus::Pass => self.passed += 1,
            CheckStatus::Warn => self.warned += 1,
            CheckStatus::Fail => self.failed += 1,
        }
        self.total += 1;
        self.results.push((name, result));
    }

    /// No check failed
    pub fn is_healthy(&self) -> bool {
        self.failed == 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warned > 0
    }

    /// 0 = all pass, 1 = any fail, 2 = any warn (but no fail)
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else if self.warned > 0 {
            2
        } else {
            0
        }
    }
}

/// Collects checks and runs them in insertion order
#[derive(Default)]
pub struct HealthCheckRunner {
    checks: Vec<Box<dyn SystemCheck>>,
}

impl HealthCheckRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_check<C: SystemCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn run(self) -> HealthCheckReport {
        let mut report = HealthCheckReport::default();

        for check in self.checks {
            let start = Instant::now();
            let result = check.check().with_duration(start.elapsed());
            debug!(check = check.name(), status = ?result.status, "Health check finished");
            report.push(check.name().to_string(), result);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(CheckStatus);

    impl SystemCheck for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn check(&self) -> CheckResult {
            match self.0 {
                CheckStatus::Pass => CheckResult::pass("pass"),
                CheckStatus::Warn => CheckResult::warn("warn"),
                CheckStatus::Fail => CheckResult::fail("fail"),
            }
        }
    }

    #[test]
    fn test_counts_and_exit_codes() {
        let report = HealthCheckRunner::new()
            .add_check(Fixed(CheckStatus::Pass))
            .add_check(Fixed(CheckStatus::Warn))
            .run();
        assert_eq!((report.total, report.passed, report.warned), (2, 1, 1));
        assert!(report.is_healthy());
        assert_eq!(report.exit_code(), 2);

        let report = HealthCheckRunner::new()
            .add_check(Fixed(CheckStatus::Warn))
            .add_check(Fixed(CheckStatus::Fail))
            .run();
        assert!(!report.is_healthy());
        assert_eq!(report.exit_code(), 1);

        let report = HealthCheckRunner::new().run();
        assert_eq!(report.total, 0);
        assert_eq!(report.exit_code(), 0);
    }
}
