//! Build information health check

use crate::build_info;
use crate::health::check::{CheckResult, SystemCheck};

/// Reports build metadata; missing git data is a warning
pub struct BuildInfoCheck;

impl BuildInfoCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BuildInfoCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for BuildInfoCheck {
    fn name(&self) -> &'static str {
        "Build Info"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates build metadata (git, rustc, timestamps)")
    }

    fn check(&self) -> CheckResult {
        let details = build_info::detailed_info()
            .lines()
            .map(|line| format!("  {line}"))
            .collect();

        if build_info::GIT_SHA.is_none() {
            CheckResult::warn("Build metadata accessible (no git information)")
                .with_details(details)
        } else {
            CheckResult::pass("Build metadata accessible").with_details(details)
        }
    }
}
