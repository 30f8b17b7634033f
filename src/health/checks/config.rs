//! Configuration health check

use crate::app::AppConfig;
use crate::health::check::{CheckResult, SystemCheck};

/// Loads every profile and reports what each resolves to
pub struct ConfigCheck {
    profiles: Vec<&'static str>,
}

impl ConfigCheck {
    pub fn new() -> Self {
        Self {
            profiles: vec!["debug", "release"],
        }
    }

    pub fn with_profiles(profiles: Vec<&'static str>) -> Self {
        Self { profiles }
    }
}

impl Default for ConfigCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for ConfigCheck {
    fn name(&self) -> &'static str {
        "Configuration"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates configuration loading from files and environment")
    }

    fn check(&self) -> CheckResult {
        let mut details = Vec::new();
        let mut failed = false;

        for profile in &self.profiles {
            match AppConfig::load(profile) {
                Ok(config) => details.push(format!(
                    "  ✓ Profile '{}': {}x{}, shaders {} + {}",
                    profile,
                    config.window.width,
                    config.window.height,
                    config.shaders.vertex.display(),
                    config.shaders.fragment.display()
                )),
                Err(e) => {
                    details.push(format!("  ✗ Profile '{profile}': {e}"));
                    failed = true;
                }
            }
        }

        let env_warning = match AppConfig::load_from_env() {
            Ok(config) => {
                details.push(format!("  ✓ Environment profile '{}'", config.profile));
                false
            }
            Err(e) => {
                details.push(format!("  ⚠ Environment config: {e}"));
                true
            }
        };

        if failed {
            CheckResult::fail("Failed to load one or more config profiles").with_details(details)
        } else if env_warning {
            CheckResult::warn("Config loaded with warnings").with_details(details)
        } else {
            CheckResult::pass(format!("{} profiles validated", self.profiles.len()))
                .with_details(details)
        }
    }
}
