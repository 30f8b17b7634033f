//! Startup diagnostics
//!
//! Each [`SystemCheck`] exercises one part of the startup sequence without
//! opening a window, so the checks run in CI and from integration tests.
//!
//! # Example
//!
//! ```no_run
//! use tornado_simulation::health::{HealthCheckRunner, checks::*};
//!
//! let report = HealthCheckRunner::new()
//!     .add_check(ConfigCheck::new())
//!     .add_check(ShaderSourceCheck::new())
//!     .run();
//!
//! if !report.is_healthy() {
//!     tornado_simulation::health::print_report(&report);
//! }
//! ```

pub mod check;
pub mod checks;
pub mod reporter;
pub mod runner;

pub use check::{CheckResult, CheckStatus, SystemCheck};
pub use reporter::{format_report, print_report};
pub use runner::{HealthCheckReport, HealthCheckRunner};

/// Runs the checks that need neither a GPU nor a display
pub fn run_all_checks() -> HealthCheckReport {
    HealthCheckRunner::new()
        .add_check(checks::ConfigCheck::new())
        .add_check(checks::BuildInfoCheck::new())
        .add_check(checks::ShaderSourceCheck::new())
        .add_check(checks::ParameterPanelCheck::new())
        .run()
}
