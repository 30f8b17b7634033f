//! Terminal formatting for health reports

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::runner::HealthCheckReport;

/// Formats a report as a table followed by a summary
pub fn format_report(report: &HealthCheckReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Check", "Status", "Duration", "Message"]);

    for (name, result) in &report.results {
        builder.push_record([
            name.clone(),
            result.status.as_colored_str(),
            format!("{:.2?}", result.duration),
            result.message.clone(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    format!("{table}\n{}", format_summary(report))
}

fn format_summary(report: &HealthCheckReport) -> String {
    let mut lines = vec![
        String::new(),
        "Summary".bold().underline().to_string(),
        format!("  Total checks: {}", report.total),
        format!("  {} Passed: {}", "✓".green(), report.passed),
    ];

    if report.warned > 0 {
        lines.push(format!("  {} Warned: {}", "⚠".yellow(), report.warned));
    }
    if report.failed > 0 {
        lines.push(format!("  {} Failed: {}", "✗".red(), report.failed));
    }

    lines.push(String::new());
    let overall = match (report.is_healthy(), report.has_warnings()) {
        (false, _) => "Overall: UNHEALTHY".red().bold(),
        (true, true) => "Overall: HEALTHY (with warnings)".yellow().bold(),
        (true, false) => "Overall: HEALTHY".green().bold(),
    };
    lines.push(format!("  {overall}"));

    lines.join("\n") + "\n"
}

/// Prints the report and every check's detail block to stdout
pub fn print_report(report: &HealthCheckReport) {
    println!("{}", format_report(report));

    for (name, result) in &report.results {
        if let Some(details) = &result.details {
            println!("\n{} Details:", name.bold());
            println!("{details}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::check::CheckResult;

    #[test]
    fn test_report_lists_every_check() {
        colored::control::set_override(false);

        let report = HealthCheckReport {
            results: vec![
                ("Configuration".to_string(), CheckResult::pass("2 profiles")),
                ("Shader Sources".to_string(), CheckResult::fail("link failed")),
            ],
            total: 2,
            passed: 1,
            warned: 0,
            failed: 1,
        };

        let text = format_report(&report);
        assert!(text.contains("Configuration"));
        assert!(text.contains("link failed"));
        assert!(text.contains("FAIL"));
        assert!(text.contains("Overall: UNHEALTHY"));
    }
}
