//! Output formatting utilities.

use mekparity_batch::ArtifactPaths;
use mekparity_canonical::NormalizationReport;
use mekparity_verify::{DiscrepancyRecord, ValidationSummary};

/// Prints the run summary: counts, pass rate, top categories and artifacts.
pub fn print_summary(summary: &ValidationSummary, paths: &ArtifactPaths) {
    println!("Units validated:  {}", summary.units_validated);
    println!("Passed:           {}", summary.units_passed);
    println!("With issues:      {}", summary.units_with_issues);
    println!("Parse errors:     {}", summary.units_with_parse_errors);
    println!("Pass rate:        {:.1}%", summary.pass_rate());

    let top = summary.top_categories(10);
    if !top.is_empty() {
        println!();
        println!("{:<24} {}", "CATEGORY", "COUNT");
        println!("{}", "-".repeat(32));
        for (category, count) in top {
            println!("{:<24} {}", category.as_str(), count);
        }
    }

    println!();
    println!("Manifest:         {}", paths.manifest.display());
    println!("Summary:          {}", paths.summary.display());
    println!(
        "Issues:           {} ({} files)",
        paths.issues_dir.display(),
        paths.issue_files
    );
    println!("Generated:        {}", paths.generated_dir.display());
}

/// Prints discrepancies as a table.
pub fn print_discrepancy_table(discrepancies: &[DiscrepancyRecord]) {
    println!(
        "{:<22} {:<20} {:<24} {:<24}",
        "CATEGORY", "WHERE", "EXPECTED", "ACTUAL"
    );
    println!("{}", "-".repeat(92));
    for record in discrepancies {
        let place = match (&record.location, record.index, &record.field) {
            (Some(location), Some(index), _) => format!("{}[{}]", location, index),
            (Some(location), None, _) => location.clone(),
            (None, _, Some(field)) => field.clone(),
            (None, _, None) => String::new(),
        };
        println!(
            "{:<22} {:<20} {:<24} {:<24}",
            record.category.as_str(),
            truncate(&place, 20),
            truncate(&record.expected, 24),
            truncate(&record.actual, 24)
        );
    }
}

/// Prints normalization metrics, if any.
pub fn print_normalization(report: &NormalizationReport) {
    if report.is_exact() {
        return;
    }
    let metrics: Vec<String> = report
        .metrics
        .iter()
        .map(|(name, count)| format!("{}={}", name, count))
        .collect();
    println!("Normalization: {}", metrics.join(", "));
    for note in &report.notes {
        println!("  {}: {:?} -> {}", note.field, note.raw, note.resolved);
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
