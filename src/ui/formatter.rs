//! Formatting functions for console output.

use console::style;

use crate::workflow::RunReport;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print the header of a numbered stage.
pub fn display_stage(number: usize, title: &str) {
    println!("\n{}", style(format!("{}. {}", number, title)).bold());
}

/// Print one completed step, indented under its stage.
pub fn display_step(description: &str) {
    println!("  {} {}", style("✓").green(), description);
}

/// Pass the commit graph through untouched.
pub fn display_log(graph: &str) {
    println!();
    print!("{}", graph);
    if !graph.ends_with('\n') {
        println!();
    }
}

/// Summary lines for a completed run
pub fn format_summary(report: &RunReport) -> Vec<String> {
    let mut lines = vec![format!("{} stages completed", report.stages_completed)];

    if report.tags.is_empty() {
        lines.push("No tags created".to_string());
    } else {
        lines.push(format!("Tags: {}", report.tags.join(", ")));
    }

    if !report.pruned.is_empty() {
        lines.push(format!("Pruned: {}", report.pruned.join(", ")));
    }
    lines
}

/// Display the summary of a completed run.
pub fn display_summary(report: &RunReport) {
    println!();
    for line in format_summary(report) {
        display_success(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_tags() {
        let report = RunReport {
            stages_completed: 10,
            tags: vec!["license".to_string(), "copyright".to_string()],
            pruned: Vec::new(),
            log: None,
        };
        assert_eq!(
            format_summary(&report),
            vec!["10 stages completed", "Tags: license, copyright"]
        );
    }

    #[test]
    fn test_summary_mentions_pruned_branches() {
        let report = RunReport {
            stages_completed: 10,
            tags: Vec::new(),
            pruned: vec!["stale".to_string()],
            log: None,
        };
        let lines = format_summary(&report);
        assert_eq!(lines[1], "No tags created");
        assert_eq!(lines[2], "Pruned: stale");
    }
}
