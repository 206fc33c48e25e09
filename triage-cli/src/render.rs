//! Plain-text rendering of scoring results.

use clap::ValueEnum;
use std::fmt::Write;
use triage_core::{Analysis, CycleReport, ScoredTask};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn render_analysis(analysis: &Analysis) -> String {
    let mut out = String::new();

    if analysis.tasks.is_empty() {
        out.push_str("(no tasks)\n");
    }
    for (rank, scored) in analysis.tasks.iter().enumerate() {
        render_task(&mut out, rank + 1, scored);
    }

    if analysis.cycles.has_cycle {
        out.push('\n');
        out.push_str(&render_cycles(&analysis.cycles));
    }
    out
}

fn render_task(out: &mut String, rank: usize, scored: &ScoredTask) {
    let b = &scored.breakdown;
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "{rank:>3}. [{:>6.2}] #{} {}",
        scored.score, scored.task.id, scored.task.title
    );
    let _ = writeln!(out, "       {}", scored.reason);
    let _ = writeln!(
        out,
        "       urgency={:.2} importance={:.2} effort={:.2} dependency={:.2}",
        b.urgency_score, b.importance_score, b.effort_score, b.dependency_score
    );
}

pub fn render_cycles(report: &CycleReport) -> String {
    if !report.has_cycle {
        return "No dependency cycles.\n".to_string();
    }
    let mut out = String::from("Dependency cycle detected (first found only):\n");
    for cycle in &report.cycles {
        let _ = writeln!(out, "  {cycle}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use triage_core::{analyze, RawTask, ScoringRequest};

    #[test]
    fn renders_rank_score_and_reason() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 19).unwrap();
        let analysis = analyze(
            ScoringRequest::new(vec![RawTask::new("Plan sprint").with_id(4).with_hours(2)]),
            today,
        );
        let text = render_analysis(&analysis);
        assert!(text.starts_with("  1. [ 39.33] #4 Plan sprint\n"));
        assert!(text.contains("No due date — moderate urgency"));
        assert!(!text.contains("cycle"));
    }

    #[test]
    fn renders_cycle_block() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 19).unwrap();
        let analysis = analyze(
            ScoringRequest::new(vec![
                RawTask::new("a").with_id(1).with_dependencies([2]),
                RawTask::new("b").with_id(2).with_dependencies([1]),
            ]),
            today,
        );
        let text = render_analysis(&analysis);
        assert!(text.contains("Dependency cycle detected"));
        assert!(text.contains("1 -> 2 -> 1"));
    }

    #[test]
    fn clean_report() {
        assert_eq!(render_cycles(&CycleReport::default()), "No dependency cycles.\n");
    }
}
