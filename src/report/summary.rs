//! Console summary table

use std::fmt::Write;

use crate::config::defaults::BANNER_WIDTH;
use crate::pipeline::PipelineOutput;
use crate::types::DailyRecord;

/// Banner line framing a heading.
pub fn banner(text: &str) -> String {
    let rule = "═".repeat(BANNER_WIDTH);
    format!("\n{rule}\n  {text}\n{rule}")
}

/// Render the per-day summary table:
/// date, daily_CWL, daily_SHWe, compound, streak, state, multiplier.
pub fn render_table(daily: &[DailyRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}  {:>9}  {:>10}  {:>8}  {:>27}  {:>10}  {:>15}",
        "date", "daily_CWL", "daily_SHWe", "compound", "consecutive_compound_cycles", "risk_state", "risk_multiplier"
    );
    for day in daily {
        let _ = writeln!(
            out,
            "{:<10}  {:>9.1}  {:>10.1}  {:>8}  {:>27}  {:>10}  {:>15.3}",
            day.date().format("%Y-%m-%d").to_string(),
            day.aggregate.daily_cwl,
            day.aggregate.daily_shwe,
            day.flags().compound,
            day.streaks.consecutive_compound_cycles,
            day.risk_state.to_string(),
            day.risk_multiplier,
        );
    }
    out
}

/// Full summary block for one dataset: banner, table, one-line totals.
pub fn render_summary(label: &str, output: &PipelineOutput) -> String {
    let histogram = output.state_histogram();
    let (total_cwl, total_shwe) = output.totals();

    let mut out = banner(&format!("Summary: {label}"));
    out.push('\n');
    out.push_str(&render_table(&output.daily));
    let _ = write!(
        out,
        "\nDays: {} (Stable {}, Straining {}, Failure {})  |  Cumulative CWL {:.1}  SHWe {:.1}  |  Max compound streak {}",
        histogram.total(),
        histogram.stable,
        histogram.straining,
        histogram.failure,
        total_cwl,
        total_shwe,
        output.max_compound_streak(),
    );
    if let Some(peak) = output.peak_day() {
        let _ = write!(
            out,
            "\nPeak day: {} ({}, multiplier {:.3})",
            peak.date(),
            peak.risk_state,
            peak.risk_multiplier
        );
    }
    out
}
