//! Output formatting for replay summaries

use anyhow::Error;
use colored::Colorize;
use serde_json::json;

use crate::replay::ReplaySummary;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print the summary in the requested format
pub fn print_summary(summary: &ReplaySummary, json: bool) {
    if json {
        let output = json!({
            "success": true,
            "summary": summary,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("Failed to format summary as JSON: {e}"),
        }
    } else {
        print!("{}", render_human(summary));
    }
}

fn render_human(summary: &ReplaySummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {} records over {} ms\n",
        "Replayed".bold(),
        summary.records,
        summary.duration_ms
    ));

    if !summary.events.is_empty() {
        let events: Vec<String> = summary
            .events
            .iter()
            .map(|(kind, count)| format!("{kind}={count}"))
            .collect();
        out.push_str(&format!("  events:   {}\n", events.join(" ")));
    }

    out.push_str(&format!(
        "  friction: {} applied ({:.1} px), {} suppressed, {} passed through\n",
        summary.applied, summary.damped_distance, summary.suppressed, summary.passed_through
    ));

    if summary.mode_requests.is_empty() {
        out.push_str(&format!("  fatigue:  {}\n", "no cozy mode requests".green()));
    } else {
        let times: Vec<String> = summary
            .mode_requests
            .iter()
            .map(|t| format!("{t} ms"))
            .collect();
        out.push_str(&format!(
            "  fatigue:  {} at {}\n",
            format!("{} cozy mode request(s)", summary.mode_requests.len()).yellow(),
            times.join(", ")
        ));
    }

    out.push_str(&format!(
        "  final:    {} mode, position {:.1} px\n",
        summary.final_mode, summary.final_position
    ));

    if let Some(k) = &summary.kinetics {
        out.push_str(&format!(
            "  kinetics: {} frames ({} in window), avg {:.1} px/s, fatigued {} (x{:.1})\n",
            k.frame_count,
            k.windowed_frames,
            k.average_velocity,
            if k.fatigued { "yes" } else { "no" },
            k.friction_multiplier
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::run;
    use crate::settings::ReplaySettings;
    use crate::trace::TraceRecord;
    use pulse_friction::InputEvent;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn human_output_mentions_requests() -> TestResult {
        colored::control::set_override(false);
        let mut records: Vec<TraceRecord> = (1..=15u64)
            .map(|i| TraceRecord::event(i * 100, InputEvent::Scroll { position: i as f64 * 180.0 }))
            .collect();
        records.push(TraceRecord::event(1_600, InputEvent::Wheel { delta_y: 100.0 }));
        let summary = run(&records, &ReplaySettings::default())?;

        let text = render_human(&summary);
        assert!(text.contains("Replayed 16 records over 1500 ms"));
        assert!(text.contains("scroll=15"));
        assert!(text.contains("1 cozy mode request(s) at 1600 ms"));
        assert!(text.contains("cozy mode"));
        Ok(())
    }

    #[test]
    fn human_output_without_requests() -> TestResult {
        colored::control::set_override(false);
        let summary = run(&[], &ReplaySettings::default())?;
        let text = render_human(&summary);
        assert!(text.contains("no cozy mode requests"));
        assert!(text.contains("normal mode"));
        Ok(())
    }
}
