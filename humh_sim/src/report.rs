//! Final run report.

use crate::exporter::encode_rows;
use crate::runner::ScenarioResult;
use humh_core::{Grid, StateSnapshot, Verdict};
use tracing::info;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

fn describe(snapshot: &StateSnapshot) -> String {
    format!(
        "{:.4} (p = {:.3}) - {}",
        snapshot.harmonic_entropy, snapshot.active_proportion, snapshot.state
    )
}

/// Report lines for a finished run.
pub fn report_lines(result: &ScenarioResult) -> Vec<String> {
    let summary = &result.summary;
    let config = &result.timeline.config;
    let mut lines = vec![
        format!("FINAL REPORT - {} (seed={}, radius={})", result.scenario, result.seed, config.activation_radius),
        format!("Harmonic compression: {}%", config.compression_percent),
        format!("Frames simulated: {} ({})", summary.frames_simulated, result.termination()),
        String::new(),
        "ENTROPIC TRAJECTORY:".to_string(),
        format!("  • EH initial: {}", describe(&summary.initial)),
        format!("  • EH final:   {}", describe(&summary.final_state)),
        format!("    {}", summary.final_state.state.description()),
    ];

    if let Some(reduction) = summary.entropy_reduction_percent {
        lines.push(format!("  • Harmonic entropy reduction: {:.1}%", reduction));
    }

    lines.push(String::new());
    lines.push(match summary.verdict {
        Verdict::Manifested => "✓ System evolved to full harmony".to_string(),
        Verdict::InTransit => "System still in transit to full harmony".to_string(),
    });

    lines.push(String::new());
    lines.push("ENERGY EFFICIENCY:".to_string());
    lines.push(format!("  • Initial energy:          {:.1}%", summary.initial_energy_percent));
    lines.push(format!("  • Total energy (realist):  {:.1}%", summary.final_total_energy_percent));
    lines.push(format!("  • Mean raw cost:           {:.3}%", summary.mean_raw_cost));
    lines.push(format!("  • Mean parsimonious energy: {:.3}%", summary.mean_parsimonious_energy));
    if let Some(savings) = summary.compression_savings_percent {
        lines.push(format!("  • Compression savings:     {:.1}%", savings));
    }

    lines
}

/// Logs the final report at INFO level.
pub fn log_report(result: &ScenarioResult) {
    info!("{}", RULE);
    for line in report_lines(result) {
        info!("{}", line);
    }
    info!("{}", RULE);
}

/// Renders the grid as text, `#` for active cells.
pub fn render_ascii(grid: &Grid) -> String {
    encode_rows(grid).join("\n")
}

/// Machine-readable summary of a run.
pub fn result_json(result: &ScenarioResult) -> serde_json::Value {
    serde_json::json!({
        "scenario": result.scenario.name(),
        "seed": result.seed,
        "passed": result.passed,
        "steps": result.total_steps(),
        "termination": result.termination(),
        "config": result.timeline.config,
        "summary": result.summary,
        "failure_reason": result.failure_reason,
    })
}
