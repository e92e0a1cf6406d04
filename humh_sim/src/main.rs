//! HUMH Simulator CLI
//!
//! Run deterministic observer-manifestation scenarios and report their
//! harmonic trajectory.

use clap::Parser;
use humh_sim::report::{log_report, render_ascii, result_json};
use humh_sim::scenarios::ScenarioId;
use humh_sim::{encode_rows, ConfigOverrides, ScenarioResult, ScenarioRunner, SimError, SimExport, SimFrame};
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// HUMH observer-manifestation simulator
#[derive(Parser, Debug)]
#[command(name = "humh-sim")]
#[command(about = "Run deterministic HUMH manifestation scenarios", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Scenario to run (baseline, full_coverage, no_compression, total_compression,
    /// empty_start, dense_start, pinpoint, wide_observer, all)
    #[arg(short = 'S', long, default_value = "baseline")]
    scenario: String,

    /// Number of consecutive seeds to run
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Override grid side length
    #[arg(long)]
    grid_size: Option<usize>,

    /// Override maximum number of frames
    #[arg(short, long)]
    frames: Option<usize>,

    /// Override activation radius (square neighborhood half-width)
    #[arg(short, long)]
    radius: Option<usize>,

    /// Override harmonic compression percent
    #[arg(short, long)]
    compression: Option<f64>,

    /// Override initial active probability
    #[arg(short, long)]
    probability: Option<f64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Export the timeline of a single run to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// Include per-step grid snapshots in the export
    #[arg(long)]
    export_grids: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            grid_size: self.grid_size,
            frame_count: self.frames,
            activation_radius: self.radius,
            compression_percent: self.compression,
            initial_active_probability: self.probability,
        }
    }
}

/// Runs a scenario and writes every frame to `export_path`.
fn run_with_export(
    runner: &ScenarioRunner,
    scenario: ScenarioId,
    seed: u64,
    export_path: &str,
    include_grids: bool,
) -> Result<ScenarioResult, SimError> {
    let mut export = SimExport::new(scenario.name(), seed, runner.config_for(scenario));

    let result = runner.run_observed(scenario, |ctx, record, grid| {
        export.add_frame(SimFrame {
            time_sec: ctx.time_secs(),
            record: record.clone(),
            grid: include_grids.then(|| encode_rows(grid)),
        });
    })?;

    export.set_initial_grid(&result.timeline.initial_grid);
    export.finalize(result.termination(), result.passed, result.summary.clone());
    export.write_to_file(export_path)?;

    info!("Exported {} frames to {}", export.frames.len(), export_path);
    Ok(result)
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if !args.json {
        info!("HUMH Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    // Parse scenarios
    let scenarios: Vec<ScenarioId> = if args.scenario == "all" {
        ScenarioId::all()
    } else {
        match args.scenario.parse() {
            Ok(scenario) => vec![scenario],
            Err(e) => {
                error!("{}", e);
                error!("Available scenarios:");
                for scenario in ScenarioId::all() {
                    error!("  {:<18} {}", scenario.name(), scenario.description());
                }
                error!("  {:<18} Run every scenario", "all");
                std::process::exit(1);
            }
        }
    };

    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    } else {
        args.seed
    };

    let overrides = args.overrides();
    if !overrides.is_empty() {
        debug!("Config overrides: {:?}", overrides);
    }

    // Handle --export mode
    if let Some(export_path) = &args.export {
        if scenarios.len() > 1 || args.seeds > 1 {
            error!("--export only supports a single scenario and seed");
            std::process::exit(1);
        }

        let runner = ScenarioRunner::new(base_seed).with_overrides(overrides);
        match run_with_export(&runner, scenarios[0], base_seed, export_path, args.export_grids) {
            Ok(result) => {
                if args.json {
                    println!("{}", result_json(&result));
                } else {
                    log_report(&result);
                }
                if !result.passed {
                    std::process::exit(1);
                }
            }
            Err(e) => {
                error!("Export failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Track results
    let mut all_results: Vec<ScenarioResult> = Vec::new();
    let mut failed_count = 0;

    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);
        let runner = ScenarioRunner::new(seed).with_overrides(overrides.clone());

        for scenario in &scenarios {
            let result = match runner.run(*scenario) {
                Ok(result) => result,
                Err(e) => {
                    error!("✗ {} (seed={}) could not start: {}", scenario.name(), seed, e);
                    std::process::exit(1);
                }
            };

            if !args.json {
                if result.passed {
                    info!("✓ {} (seed={}) PASSED", scenario.name(), seed);
                } else {
                    error!(
                        "✗ {} (seed={}) FAILED: {}",
                        scenario.name(),
                        seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
                log_report(&result);
                debug!("Final grid:\n{}", render_ascii(&result.timeline.final_grid));
            }

            if !result.passed {
                failed_count += 1;
            }

            all_results.push(result);
        }
    }

    // Summary
    let total = all_results.len();
    let passed = total - failed_count;

    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results.iter().map(result_json).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize results: {}", e);
                std::process::exit(1);
            }
        }
    } else if total > 1 {
        if failed_count == 0 {
            info!("✅ All {} scenario runs passed!", total);
        } else {
            error!("❌ {}/{} scenario runs failed!", failed_count, total);

            for result in all_results.iter().filter(|r| !r.passed) {
                error!(
                    "  - {} seed={}: {}",
                    result.scenario.name(),
                    result.seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
}
