use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{error, info, warn};

use crosswalk_sim::results::write_results;
use crosswalk_sim::simulation::{EmojiRenderer, Layout, SignalTiming, SimConfig, SimWorld};
use crosswalk_sim::sweep::{run_sweep, SweepConfig};

#[derive(Parser)]
#[command(name = "crosswalk_sim")]
#[command(about = "Pedestrian/vehicle conflict simulation at a signalized crosswalk")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single simulation, optionally drawing the board as it goes
    Run(RunArgs),
    /// Sweep arrival rates in parallel and write mean conflicts to CSV
    Sweep(SweepArgs),
}

/// Intersection layout and signal timing
#[derive(Args)]
struct LayoutArgs {
    #[arg(long, env = "CROSSWALK_ROWS", default_value_t = 6)]
    crosswalk_rows: i32,

    #[arg(long, env = "CROSSWALK_COLS", default_value_t = 42)]
    crosswalk_cols: i32,

    #[arg(long, env = "WAITING_AREA_COLS", default_value_t = 1)]
    waiting_area_cols: i32,

    #[arg(long, env = "VEHICLE_LANES", default_value_t = 6)]
    vehicle_lanes: i32,

    /// Vehicle length in cells
    #[arg(long, env = "VEHICLE_ROWS", default_value_t = 6)]
    vehicle_rows: i32,

    /// Vehicle width in cells
    #[arg(long, env = "VEHICLE_COLS", default_value_t = 5)]
    vehicle_cols: i32,

    /// Signal cycle in ticks
    #[arg(long, env = "STOP_LIGHT_CYCLE", default_value_t = 90)]
    stop_light_cycle: u32,

    #[arg(long, env = "GREEN_LIGHT_TIME", default_value_t = 50)]
    green_light_time: u32,

    #[arg(long, env = "YELLOW_LIGHT_TIME", default_value_t = 5)]
    yellow_light_time: u32,
}

impl LayoutArgs {
    fn to_config(&self) -> SimConfig {
        let layout = Layout {
            crosswalk_rows: self.crosswalk_rows,
            crosswalk_cols: self.crosswalk_cols,
            waiting_area_cols: self.waiting_area_cols,
            vehicle_lanes: self.vehicle_lanes,
            vehicle_rows: self.vehicle_rows,
            vehicle_cols: self.vehicle_cols,
        };
        let signal = SignalTiming {
            cycle: self.stop_light_cycle,
            green: self.green_light_time,
            yellow: self.yellow_light_time,
        };
        SimConfig::from_layout(layout, signal)
    }
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    layout: LayoutArgs,

    /// Number of ticks (seconds) to simulate
    #[arg(long, env = "SIMULATION_TIME", default_value_t = 3600)]
    ticks: u64,

    #[arg(long, env = "SEED", default_value_t = 9_000_000)]
    seed: u64,

    #[arg(long, env = "PEDESTRIAN_RATE_HR", default_value_t = 2000.0)]
    pedestrian_rate_hr: f64,

    #[arg(long, env = "VEHICLE_RATE_HR", default_value_t = 1400.0)]
    vehicle_rate_hr: f64,

    /// Draw the board every N ticks (0 disables drawing)
    #[arg(long, env = "RENDER_EVERY", default_value_t = 0)]
    render_every: u64,

    /// Pause after each drawing, in milliseconds
    #[arg(long, env = "DELAY_MS", default_value_t = 0)]
    delay_ms: u64,
}

#[derive(Args)]
struct SweepArgs {
    #[command(flatten)]
    layout: LayoutArgs,

    #[arg(long, env = "INITIAL_PEDESTRIAN_ARRIVAL_RATE_HR", default_value_t = 1000.0)]
    initial_pedestrian_rate: f64,

    #[arg(long, env = "FINAL_PEDESTRIAN_ARRIVAL_RATE_HR", default_value_t = 6000.0)]
    final_pedestrian_rate: f64,

    #[arg(long, env = "INITIAL_VEHICLE_ARRIVAL_RATE_HR", default_value_t = 200.0)]
    initial_vehicle_rate: f64,

    #[arg(long, env = "FINAL_VEHICLE_ARRIVAL_RATE_HR", default_value_t = 1400.0)]
    final_vehicle_rate: f64,

    /// Points per rate axis
    #[arg(long, env = "STEPS", default_value_t = 30)]
    steps: usize,

    #[arg(long, env = "RUNS_PER_SIMULATION", default_value_t = 30)]
    runs_per_simulation: u64,

    /// Ticks per run
    #[arg(long, env = "SIMULATION_TIME", default_value_t = 3600)]
    simulation_time: u64,

    #[arg(long, env = "BASE_SEED", default_value_t = 9_000_000)]
    base_seed: u64,

    #[arg(long, env = "WORKERS", default_value_t = 20)]
    workers: usize,

    #[arg(long, env = "OUTPUT", default_value = "results/conflicts.csv")]
    output: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Run(args) => run_single(args),
        Command::Sweep(args) => run_parameter_sweep(args),
    };

    if let Err(err) = outcome {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

/// Run one simulation headless, printing the board every `render_every` ticks
fn run_single(args: RunArgs) -> Result<()> {
    let config = args
        .layout
        .to_config()
        .with_hourly_rates(args.pedestrian_rate_hr, args.vehicle_rate_hr);
    let renderer = EmojiRenderer::new(&config);
    let mut world = SimWorld::new_with_seed(config, args.seed)?;

    info!(
        "Running {} ticks with seed {} ({} ped/hr, {} veh/hr)",
        args.ticks, args.seed, args.pedestrian_rate_hr, args.vehicle_rate_hr
    );

    while world.epoch < args.ticks {
        let chunk = if args.render_every > 0 {
            args.render_every.min(args.ticks - world.epoch)
        } else {
            args.ticks - world.epoch
        };
        world.advance_to(world.epoch + chunk)?;

        if args.render_every > 0 {
            println!("--- After tick {} ---", world.epoch);
            world.print_summary();
            world.draw_map(&renderer);
            println!();

            if args.delay_ms > 0 && world.epoch < args.ticks {
                std::thread::sleep(std::time::Duration::from_millis(args.delay_ms));
            }
        }
    }

    println!("=== Final State ===");
    world.print_summary();

    info!("=== SIMULATION COMPLETE ===");
    info!("Epoch: {}", world.epoch);
    info!("Conflicts: {}", world.conflicts);
    info!("Active entities: {}", world.entities.len());
    Ok(())
}

/// Run the whole rate sweep and persist the results
fn run_parameter_sweep(args: SweepArgs) -> Result<()> {
    let config = SweepConfig {
        base: args.layout.to_config(),
        initial_pedestrian_rate: args.initial_pedestrian_rate,
        final_pedestrian_rate: args.final_pedestrian_rate,
        initial_vehicle_rate: args.initial_vehicle_rate,
        final_vehicle_rate: args.final_vehicle_rate,
        steps: args.steps,
        runs_per_simulation: args.runs_per_simulation,
        simulation_time: args.simulation_time,
        base_seed: args.base_seed,
        workers: args.workers,
    };

    let report = run_sweep(&config)?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    write_results(&args.output, &report.results)?;

    info!("=== SIMULATION COMPLETE ===");
    info!(
        "Scenarios: {} succeeded, {} failed",
        report.results.len(),
        report.failed.len()
    );
    info!("Sweep results written to {}", args.output.display());

    if !report.failed.is_empty() {
        for (index, reason) in &report.failed {
            warn!("Scenario {} missing from results: {}", index, reason);
        }
        bail!(
            "{} of {} scenarios failed",
            report.failed.len(),
            report.failed.len() + report.results.len()
        );
    }
    Ok(())
}
