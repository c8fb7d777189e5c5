//! Parallel parameter sweep over arrival rates
//!
//! Every combination of pedestrian and vehicle hourly rates becomes one
//! [`SweepUnit`]. Units run on a fixed-size rayon pool; each one simulates
//! several independently seeded repeats and reports the mean conflict count.

use std::time::Instant;

use anyhow::{bail, Context, Result};
use log::{error, info};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::simulation::{SimConfig, SimWorld};

/// Seed offset between consecutive units
const SEED_STRIDE: u64 = 100;

/// Everything the sweep needs besides the layout itself
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Layout and signal timing shared by every unit; its rates are replaced
    pub base: SimConfig,
    pub initial_pedestrian_rate: f64,
    pub final_pedestrian_rate: f64,
    pub initial_vehicle_rate: f64,
    pub final_vehicle_rate: f64,
    /// Points per rate axis
    pub steps: usize,
    pub runs_per_simulation: u64,
    /// Ticks per repeat
    pub simulation_time: u64,
    pub base_seed: u64,
    pub workers: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            base: SimConfig::default(),
            initial_pedestrian_rate: 1000.0,
            final_pedestrian_rate: 6000.0,
            initial_vehicle_rate: 200.0,
            final_vehicle_rate: 1400.0,
            steps: 30,
            runs_per_simulation: 30,
            simulation_time: 3600,
            base_seed: 9_000_000,
            workers: 20,
        }
    }
}

/// One rate combination
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepUnit {
    pub index: usize,
    pub pedestrians_per_hour: f64,
    pub vehicles_per_hour: f64,
}

impl SweepUnit {
    /// Seed for the given repeat of this unit
    pub fn seed(&self, base_seed: u64, repeat: u64) -> u64 {
        base_seed + self.index as u64 * SEED_STRIDE + repeat
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepResult {
    pub index: usize,
    pub pedestrians_per_hour: f64,
    pub vehicles_per_hour: f64,
    pub mean_conflicts: f64,
}

/// Outcome of a whole sweep
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Successful units in index order
    pub results: Vec<SweepResult>,
    /// Failed unit indices with the reason
    pub failed: Vec<(usize, String)>,
}

/// `steps` evenly spaced values from `start` to `end`, both included
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps - 1) as f64;
            (0..steps).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Cartesian product of the pedestrian and vehicle rate axes, pedestrian-major
pub fn build_units(config: &SweepConfig) -> Vec<SweepUnit> {
    let pedestrians = linspace(
        config.initial_pedestrian_rate,
        config.final_pedestrian_rate,
        config.steps,
    );
    let vehicles = linspace(
        config.initial_vehicle_rate,
        config.final_vehicle_rate,
        config.steps,
    );

    pedestrians
        .iter()
        .flat_map(|&p| vehicles.iter().map(move |&v| (p, v)))
        .enumerate()
        .map(|(index, (pedestrians_per_hour, vehicles_per_hour))| SweepUnit {
            index,
            pedestrians_per_hour,
            vehicles_per_hour,
        })
        .collect()
}

/// Run every repeat of one unit and average the conflict totals
pub fn run_unit(config: &SweepConfig, unit: &SweepUnit) -> Result<SweepResult> {
    if config.runs_per_simulation == 0 {
        bail!("runs per simulation must be at least 1");
    }

    let sim_config = config
        .base
        .clone()
        .with_hourly_rates(unit.pedestrians_per_hour, unit.vehicles_per_hour);

    let mut total = 0u64;
    for repeat in 0..config.runs_per_simulation {
        let seed = unit.seed(config.base_seed, repeat);
        let mut world = SimWorld::new_with_seed(sim_config.clone(), seed)?;
        world
            .advance_to(config.simulation_time)
            .with_context(|| format!("unit {} repeat {} (seed {})", unit.index, repeat, seed))?;
        total += world.conflicts;
    }

    Ok(SweepResult {
        index: unit.index,
        pedestrians_per_hour: unit.pedestrians_per_hour,
        vehicles_per_hour: unit.vehicles_per_hour,
        mean_conflicts: total as f64 / config.runs_per_simulation as f64,
    })
}

/// Run every unit on a pool of `config.workers` threads
pub fn run_sweep(config: &SweepConfig) -> Result<SweepReport> {
    let units = build_units(config);
    let pool = ThreadPoolBuilder::new()
        .num_threads(config.workers.max(1))
        .build()
        .context("building sweep thread pool")?;

    info!(
        "Sweeping {} scenarios x {} runs on {} workers",
        units.len(),
        config.runs_per_simulation,
        config.workers.max(1)
    );

    let outcomes: Vec<(usize, Result<SweepResult>)> = pool.install(|| {
        units
            .par_iter()
            .map(|unit| {
                let start = Instant::now();
                let outcome = run_unit(config, unit);
                if let Ok(result) = &outcome {
                    info!(
                        "Scenario {} ({:.0} ped/hr, {:.0} veh/hr) done in {:.2}s: {:.2} conflicts",
                        unit.index,
                        unit.pedestrians_per_hour,
                        unit.vehicles_per_hour,
                        start.elapsed().as_secs_f64(),
                        result.mean_conflicts
                    );
                }
                (unit.index, outcome)
            })
            .collect()
    });

    let mut report = SweepReport::default();
    for (index, outcome) in outcomes {
        match outcome {
            Ok(result) => report.results.push(result),
            Err(err) => {
                error!("Scenario {} failed: {:#}", index, err);
                report.failed.push((index, format!("{:#}", err)));
            }
        }
    }
    Ok(report)
}
