use std::process::Command;

use crosswalk_sim::simulation::{
    EmojiRenderer, Layout, Point, Rectangle, SignalTiming, SimConfig, SimWorld,
};

fn conflict_trace(seed: u64, ticks: u64) -> Vec<u32> {
    let mut world = SimWorld::new_with_seed(SimConfig::default(), seed).unwrap();
    (0..ticks).map(|_| world.tick().unwrap()).collect()
}

/// Test the default layout geometry
#[test]
fn test_default_geometry() {
    let config = SimConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.total_rows(), 18);
    assert_eq!(config.total_cols(), 44);
    assert_eq!(config.vehicle_lanes(), 6);
    assert_eq!(
        config.crosswalk_zone(),
        Rectangle::from_corners(Point::new(6, 1), Point::new(11, 42))
    );
    assert_eq!(
        config.walking_zone(),
        Rectangle::from_corners(Point::new(6, 0), Point::new(11, 43))
    );
    assert!((config.pedestrian_arrival_rate - 2000.0 / 7200.0).abs() < 1e-12);
    assert!((config.vehicle_arrival_rate - 1400.0 / 21600.0).abs() < 1e-12);
}

/// Test that layouts which cannot hold a vehicle are rejected
#[test]
fn test_invalid_layouts_rejected() {
    let too_wide = Layout {
        vehicle_cols: 8,
        ..Layout::default()
    };
    let config = SimConfig::from_layout(too_wide, SignalTiming::default());
    assert!(config.validate().is_err());
    assert!(SimWorld::new_with_seed(config, 1).is_err());

    let bad_signal = SignalTiming {
        cycle: 40,
        green: 50,
        yellow: 5,
    };
    let config = SimConfig::from_layout(Layout::default(), bad_signal);
    assert!(SimWorld::new_with_seed(config, 1).is_err());
}

/// Test the world is wired the way the layout describes
#[test]
fn test_world_construction() {
    let world = SimWorld::new_with_seed(SimConfig::default(), 1).unwrap();
    assert_eq!(world.epoch, 0);
    assert_eq!(world.conflicts, 0);
    assert!(world.signal.is_green());
    assert_eq!(world.waiting_areas.len(), 2);
    assert_eq!(world.waiting_areas[0].view().center(), Point::new(6, 0));
    assert_eq!(world.waiting_areas[1].view().center(), Point::new(11, 43));
    assert_eq!(world.vehicle_lanes.len(), 6);

    let turning: Vec<bool> = world.vehicle_lanes.iter().map(|l| l.is_turning()).collect();
    assert_eq!(turning, vec![true, false, false, false, false, true]);
    assert!(world.entities.is_empty());
}

/// Test that a full hour runs and lands on the requested epoch
#[test]
fn test_default_run_reaches_epoch() {
    let mut world = SimWorld::new_with_seed(SimConfig::default(), 9_000_000).unwrap();
    world.advance_to(3600).unwrap();
    assert_eq!(world.epoch, 3600);

    // Already there: nothing happens
    let conflicts = world.conflicts;
    world.advance_to(100).unwrap();
    world.advance_to(3600).unwrap();
    assert_eq!(world.epoch, 3600);
    assert_eq!(world.conflicts, conflicts);
}

/// Test that identical seeds replay identical runs
#[test]
fn test_same_seed_same_conflicts() {
    let first = conflict_trace(9_000_000, 1800);
    let second = conflict_trace(9_000_000, 1800);
    assert_eq!(first, second);

    let mut a = SimWorld::new_with_seed(SimConfig::default(), 77).unwrap();
    let mut b = SimWorld::new_with_seed(SimConfig::default(), 77).unwrap();
    a.advance_to(600).unwrap();
    b.advance_to(600).unwrap();
    assert_eq!(a.summary(), b.summary());
    assert_eq!(a.grid.occupied_handles(), b.grid.occupied_handles());
}

/// Test that grid and arena stay consistent through a busy run
#[test]
fn test_grid_and_arena_agree() {
    let config = SimConfig::default().with_hourly_rates(6000.0, 1400.0);
    let mut world = SimWorld::new_with_seed(config, 3).unwrap();

    for _ in 0..400 {
        world.tick().unwrap();
        let handles = world.grid.occupied_handles();
        assert_eq!(handles.len(), world.entities.len());
        assert!(handles.iter().all(|&id| world.entities.get(id).is_some()));
    }
    assert!(world.entities.pedestrian_count() > 0);
}

/// Test that unusual vehicle shapes survive long, saturated runs
#[test]
fn test_odd_vehicle_shapes_run_to_completion() {
    let shapes = [
        Layout {
            vehicle_rows: 1,
            vehicle_cols: 1,
            ..Layout::default()
        },
        Layout {
            vehicle_rows: 12,
            ..Layout::default()
        },
        Layout {
            vehicle_rows: 3,
            vehicle_cols: 7,
            ..Layout::default()
        },
    ];

    for layout in shapes {
        for seed in [1, 2, 3] {
            let config = SimConfig::from_layout(layout, SignalTiming::default())
                .with_hourly_rates(20000.0, 8000.0);
            let mut world = SimWorld::new_with_seed(config, seed).unwrap();
            if let Err(err) = world.advance_to(1500) {
                panic!("{layout:?} seed {seed} failed at epoch {}: {err:#}", world.epoch);
            }
            assert_eq!(world.epoch, 1500);
            assert_eq!(world.grid.occupied_handles().len(), world.entities.len());
        }
    }
}

/// Test the board and summary output
#[test]
fn test_render_and_summary() {
    let config = SimConfig::default();
    let renderer = EmojiRenderer::new(&config);
    let world = SimWorld::new_with_seed(config, 1).unwrap();

    let board = world.render(&renderer, None);
    let lines: Vec<&str> = board.lines().collect();
    assert_eq!(lines.len(), 19);
    assert!(lines[7].contains("🔳"));
    assert!(lines[7].contains("⬜"));
    assert!(!lines[1].contains("⬜"));

    let window = world.render(&renderer, Some(Rectangle::new(2, 3)));
    assert_eq!(window.lines().count(), 3);

    let summary = world.summary();
    assert!(summary.contains("Epoch: 0"));
    assert!(summary.contains("Conflicts: 0"));
}

/// Test that the binary runs headless and logs its completion report
#[test]
fn test_headless_simulation_runs() {
    let output = Command::new(env!("CARGO_BIN_EXE_crosswalk_sim"))
        .args(["run", "--ticks", "300"])
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to execute simulation");

    assert!(
        output.status.success(),
        "Simulation failed to run. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
    assert!(stderr.contains("Epoch: 300"), "Missing 'Epoch' statistic");
    assert!(stderr.contains("Conflicts:"), "Missing 'Conflicts' statistic");
    assert!(
        stderr.contains("Active entities:"),
        "Missing 'Active entities' statistic"
    );
}

/// Test that a bad signal timing makes the binary fail
#[test]
fn test_invalid_timing_exits_with_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_crosswalk_sim"))
        .args(["run", "--ticks", "10", "--green-light-time", "100"])
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to execute simulation");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid signal timing"), "stderr: {}", stderr);
}

/// Test that a sweep with failed scenarios exits non-zero after writing what it has
#[test]
fn test_sweep_with_failures_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let output = Command::new(env!("CARGO_BIN_EXE_crosswalk_sim"))
        .args([
            "sweep",
            "--steps",
            "1",
            "--runs-per-simulation",
            "1",
            "--simulation-time",
            "10",
            "--green-light-time",
            "100",
            "--output",
        ])
        .arg(&path)
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to execute sweep");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "stderr: {}", stderr);
    assert!(stderr.contains("1 of 1 scenarios failed"), "stderr: {}", stderr);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents.lines().collect::<Vec<_>>(),
        vec!["pedestrian_arrival_rate,vehicle_arrival_rate,conflicts"]
    );
}

/// Test that the sweep reads its rate bounds from the environment
#[test]
fn test_sweep_rates_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_crosswalk_sim"))
        .args(["sweep", "--steps", "1", "--runs-per-simulation", "1"])
        .args(["--simulation-time", "10", "--output"])
        .arg(dir.path().join("out.csv"))
        .env("RUST_LOG", "info")
        .env("INITIAL_VEHICLE_ARRIVAL_RATE_HR", "-5")
        .output()
        .expect("Failed to execute sweep");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "stderr: {}", stderr);
    assert!(stderr.contains("arrival rates cannot be negative"), "stderr: {}", stderr);
}
