//! Parameter sweep and CSV output tests

use std::fs;

use crosswalk_sim::results::{write_results, ResultWriter};
use crosswalk_sim::simulation::{Layout, SignalTiming, SimConfig};
use crosswalk_sim::sweep::{build_units, linspace, run_sweep, run_unit, SweepConfig, SweepResult};

fn small_sweep() -> SweepConfig {
    SweepConfig {
        steps: 2,
        runs_per_simulation: 2,
        simulation_time: 300,
        workers: 2,
        ..SweepConfig::default()
    }
}

#[test]
fn test_linspace_includes_both_ends() {
    assert_eq!(linspace(1000.0, 6000.0, 3), vec![1000.0, 3500.0, 6000.0]);
    assert_eq!(linspace(200.0, 1400.0, 1), vec![200.0]);
    assert!(linspace(0.0, 1.0, 0).is_empty());

    let points = linspace(1000.0, 6000.0, 30);
    assert_eq!(points.len(), 30);
    assert_eq!(points[0], 1000.0);
    assert!((points[29] - 6000.0).abs() < 1e-9);
}

#[test]
fn test_units_are_pedestrian_major() {
    let config = SweepConfig {
        steps: 3,
        ..SweepConfig::default()
    };
    let units = build_units(&config);
    assert_eq!(units.len(), 9);

    for (i, unit) in units.iter().enumerate() {
        assert_eq!(unit.index, i);
    }
    assert_eq!(units[1].pedestrians_per_hour, 1000.0);
    assert_eq!(units[1].vehicles_per_hour, 800.0);
    assert_eq!(units[3].pedestrians_per_hour, 3500.0);
    assert_eq!(units[3].vehicles_per_hour, 200.0);
}

#[test]
fn test_unit_seeds() {
    let units = build_units(&SweepConfig::default());
    assert_eq!(units[0].seed(9_000_000, 0), 9_000_000);
    assert_eq!(units[2].seed(9_000_000, 3), 9_000_203);
}

#[test]
fn test_run_unit_is_deterministic() {
    let config = small_sweep();
    let unit = build_units(&config)[3];
    let first = run_unit(&config, &unit).unwrap();
    let second = run_unit(&config, &unit).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.index, 3);
    assert!(first.mean_conflicts >= 0.0);
}

#[test]
fn test_sweep_is_deterministic_and_ordered() {
    let config = small_sweep();
    let first = run_sweep(&config).unwrap();
    assert!(first.failed.is_empty());
    assert_eq!(first.results.len(), 4);
    let indices: Vec<usize> = first.results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);

    // Worker count does not change the outcome
    let single = run_sweep(&SweepConfig {
        workers: 1,
        ..small_sweep()
    })
    .unwrap();
    assert_eq!(first.results, single.results);
}

#[test]
fn test_failed_units_are_reported() {
    let bad_signal = SignalTiming {
        cycle: 30,
        green: 50,
        yellow: 5,
    };
    let config = SweepConfig {
        base: SimConfig::from_layout(Layout::default(), bad_signal),
        ..small_sweep()
    };

    let report = run_sweep(&config).unwrap();
    assert!(report.results.is_empty());
    assert_eq!(report.failed.len(), 4);
    assert!(report.failed[0].1.contains("invalid signal timing"));

    let no_runs = SweepConfig {
        runs_per_simulation: 0,
        ..small_sweep()
    };
    let unit = build_units(&no_runs)[0];
    assert!(run_unit(&no_runs, &unit).is_err());
}

#[test]
fn test_results_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conflicts.csv");
    let results = vec![
        SweepResult {
            index: 0,
            pedestrians_per_hour: 1000.0,
            vehicles_per_hour: 200.0,
            mean_conflicts: 1.5,
        },
        SweepResult {
            index: 1,
            pedestrians_per_hour: 1000.0,
            vehicles_per_hour: 241.37931034482759,
            mean_conflicts: 0.0,
        },
    ];

    write_results(&path, &results).unwrap();
    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            "pedestrian_arrival_rate,vehicle_arrival_rate,conflicts",
            "1000,200,1.5",
            "1000,241,0",
        ]
    );
}

#[test]
fn test_sweep_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sweep.csv");
    let report = run_sweep(&small_sweep()).unwrap();

    let mut writer = ResultWriter::new(&path).unwrap();
    for result in &report.results {
        writer.write(result).unwrap();
    }
    writer.finish().unwrap();
    writer.finish().unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["pedestrian_arrival_rate", "vehicle_arrival_rate", "conflicts"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[0][0], "1000");
    assert_eq!(&rows[3][1], "1400");
    for row in &rows {
        assert!(row[2].parse::<f64>().unwrap() >= 0.0);
    }
}
