//! CSV output for sweep results
//!
//! One row per scenario: `pedestrian_arrival_rate`, `vehicle_arrival_rate`
//! (hourly, whole numbers) and the mean `conflicts` over its repeats.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use crate::sweep::SweepResult;

/// Streams sweep results into a CSV file
pub struct ResultWriter {
    writer: Writer<File>,
    finished: bool,
}

impl ResultWriter {
    /// Create (or truncate) `path` and write the header row
    pub fn new(path: &Path) -> Result<Self> {
        let mut writer = Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        writer.write_record(["pedestrian_arrival_rate", "vehicle_arrival_rate", "conflicts"])?;
        Ok(Self {
            writer,
            finished: false,
        })
    }

    pub fn write(&mut self, result: &SweepResult) -> Result<()> {
        self.writer.write_record(&[
            (result.pedestrians_per_hour.round() as i64).to_string(),
            (result.vehicles_per_hour.round() as i64).to_string(),
            result.mean_conflicts.to_string(),
        ])?;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }
}

/// Write every result to `path`, in the order given
pub fn write_results(path: &Path, results: &[SweepResult]) -> Result<()> {
    let mut writer = ResultWriter::new(path)?;
    for result in results {
        writer.write(result)?;
    }
    writer.finish()
}
