//! Periodic snapshots and their CSV export.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostics::Stats;
use crate::state::FieldState;

/// State and statistics captured after one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Completed steps when the snapshot was taken.
    pub step: u64,
    /// Simulated time (s).
    pub time: f64,
    /// Statistics of `state`.
    pub stats: Stats,
    /// Copy of the full state.
    pub state: FieldState,
}

/// Collects per-snapshot statistics for tabular export.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    rows: Vec<Stats>,
}

impl StatsRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row.
    pub fn push(&mut self, stats: Stats) {
        self.rows.push(stats);
    }

    /// Recorded rows in insertion order.
    pub fn rows(&self) -> &[Stats] {
        &self.rows
    }

    /// Writes one CSV row per recorded snapshot.
    ///
    /// Species columns follow the order of the first row.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        let species: Vec<String> = self
            .rows
            .first()
            .map(|row| {
                row.compositions
                    .iter()
                    .map(|entry| entry.species.to_string())
                    .collect()
            })
            .unwrap_or_default();

        write!(file, "step,time,precipitate_fraction,mean_eta,min_eta,max_eta")?;
        for name in &species {
            write!(file, ",mean_{name},min_{name},max_{name}")?;
        }
        writeln!(file)?;

        for row in &self.rows {
            write!(
                file,
                "{},{:.6e},{:.6},{:.6},{:.6},{:.6}",
                row.step,
                row.time,
                row.precipitate_fraction,
                row.mean_eta,
                row.min_eta,
                row.max_eta
            )?;
            for entry in &row.compositions {
                write!(file, ",{:.8},{:.8},{:.8}", entry.mean, entry.min, entry.max)?;
            }
            writeln!(file)?;
        }
        Ok(())
    }
}

/// Deterministic file name for the snapshot taken at `step`.
pub fn snapshot_path(root: &Path, step: u64) -> PathBuf {
    root.join(format!("snapshot_{step:06}.json"))
}
