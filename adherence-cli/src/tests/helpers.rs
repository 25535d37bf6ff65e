//! Test helpers for laying out configuration and series files.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

use crate::score::{LedgerTarget, ScoreConfig};

pub(super) const HYBRID_CONFIG: &str = r#"{
    "algorithm_type": "proportional_frequency_hybrid",
    "daily_target": 5000,
    "required_qualifying_days": 2
}"#;

pub(super) const ALLOWANCE_CONFIG: &str = r#"{
    "algorithm_type": "constrained_weekly_allowance",
    "weekly_allowance": 7,
    "max_days_per_week": 3,
    "rollover": {"max_rollover_percentage": 50}
}"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Temporary directory holding one configuration and one series file.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write_config(&self, json: &str) -> Utf8PathBuf {
        let path = self.path("config.json");
        write_utf8(&path, json.as_bytes());
        path
    }

    pub(super) fn write_series(&self, json: &str) -> Utf8PathBuf {
        let path = self.path("series.json");
        write_utf8(&path, json.as_bytes());
        path
    }

    pub(super) fn score_config(&self, config: &str, series: &str) -> ScoreConfig {
        ScoreConfig {
            config_path: self.write_config(config),
            series_path: self.write_series(series),
            ledger: None,
        }
    }

    pub(super) fn ledger_target(&self, week: &str) -> LedgerTarget {
        LedgerTarget {
            path: self.path("ledgers/allowance.bin"),
            week: week.parse().expect("valid week"),
        }
    }
}
