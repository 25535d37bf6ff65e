//! Score command implementation for the adherence CLI.

use std::io::{BufReader, Write};

use adherence_core::{
    AdherenceScorer, LedgerEntry, MeasurementSeries, Observation, WeekId, WeeklyAllowanceLedger,
};
use adherence_fs::open_utf8_file;
use adherence_scorer::{
    AlgorithmConfig, AlgorithmType, Strategy, build_strategy, numeric_series, read_ledger_file,
    write_ledger_file,
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CONFIG, ARG_LEDGER, ARG_SERIES, ARG_WEEK, CliError, ENV_CONFIG, ENV_LEDGER, ENV_SERIES,
    ENV_WEEK,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score a JSON series of daily observations against a JSON \
                 algorithm configuration and print the period score, the \
                 progressive day scores, and a description of the goal. \
                 Allowance goals can carry rollover between weeks through a \
                 ledger file.",
    about = "Score a series against a goal"
)]
#[ortho_config(prefix = "ADHERENCE")]
pub(crate) struct ScoreArgs {
    /// Path to the JSON algorithm configuration.
    #[arg(long = ARG_CONFIG, value_name = "path")]
    #[serde(default)]
    pub(crate) config: Option<Utf8PathBuf>,
    /// Path to the JSON array of daily observations.
    #[arg(long = ARG_SERIES, value_name = "path")]
    #[serde(default)]
    pub(crate) series: Option<Utf8PathBuf>,
    /// Allowance ledger to restore and update.
    #[arg(long = ARG_LEDGER, value_name = "path")]
    #[serde(default)]
    pub(crate) ledger: Option<Utf8PathBuf>,
    /// ISO week the series covers, e.g. `2025-W14`.
    #[arg(long = ARG_WEEK, value_name = "week")]
    #[serde(default)]
    pub(crate) week: Option<String>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Ledger file and the week to record in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LedgerTarget {
    pub(crate) path: Utf8PathBuf,
    pub(crate) week: WeekId,
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreConfig {
    pub(crate) config_path: Utf8PathBuf,
    pub(crate) series_path: Utf8PathBuf,
    pub(crate) ledger: Option<LedgerTarget>,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.config_path, ARG_CONFIG)?;
        require_existing(&self.series_path, ARG_SERIES)
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match adherence_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let config_path = args.config.ok_or(CliError::MissingArgument {
            field: ARG_CONFIG,
            env: ENV_CONFIG,
        })?;
        let series_path = args.series.ok_or(CliError::MissingArgument {
            field: ARG_SERIES,
            env: ENV_SERIES,
        })?;
        let ledger = match (args.ledger, args.week) {
            (None, None) => None,
            (Some(path), Some(text)) => Some(LedgerTarget {
                path,
                week: text.parse().map_err(CliError::InvalidWeek)?,
            }),
            (Some(_), None) => {
                return Err(CliError::MissingArgument {
                    field: ARG_WEEK,
                    env: ENV_WEEK,
                });
            }
            (None, Some(_)) => {
                return Err(CliError::MissingArgument {
                    field: ARG_LEDGER,
                    env: ENV_LEDGER,
                });
            }
        };
        Ok(Self {
            config_path,
            series_path,
            ledger,
        })
    }
}

/// JSON document printed by the `score` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ScoreReport {
    pub(crate) algorithm_type: AlgorithmType,
    /// Period score; absent until the series covers the whole window.
    pub(crate) weekly_score: Option<f64>,
    pub(crate) progressive_scores: Vec<f64>,
    pub(crate) description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) ledger_entry: Option<LedgerEntry>,
}

pub(super) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let mut stdout = std::io::stdout().lock();
    run_score_with(&config, &mut stdout)
}

pub(super) fn run_score_with(config: &ScoreConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let report = execute_score(config)?;
    write_score_report(writer, &report)
}

pub(super) fn execute_score(config: &ScoreConfig) -> Result<ScoreReport, CliError> {
    let algorithm: AlgorithmConfig = load_json(&config.config_path, ARG_CONFIG)?;
    let series: MeasurementSeries<Observation> = load_json(&config.series_path, ARG_SERIES)?;
    let strategy = build_strategy(algorithm)?;
    log::debug!(
        "scoring {} observations with {}",
        series.len(),
        strategy.algorithm_type()
    );
    match &config.ledger {
        Some(target) => score_with_ledger(strategy, &series, target),
        None => score_plain(&strategy, &series),
    }
}

fn score_plain(
    strategy: &Strategy,
    series: &MeasurementSeries<Observation>,
) -> Result<ScoreReport, CliError> {
    let weekly_score = if series.len() == strategy.window_days() {
        Some(strategy.weekly_score(series)?)
    } else {
        None
    };
    Ok(ScoreReport {
        algorithm_type: strategy.algorithm_type(),
        weekly_score,
        progressive_scores: strategy.progressive_scores(series)?,
        description: strategy.describe(),
        ledger_entry: None,
    })
}

fn score_with_ledger(
    strategy: Strategy,
    series: &MeasurementSeries<Observation>,
    target: &LedgerTarget,
) -> Result<ScoreReport, CliError> {
    let algorithm = strategy.algorithm_type();
    let Strategy::ConstrainedWeeklyAllowance(allowance) = strategy else {
        return Err(CliError::LedgerUnsupported { algorithm });
    };
    let ledger = if restorable(&target.path)? {
        read_ledger_file(&target.path)?
    } else {
        log::debug!("no ledger at {}; starting a new one", target.path);
        WeeklyAllowanceLedger::new()
    };
    let mut goal = allowance.with_ledger(ledger);
    let usage = numeric_series(series)?;
    let progressive_scores = goal.progressive_scores_for(&usage, target.week)?;
    let entry = if usage.len() == goal.window_days() {
        let recorded = goal.record_week(target.week, &usage)?;
        write_ledger_file(&target.path, goal.ledger())?;
        Some(recorded)
    } else {
        log::debug!(
            "{} of {} days observed; leaving {} unrecorded",
            usage.len(),
            goal.window_days(),
            target.week
        );
        None
    };
    Ok(ScoreReport {
        algorithm_type: algorithm,
        weekly_score: entry.as_ref().map(|recorded| recorded.score),
        progressive_scores,
        description: goal.describe(),
        ledger_entry: entry,
    })
}

fn restorable(path: &Utf8Path) -> Result<bool, CliError> {
    adherence_fs::file_is_file(path).map_err(|source| CliError::InspectSourcePath {
        field: ARG_LEDGER,
        path: path.to_path_buf(),
        source,
    })
}

fn load_json<T: DeserializeOwned>(path: &Utf8Path, field: &'static str) -> Result<T, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        field,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseInput {
        field,
        path: path.to_path_buf(),
        source,
    })
}

fn write_score_report(writer: &mut dyn Write, report: &ScoreReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerialiseReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteReport)?;
    writer.write_all(b"\n").map_err(CliError::WriteReport)?;
    Ok(())
}
