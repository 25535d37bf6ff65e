//! Persistence of allowance ledgers.

use adherence_core::{LedgerEntry, MeasurementSeries, WeekId, WeeklyAllowanceLedger};
use adherence_scorer::{
    ConstrainedWeeklyAllowance, ConstrainedWeeklyAllowanceConfig, LedgerFileError, RolloverConfig,
    read_ledger_file, write_ledger_file,
};
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("create temp dir: {err}"),
    }
}

fn ledger_path(dir: &TempDir, name: &str) -> Utf8PathBuf {
    match Utf8PathBuf::from_path_buf(dir.path().join(name)) {
        Ok(path) => path,
        Err(path) => panic!("non-UTF-8 temp path: {}", path.display()),
    }
}

fn drinks() -> ConstrainedWeeklyAllowance {
    ConstrainedWeeklyAllowance::new(ConstrainedWeeklyAllowanceConfig {
        weekly_allowance: 7.0,
        max_days_per_week: Some(3),
        penalty_for_overage: 25.0,
        minimum_usage: None,
        rollover: Some(RolloverConfig {
            max_rollover_percentage: 50.0,
        }),
        failure_value: 0.0,
        window_days: 7,
    })
    .expect("valid allowance")
}

#[rstest]
fn ledger_round_trips_through_disk(temp_dir: TempDir) {
    let path = ledger_path(&temp_dir, "nested/drinks.bin");
    let mut goal = drinks();
    let week: WeekId = "2025-W14".parse().expect("valid week");
    let usage = MeasurementSeries::new(vec![0.0, 2.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    goal.record_week(week, &usage).expect("score week");
    write_ledger_file(&path, goal.ledger()).expect("write ledger");

    let restored = read_ledger_file(&path).expect("read ledger");
    assert_eq!(&restored, goal.ledger());

    let resumed = drinks().with_ledger(restored);
    let next = "2025-W15".parse().expect("valid week");
    assert_eq!(resumed.available_allowance(next), 10.5);
}

#[rstest]
fn empty_ledger_round_trips(temp_dir: TempDir) {
    let path = ledger_path(&temp_dir, "empty.bin");
    write_ledger_file(&path, &WeeklyAllowanceLedger::new()).expect("write ledger");
    let restored = read_ledger_file(&path).expect("read ledger");
    assert!(restored.is_empty());
}

#[rstest]
fn later_weeks_sort_last(temp_dir: TempDir) {
    let path = ledger_path(&temp_dir, "weeks.bin");
    let mut ledger = WeeklyAllowanceLedger::new();
    let entry = LedgerEntry {
        usage: 3.0,
        allowance: 7.0,
        overage: 0.0,
        score: 100.0,
        days_used: 2,
    };
    for text in ["2025-W02", "2024-W52", "2025-W01"] {
        ledger.insert(text.parse().expect("valid week"), entry);
    }
    write_ledger_file(&path, &ledger).expect("write ledger");
    let restored = read_ledger_file(&path).expect("read ledger");
    let latest = restored.latest().map(|(week, _)| week.to_string());
    assert_eq!(latest.as_deref(), Some("2025-W02"));
}

#[rstest]
fn overwriting_keeps_a_single_decodable_ledger(temp_dir: TempDir) {
    let path = ledger_path(&temp_dir, "drinks.bin");
    let mut goal = drinks();
    let usage = MeasurementSeries::new(vec![0.0, 2.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    for text in ["2025-W14", "2025-W15"] {
        goal.record_week(text.parse().expect("valid week"), &usage).expect("score week");
        write_ledger_file(&path, goal.ledger()).expect("write ledger");
    }
    write_ledger_file(&path, &WeeklyAllowanceLedger::new()).expect("shrink ledger");

    assert!(read_ledger_file(&path).expect("read ledger").is_empty());
    let names: Vec<_> = std::fs::read_dir(temp_dir.path())
        .expect("list dir")
        .map(|entry| {
            let name = entry.expect("dir entry").file_name();
            name.into_string().expect("utf-8 file name")
        })
        .collect();
    assert_eq!(names, ["drinks.bin"]);
}

#[rstest]
fn missing_file_reports_read_error(temp_dir: TempDir) {
    let path = ledger_path(&temp_dir, "absent.bin");
    let err = read_ledger_file(&path).expect_err("missing ledger");
    assert!(matches!(err, LedgerFileError::ReadFile { .. }));
}

#[rstest]
fn corrupt_file_reports_decode_error(temp_dir: TempDir) {
    let path = ledger_path(&temp_dir, "corrupt.bin");
    std::fs::write(path.as_std_path(), [0xff_u8; 3]).expect("write junk");
    let err = read_ledger_file(&path).expect_err("corrupt ledger");
    assert!(matches!(err, LedgerFileError::Deserialise { .. }));
}
