// Command handlers: glue between the CLI, the grading engine, the store and
// the viewer.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use bullpen_core::config::Config;
use bullpen_core::db::Database;
use bullpen_core::records::{SessionStore, StoreOutcome, SummaryRow};
use bullpen_grading::ingest;
use bullpen_grading::score::Scorer;
use bullpen_grading::session::{grade_session, resolve_session_date, ScoredSession};
use bullpen_grading::trend::{build_trend, TrendMode, TrendPoint};
use bullpen_grading::zone::StrikeZone;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cli::{Command, GradeArgs, TrendArgs, ViewArgs};
use crate::tui::{self, ViewState};

/// Meta key recording the most recent import.
pub const LAST_IMPORT_KEY: &str = "last_import";

/// What the last stored `grade` run did, kept in the store's meta table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastImport {
    pub source: String,
    pub session_date: NaiveDate,
    pub pitches: usize,
    pub inserted: Vec<String>,
    pub skipped: Vec<String>,
}

/// Dispatch one CLI command.
pub fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Grade(args) => grade(&args, config),
        Command::Sessions => sessions(config),
        Command::Trend(args) => trend(&args, config),
        Command::View(args) => view(&args, config),
    }
}

fn open_db(config: &Config) -> anyhow::Result<Database> {
    let db = Database::open(&config.db_path)
        .with_context(|| format!("failed to open database at {}", config.db_path))?;
    info!("Database opened at {}", config.db_path);
    Ok(db)
}

// ---------------------------------------------------------------------------
// grade
// ---------------------------------------------------------------------------

fn grade(args: &GradeArgs, config: &Config) -> anyhow::Result<()> {
    let run = grade_and_store(args, config)?;
    let session = &run.session;

    print!("{}", format_summary_table(&summary_rows(session)));
    if session.zeroed_rows > 0 {
        println!(
            "{} pitch(es) had no usable location and scored 0.",
            session.zeroed_rows
        );
    }
    if let Some(outcome) = &run.outcome {
        print!("{}", format_outcome(outcome, session.session_date));
    }

    if args.view {
        let (pitches, summaries) = session.to_records();
        let state = ViewState::new(
            session.session_date,
            session.source.clone(),
            StrikeZone::from(&config.zone),
            pitches,
            summaries,
            run.history,
        );
        tui::run(state)?;
    }
    Ok(())
}

/// The non-interactive half of `grade`.
#[derive(Debug)]
pub struct GradeRun {
    pub session: ScoredSession,
    /// `None` with `--no-store`.
    pub outcome: Option<StoreOutcome>,
    /// Per pitcher in this session: stored history, or just this session
    /// when nothing was stored.
    pub history: HashMap<String, Vec<SummaryRow>>,
}

/// Grade the CSV named in `args` and, unless `--no-store`, persist it and
/// record it as the last import.
pub fn grade_and_store(args: &GradeArgs, config: &Config) -> anyhow::Result<GradeRun> {
    let source = display_name(&args.csv);
    let today = chrono::Local::now().date_naive();
    let session_date = args
        .date
        .unwrap_or_else(|| resolve_session_date(&source, today));

    let session = grade_file(&args.csv, session_date, &Scorer::from_config(config))?;

    let mut history = HashMap::new();
    if args.no_store {
        info!("--no-store given; {} not persisted", source);
        for row in summary_rows(&session) {
            history.insert(row.pitcher.clone(), vec![row]);
        }
        return Ok(GradeRun {
            session,
            outcome: None,
            history,
        });
    }

    let db = open_db(config)?;
    let outcome = persist(&db, &session)?;

    let meta = LastImport {
        source: session.source.clone(),
        session_date,
        pitches: session.pitch_count(),
        inserted: outcome.inserted.clone(),
        skipped: outcome.skipped.clone(),
    };
    db.save_meta(LAST_IMPORT_KEY, &serde_json::to_value(&meta)?)
        .context("failed to record last import")?;

    for s in &session.summaries {
        history.insert(s.pitcher.clone(), db.load_pitcher_history(&s.pitcher)?);
    }
    Ok(GradeRun {
        session,
        outcome: Some(outcome),
        history,
    })
}

/// The most recent stored import, if any.
pub fn last_import(db: &Database) -> anyhow::Result<Option<LastImport>> {
    match db.load_meta(LAST_IMPORT_KEY)? {
        Some(value) => {
            let record: LastImport =
                serde_json::from_value(value).context("malformed last_import record")?;
            Ok(Some(record))
        }
        None => Ok(None),
    }
}

/// Ingest, score and aggregate one CSV file.
pub fn grade_file(path: &Path, session_date: NaiveDate, scorer: &Scorer) -> anyhow::Result<ScoredSession> {
    let report = ingest::load_pitches(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if report.malformed_rows > 0 {
        warn!(
            "{} malformed row(s) skipped in {}",
            report.malformed_rows,
            path.display()
        );
    }
    let session = grade_session(&report.records, session_date, display_name(path), scorer)
        .with_context(|| format!("failed to grade {}", path.display()))?;
    Ok(session)
}

/// Hand a graded session to any store.
pub fn persist(store: &dyn SessionStore, session: &ScoredSession) -> anyhow::Result<StoreOutcome> {
    let (pitches, summaries) = session.to_records();
    let outcome = store
        .record_session(&pitches, &summaries)
        .context("failed to store session")?;
    info!(
        "stored {} ({}): {} inserted, {} already present",
        session.source,
        session.session_date,
        outcome.inserted.len(),
        outcome.skipped.len()
    );
    Ok(outcome)
}

fn summary_rows(session: &ScoredSession) -> Vec<SummaryRow> {
    session
        .summaries
        .iter()
        .map(|s| s.to_row(session.session_date))
        .collect()
}

// ---------------------------------------------------------------------------
// sessions / trend / view
// ---------------------------------------------------------------------------

fn sessions(config: &Config) -> anyhow::Result<()> {
    let db = open_db(config)?;
    let rows = db.load_sessions()?;
    if rows.is_empty() {
        println!("No stored sessions.");
        return Ok(());
    }
    print!("{}", format_summary_table(&rows));
    if let Some(record) = last_import(&db)? {
        print!("{}", format_last_import(&record));
    }
    Ok(())
}

fn trend(args: &TrendArgs, config: &Config) -> anyhow::Result<()> {
    let db = open_db(config)?;
    let history = db.load_pitcher_history(&args.pitcher)?;
    if history.is_empty() {
        bail!("no stored sessions for pitcher '{}'", args.pitcher);
    }
    let mode = if args.raw_ppp {
        TrendMode::RawPointsPerPitch
    } else {
        TrendMode::PercentOfMax
    };
    print!("{}", format_trend(&args.pitcher, &build_trend(&history, mode), mode));
    Ok(())
}

fn view(args: &ViewArgs, config: &Config) -> anyhow::Result<()> {
    let db = open_db(config)?;
    let session_date = match args.date {
        Some(d) => d,
        None => match db.session_dates()?.first() {
            Some(d) => *d,
            None => bail!("no stored sessions to view; grade a CSV first"),
        },
    };

    let summaries = db.load_session_summaries(session_date)?;
    if summaries.is_empty() {
        bail!("no stored session on {}", session_date);
    }
    let pitches = db.load_session_pitches(session_date, None)?;
    let mut history = HashMap::new();
    for s in &summaries {
        history.insert(s.pitcher.clone(), db.load_pitcher_history(&s.pitcher)?);
    }

    let state = ViewState::new(
        session_date,
        "stored",
        StrikeZone::from(&config.zone),
        pitches,
        summaries,
        history,
    );
    tui::run(state)
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Fixed-width table of session summaries, one line per row.
pub fn format_summary_table(rows: &[SummaryRow]) -> String {
    let name_width = rows
        .iter()
        .map(|r| r.pitcher.chars().count())
        .max()
        .unwrap_or(0)
        .max("Pitcher".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}  {:<nw$}  {:>5}  {:>6}  {:>5}  {:>5}  {:>5}  Grade",
        "Date",
        "Pitcher",
        "N",
        "Finish",
        "PPP",
        "Max",
        "%Max",
        nw = name_width
    );
    for r in rows {
        let _ = writeln!(
            out,
            "{:<10}  {:<nw$}  {:>5}  {:>6}  {:>5.2}  {:>5}  {:>4.0}%  {}",
            r.session_date,
            r.pitcher,
            r.total_pitches,
            r.finish_pitches,
            r.points_per_pitch,
            r.max_possible,
            r.grade_percent * 100.0,
            r.grade,
            nw = name_width
        );
    }
    out
}

pub fn format_outcome(outcome: &StoreOutcome, session_date: NaiveDate) -> String {
    let mut out = String::new();
    if !outcome.inserted.is_empty() {
        let _ = writeln!(
            out,
            "Stored {} pitcher(s) for {}.",
            outcome.inserted.len(),
            session_date
        );
    }
    for name in &outcome.skipped {
        let _ = writeln!(
            out,
            "Skipped {}: a session on {} is already stored.",
            name, session_date
        );
    }
    out
}

pub fn format_last_import(record: &LastImport) -> String {
    format!(
        "Last import: {} ({}), {} pitch(es); {} stored, {} already present.\n",
        record.source,
        record.session_date,
        record.pitches,
        record.inserted.len(),
        record.skipped.len()
    )
}

pub fn format_trend(pitcher: &str, points: &[TrendPoint], mode: TrendMode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", pitcher, mode.label());
    for p in points {
        let _ = writeln!(
            out,
            "{}  PPP {:.2}  {:>3.0}%  {}",
            p.session_date,
            p.points_per_pitch,
            p.grade_percent * 100.0,
            p.grade
        );
    }
    out
}

/// Resolve the base directory for config and logs.
pub fn base_dir(config_dir: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match config_dir {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("failed to read current directory"),
    }
}
