// SQLite persistence layer for graded bullpen sessions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, warn};

use crate::records::{Grade, PitchCategory, PitchRow, SessionStore, StoreOutcome, SummaryRow};

/// Bumped whenever the table layout changes.
const SCHEMA_VERSION: i64 = 1;

/// SQLite-backed history of pitcher session summaries and their scored
/// pitches, plus a small JSON key-value table for bookkeeping.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        if path != ":memory:" {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create database directory {}", parent.display())
                    })?;
                }
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS pitcher_sessions (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                pitcher_name   TEXT NOT NULL,
                session_date   TEXT NOT NULL,
                total_pitches  INTEGER NOT NULL,
                finish_pitches INTEGER NOT NULL,
                avg_score      REAL NOT NULL,
                ppp            REAL NOT NULL,
                max_possible   INTEGER NOT NULL,
                grade_percent  REAL NOT NULL,
                grade          TEXT NOT NULL,
                created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                UNIQUE(pitcher_name, session_date)
            );

            CREATE TABLE IF NOT EXISTS session_pitches (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id    INTEGER NOT NULL REFERENCES pitcher_sessions(id) ON DELETE CASCADE,
                pitcher_name  TEXT NOT NULL,
                session_date  TEXT NOT NULL,
                pitch_type    TEXT NOT NULL,
                height_inches REAL,
                side_inches   REAL,
                is_fastball   INTEGER NOT NULL,
                is_finish     INTEGER NOT NULL,
                score         INTEGER NOT NULL,
                category      TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_session_pitches_date
                ON session_pitches(session_date, pitcher_name);

            CREATE TABLE IF NOT EXISTS store_meta (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.save_meta(Self::SCHEMA_VERSION_KEY, &serde_json::json!(SCHEMA_VERSION))?;
        Ok(db)
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Insert a graded session in a single transaction.
    ///
    /// Summaries use INSERT OR IGNORE on `(pitcher_name, session_date)`: a
    /// pitcher already stored for that date is skipped along with all of
    /// their pitches, so re-uploading a file never duplicates history.
    /// Pitches without a matching summary in `summaries` are ignored.
    pub fn record_session(
        &self,
        pitches: &[PitchRow],
        summaries: &[SummaryRow],
    ) -> Result<StoreOutcome> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin session transaction")?;

        let mut outcome = StoreOutcome::default();
        let mut session_ids: HashMap<(&str, NaiveDate), i64> = HashMap::new();

        for summary in summaries {
            let changed = tx
                .execute(
                    "INSERT OR IGNORE INTO pitcher_sessions
                        (pitcher_name, session_date, total_pitches, finish_pitches,
                         avg_score, ppp, max_possible, grade_percent, grade)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        summary.pitcher,
                        summary.session_date,
                        summary.total_pitches,
                        summary.finish_pitches,
                        summary.avg_score,
                        summary.points_per_pitch,
                        summary.max_possible,
                        summary.grade_percent,
                        summary.grade,
                    ],
                )
                .context("failed to insert pitcher session")?;

            if changed == 0 {
                warn!(
                    "session for '{}' on {} already stored, skipping",
                    summary.pitcher, summary.session_date
                );
                outcome.skipped.push(summary.pitcher.clone());
            } else {
                session_ids.insert(
                    (summary.pitcher.as_str(), summary.session_date),
                    tx.last_insert_rowid(),
                );
                outcome.inserted.push(summary.pitcher.clone());
            }
        }

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO session_pitches
                        (session_id, pitcher_name, session_date, pitch_type, height_inches,
                         side_inches, is_fastball, is_finish, score, category)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                )
                .context("failed to prepare pitch insert")?;

            for pitch in pitches {
                let Some(session_id) =
                    session_ids.get(&(pitch.pitcher.as_str(), pitch.session_date))
                else {
                    continue;
                };
                stmt.execute(params![
                    session_id,
                    pitch.pitcher,
                    pitch.session_date,
                    pitch.pitch_type,
                    pitch.height_inches,
                    pitch.side_inches,
                    pitch.is_fastball,
                    pitch.is_finish,
                    pitch.score,
                    pitch.category,
                ])
                .context("failed to insert session pitch")?;
            }
        }

        tx.commit().context("failed to commit session")?;
        debug!(
            "stored {} pitcher sessions, skipped {}",
            outcome.inserted.len(),
            outcome.skipped.len()
        );
        Ok(outcome)
    }

    /// Every stored summary, oldest session first, pitchers alphabetical
    /// within a date.
    pub fn load_sessions(&self) -> Result<Vec<SummaryRow>> {
        self.query_summaries(
            "SELECT pitcher_name, session_date, total_pitches, finish_pitches, avg_score,
                    ppp, max_possible, grade_percent, grade
             FROM pitcher_sessions ORDER BY session_date, pitcher_name",
            params![],
        )
    }

    /// Summaries for a single session date, pitchers alphabetical.
    pub fn load_session_summaries(&self, session_date: NaiveDate) -> Result<Vec<SummaryRow>> {
        self.query_summaries(
            "SELECT pitcher_name, session_date, total_pitches, finish_pitches, avg_score,
                    ppp, max_possible, grade_percent, grade
             FROM pitcher_sessions WHERE session_date = ?1 ORDER BY pitcher_name",
            params![session_date],
        )
    }

    /// One pitcher's summaries ordered by session date.
    pub fn load_pitcher_history(&self, pitcher: &str) -> Result<Vec<SummaryRow>> {
        self.query_summaries(
            "SELECT pitcher_name, session_date, total_pitches, finish_pitches, avg_score,
                    ppp, max_possible, grade_percent, grade
             FROM pitcher_sessions WHERE pitcher_name = ?1 ORDER BY session_date",
            params![pitcher],
        )
    }

    fn query_summaries<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<SummaryRow>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(sql)
            .context("failed to prepare summary query")?;
        let rows = stmt
            .query_map(params, summary_from_row)
            .context("failed to query pitcher sessions")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map pitcher session rows")?;
        Ok(rows)
    }

    /// Stored pitches for a session date in upload order, optionally limited
    /// to one pitcher.
    pub fn load_session_pitches(
        &self,
        session_date: NaiveDate,
        pitcher: Option<&str>,
    ) -> Result<Vec<PitchRow>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT pitcher_name, pitch_type, height_inches, side_inches, is_fastball,
                        is_finish, score, category, session_date
                 FROM session_pitches
                 WHERE session_date = ?1 AND (?2 IS NULL OR pitcher_name = ?2)
                 ORDER BY id",
            )
            .context("failed to prepare load_session_pitches query")?;

        let pitches = stmt
            .query_map(params![session_date, pitcher], |row| {
                Ok(PitchRow {
                    pitcher: row.get(0)?,
                    pitch_type: row.get(1)?,
                    height_inches: row.get(2)?,
                    side_inches: row.get(3)?,
                    is_fastball: row.get(4)?,
                    is_finish: row.get(5)?,
                    score: row.get(6)?,
                    category: row.get(7)?,
                    session_date: row.get(8)?,
                })
            })
            .context("failed to query session pitches")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map session pitch rows")?;

        Ok(pitches)
    }

    /// Distinct session dates, most recent first.
    pub fn session_dates(&self) -> Result<Vec<NaiveDate>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT DISTINCT session_date FROM pitcher_sessions ORDER BY session_date DESC")
            .context("failed to prepare session_dates query")?;
        let dates = stmt
            .query_map([], |row| row.get(0))
            .context("failed to query session dates")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map session dates")?;
        Ok(dates)
    }

    /// Distinct pitcher names with stored history, sorted.
    pub fn pitcher_names(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT DISTINCT pitcher_name FROM pitcher_sessions ORDER BY pitcher_name")
            .context("failed to prepare pitcher_names query")?;
        let names = stmt
            .query_map([], |row| row.get(0))
            .context("failed to query pitcher names")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map pitcher names")?;
        Ok(names)
    }

    /// Returns `true` if a summary for `pitcher` on `session_date` is stored.
    pub fn has_session(&self, pitcher: &str, session_date: NaiveDate) -> Result<bool> {
        let conn = self.conn();
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM pitcher_sessions
                               WHERE pitcher_name = ?1 AND session_date = ?2)",
                params![pitcher, session_date],
                |row| row.get(0),
            )
            .context("failed to check pitcher session existence")?;
        Ok(exists)
    }

    // ------------------------------------------------------------------
    // Key-value metadata
    // ------------------------------------------------------------------

    const SCHEMA_VERSION_KEY: &'static str = "schema_version";

    /// Persist an arbitrary JSON value under `key`. Uses INSERT OR REPLACE so
    /// repeated saves overwrite the previous value.
    pub fn save_meta(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str = serde_json::to_string(value).context("failed to serialize meta value")?;
        conn.execute(
            "INSERT OR REPLACE INTO store_meta (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save meta value")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`. Returns `None` if the key
    /// does not exist.
    pub fn load_meta(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let json_str: Option<String> = conn
            .query_row(
                "SELECT value FROM store_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query store meta")?;

        match json_str {
            Some(s) => {
                let value = serde_json::from_str(&s).context("failed to deserialize meta value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

impl SessionStore for Database {
    fn record_session(
        &self,
        pitches: &[PitchRow],
        summaries: &[SummaryRow],
    ) -> Result<StoreOutcome> {
        Database::record_session(self, pitches, summaries)
    }
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<SummaryRow> {
    Ok(SummaryRow {
        pitcher: row.get(0)?,
        session_date: row.get(1)?,
        total_pitches: row.get(2)?,
        finish_pitches: row.get(3)?,
        avg_score: row.get(4)?,
        points_per_pitch: row.get(5)?,
        max_possible: row.get(6)?,
        grade_percent: row.get(7)?,
        grade: row.get(8)?,
    })
}

// ---------------------------------------------------------------------------
// SQL conversions for record enums (stored as their display strings)
// ---------------------------------------------------------------------------

impl ToSql for Grade {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Grade {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

impl ToSql for PitchCategory {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PitchCategory {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Helper: create a fresh in-memory database for each test.
    fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_pitch(pitcher: &str, day: &str, score: u8) -> PitchRow {
        PitchRow {
            pitcher: pitcher.to_string(),
            pitch_type: "Fastball".to_string(),
            height_inches: Some(33.0),
            side_inches: Some(-1.5),
            is_fastball: true,
            is_finish: false,
            score,
            category: match score {
                0 => PitchCategory::Zero,
                1 => PitchCategory::OnePoint,
                _ => PitchCategory::TwoPoint,
            },
            session_date: date(day),
        }
    }

    fn sample_summary(pitcher: &str, day: &str, ppp: f64) -> SummaryRow {
        SummaryRow {
            pitcher: pitcher.to_string(),
            session_date: date(day),
            total_pitches: 2,
            finish_pitches: 0,
            avg_score: ppp,
            points_per_pitch: ppp,
            max_possible: 2,
            grade_percent: ppp / 2.0,
            grade: Grade::C,
        }
    }

    #[test]
    fn open_creates_tables() {
        let db = test_db();
        let conn = db.conn();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"pitcher_sessions".to_string()));
        assert!(tables.contains(&"session_pitches".to_string()));
        assert!(tables.contains(&"store_meta".to_string()));
    }

    #[test]
    fn open_records_schema_version() {
        let db = test_db();
        assert_eq!(
            db.load_meta("schema_version").unwrap(),
            Some(json!(SCHEMA_VERSION))
        );
    }

    #[test]
    fn record_and_load_session_round_trip() {
        let db = test_db();
        let pitches = vec![
            sample_pitch("Smith", "2025-04-12", 2),
            PitchRow {
                height_inches: None,
                side_inches: None,
                ..sample_pitch("Smith", "2025-04-12", 0)
            },
        ];
        let summaries = vec![sample_summary("Smith", "2025-04-12", 1.0)];

        let outcome = db.record_session(&pitches, &summaries).unwrap();
        assert_eq!(outcome.inserted, vec!["Smith"]);
        assert!(outcome.skipped.is_empty());

        let loaded = db.load_session_summaries(date("2025-04-12")).unwrap();
        assert_eq!(loaded, summaries);

        let loaded_pitches = db.load_session_pitches(date("2025-04-12"), None).unwrap();
        assert_eq!(loaded_pitches, pitches);
    }

    #[test]
    fn duplicate_pitcher_and_date_is_skipped() {
        let db = test_db();
        let pitches = vec![sample_pitch("Smith", "2025-04-12", 2)];
        let summaries = vec![sample_summary("Smith", "2025-04-12", 2.0)];
        db.record_session(&pitches, &summaries).unwrap();

        let again = db
            .record_session(&pitches, &[sample_summary("Smith", "2025-04-12", 0.5)])
            .unwrap();
        assert!(again.inserted.is_empty());
        assert_eq!(again.skipped, vec!["Smith"]);

        // The original row is untouched and no pitches were duplicated.
        let loaded = db.load_session_summaries(date("2025-04-12")).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!((loaded[0].points_per_pitch - 2.0).abs() < f64::EPSILON);
        assert_eq!(
            db.load_session_pitches(date("2025-04-12"), None).unwrap().len(),
            1
        );
    }

    #[test]
    fn partial_duplicate_inserts_only_new_pitchers() {
        let db = test_db();
        db.record_session(
            &[sample_pitch("Smith", "2025-04-12", 1)],
            &[sample_summary("Smith", "2025-04-12", 1.0)],
        )
        .unwrap();

        let outcome = db
            .record_session(
                &[
                    sample_pitch("Smith", "2025-04-12", 1),
                    sample_pitch("Jones", "2025-04-12", 2),
                ],
                &[
                    sample_summary("Jones", "2025-04-12", 2.0),
                    sample_summary("Smith", "2025-04-12", 1.0),
                ],
            )
            .unwrap();

        assert_eq!(outcome.inserted, vec!["Jones"]);
        assert_eq!(outcome.skipped, vec!["Smith"]);
        let smith = db
            .load_session_pitches(date("2025-04-12"), Some("Smith"))
            .unwrap();
        assert_eq!(smith.len(), 1);
        let jones = db
            .load_session_pitches(date("2025-04-12"), Some("Jones"))
            .unwrap();
        assert_eq!(jones.len(), 1);
    }

    #[test]
    fn same_pitcher_different_dates_are_separate() {
        let db = test_db();
        db.record_session(&[], &[sample_summary("Smith", "2025-04-12", 1.0)])
            .unwrap();
        db.record_session(&[], &[sample_summary("Smith", "2025-04-19", 1.5)])
            .unwrap();

        let history = db.load_pitcher_history("Smith").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].session_date, date("2025-04-12"));
        assert_eq!(history[1].session_date, date("2025-04-19"));
    }

    #[test]
    fn pitches_without_summary_are_ignored() {
        let db = test_db();
        db.record_session(
            &[sample_pitch("Ghost", "2025-04-12", 2)],
            &[sample_summary("Smith", "2025-04-12", 1.0)],
        )
        .unwrap();
        assert!(db
            .load_session_pitches(date("2025-04-12"), None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn load_sessions_orders_by_date_then_pitcher() {
        let db = test_db();
        db.record_session(
            &[],
            &[
                sample_summary("Zeta", "2025-04-19", 1.0),
                sample_summary("Alpha", "2025-04-19", 1.0),
                sample_summary("Zeta", "2025-04-12", 1.0),
            ],
        )
        .unwrap();

        let all = db.load_sessions().unwrap();
        let keys: Vec<(String, NaiveDate)> = all
            .iter()
            .map(|s| (s.pitcher.clone(), s.session_date))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Zeta".to_string(), date("2025-04-12")),
                ("Alpha".to_string(), date("2025-04-19")),
                ("Zeta".to_string(), date("2025-04-19")),
            ]
        );
    }

    #[test]
    fn session_dates_most_recent_first_and_pitcher_names_sorted() {
        let db = test_db();
        db.record_session(
            &[],
            &[
                sample_summary("Zeta", "2025-04-12", 1.0),
                sample_summary("Alpha", "2025-05-01", 1.0),
            ],
        )
        .unwrap();

        assert_eq!(
            db.session_dates().unwrap(),
            vec![date("2025-05-01"), date("2025-04-12")]
        );
        assert_eq!(db.pitcher_names().unwrap(), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn has_session_false_then_true() {
        let db = test_db();
        assert!(!db.has_session("Smith", date("2025-04-12")).unwrap());
        db.record_session(&[], &[sample_summary("Smith", "2025-04-12", 1.0)])
            .unwrap();
        assert!(db.has_session("Smith", date("2025-04-12")).unwrap());
        assert!(!db.has_session("smith", date("2025-04-12")).unwrap());
    }

    #[test]
    fn save_meta_overwrites_previous_value() {
        let db = test_db();
        db.save_meta("last_import", &json!({"file": "a.csv"})).unwrap();
        db.save_meta("last_import", &json!({"file": "b.csv"})).unwrap();
        assert_eq!(
            db.load_meta("last_import").unwrap(),
            Some(json!({"file": "b.csv"}))
        );
        assert!(db.load_meta("missing").unwrap().is_none());
    }

    #[test]
    fn session_store_trait_delegates() {
        let db = test_db();
        let store: &dyn SessionStore = &db;
        let outcome = store
            .record_session(&[], &[sample_summary("Smith", "2025-04-12", 1.0)])
            .unwrap();
        assert_eq!(outcome.inserted, vec!["Smith"]);
    }
}
