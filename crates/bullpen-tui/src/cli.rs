// Command-line interface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Bullpen session grader: score pitch locations, grade pitchers, track trends.
#[derive(Parser, Debug)]
#[command(name = "bullpen", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `defaults/` and `config/`. Defaults to the current
    /// directory.
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Grade a session CSV and store the results.
    Grade(GradeArgs),
    /// List every stored session summary.
    Sessions,
    /// Show one pitcher's graded history.
    Trend(TrendArgs),
    /// Open the viewer on stored sessions.
    View(ViewArgs),
}

#[derive(Args, Debug)]
pub struct GradeArgs {
    /// TrackMan-style CSV export.
    pub csv: PathBuf,

    /// Session date. Taken from the file name when omitted, else today.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Grade and print without writing to the database.
    #[arg(long, default_value_t = false)]
    pub no_store: bool,

    /// Open the viewer after grading.
    #[arg(long, default_value_t = false)]
    pub view: bool,
}

#[derive(Args, Debug)]
pub struct TrendArgs {
    /// Pitcher name exactly as stored.
    pub pitcher: String,

    /// Grade points-per-pitch directly (legacy, not comparable to session grades).
    #[arg(long, default_value_t = false)]
    pub raw_ppp: bool,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Session to open. Defaults to the most recent.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
