// Configuration loading and parsing (grader.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize {path}: {source}")]
    InitError {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub zone: ZoneConfig,
    pub classifier: ClassifierConfig,
    pub db_path: String,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            zone: ZoneConfig::default(),
            classifier: ClassifierConfig::default(),
            db_path: DEFAULT_DB_FILE.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

const CONFIG_FILE: &str = "grader.toml";
const DEFAULT_DB_FILE: &str = "bullpen.db";
const DEFAULT_LOG_FILTER: &str = "bullpen_tui=info,bullpen_core=info,bullpen_grading=info,warn";

// ---------------------------------------------------------------------------
// grader.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire grader.toml file.
#[derive(Debug, Clone, Deserialize)]
struct GraderFile {
    #[serde(default)]
    zone: ZoneConfig,
    #[serde(default)]
    classifier: ClassifierConfig,
    #[serde(default)]
    database: Option<DatabaseSection>,
    #[serde(default)]
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingSection {
    filter: String,
}

/// Strike zone geometry in inches, plate-crossing coordinates centered on
/// home plate. Side is signed; height is measured from the ground.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    pub bottom: f64,
    pub top: f64,
    /// Ceiling of the band above the zone where fastballs earn buffer credit.
    pub fb_buffer_top: f64,
    /// Floor of the band below the zone where non-fastballs earn buffer credit.
    pub nfb_buffer_bottom: f64,
    pub side_left: f64,
    pub side_right: f64,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        ZoneConfig {
            bottom: 19.4,
            top: 38.5,
            fb_buffer_top: 40.5,
            nfb_buffer_bottom: 17.4,
            side_left: -8.5,
            side_right: 8.5,
        }
    }
}

/// How pitch-type text is matched against the fastball family names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyMatchMode {
    /// Case-insensitive substring match.
    #[default]
    Substring,
    /// Case-insensitive match against whole alphanumeric words.
    Token,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub fastball_families: Vec<String>,
    pub match_mode: FamilyMatchMode,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            fastball_families: vec!["Fastball".into(), "Sinker".into(), "Cutter".into()],
            match_mode: FamilyMatchMode::Substring,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/grader.toml` relative to the
/// given `base_dir`.
///
/// A relative `[database] path` is resolved against `base_dir`. When the
/// `[database]` table is omitted the store lives in the per-user data
/// directory.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: GraderFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let db_path = match file.database {
        Some(db) => resolve_db_path(base_dir, &db.path),
        None => default_db_path(base_dir),
    };

    let config = Config {
        zone: file.zone,
        classifier: file.classifier,
        db_path,
        log_filter: file
            .logging
            .map(|l| l.filter)
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
    };

    validate(&config)?;

    Ok(config)
}

/// Built-in copy of `defaults/grader.toml`, used when the base directory has
/// no `defaults/` of its own (an installed binary run from elsewhere).
const BUILTIN_GRADER_TOML: &str = include_str!("../../../defaults/grader.toml");

/// Make sure `config/grader.toml` exists. A missing file is seeded from
/// `defaults/grader.toml` when the base directory has one, else from the
/// built-in defaults. Returns the path written, or `None` when an existing
/// file was left alone.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let seed = base_dir.join("defaults").join(CONFIG_FILE);
    let contents = if seed.is_file() {
        std::fs::read_to_string(&seed).map_err(|e| init_error(&seed, e))?
    } else {
        BUILTIN_GRADER_TOML.to_string()
    };

    std::fs::create_dir_all(&config_dir).map_err(|e| init_error(&config_dir, e))?;
    // create_new: a file that appeared since the check above is kept.
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => return Err(init_error(&target, e)),
    };
    std::io::Write::write_all(&mut dest, contents.as_bytes())
        .map_err(|e| init_error(&target, e))?;

    info!("Seeded {} from defaults", target.display());
    Ok(Some(target))
}

/// Create the directory an on-disk database file will live in.
fn ensure_db_dir(db_path: &str) -> Result<(), ConfigError> {
    if db_path == ":memory:" {
        return Ok(());
    }
    match Path::new(db_path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|e| init_error(dir, e))
        }
        _ => Ok(()),
    }
}

/// Seed `config/grader.toml` if needed, load it, and create the database
/// directory.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_file(base_dir)?;
    let config = load_config_from(base_dir)?;
    ensure_db_dir(&config.db_path)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn init_error(path: &Path, source: std::io::Error) -> ConfigError {
    ConfigError::InitError {
        path: path.to_path_buf(),
        source,
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn resolve_db_path(base_dir: &Path, raw: &str) -> String {
    if raw == ":memory:" || Path::new(raw).is_absolute() {
        return raw.to_string();
    }
    base_dir.join(raw).display().to_string()
}

fn default_db_path(base_dir: &Path) -> String {
    match directories::ProjectDirs::from("org", "bullpen", "bullpen-grader") {
        Some(dirs) => dirs.data_dir().join(DEFAULT_DB_FILE).display().to_string(),
        None => base_dir.join(DEFAULT_DB_FILE).display().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let z = &config.zone;
    let zone_fields: &[(&str, f64)] = &[
        ("zone.bottom", z.bottom),
        ("zone.top", z.top),
        ("zone.fb_buffer_top", z.fb_buffer_top),
        ("zone.nfb_buffer_bottom", z.nfb_buffer_bottom),
        ("zone.side_left", z.side_left),
        ("zone.side_right", z.side_right),
    ];
    for (name, val) in zone_fields {
        if !val.is_finite() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be a finite number, got {val}"),
            });
        }
    }

    if z.bottom >= z.top {
        return Err(ConfigError::ValidationError {
            field: "zone.bottom".into(),
            message: format!("must be below zone.top ({}), got {}", z.top, z.bottom),
        });
    }
    if z.fb_buffer_top < z.top {
        return Err(ConfigError::ValidationError {
            field: "zone.fb_buffer_top".into(),
            message: format!("must be >= zone.top ({}), got {}", z.top, z.fb_buffer_top),
        });
    }
    if z.nfb_buffer_bottom > z.bottom {
        return Err(ConfigError::ValidationError {
            field: "zone.nfb_buffer_bottom".into(),
            message: format!(
                "must be <= zone.bottom ({}), got {}",
                z.bottom, z.nfb_buffer_bottom
            ),
        });
    }
    if z.side_left >= z.side_right {
        return Err(ConfigError::ValidationError {
            field: "zone.side_left".into(),
            message: format!(
                "must be left of zone.side_right ({}), got {}",
                z.side_right, z.side_left
            ),
        });
    }

    let families = &config.classifier.fastball_families;
    if families.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "classifier.fastball_families".into(),
            message: "must name at least one pitch family".into(),
        });
    }
    if families.iter().any(|f| f.trim().is_empty()) {
        return Err(ConfigError::ValidationError {
            field: "classifier.fastball_families".into(),
            message: "family names must not be blank".into(),
        });
    }

    if config.db_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "database.path".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
