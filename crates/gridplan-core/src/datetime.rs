use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Error;

const TIMEZONE_ENV_VAR: &str = "GRIDPLAN_TIMEZONE";
const TIMEZONE_CONFIG_ENV_VAR: &str = "GRIDPLAN_TIME_CONFIG";
const TIMEZONE_CONFIG_FILE: &str = "gridplan-time.toml";

#[derive(Debug, Deserialize)]
struct TimezoneConfig {
    timezone: Option<String>,
}

/// The calendar date the rolling window starts at. Recomputed on every view,
/// so the window slides during a long-lived session.
///
/// Resolution order: `GRIDPLAN_TIMEZONE`, then `gridplan-time.toml`, then the
/// `timezone` rc key, then the system-local date.
pub fn today(cfg: &Config) -> NaiveDate {
    match resolve_timezone(cfg) {
        Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
        None => Local::now().date_naive(),
    }
}

/// Strict ISO `YYYY-MM-DD` date-key parsing; anything else is rejected at
/// the boundary.
pub fn parse_date_key(raw: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        Error::InvalidInput(format!("expected a YYYY-MM-DD date, got: {raw}"))
    })
}

fn resolve_timezone(cfg: &Config) -> Option<Tz> {
    if let Ok(raw) = std::env::var(TIMEZONE_ENV_VAR)
        && let Some(tz) = parse_timezone(&raw, TIMEZONE_ENV_VAR)
    {
        return Some(tz);
    }

    if let Some(path) = timezone_config_path()
        && let Some(tz) = load_timezone_from_file(&path)
    {
        return Some(tz);
    }

    if let Some(raw) = cfg.get("timezone") {
        return parse_timezone(&raw, "timezone rc key");
    }

    None
}

fn timezone_config_path() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var(TIMEZONE_CONFIG_ENV_VAR) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(TIMEZONE_CONFIG_FILE))
}

fn load_timezone_from_file(path: &Path) -> Option<Tz> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return None,
    };

    let parsed: TimezoneConfig = match toml::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(file = %path.display(), error = %err, "ignoring malformed timezone config");
            return None;
        }
    };

    let name = parsed.timezone?;
    debug!(file = %path.display(), timezone = %name, "loaded timezone config");
    parse_timezone(&name, "timezone config file")
}

fn parse_timezone(raw: &str, origin: &str) -> Option<Tz> {
    match raw.trim().parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            warn!(origin, timezone = %raw, "not an IANA timezone; ignoring");
            None
        }
    }
}
