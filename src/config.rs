use log::{warn, LevelFilter};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://agricultural_data.db?mode=rwc";

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub log_dir: PathBuf,
    pub log_level: LevelFilter,
    /// Fixed latitude for area estimates; `None` uses each ring's mean latitude.
    pub reference_latitude: Option<f64>,
    pub db_max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_dir: PathBuf::from("logs"),
            log_level: LevelFilter::Info,
            reference_latitude: None,
            db_max_connections: 1,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unparseable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            log_dir: get("SURVEY_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: setting(&get, "SURVEY_LOG_LEVEL", defaults.log_level, |v| {
                LevelFilter::from_str(v).ok()
            }),
            reference_latitude: setting(&get, "SURVEY_REFERENCE_LATITUDE", None, |v| {
                f64::from_str(v)
                    .ok()
                    .filter(|lat| (-90.0..=90.0).contains(lat))
                    .map(Some)
            }),
            db_max_connections: setting(
                &get,
                "SURVEY_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
                |v| v.parse::<u32>().ok().filter(|n| *n > 0),
            ),
        }
    }
}

fn setting<T>(
    get: &dyn Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    parse: impl FnOnce(&str) -> Option<T>,
) -> T {
    let Some(raw) = get(key) else {
        return default;
    };
    match parse(&raw) {
        Some(v) => v,
        None => {
            warn!("ignoring invalid {}={:?}, using default", key, raw);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config(&[]), AppConfig::default());
    }

    #[test]
    fn values_are_read() {
        let c = config(&[
            ("DATABASE_URL", "sqlite://other.db?mode=rwc"),
            ("SURVEY_LOG_DIR", "/tmp/survey-logs"),
            ("SURVEY_LOG_LEVEL", "debug"),
            ("SURVEY_REFERENCE_LATITUDE", "-13.85"),
            ("SURVEY_DB_MAX_CONNECTIONS", "4"),
        ]);
        assert_eq!(c.database_url, "sqlite://other.db?mode=rwc");
        assert_eq!(c.log_dir, PathBuf::from("/tmp/survey-logs"));
        assert_eq!(c.log_level, LevelFilter::Debug);
        assert_eq!(c.reference_latitude, Some(-13.85));
        assert_eq!(c.db_max_connections, 4);
    }

    #[test]
    fn invalid_values_fall_back() {
        let c = config(&[
            ("SURVEY_LOG_LEVEL", "loud"),
            ("SURVEY_REFERENCE_LATITUDE", "123"),
            ("SURVEY_DB_MAX_CONNECTIONS", "0"),
            ("DATABASE_URL", "   "),
        ]);
        assert_eq!(c, AppConfig::default());
    }
}
