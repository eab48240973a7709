use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use crate::errors::ConfigError;
use crate::feed::ScrollTrigger;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_RESULTS: u32 = 25;
const DEFAULT_FEED_IDLE_TTL_SECS: u64 = 900;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub bind_addr: SocketAddr,
    pub max_results: u32,
    pub scroll: ScrollTrigger,
    /// Feeds left untouched this long are closed.
    pub feed_idle_ttl: Duration,
    pub log_dir: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings from an env file only, ignoring the process environment.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let vars: Vec<(String, String)> = dotenvy::from_path_iter(path)?.collect::<Result<_, _>>()?;
        Self::from_lookup(|name| {
            vars.iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        })
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing("API_KEY"))?;

        let bind_addr = parse_or(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR.parse().ok())?
            .ok_or(ConfigError::Missing("BIND_ADDR"))?;

        let max_results = parse_or(&lookup, "SEARCH_MAX_RESULTS", Some(DEFAULT_MAX_RESULTS))?
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .clamp(1, 50);

        let defaults = ScrollTrigger::default();
        let scroll = ScrollTrigger {
            threshold_rows: parse_or(&lookup, "SCROLL_THRESHOLD_ROWS", Some(defaults.threshold_rows))?
                .unwrap_or(defaults.threshold_rows),
            placeholder_rows: parse_or(&lookup, "PLACEHOLDER_ROWS", Some(defaults.placeholder_rows))?
                .unwrap_or(defaults.placeholder_rows),
        };

        let feed_idle_ttl = parse_or(&lookup, "FEED_IDLE_TTL_SECS", Some(DEFAULT_FEED_IDLE_TTL_SECS))?
            .unwrap_or(DEFAULT_FEED_IDLE_TTL_SECS)
            .max(1);

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Config {
            api_key,
            bind_addr,
            max_results,
            scroll,
            feed_idle_ttl: Duration::from_secs(feed_idle_ttl),
            log_dir: lookup("LOG_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            log_format,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: Option<T>,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::Invalid { name, value }),
        },
        _ => Ok(default),
    }
}
