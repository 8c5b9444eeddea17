use std::env;
use std::path::PathBuf;

/// Default location of the board file, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "seat-market.json";
/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON file holding the board and its settings
    pub data_path: PathBuf,
    /// `tracing` filter directive
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            rust_log: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            data_path: non_empty("SEAT_MARKET_DATA")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            rust_log: non_empty("RUST_LOG").unwrap_or(defaults.rust_log),
        }
    }

    /// Apply a `--data` flag on top of the environment
    pub fn with_data_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.data_path = path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.data_path, PathBuf::from("seat-market.json"));
        assert_eq!(config.rust_log, "warn");
    }

    #[test]
    fn test_env_values() {
        let config = Config::from_lookup(lookup(&[
            ("SEAT_MARKET_DATA", "/tmp/room-204.json"),
            ("RUST_LOG", "seatmarket_store=debug"),
        ]));
        assert_eq!(config.data_path, PathBuf::from("/tmp/room-204.json"));
        assert_eq!(config.rust_log, "seatmarket_store=debug");
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = Config::from_lookup(lookup(&[("SEAT_MARKET_DATA", "  ")]));
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    }

    #[test]
    fn test_flag_overrides_env() {
        let config = Config::from_lookup(lookup(&[("SEAT_MARKET_DATA", "env.json")]))
            .with_data_path(Some(PathBuf::from("flag.json")));
        assert_eq!(config.data_path, PathBuf::from("flag.json"));

        let config = Config::default().with_data_path(None);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    }
}
