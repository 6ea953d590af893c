//! Server configuration from environment variables.
//!
//! HOST (default 0.0.0.0), PORT (default 8080), PLAYERS_CSV (roster imported at boot),
//! RNG_SEED (fixed seed for pairing shuffles).

use std::collections::HashMap;
use std::path::PathBuf;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub players_csv: Option<PathBuf>,
    pub rng_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            players_csv: None,
            rng_seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build from `(name, value)` pairs. Unparseable numbers fall back to their defaults.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        let non_empty = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        Self {
            host: non_empty("HOST").map(str::to_string).unwrap_or_else(default_host),
            port: non_empty("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_port),
            players_csv: non_empty("PLAYERS_CSV").map(PathBuf::from),
            rng_seed: non_empty("RNG_SEED").and_then(|s| s.parse().ok()),
        }
    }
}
