//! Client configuration, read from `PORTAL_*` environment variables.
//!
//! Every setting has a default; an unparsable value is logged and ignored
//! rather than failing startup.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::simulator::SimulatorConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:8001";
pub const DEFAULT_SIMULATED_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the live authority API.
    pub api_url: String,
    /// Artificial latency of every simulated backend call.
    pub simulated_delay: Duration,
    pub simulator: SimulatorConfig,
    /// SQLite file for the persisted session and mode flag. `None` picks the
    /// per-user app data directory.
    pub storage_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            simulated_delay: Duration::from_millis(DEFAULT_SIMULATED_DELAY_MS),
            simulator: SimulatorConfig::default(),
            storage_path: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = lookup("PORTAL_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);

        let delay_ms = parse_or(&lookup, "PORTAL_MOCK_DELAY_MS", DEFAULT_SIMULATED_DELAY_MS);
        let interval_ms = parse_or(
            &lookup,
            "PORTAL_SIM_INTERVAL_MS",
            defaults.simulator.interval.as_millis() as u64,
        );
        let mut probability = parse_or(&lookup, "PORTAL_SIM_PROBABILITY", defaults.simulator.probability);
        if probability.is_nan() {
            tracing::warn!("PORTAL_SIM_PROBABILITY is not a number, using default");
            probability = defaults.simulator.probability;
        } else if !(0.0..=1.0).contains(&probability) {
            tracing::warn!(value = probability, "PORTAL_SIM_PROBABILITY out of range, clamping");
            probability = probability.clamp(0.0, 1.0);
        }
        let seed = lookup("PORTAL_SIM_SEED").and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                tracing::warn!(key = "PORTAL_SIM_SEED", value = %raw, "ignoring invalid setting");
                None
            }
        });

        let storage_path = lookup("PORTAL_STORAGE_PATH")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            api_url,
            simulated_delay: Duration::from_millis(delay_ms),
            simulator: SimulatorConfig {
                interval: Duration::from_millis(interval_ms.max(1)),
                probability,
                seed,
            },
            storage_path,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_simulated_delay(mut self, delay: Duration) -> Self {
        self.simulated_delay = delay;
        self
    }

    pub fn with_simulator(mut self, simulator: SimulatorConfig) -> Self {
        self.simulator = simulator;
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring invalid setting");
            default
        }),
    }
}
