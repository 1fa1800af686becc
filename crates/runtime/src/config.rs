//! Session configuration read from `BLOCKSHOT_*` environment variables.

use std::path::PathBuf;

use blockshot_core::ResolverConfig;

use crate::types::{
    DEFAULT_ARRIVAL_TIMEOUT_MS, DEFAULT_MAX_IDLE_PASSES, DEFAULT_TRAVEL_MS, SHOT_SETTLE_MS,
    TICK_MS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub tick_ms: u32,
    pub settle_ms: u32,
    /// None waits for projectile arrival forever
    pub arrival_timeout_ms: Option<u32>,
    pub max_idle_passes: u32,
    pub travel_ms: u32,
    pub level_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            settle_ms: SHOT_SETTLE_MS,
            arrival_timeout_ms: Some(DEFAULT_ARRIVAL_TIMEOUT_MS),
            max_idle_passes: DEFAULT_MAX_IDLE_PASSES,
            travel_ms: DEFAULT_TRAVEL_MS,
            level_path: None,
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    ///
    /// - `BLOCKSHOT_TICK_MS`: scheduler tick interval
    /// - `BLOCKSHOT_SETTLE_MS`: settle animation after each removal
    /// - `BLOCKSHOT_ARRIVAL_TIMEOUT_MS`: projectile arrival timeout, 0 disables it
    /// - `BLOCKSHOT_MAX_IDLE_PASSES`: passes without a match before a shot gives up
    /// - `BLOCKSHOT_TRAVEL_MS`: projectile travel time
    /// - `BLOCKSHOT_LEVEL`: level pattern JSON file
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let num = |key: &str, default: u32| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(default)
        };

        let arrival_timeout_ms = match lookup("BLOCKSHOT_ARRIVAL_TIMEOUT_MS")
            .and_then(|s| s.trim().parse::<u32>().ok())
        {
            Some(0) => None,
            Some(ms) => Some(ms),
            None => defaults.arrival_timeout_ms,
        };

        let level_path = lookup("BLOCKSHOT_LEVEL")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        Self {
            tick_ms: num("BLOCKSHOT_TICK_MS", defaults.tick_ms).max(1),
            settle_ms: num("BLOCKSHOT_SETTLE_MS", defaults.settle_ms),
            arrival_timeout_ms,
            max_idle_passes: num("BLOCKSHOT_MAX_IDLE_PASSES", defaults.max_idle_passes),
            travel_ms: num("BLOCKSHOT_TRAVEL_MS", defaults.travel_ms),
            level_path,
        }
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            settle_ms: self.settle_ms,
            arrival_timeout_ms: self.arrival_timeout_ms,
            max_idle_passes: self.max_idle_passes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> SessionConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SessionConfig::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(vars(&[]), SessionConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = vars(&[
            ("BLOCKSHOT_TICK_MS", "10"),
            ("BLOCKSHOT_SETTLE_MS", "0"),
            ("BLOCKSHOT_MAX_IDLE_PASSES", "4"),
            ("BLOCKSHOT_TRAVEL_MS", " 30 "),
            ("BLOCKSHOT_LEVEL", "levels/one.json"),
        ]);
        assert_eq!(config.tick_ms, 10);
        assert_eq!(config.settle_ms, 0);
        assert_eq!(config.max_idle_passes, 4);
        assert_eq!(config.travel_ms, 30);
        assert_eq!(config.level_path, Some(PathBuf::from("levels/one.json")));
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = vars(&[("BLOCKSHOT_ARRIVAL_TIMEOUT_MS", "0")]);
        assert_eq!(config.arrival_timeout_ms, None);
        assert_eq!(config.resolver_config().arrival_timeout_ms, None);
    }

    #[test]
    fn garbage_falls_back() {
        let config = vars(&[("BLOCKSHOT_TICK_MS", "fast"), ("BLOCKSHOT_LEVEL", "  ")]);
        assert_eq!(config.tick_ms, TICK_MS);
        assert_eq!(config.level_path, None);
    }
}
