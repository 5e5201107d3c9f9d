use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_TOKEN_PREFIX: &str = "Q";
pub const DEFAULT_TOKEN_BASE: u32 = 100;
pub const DEFAULT_MINUTES_PER_PATIENT: u32 = 15;
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub directory_seed_path: Option<String>,
    pub token_prefix: String,
    pub token_base: u32,
    pub minutes_per_patient: u32,
    pub event_channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            directory_seed_path: None,
            token_prefix: DEFAULT_TOKEN_PREFIX.to_string(),
            token_base: DEFAULT_TOKEN_BASE,
            minutes_per_patient: DEFAULT_MINUTES_PER_PATIENT,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| {
                    warn!("BIND_ADDRESS not set, using default");
                    DEFAULT_BIND_ADDRESS.to_string()
                }),
            directory_seed_path: env::var("DIRECTORY_SEED_PATH").ok(),
            token_prefix: env::var("TOKEN_PREFIX")
                .ok()
                .filter(|prefix| !prefix.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TOKEN_PREFIX.to_string()),
            token_base: parse_var("TOKEN_BASE", DEFAULT_TOKEN_BASE),
            minutes_per_patient: parse_var("MINUTES_PER_PATIENT", DEFAULT_MINUTES_PER_PATIENT),
            event_channel_capacity: parse_var("EVENT_CHANNEL_CAPACITY", DEFAULT_EVENT_CHANNEL_CAPACITY),
        };

        if config.directory_seed_path.is_none() {
            warn!("DIRECTORY_SEED_PATH not set, using built-in hospital directory");
        }

        if !config.is_valid() {
            warn!("Queue configuration has zero-sized values, the engine clamps them to 1");
        }

        config
    }

    /// Event capacity and visit length must be non-zero for the engine to be useful.
    pub fn is_valid(&self) -> bool {
        self.event_channel_capacity > 0 && self.minutes_per_patient > 0
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value '{}', using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.token_prefix, "Q");
        assert_eq!(config.token_base, 100);
        assert_eq!(config.minutes_per_patient, 15);
        assert!(config.directory_seed_path.is_none());
        assert!(config.is_valid());
    }

    #[test]
    fn zero_capacity_is_invalid() {
        let config = AppConfig {
            event_channel_capacity: 0,
            ..AppConfig::default()
        };
        assert!(!config.is_valid());
    }
}
