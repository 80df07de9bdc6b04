// src/utils/env.rs
use log::{debug, info, warn};
use std::path::Path;

const ENV_PATHS: [&str; 3] = [".env", ".env.local", "../.env"];

/// Loads the first `.env` file found. Variables already set in the system
/// environment are left untouched.
pub fn load_env() {
    let mut loaded_env = false;
    for path in ENV_PATHS.iter() {
        if Path::new(path).exists() {
            match dotenv::from_path(path) {
                Ok(()) => {
                    info!("Loaded environment variables from {}", path);
                    loaded_env = true;
                    break;
                }
                Err(e) => warn!("Failed to load environment from {}: {}", path, e),
            }
        }
    }
    if !loaded_env {
        info!("No .env file found, using environment variables from system");
    }
}

/// Reads `key`, falling back to `default` when unset or unparsable.
pub fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring invalid value {:?} for {}", raw, key);
                default
            }
        },
        Err(_) => {
            debug!("{} not set, using default", key);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_env_or_parses_and_falls_back() {
        env::set_var("JUICE_TEST_ENV_OR_PORT", "8080");
        assert_eq!(env_or("JUICE_TEST_ENV_OR_PORT", 1u16), 8080);

        env::set_var("JUICE_TEST_ENV_OR_PORT", "not-a-port");
        assert_eq!(env_or("JUICE_TEST_ENV_OR_PORT", 1u16), 1);

        env::remove_var("JUICE_TEST_ENV_OR_PORT");
        assert_eq!(env_or("JUICE_TEST_ENV_OR_PORT", 7u16), 7);
    }
}
