use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    // Missing DataForSEO credentials are startup-fatal; the service cannot
    // answer ranking requests without them. Geocoding keys are optional and
    // only narrow the provider chain down to the free Nominatim fallback.
    let dataforseo_login = require("DATAFORSEO_LOGIN")?;
    let dataforseo_password = require("DATAFORSEO_PASSWORD")?;
    let google_maps_api_key = lookup("GOOGLE_MAPS_API_KEY").ok();
    let opencage_api_key = lookup("OPENCAGE_API_KEY").ok();

    let env = parse_environment(&or_default("RANKTRACK_ENV", "development"));

    let bind_addr = parse_addr("RANKTRACK_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("RANKTRACK_LOG_LEVEL", "info");

    let default_depth = parse_u32("RANKTRACK_DEFAULT_DEPTH", "40")?;
    let max_depth = parse_u32("RANKTRACK_MAX_DEPTH", "100")?;
    if default_depth == 0 || default_depth > max_depth {
        return Err(ConfigError::InvalidEnvVar {
            var: "RANKTRACK_DEFAULT_DEPTH".to_string(),
            reason: format!("must be between 1 and RANKTRACK_MAX_DEPTH ({max_depth})"),
        });
    }

    let request_timeout_secs = parse_u64("RANKTRACK_REQUEST_TIMEOUT_SECS", "30")?;
    let geocode_timeout_secs = parse_u64("RANKTRACK_GEOCODE_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("RANKTRACK_USER_AGENT", "ranktrack/0.1 (rank-tracking)");

    Ok(AppConfig {
        dataforseo_login,
        dataforseo_password,
        google_maps_api_key,
        opencage_api_key,
        env,
        bind_addr,
        log_level,
        default_depth,
        max_depth,
        request_timeout_secs,
        geocode_timeout_secs,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
