use crate::app_config::{AppConfig, Environment};
use crate::locator::DEFAULT_RADIUS_KM;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = lookup("DATABASE_URL")
        .ok()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    let env = parse_environment(&or_default("STOREFINDER_ENV", "development"))?;

    let mut bind_addr = or_default("STOREFINDER_BIND_ADDR", "0.0.0.0:8000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("STOREFINDER_BIND_ADDR", e.to_string()))?;
    if let Ok(port) = lookup("PORT") {
        let port = port
            .parse::<u16>()
            .map_err(|e| invalid("PORT", e.to_string()))?;
        bind_addr.set_port(port);
    }

    let log_level = or_default("STOREFINDER_LOG_LEVEL", "info");

    let default_radius_km = or_default(
        "STOREFINDER_DEFAULT_RADIUS_KM",
        &DEFAULT_RADIUS_KM.to_string(),
    )
    .parse::<f64>()
    .map_err(|e| invalid("STOREFINDER_DEFAULT_RADIUS_KM", e.to_string()))?;
    if !default_radius_km.is_finite() || default_radius_km < 0.0 {
        return Err(invalid(
            "STOREFINDER_DEFAULT_RADIUS_KM",
            format!("must be a non-negative number, got {default_radius_km}"),
        ));
    }

    let db_max_connections = parse_u32("STOREFINDER_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("STOREFINDER_DB_MIN_CONNECTIONS", "1")?;
    if db_min_connections > db_max_connections {
        return Err(invalid(
            "STOREFINDER_DB_MIN_CONNECTIONS",
            format!("must not exceed STOREFINDER_DB_MAX_CONNECTIONS ({db_max_connections})"),
        ));
    }
    let db_acquire_timeout_secs = parse_u64("STOREFINDER_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let rate_limit_per_minute = parse_usize("STOREFINDER_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        default_radius_km,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFINDER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
