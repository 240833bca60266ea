use std::str::FromStr;
use std::time::Duration;

use crate::context::OpContext;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Database configuration loaded from environment variables.
///
/// sqlx pools have no separate idle ceiling: idle connections are bounded by
/// `max_open_conns` and reaped after `max_idle_time`.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Upper bound on pooled connections (in use + idle).
    pub max_open_conns: u32,
    /// Connections the pool keeps open even when idle.
    pub min_idle_conns: u32,
    /// Idle connections older than this are closed.
    pub max_idle_time: Duration,
    /// How long a caller waits for a pooled connection.
    pub acquire_timeout: Duration,
    /// Default deadline for a single store operation.
    pub query_timeout: Duration,
}

impl DbConfig {
    /// Load a `.env` file if present, then read the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default    |
    /// |---------------------------|------------|
    /// | `DATABASE_URL`            | (required) |
    /// | `DB_MAX_OPEN_CONNS`       | `25`       |
    /// | `DB_MIN_IDLE_CONNS`       | `0`        |
    /// | `DB_MAX_IDLE_TIME_SECS`   | `900`      |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `5`        |
    /// | `DB_QUERY_TIMEOUT_SECS`   | `3`        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_open_conns = parse_or(&lookup, "DB_MAX_OPEN_CONNS", 25u32)?;
        let min_idle_conns = parse_or(&lookup, "DB_MIN_IDLE_CONNS", 0u32)?;
        let max_idle_time = parse_or(&lookup, "DB_MAX_IDLE_TIME_SECS", 900u64)?;
        let acquire_timeout = parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5u64)?;
        let query_timeout = parse_or(&lookup, "DB_QUERY_TIMEOUT_SECS", 3u64)?;

        if max_open_conns == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_OPEN_CONNS",
                value: max_open_conns.to_string(),
            });
        }
        if min_idle_conns > max_open_conns {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_IDLE_CONNS",
                value: min_idle_conns.to_string(),
            });
        }

        Ok(Self {
            database_url,
            max_open_conns,
            min_idle_conns,
            max_idle_time: Duration::from_secs(max_idle_time),
            acquire_timeout: Duration::from_secs(acquire_timeout),
            query_timeout: Duration::from_secs(query_timeout),
        })
    }

    /// An operation context using the configured query timeout.
    pub fn op_context(&self) -> OpContext {
        OpContext::new(self.query_timeout)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => {
            let parsed = raw.trim().parse();
            parsed.map_err(|_| ConfigError::Invalid { var, value: raw })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_url_is_set() {
        let config =
            DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/cinedex")]))
                .unwrap();
        assert_eq!(config.database_url, "postgres://localhost/cinedex");
        assert_eq!(config.max_open_conns, 25);
        assert_eq!(config.min_idle_conns, 0);
        assert_eq!(config.max_idle_time, Duration::from_secs(900));
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
        assert_eq!(config.query_timeout, Duration::from_secs(3));
        assert_eq!(config.op_context().timeout(), Duration::from_secs(3));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/cinedex"),
            ("DB_MAX_OPEN_CONNS", "50"),
            ("DB_MIN_IDLE_CONNS", " 5 "),
            ("DB_QUERY_TIMEOUT_SECS", "10"),
        ]))
        .unwrap();
        assert_eq!(config.max_open_conns, 50);
        assert_eq!(config.min_idle_conns, 5);
        assert_eq!(config.query_timeout, Duration::from_secs(10));
    }

    #[test]
    fn missing_url_is_an_error() {
        let err = DbConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn garbage_number_is_an_error() {
        let err = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/cinedex"),
            ("DB_MAX_OPEN_CONNS", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "DB_MAX_OPEN_CONNS",
                ..
            }
        ));
    }

    #[test]
    fn idle_floor_cannot_exceed_pool_size() {
        let err = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/cinedex"),
            ("DB_MAX_OPEN_CONNS", "4"),
            ("DB_MIN_IDLE_CONNS", "8"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "DB_MIN_IDLE_CONNS",
                ..
            }
        ));
    }
}
