//! Database connection settings read from the environment.

use std::fmt;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{var} must be {expected}, got '{value}'")]
pub struct ConfigError {
    pub var: &'static str,
    pub expected: &'static str,
    pub value: String,
}

/// Connection settings for the StudyConnect database.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Refuse to connect without TLS.
    pub require_tls: bool,
    pub max_connections: u32,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("require_tls", &self.require_tls)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DbConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default        |
    /// |----------------------|----------------|
    /// | `DB_HOST`            | `localhost`    |
    /// | `DB_PORT`            | `5432`         |
    /// | `DB_USER`            | `postgres`     |
    /// | `DB_PASSWORD`        | empty          |
    /// | `DB_NAME`            | `studyconnect` |
    /// | `DB_SSL`             | `false`        |
    /// | `DB_MAX_CONNECTIONS` | `10`           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DbConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = var("DB_PORT", "5432");
        let port = port.trim().parse::<u16>().map_err(|_| ConfigError {
            var: "DB_PORT",
            expected: "a valid port number",
            value: port.clone(),
        })?;

        let max_connections = var("DB_MAX_CONNECTIONS", "10");
        let max_connections = match max_connections.trim().parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(ConfigError {
                    var: "DB_MAX_CONNECTIONS",
                    expected: "a positive integer",
                    value: max_connections,
                })
            }
        };

        let ssl = var("DB_SSL", "false");
        let require_tls = parse_flag(&ssl).ok_or(ConfigError {
            var: "DB_SSL",
            expected: "a boolean (true/false)",
            value: ssl.clone(),
        })?;

        Ok(Self {
            host: var("DB_HOST", "localhost"),
            port,
            user: var("DB_USER", "postgres"),
            password: var("DB_PASSWORD", ""),
            database: var("DB_NAME", "studyconnect"),
            require_tls,
            max_connections,
        })
    }

    /// Connection options for sqlx. Without `require_tls` TLS is still
    /// preferred when the server offers it.
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_tls {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database)
            .ssl_mode(ssl_mode);
        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<DbConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DbConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.user, "postgres");
        assert_eq!(config.database, "studyconnect");
        assert!(!config.require_tls);
        assert_eq!(config.max_connections, 10);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = config_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_USER", "study"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_NAME", "studyconnect_prod"),
            ("DB_SSL", "true"),
        ])
        .unwrap();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 6543);
        assert_eq!(config.password, "s3cret");
        assert!(config.require_tls);
    }

    #[test]
    fn ssl_flag_accepts_common_spellings() {
        for on in ["1", "yes", "TRUE", " on "] {
            assert!(config_from(&[("DB_SSL", on)]).unwrap().require_tls, "{on}");
        }
        for off in ["0", "no", "False", ""] {
            assert!(!config_from(&[("DB_SSL", off)]).unwrap().require_tls, "{off}");
        }
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = config_from(&[("DB_SSL", "sometimes")]).unwrap_err();
        assert_eq!(err.var, "DB_SSL");

        let err = config_from(&[("DB_PORT", "not-a-port")]).unwrap_err();
        assert_eq!(err.var, "DB_PORT");

        let err = config_from(&[("DB_MAX_CONNECTIONS", "0")]).unwrap_err();
        assert_eq!(err.var, "DB_MAX_CONNECTIONS");
    }

    #[test]
    fn debug_output_hides_password() {
        let config = config_from(&[("DB_PASSWORD", "hunter22")]).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter22"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn tls_requirement_maps_to_ssl_mode() {
        let config = config_from(&[("DB_SSL", "true"), ("DB_HOST", "db.internal")]).unwrap();
        let options = config.connect_options();
        assert_eq!(options.get_host(), "db.internal");
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Require));
    }
}
