//! Service configuration
//!
//! Loaded from environment variables. Unset variables take their defaults;
//! unparseable ones are reported with a warning and also take their default,
//! so a typo never prevents the service from starting.
//!
//! | Variable        | Default   |
//! |-----------------|-----------|
//! | `HTTP_HOST`     | `0.0.0.0` |
//! | `HTTP_PORT`     | `8080`    |
//! | `HTTP_TIMEOUT`  | `30s`     |
//! | `JWT_SECRET`    | dev value |
//! | `TOKEN_TTL`     | `24h`     |
//! | `APP_LOG_LEVEL` | `info`    |
//! | `APP_LOG_JSON`  | `false`   |
//! | `METRICS_PORT`  | `9000`    |

use std::{env, fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Secret used when `JWT_SECRET` is unset. Fine for local runs only.
const DEV_JWT_SECRET: &str = "pvz-development-secret";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub http: HttpConfig,
    pub auth: AuthConfig,
    pub log: LogConfig,
    pub metrics: MetricsConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    /// Deadline for a single request; exceeded requests get 408
    pub request_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl HttpConfig {
    /// `host:port` for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Token signing settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Prometheus exporter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { port: 9000 }
    }
}

impl ServiceConfig {
    /// Build configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            http: HttpConfig {
                host: read("HTTP_HOST").unwrap_or(defaults.http.host),
                port: parse_or("HTTP_PORT", read("HTTP_PORT"), defaults.http.port),
                request_timeout: read("HTTP_TIMEOUT")
                    .map(|raw| duration_or("HTTP_TIMEOUT", &raw, defaults.http.request_timeout))
                    .unwrap_or(defaults.http.request_timeout),
            },
            auth: AuthConfig {
                jwt_secret: read("JWT_SECRET").unwrap_or_else(|| {
                    warn!("JWT_SECRET is not set, using the development secret");
                    defaults.auth.jwt_secret
                }),
                token_ttl: read("TOKEN_TTL")
                    .map(|raw| duration_or("TOKEN_TTL", &raw, defaults.auth.token_ttl))
                    .unwrap_or(defaults.auth.token_ttl),
            },
            log: LogConfig {
                level: read("APP_LOG_LEVEL").unwrap_or(defaults.log.level),
                json: read("APP_LOG_JSON")
                    .map(|raw| {
                        let raw = raw.trim().to_ascii_lowercase();
                        raw == "true" || raw == "1"
                    })
                    .unwrap_or(defaults.log.json),
            },
            metrics: MetricsConfig {
                port: parse_or("METRICS_PORT", read("METRICS_PORT"), defaults.metrics.port),
            },
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, default = %default, "invalid configuration value, using default");
            default
        }
    }
}

fn duration_or(key: &str, raw: &str, default: Duration) -> Duration {
    parse_duration(raw).unwrap_or_else(|| {
        warn!(key, value = %raw, ?default, "invalid duration, using default");
        default
    })
}

/// Parse `250ms`, `30s`, `5m`, `24h` or a bare number of seconds
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let amount: u64 = digits.parse().ok()?;

    let duration = match unit.trim() {
        "" | "s" => Duration::from_secs(amount),
        "ms" => Duration::from_millis(amount),
        "m" => Duration::from_secs(amount.checked_mul(60)?),
        "h" => Duration::from_secs(amount.checked_mul(3600)?),
        _ => return None,
    };
    Some(duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServiceConfig::from_lookup(lookup(&[]));
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.request_timeout, Duration::from_secs(30));
        assert_eq!(config.auth.token_ttl, Duration::from_secs(86_400));
        assert_eq!(config.log.level, "info");
        assert!(!config.log.json);
        assert_eq!(config.metrics.port, 9000);
    }

    #[test]
    fn test_values_from_environment() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("HTTP_HOST", "127.0.0.1"),
            ("HTTP_PORT", "9090"),
            ("HTTP_TIMEOUT", "5s"),
            ("JWT_SECRET", "s3cret"),
            ("TOKEN_TTL", "2h"),
            ("APP_LOG_LEVEL", "debug"),
            ("APP_LOG_JSON", "true"),
            ("METRICS_PORT", "9100"),
        ]));

        assert_eq!(config.http.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.http.request_timeout, Duration::from_secs(5));
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.token_ttl, Duration::from_secs(7200));
        assert_eq!(config.log.level, "debug");
        assert!(config.log.json);
        assert_eq!(config.metrics.port, 9100);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("HTTP_PORT", "eighty"),
            ("HTTP_TIMEOUT", "soon"),
        ]));
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("250ms"), Some(Duration::from_millis(250)));
        assert_eq!(parse_duration("30"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("5m"), Some(Duration::from_secs(300)));
        assert_eq!(parse_duration("24h"), Some(Duration::from_secs(86_400)));
        assert_eq!(parse_duration("3d"), None);
        assert_eq!(parse_duration("h"), None);
    }

    #[test]
    fn test_secret_is_redacted() {
        let rendered = format!("{:?}", AuthConfig::default());
        assert!(!rendered.contains(DEV_JWT_SECRET));
    }
}
