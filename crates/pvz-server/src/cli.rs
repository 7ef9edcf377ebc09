//! Command-line overrides on top of the environment configuration

use std::time::Duration;

use clap::Parser;
use pvz_core::{ServiceConfig, config::parse_duration};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pvz-server", version, about = "Pickup point reception service")]
pub struct Args {
    /// Interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Per-request timeout, e.g. `500ms`, `30s`
    #[arg(long, value_parser = parse_timeout)]
    pub request_timeout: Option<Duration>,

    /// Log filter directive, e.g. `info` or `pvz_core=debug`
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Prometheus scrape port
    #[arg(long)]
    pub metrics_port: Option<u16>,
}

impl Args {
    /// Overlay explicitly passed flags onto `config`
    pub fn apply(self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(host) = self.host {
            config.http.host = host;
        }
        if let Some(port) = self.port {
            config.http.port = port;
        }
        if let Some(timeout) = self.request_timeout {
            config.http.request_timeout = timeout;
        }
        if let Some(level) = self.log_level {
            config.log.level = level;
        }
        if self.json_logs {
            config.log.json = true;
        }
        if let Some(port) = self.metrics_port {
            config.metrics.port = port;
        }
        config
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    parse_duration(raw).ok_or_else(|| format!("invalid duration: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "pvz-server",
            "--host",
            "127.0.0.1",
            "-p",
            "3000",
            "--request-timeout",
            "5s",
            "--json-logs",
        ])
        .unwrap();

        let config = args.apply(ServiceConfig::default());
        assert_eq!(config.http.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.http.request_timeout, Duration::from_secs(5));
        assert!(config.log.json);
        assert_eq!(config.log.level, ServiceConfig::default().log.level);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::try_parse_from(["pvz-server"]).unwrap();
        let base = ServiceConfig::default();

        let config = args.apply(base.clone());
        assert_eq!(config.http.port, base.http.port);
        assert_eq!(config.metrics.port, base.metrics.port);
        assert!(!config.log.json);
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        assert!(Args::try_parse_from(["pvz-server", "--request-timeout", "soon"]).is_err());
    }
}
