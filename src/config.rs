use crate::algorithms::StrategyKind;
use crate::config_validator::ConfigValidator;
use crate::error::ThrottlerResult;
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Service configuration, read from flags with environment fallback
#[derive(Debug, Clone, Parser)]
#[command(name = "throttle-mock", version, about)]
pub struct Config {
    /// Server bind address
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// Admission strategy used for trace segment submissions
    #[arg(long, env = "ADMISSION_STRATEGY", value_enum, default_value_t = StrategyKind::Probabilistic)]
    pub strategy: StrategyKind,

    /// Token bucket refill rate in tokens per second
    #[arg(long, env = "BUCKET_RATE", default_value_t = 10.0)]
    pub bucket_rate: f64,

    /// Token bucket burst ceiling
    #[arg(long, env = "BUCKET_BURST", default_value_t = 20)]
    pub bucket_burst: u32,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// Enable request tracing
    #[arg(long, env = "ENABLE_TRACING", default_value_t = true, action = clap::ArgAction::Set)]
    pub enable_tracing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            strategy: StrategyKind::Probabilistic,
            bucket_rate: 10.0,
            bucket_burst: 20,
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            enable_tracing: true,
        }
    }
}

impl Config {
    /// Load configuration from command-line flags and environment variables
    pub fn load() -> ThrottlerResult<Self> {
        let config = Config::parse();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ThrottlerResult<()> {
        ConfigValidator::validate_bucket(self.bucket_rate, self.bucket_burst)?;
        ConfigValidator::validate_log_level(&self.log_level)?;
        Ok(())
    }

    /// Default filter directive when RUST_LOG is not set
    pub fn log_filter(&self) -> String {
        format!("throttle_mock={},tower_http={}", self.log_level, self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let config = Config::try_parse_from([
            "throttle-mock",
            "--bind-addr",
            "127.0.0.1:9000",
            "--strategy",
            "token-bucket",
            "--bucket-rate",
            "2.5",
            "--bucket-burst",
            "7",
            "--log-format",
            "pretty",
            "--enable-tracing",
            "false",
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.strategy, StrategyKind::TokenBucket);
        assert_eq!(config.bucket_rate, 2.5);
        assert_eq!(config.bucket_burst, 7);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.enable_tracing);
    }

    #[test]
    fn test_rejects_unknown_strategy() {
        assert!(Config::try_parse_from(["throttle-mock", "--strategy", "fifo"]).is_err());
    }

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.log_filter(), "throttle_mock=info,tower_http=info");
    }

    #[test]
    fn test_invalid_bucket_is_rejected() {
        let config = Config {
            bucket_burst: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
