use crate::error::ThrottlerError;
use tracing_subscriber::filter::LevelFilter;

/// Validates configuration values for consistency and correctness
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates token bucket parameters
    pub fn validate_bucket(refill_rate: f64, burst: u32) -> Result<(), ThrottlerError> {
        if !refill_rate.is_finite() || refill_rate < 0.0 {
            return Err(ThrottlerError::Configuration(format!(
                "Bucket refill rate must be a finite, non-negative number (got {})",
                refill_rate
            )));
        }

        if burst == 0 {
            return Err(ThrottlerError::Configuration(
                "Bucket burst must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates a log level name
    pub fn validate_log_level(level: &str) -> Result<(), ThrottlerError> {
        level.parse::<LevelFilter>().map(|_| ()).map_err(|_| {
            ThrottlerError::Configuration(format!(
                "Invalid log level '{}'. Must be one of: off, error, warn, info, debug, trace",
                level
            ))
        })
    }
}
