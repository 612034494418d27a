use crate::error::ThrottlerError;
use serde::Deserialize;
use tracing::warn;
use validator::Validate;

/// Rate applied by `SetThrottled` when the caller gives none
pub const DEFAULT_THROTTLE_RATE: i64 = 100;

/// Body of a `PutTraceSegments` style submission
#[derive(Debug, Default, Deserialize)]
pub struct TraceSegmentsRequest {
    #[serde(rename = "TraceSegmentDocuments", default)]
    pub trace_segment_documents: Vec<serde_json::Value>,
}

#[derive(Debug, Validate)]
struct ThrottleRate {
    #[validate(range(min = 0, max = 100))]
    rate: i64,
}

/// Request validation utilities
pub struct RequestValidator;

impl RequestValidator {
    /// Parses the `rate` query parameter of `SetThrottled`.
    ///
    /// A missing or empty parameter yields [`DEFAULT_THROTTLE_RATE`].
    pub fn validate_throttle_rate(raw: Option<&str>) -> Result<i64, ThrottlerError> {
        // Only an absent or empty parameter defaults; padding is not a number
        let raw = match raw {
            None | Some("") => return Ok(DEFAULT_THROTTLE_RATE),
            Some(raw) => raw,
        };

        let rate = raw.parse::<i64>().map_err(|_| {
            warn!(rate = raw, "rate is not a number");
            ThrottlerError::InvalidArgument("rate is not a number".to_string())
        })?;

        ThrottleRate { rate }.validate().map_err(|_| {
            warn!(rate, "rate out of range");
            ThrottlerError::InvalidArgument("rate out of range".to_string())
        })?;

        Ok(rate)
    }

    /// Number of segment documents in a submission body. An empty body carries no load.
    pub fn segment_load(body: &[u8]) -> Result<u64, ThrottlerError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(0);
        }

        let request: TraceSegmentsRequest = serde_json::from_slice(body)?;
        Ok(request.trace_segment_documents.len() as u64)
    }
}
