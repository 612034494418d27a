use crate::algorithms::StrategyKind;
use crate::mode::OperatingMode;
use crate::token_bucket::BucketSnapshot;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Wire tag clients match on to detect throttling
pub const THROTTLING_EXCEPTION: &str = "ThrottlingException";

#[derive(Debug, Serialize)]
pub struct TraceSegmentsResponse {
    #[serde(rename = "UnprocessedTraceSegments")]
    pub unprocessed_trace_segments: Vec<UnprocessedTraceSegment>,
}

#[derive(Debug, Default, Serialize)]
pub struct UnprocessedTraceSegment {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "ErrorCode")]
    pub error_code: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl TraceSegmentsResponse {
    /// Success body: a single blank unprocessed entry
    pub fn accepted() -> Self {
        Self {
            unprocessed_trace_segments: vec![UnprocessedTraceSegment::default()],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ThrottlingException {
    pub message: String,
    #[serde(rename = "__type")]
    pub error_type: String,
}

impl ThrottlingException {
    pub fn rate_exceeded() -> Self {
        Self {
            message: "Rate exceeded".to_string(),
            error_type: THROTTLING_EXCEPTION.to_string(),
        }
    }
}

impl IntoResponse for ThrottlingException {
    fn into_response(self) -> Response {
        (StatusCode::TOO_MANY_REQUESTS, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ThrottleResponse {
    pub rate: i64,
    pub message: String,
}

impl ThrottleResponse {
    pub fn updated(rate: i64) -> Self {
        Self {
            rate,
            message: format!("throttle rate set to: {}%", rate),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub rate: u8,
    pub strategy: StrategyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<BucketSnapshot>,
}

impl StatusResponse {
    pub fn new(mode: OperatingMode, strategy: StrategyKind, bucket: Option<BucketSnapshot>) -> Self {
        Self {
            status: mode.label().to_string(),
            rate: mode.intensity().value(),
            strategy,
            bucket,
        }
    }
}
