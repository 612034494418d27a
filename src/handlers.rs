use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::admission::AdmissionController;
use crate::algorithms::Verdict;
use crate::error::ThrottlerError;
use crate::metrics::MetricsSnapshot;
use crate::response::{StatusResponse, ThrottleResponse, ThrottlingException, TraceSegmentsResponse};
use crate::validation::RequestValidator;

/// Shared application state
pub type SharedState = Arc<AppState>;

/// Application state; built once at startup and handed to every handler
pub struct AppState {
    pub controller: AdmissionController,
}

impl AppState {
    pub fn new(controller: AdmissionController) -> Self {
        Self { controller }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SetThrottledParams {
    #[serde(default)]
    pub rate: Option<String>,
}

/// Accept or throttle a batch of trace segments
pub async fn put_trace_segments(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Response, ThrottlerError> {
    let load = RequestValidator::segment_load(&body)?;

    let response = match state.controller.admit(load) {
        Verdict::Accept => (StatusCode::OK, Json(TraceSegmentsResponse::accepted())).into_response(),
        Verdict::Reject => ThrottlingException::rate_exceeded().into_response(),
    };

    Ok(response)
}

/// Stop throttling
pub async fn set_ok(State(state): State<SharedState>) -> Json<StatusResponse> {
    let transition = state.controller.set_accepting();

    // Report the mode this call applied, not whatever a later writer left behind
    Json(StatusResponse::new(
        transition.to,
        state.controller.strategy(),
        state.controller.bucket_snapshot(),
    ))
}

/// Start throttling at `rate` percent (defaults to 100)
pub async fn set_throttled(
    State(state): State<SharedState>,
    Query(params): Query<SetThrottledParams>,
) -> Result<Json<ThrottleResponse>, ThrottlerError> {
    let rate = RequestValidator::validate_throttle_rate(params.rate.as_deref())?;
    state.controller.set_throttled(rate)?;

    info!(rate, strategy = %state.controller.strategy(), "throttle rate set");

    Ok(Json(ThrottleResponse::updated(rate)))
}

/// Current operating mode
pub async fn get_status(State(state): State<SharedState>) -> Json<StatusResponse> {
    Json(StatusResponse::new(
        state.controller.mode(),
        state.controller.strategy(),
        state.controller.bucket_snapshot(),
    ))
}

/// Admission counters
pub async fn get_metrics(State(state): State<SharedState>) -> Json<MetricsSnapshot> {
    Json(state.controller.metrics())
}

/// Liveness check
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::Probabilistic;
    use crate::mode::{Intensity, OperatingMode};
    use crate::mode_store::ModeStore;

    fn state() -> SharedState {
        let controller =
            AdmissionController::new(Arc::new(ModeStore::new()), Box::new(Probabilistic::new()));
        Arc::new(AppState::new(controller))
    }

    fn params(rate: Option<&str>) -> Query<SetThrottledParams> {
        Query(SetThrottledParams {
            rate: rate.map(str::to_string),
        })
    }

    #[test]
    fn test_set_throttled_cases() {
        let cases = [
            (Some("50"), Some(50)),
            (Some("DOGS"), None),
            (Some(" 50 "), None),
            (Some("   "), None),
            (None, Some(100)),
            (Some("101"), None),
        ];

        for (rate, expected) in cases {
            let state = state();
            let result = tokio_test::block_on(set_throttled(State(state.clone()), params(rate)));

            match expected {
                Some(value) => {
                    assert_eq!(result.unwrap().rate, value);
                    assert_eq!(
                        state.controller.mode(),
                        OperatingMode::Throttled(Intensity::new(value).unwrap())
                    );
                }
                None => {
                    let err = result.unwrap_err();
                    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
                    assert_eq!(state.controller.mode(), OperatingMode::Accepting);
                }
            }
        }
    }

    #[test]
    fn test_set_ok_resets_mode() {
        let state = state();
        state.controller.set_throttled(80).unwrap();

        let Json(status) = tokio_test::block_on(set_ok(State(state.clone())));
        assert_eq!(status.status, "OK");
        assert_eq!(status.rate, 0);
        assert!(status.bucket.is_none());
    }

    #[test]
    fn test_set_ok_reports_its_own_write_under_contention() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::thread;

        let state = state();
        let done = Arc::new(AtomicBool::new(false));

        let writer = {
            let state = state.clone();
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    state.controller.set_throttled(60).unwrap();
                }
            })
        };

        for _ in 0..2_000 {
            let Json(status) = tokio_test::block_on(set_ok(State(state.clone())));
            assert_eq!(status.status, "OK");
            assert_eq!(status.rate, 0);
        }

        done.store(true, Ordering::Relaxed);
        writer.join().unwrap();
    }

    #[test]
    fn test_trace_segments_rejected_at_full_throttle() {
        let state = state();
        state.controller.set_throttled(100).unwrap();

        let body = Bytes::from_static(br#"{"TraceSegmentDocuments": ["{}"]}"#);
        let response =
            tokio_test::block_on(put_trace_segments(State(state), body)).unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
