//! Admission counters.
//!
//! Plain monotonic counters with `Relaxed` ordering; they are read only for
//! display and never used to make a decision.

use crate::algorithms::Verdict;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Upper bounds (inclusive) of the load histogram buckets; the last bucket is open.
pub const LOAD_BUCKET_BOUNDS: [u64; 6] = [0, 1, 5, 10, 50, 100];
const LOAD_BUCKET_LABELS: [&str; 7] = ["0", "1", "2-5", "6-10", "11-50", "51-100", ">100"];

#[derive(Debug, Default)]
pub struct AdmissionMetrics {
    total_requests: AtomicU64,
    accepted_requests: AtomicU64,
    rejected_requests: AtomicU64,
    total_load: AtomicU64,
    mode_transitions: AtomicU64,
    load_histogram: [AtomicU64; 7],
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoadBucket {
    pub range: &'static str,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub accepted_requests: u64,
    pub rejected_requests: u64,
    pub total_load: u64,
    pub mode_transitions: u64,
    pub load_distribution: Vec<LoadBucket>,
}

impl AdmissionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_decision(&self, load: u64, verdict: Verdict) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_load.fetch_add(load, Ordering::Relaxed);
        match verdict {
            Verdict::Accept => self.accepted_requests.fetch_add(1, Ordering::Relaxed),
            Verdict::Reject => self.rejected_requests.fetch_add(1, Ordering::Relaxed),
        };
        self.load_histogram[load_bucket_index(load)].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transition(&self) {
        self.mode_transitions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            accepted_requests: self.accepted_requests.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            total_load: self.total_load.load(Ordering::Relaxed),
            mode_transitions: self.mode_transitions.load(Ordering::Relaxed),
            load_distribution: LOAD_BUCKET_LABELS
                .into_iter()
                .zip(self.load_histogram.iter())
                .map(|(range, count)| LoadBucket {
                    range,
                    count: count.load(Ordering::Relaxed),
                })
                .collect(),
        }
    }
}

fn load_bucket_index(load: u64) -> usize {
    LOAD_BUCKET_BOUNDS
        .iter()
        .position(|bound| load <= *bound)
        .unwrap_or(LOAD_BUCKET_BOUNDS.len())
}
