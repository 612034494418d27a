use super::{AdmissionStrategy, StrategyKind, Verdict};
use crate::mode::OperatingMode;
use crate::token_bucket::SharedTokenBucket;
use std::sync::Arc;

/// Admits a request when the shared bucket can pay one token per submitted item.
///
/// The operating mode does not take part in the decision; only the bucket's
/// rate and burst do.
#[derive(Debug, Clone)]
pub struct LoadWeighted {
    bucket: Arc<SharedTokenBucket>,
}

impl LoadWeighted {
    pub fn new(bucket: Arc<SharedTokenBucket>) -> Self {
        Self { bucket }
    }
}

impl AdmissionStrategy for LoadWeighted {
    fn decide(&self, _mode: OperatingMode, load: u64) -> Verdict {
        if self.bucket.try_admit(load) {
            Verdict::Accept
        } else {
            Verdict::Reject
        }
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::TokenBucket
    }

    fn bucket(&self) -> Option<&SharedTokenBucket> {
        Some(&self.bucket)
    }
}
