use crate::algorithms::{AdmissionStrategy, LoadWeighted, Probabilistic, StrategyKind, Verdict};
use crate::config::Config;
use crate::error::ThrottlerResult;
use crate::metrics::{AdmissionMetrics, MetricsSnapshot};
use crate::mode::OperatingMode;
use crate::mode_store::{ModeStore, ModeTransition};
use crate::token_bucket::{BucketSnapshot, SharedTokenBucket};
use std::sync::Arc;
use tracing::debug;

/// Decides admission for incoming submissions and owns the administrative
/// switches that change the operating mode.
pub struct AdmissionController {
    modes: Arc<ModeStore>,
    strategy: Box<dyn AdmissionStrategy>,
    metrics: AdmissionMetrics,
}

impl AdmissionController {
    /// Create a controller with an explicit strategy
    pub fn new(modes: Arc<ModeStore>, strategy: Box<dyn AdmissionStrategy>) -> Self {
        Self {
            modes,
            strategy,
            metrics: AdmissionMetrics::new(),
        }
    }

    /// Build the controller selected by configuration
    pub fn from_config(config: &Config) -> Self {
        let modes = Arc::new(ModeStore::new());
        let strategy: Box<dyn AdmissionStrategy> = match config.strategy {
            StrategyKind::Probabilistic => Box::new(Probabilistic::new()),
            StrategyKind::TokenBucket => Box::new(LoadWeighted::new(Arc::new(
                SharedTokenBucket::new(config.bucket_burst, config.bucket_rate),
            ))),
        };
        Self::new(modes, strategy)
    }

    /// Admission check for a submission carrying `load` items
    pub fn admit(&self, load: u64) -> Verdict {
        let mode = self.modes.read();
        let verdict = self.strategy.decide(mode, load);
        self.metrics.record_decision(load, verdict);

        if verdict == Verdict::Reject {
            debug!(
                target: "throttle_mock::admission",
                load,
                mode = %mode,
                strategy = %self.strategy.kind(),
                "request rejected"
            );
        }

        verdict
    }

    pub fn set_accepting(&self) -> ModeTransition {
        let transition = self.modes.set_accepting();
        self.metrics.record_transition();
        transition
    }

    pub fn set_throttled(&self, intensity: i64) -> ThrottlerResult<ModeTransition> {
        let transition = self.modes.set_throttled(intensity)?;
        self.metrics.record_transition();
        Ok(transition)
    }

    pub fn mode(&self) -> OperatingMode {
        self.modes.read()
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Bucket parameters and occupancy; `None` for the probabilistic strategy
    pub fn bucket_snapshot(&self) -> Option<BucketSnapshot> {
        self.strategy.bucket().map(SharedTokenBucket::snapshot)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
