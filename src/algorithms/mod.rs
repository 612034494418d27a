//! Admission strategies
//!
//! An admission strategy turns the current operating mode and the load of a
//! single request into an accept/reject verdict. Two strategies exist and one
//! is chosen when the controller is built; they are never mixed.

pub mod load_weighted;
pub mod probabilistic;

use crate::mode::OperatingMode;
use crate::token_bucket::SharedTokenBucket;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use load_weighted::LoadWeighted;
pub use probabilistic::Probabilistic;

/// Outcome of one admission check. A rejection is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Accept,
    Reject,
}

impl Verdict {
    pub fn is_accept(self) -> bool {
        self == Verdict::Accept
    }
}

/// Which admission strategy the process runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Reject `intensity`% of requests while throttled
    #[default]
    Probabilistic,
    /// Spend one token per submitted segment; mode is informational only
    TokenBucket,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Probabilistic => write!(f, "probabilistic"),
            StrategyKind::TokenBucket => write!(f, "token-bucket"),
        }
    }
}

/// Trait for admission strategies
pub trait AdmissionStrategy: Send + Sync {
    /// Decide whether a request carrying `load` items is admitted under `mode`
    fn decide(&self, mode: OperatingMode, load: u64) -> Verdict;

    fn kind(&self) -> StrategyKind;

    /// Bucket backing the strategy, if any
    fn bucket(&self) -> Option<&SharedTokenBucket> {
        None
    }
}
