use super::{AdmissionStrategy, StrategyKind, Verdict};
use crate::mode::OperatingMode;
use rand::Rng;

/// Rejects a request with probability `intensity / 100` while throttled.
///
/// Each draw uses the calling thread's RNG, so no state is shared between
/// requests beyond the mode snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Probabilistic;

impl Probabilistic {
    pub fn new() -> Self {
        Self
    }

    /// Decision for a given draw `p` in `[0, 100)`.
    pub fn decide_with_draw(mode: OperatingMode, p: u8) -> Verdict {
        match mode {
            OperatingMode::Accepting => Verdict::Accept,
            OperatingMode::Throttled(intensity) if p < intensity.value() => Verdict::Reject,
            OperatingMode::Throttled(_) => Verdict::Accept,
        }
    }
}

impl AdmissionStrategy for Probabilistic {
    fn decide(&self, mode: OperatingMode, _load: u64) -> Verdict {
        if !mode.is_throttled() {
            return Verdict::Accept;
        }
        let p = rand::thread_rng().gen_range(0..100u8);
        Self::decide_with_draw(mode, p)
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Probabilistic
    }
}
