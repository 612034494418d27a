use crate::error::ThrottlerResult;
use crate::mode::{Intensity, OperatingMode};
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// A mode change applied to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: OperatingMode,
    pub to: OperatingMode,
}

/// Holds the current operating mode behind a readers-writer lock.
///
/// Mode and intensity live in one `Copy` value and every write is a single
/// assignment, so a reader always sees a whole snapshot from one update.
#[derive(Debug, Default)]
pub struct ModeStore {
    mode: RwLock<OperatingMode>,
}

impl ModeStore {
    /// Create a store in `Accepting` state
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomic snapshot of the current mode
    pub fn read(&self) -> OperatingMode {
        // Writers never leave a half-applied value behind, so a poisoned lock
        // still guards a consistent mode.
        *self.mode.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_accepting(&self) -> ModeTransition {
        self.replace(OperatingMode::Accepting)
    }

    /// Switch to `Throttled(intensity)`. Out-of-range values leave the mode untouched.
    pub fn set_throttled(&self, intensity: i64) -> ThrottlerResult<ModeTransition> {
        let intensity = Intensity::new(intensity)?;
        Ok(self.replace(OperatingMode::Throttled(intensity)))
    }

    fn replace(&self, to: OperatingMode) -> ModeTransition {
        let from = {
            let mut mode = self.mode.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *mode, to)
        };

        info!(
            target: "throttle_mock::mode",
            old_status = from.label(),
            old_rate = from.intensity().value(),
            new_status = to.label(),
            new_rate = to.intensity().value(),
            "status changed"
        );

        ModeTransition { from, to }
    }
}
