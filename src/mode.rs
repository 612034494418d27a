//! Operating mode of the mock endpoint.
//!
//! A mode is either `Accepting` or `Throttled` with an intensity percentage.
//! The intensity can only be built through range validation, so every
//! `OperatingMode` value in the process is well formed.

use crate::error::ThrottlerError;
use std::fmt;

pub const MIN_INTENSITY: i64 = 0;
pub const MAX_INTENSITY: i64 = 100;

/// Throttle intensity, a percentage in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Intensity(u8);

impl Intensity {
    pub const ZERO: Intensity = Intensity(0);
    pub const FULL: Intensity = Intensity(100);

    pub fn new(value: i64) -> Result<Self, ThrottlerError> {
        if !(MIN_INTENSITY..=MAX_INTENSITY).contains(&value) {
            return Err(ThrottlerError::InvalidArgument(format!(
                "rate out of range: {} (expected {}..={})",
                value, MIN_INTENSITY, MAX_INTENSITY
            )));
        }
        Ok(Intensity(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Intensity {
    type Error = ThrottlerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Intensity::new(value)
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatingMode {
    #[default]
    Accepting,
    Throttled(Intensity),
}

impl OperatingMode {
    pub fn is_throttled(&self) -> bool {
        matches!(self, OperatingMode::Throttled(_))
    }

    /// Intensity paired with this mode; `Accepting` always reports zero.
    pub fn intensity(&self) -> Intensity {
        match self {
            OperatingMode::Accepting => Intensity::ZERO,
            OperatingMode::Throttled(intensity) => *intensity,
        }
    }

    /// Status label as reported over the wire.
    pub fn label(&self) -> &'static str {
        match self {
            OperatingMode::Accepting => "OK",
            OperatingMode::Throttled(_) => "Throttled",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatingMode::Accepting => write!(f, "Accepting"),
            OperatingMode::Throttled(intensity) => write!(f, "Throttled({})", intensity),
        }
    }
}
