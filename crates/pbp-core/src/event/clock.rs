//! Period game clock.
//!
//! Feeds report the time left in a period as fractional seconds. Comparing
//! floats for equality is fragile, so the clock is held as whole milliseconds
//! and only converted back to seconds at the serde boundary. Two readings
//! are simultaneous only when the feed reported the same value.

use serde::{Deserialize, Serialize};
use std::fmt;

const MILLIS_PER_SEC: u32 = 1_000;

/// Time remaining in the current period, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameClock(u32);

impl GameClock {
    #[must_use]
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs * MILLIS_PER_SEC)
    }

    #[must_use]
    pub const fn from_tenths(tenths: u32) -> Self {
        Self(tenths * 100)
    }

    #[must_use]
    pub const fn from_millis(millis: u32) -> Self {
        Self(millis)
    }

    #[must_use]
    pub const fn millis(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        f64::from(self.0) / f64::from(MILLIS_PER_SEC)
    }

    /// Game time elapsed between `self` and a later clock reading, in millis.
    ///
    /// Negative when `later` shows more time remaining (out-of-order input).
    #[must_use]
    pub fn elapsed_until(self, later: Self) -> i64 {
        i64::from(self.0) - i64::from(later.0)
    }

    /// Convert fractional seconds to whole milliseconds.
    ///
    /// Returns `None` for negative or non-finite input.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn try_from_secs_f64(secs: f64) -> Option<Self> {
        let scale = f64::from(MILLIS_PER_SEC);
        if !secs.is_finite() || secs < 0.0 || secs > f64::from(u32::MAX) / scale {
            return None;
        }
        Some(Self((secs * scale).round() as u32))
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0 / MILLIS_PER_SEC;
        let millis = self.0 % MILLIS_PER_SEC;
        write!(f, "{}:{:02}", secs / 60, secs % 60)?;
        if millis == 0 {
            return Ok(());
        }
        let fraction = format!("{millis:03}");
        write!(f, ".{}", fraction.trim_end_matches('0'))
    }
}

impl Serialize for GameClock {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_secs_f64())
    }
}

impl<'de> Deserialize<'de> for GameClock {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Self::try_from_secs_f64(secs).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "seconds_remaining must be a non-negative finite number, got {secs}"
            ))
        })
    }
}
