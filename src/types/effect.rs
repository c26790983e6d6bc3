//! Transition effects.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// How a light moves to a new setting.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Effect {
    /// Change immediately; the duration is ignored by the device.
    Sudden,
    /// Fade over the transition duration.
    #[default]
    Smooth,
}

/// An effect paired with its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    effect: Effect,
    duration: Duration,
}

impl Default for Transition {
    fn default() -> Self {
        Transition {
            effect: Effect::Smooth,
            duration: Duration::from_millis(Self::DEFAULT_DURATION_MS),
        }
    }
}

impl Transition {
    pub(crate) const DEFAULT_DURATION_MS: u64 = 500;
    const MIN_SMOOTH_MS: u64 = 30;

    /// Create a transition.
    ///
    /// Returns `None` for a smooth transition shorter than 30 ms.
    ///
    /// # Examples
    ///
    /// ```
    /// use yeelight_rs::{Effect, Transition};
    ///
    /// assert!(Transition::create(Effect::Smooth, 30).is_some());
    /// assert!(Transition::create(Effect::Smooth, 29).is_none());
    /// assert!(Transition::create(Effect::Sudden, 0).is_some());
    /// ```
    pub fn create(effect: Effect, duration_ms: u64) -> Option<Self> {
        if effect == Effect::Smooth && duration_ms < Self::MIN_SMOOTH_MS {
            return None;
        }
        Some(Transition {
            effect,
            duration: Duration::from_millis(duration_ms),
        })
    }

    /// A sudden change.
    pub fn sudden() -> Self {
        Transition {
            effect: Effect::Sudden,
            duration: Duration::ZERO,
        }
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Duration in whole milliseconds, as sent on the wire.
    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
    }
}
