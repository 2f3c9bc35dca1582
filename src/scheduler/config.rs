//! Pacing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::DelayHint;

/// Maps pacing hints to pause durations.
///
/// A pause lasts `base(hint) * speed_up ^ wait_count`, where `wait_count`
/// counts the pauses already taken by the current move. While further moves
/// are queued, `wait_count` is raised to at least `backlog_floor`, so a
/// backlog drains much faster than an isolated move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub quick_ms: u64,
    pub one_by_one_ms: u64,
    pub settle_ms: u64,
    pub speed_up: f64,
    pub backlog_floor: u32,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            quick_ms: 20,
            one_by_one_ms: 200,
            settle_ms: 400,
            speed_up: 0.99,
            backlog_floor: 200,
        }
    }
}

impl PacingConfig {
    /// Every pause is zero.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            quick_ms: 0,
            one_by_one_ms: 0,
            settle_ms: 0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_quick_ms(mut self, ms: u64) -> Self {
        self.quick_ms = ms;
        self
    }

    #[must_use]
    pub fn with_one_by_one_ms(mut self, ms: u64) -> Self {
        self.one_by_one_ms = ms;
        self
    }

    #[must_use]
    pub fn with_settle_ms(mut self, ms: u64) -> Self {
        self.settle_ms = ms;
        self
    }

    #[must_use]
    pub fn with_speed_up(mut self, speed_up: f64) -> Self {
        self.speed_up = speed_up;
        self
    }

    #[must_use]
    pub fn with_backlog_floor(mut self, floor: u32) -> Self {
        self.backlog_floor = floor;
        self
    }

    /// Undiminished pause for `hint`.
    #[must_use]
    pub fn base(&self, hint: DelayHint) -> Duration {
        let ms = match hint {
            DelayHint::None => 0,
            DelayHint::Quick => self.quick_ms,
            DelayHint::OneByOne => self.one_by_one_ms,
            DelayHint::Settle => self.settle_ms,
        };
        Duration::from_millis(ms)
    }

    /// Pause for `hint` after `wait_count` earlier pauses.
    #[must_use]
    pub fn delay(&self, hint: DelayHint, wait_count: u32) -> Duration {
        let exponent = i32::try_from(wait_count).unwrap_or(i32::MAX);
        let factor = self.speed_up.clamp(0.0, 1.0).powi(exponent);
        self.base(hint).mul_f64(factor)
    }
}
