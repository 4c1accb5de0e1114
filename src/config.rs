//! Timing and capacity configuration.
//!
//! All tunable timing lives here. [`SamplerConfig::default()`] and
//! [`FeedbackConfig::default()`] reproduce the bench setup: a
//! 1 ms poll, a 250 ms button settle window, two 50 ms pulses per step and
//! a 100 ms flash of both indicators per button press.

use embassy_time::Duration;

/// Capacity of the sampler → dispatcher event queue.
///
/// When this many events are waiting, further sends are dropped.
pub const QUEUE_CAPACITY: usize = 10;

// ── SamplerConfig ────────────────────────────────────────────────────────

/// Configuration for the [`Sampler`](crate::Sampler) and its polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplerConfig {
    /// Delay between polls in milliseconds. Default: 1.
    ///
    /// Must stay short relative to the encoder's transition time or rising
    /// edges are missed. Zero is treated as 1 so the loop always yields.
    pub poll_interval_ms: u64,
    /// Minimum time between two accepted button presses. Default: 250.
    pub button_settle_ms: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1,
            button_settle_ms: 250,
        }
    }
}

impl SamplerConfig {
    /// Poll period as a timer duration, never shorter than 1 ms.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Button settle window as a timer duration.
    pub fn button_settle(&self) -> Duration {
        Duration::from_millis(self.button_settle_ms)
    }
}

// ── FeedbackConfig ───────────────────────────────────────────────────────

/// Configuration for the [`FeedbackDispatcher`](crate::FeedbackDispatcher)
/// pulse patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeedbackConfig {
    /// Number of on/off pulses per directional step. Default: 2.
    pub pulse_count: u8,
    /// On time and off time of each step pulse in milliseconds. Default: 50.
    pub pulse_ms: u32,
    /// On time and off time of the button flash in milliseconds. Default: 100.
    pub button_pulse_ms: u32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            pulse_count: 2,
            pulse_ms: 50,
            button_pulse_ms: 100,
        }
    }
}
