//! Edge classification for the phase signals and the push-button.
//!
//! Both types here are pure state machines: they never touch hardware and
//! take the current levels (and, for the button, the current instant) as
//! arguments. [`Sampler`](crate::Sampler) feeds them from real pins.

use embassy_time::{Duration, Instant};

use crate::event::EncoderEvent;

/// Levels of the two phase signals sampled at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseState {
    /// Primary phase (`A` / `CLK`). `true` is high.
    pub a: bool,
    /// Secondary phase (`B` / `DT`). `true` is high.
    pub b: bool,
}

impl PhaseState {
    pub const fn new(a: bool, b: bool) -> Self {
        Self { a, b }
    }
}

// ── DecoderContext ───────────────────────────────────────────────────────

/// Rising-edge quadrature decoder.
///
/// Only rising edges of the primary phase are classified, so each detent
/// yields exactly one step. The direction is read from the secondary phase
/// at the same instant: low is clockwise, high is counter-clockwise.
/// Falling edges only update the remembered level. A reversal in the
/// middle of a detent is therefore not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderContext {
    previous_a: bool,
}

impl DecoderContext {
    /// Create a decoder seeded with the primary phase level read at startup.
    ///
    /// Seeding from a real read prevents a spurious step on the first poll
    /// when the encoder rests with A high.
    pub const fn new(initial_a: bool) -> Self {
        Self {
            previous_a: initial_a,
        }
    }

    /// Level of the primary phase seen by the previous call to
    /// [`decode`](Self::decode).
    pub fn previous_a(&self) -> bool {
        self.previous_a
    }

    /// Classify one sample.
    ///
    /// Returns `Some` only when A went from low to high since the previous
    /// sample.
    pub fn decode(&mut self, phase: PhaseState) -> Option<EncoderEvent> {
        if phase.a == self.previous_a {
            return None;
        }

        self.previous_a = phase.a;

        if !phase.a {
            return None;
        }

        if phase.b {
            Some(EncoderEvent::StepCounterClockwise)
        } else {
            Some(EncoderEvent::StepClockwise)
        }
    }
}

// ── ButtonGate ───────────────────────────────────────────────────────────

/// Settle lockout for an active-low push-button.
///
/// A pressed reading is accepted at most once per settle window. If the
/// button is still held when the window expires, the next poll accepts it
/// again. Released readings never fire and do not reset the window.
#[derive(Debug, Clone, Copy)]
pub struct ButtonGate {
    settle: Duration,
    last_press: Option<Instant>,
}

impl ButtonGate {
    pub const fn new(settle: Duration) -> Self {
        Self {
            settle,
            last_press: None,
        }
    }

    /// Returns `true` if `pressed` should produce a
    /// [`ButtonPressed`](EncoderEvent::ButtonPressed) event at `now`.
    pub fn check(&mut self, pressed: bool, now: Instant) -> bool {
        if !pressed || self.is_settling(now) {
            return false;
        }
        self.last_press = Some(now);
        true
    }

    /// Returns `true` while a previous press is still inside its settle
    /// window.
    pub fn is_settling(&self, now: Instant) -> bool {
        match self.last_press {
            // A clock reading earlier than the last press counts as settling.
            Some(last) => match now.checked_duration_since(last) {
                Some(elapsed) => elapsed < self.settle,
                None => true,
            },
            None => false,
        }
    }
}
