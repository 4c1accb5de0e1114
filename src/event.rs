//! Events passed from the sampler to the feedback dispatcher.

/// A classified encoder action.
///
/// Produced by the [`Sampler`](crate::Sampler), moved through the feedback
/// queue and consumed exactly once by the
/// [`FeedbackDispatcher`](crate::FeedbackDispatcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderEvent {
    /// One detent clockwise: rising edge on A while B is low.
    StepClockwise,
    /// One detent counter-clockwise: rising edge on A while B is high.
    StepCounterClockwise,
    /// The push-button was read pressed outside its settle window.
    ButtonPressed,
}

impl EncoderEvent {
    /// Human-readable description, used for log output.
    pub fn label(&self) -> &'static str {
        match self {
            EncoderEvent::StepClockwise => "Clockwise turn",
            EncoderEvent::StepCounterClockwise => "Counter-clockwise turn",
            EncoderEvent::ButtonPressed => "Encoder button pressed",
        }
    }

    /// Signed detent contribution: `+1` clockwise, `-1` counter-clockwise,
    /// `0` for the button.
    pub fn delta(&self) -> i32 {
        match self {
            EncoderEvent::StepClockwise => 1,
            EncoderEvent::StepCounterClockwise => -1,
            EncoderEvent::ButtonPressed => 0,
        }
    }
}
