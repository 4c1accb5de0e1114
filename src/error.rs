//! Error types for the sampler and dispatcher.

use core::fmt;

/// Errors raised while sampling the encoder inputs.
#[derive(Debug)]
pub enum SamplerError<E> {
    /// Reading a phase or button input failed.
    Pin(E),
}

// Allow ergonomic `?` propagation from raw pin errors.
impl<E> From<E> for SamplerError<E> {
    fn from(error: E) -> Self {
        SamplerError::Pin(error)
    }
}

impl<E: fmt::Debug> fmt::Display for SamplerError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SamplerError::Pin(e) => write!(f, "Input pin error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for SamplerError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            SamplerError::Pin(e) => defmt::write!(f, "Input pin error: {}", e),
        }
    }
}

/// Errors raised while driving the feedback indicators.
///
/// An indicator that cannot be driven is a board configuration fault; the
/// dispatcher logs it and abandons the current pattern.
#[derive(Debug)]
pub enum DispatchError<E> {
    /// Setting an indicator output failed.
    Pin(E),
}

impl<E> From<E> for DispatchError<E> {
    fn from(error: E) -> Self {
        DispatchError::Pin(error)
    }
}

impl<E: fmt::Debug> fmt::Display for DispatchError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DispatchError::Pin(e) => write!(f, "Output pin error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for DispatchError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DispatchError::Pin(e) => defmt::write!(f, "Output pin error: {}", e),
        }
    }
}

/// The feedback queue was full and the event was dropped.
///
/// Returned by [`Sampler::emit`](crate::Sampler::emit). Never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull;

impl fmt::Display for QueueFull {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Feedback queue full")
    }
}
