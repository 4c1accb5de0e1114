//! Polled quadrature decoding and LED feedback for a single rotary encoder.
//!
//! This crate provides two cooperating pieces:
//!
//! - [`Sampler`] — reads the encoder's two phase signals (and an optional
//!   push-button) at a fixed cadence, classifies each rising edge of the
//!   primary phase as a clockwise or counter-clockwise step, and pushes the
//!   resulting [`EncoderEvent`] into a bounded queue without ever blocking.
//! - [`FeedbackDispatcher`] — waits on the other end of that queue and
//!   renders a short LED pulse pattern for each event.
//!
//! The queue is an [`embassy_sync::channel::Channel`] owned by the caller;
//! the sampler holds its [`Sender`](embassy_sync::channel::Sender) and the
//! dispatcher drains its [`Receiver`](embassy_sync::channel::Receiver).
//!
//! # Quick Start
//!
//! ```ignore
//! use encoder_feedback::{
//!     feedback_task, sampler_task, EncoderEvent, FeedbackConfig,
//!     FeedbackDispatcher, Sampler, SamplerConfig, QUEUE_CAPACITY,
//! };
//!
//! static QUEUE: StaticCell<Channel<CriticalSectionRawMutex, EncoderEvent, QUEUE_CAPACITY>> =
//!     StaticCell::new();
//!
//! let queue = QUEUE.init(Channel::new());
//! let config = SamplerConfig::default();
//! let sampler = Sampler::new(enc_a, enc_b, Some(enc_sw), queue.sender(), &config)?;
//! let dispatcher = FeedbackDispatcher::new(led_cw, led_ccw, Delay, FeedbackConfig::default());
//!
//! // Thin task wrappers (Embassy tasks cannot be generic):
//! spawner.spawn(led_task(dispatcher, queue.receiver())).unwrap();
//! spawner.spawn(encoder_task(sampler, config)).unwrap();
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging via [`defmt`] and `defmt::Format`
//!   implementations on the public types.
//! - **`task`** — adds the [`sampler_task`] and [`feedback_task`] loops and
//!   nothing else. `embassy-time` is always a dependency, since
//!   [`Sampler::poll`] takes an `Instant`; the loops additionally call
//!   `Instant::now()` and `Timer`, which need a time driver at link time.

#![no_std]

pub mod config;
pub mod decoder;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod sampler;
#[cfg(feature = "task")]
pub mod task;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use config::{FeedbackConfig, SamplerConfig, QUEUE_CAPACITY};
pub use decoder::{ButtonGate, DecoderContext, PhaseState};
pub use dispatcher::FeedbackDispatcher;
pub use error::{DispatchError, QueueFull, SamplerError};
pub use event::EncoderEvent;
pub use sampler::{PollReport, Sampler, SamplerStats};
#[cfg(feature = "task")]
pub use task::{feedback_task, sampler_task};
