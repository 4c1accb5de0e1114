//! Polling front end: reads the encoder pins and queues classified events.
//!
//! [`Sampler`] owns the input pins, a [`DecoderContext`] and a
//! [`ButtonGate`], and holds the producer end of the feedback queue. One
//! call to [`Sampler::poll`] performs one sampling cycle. The caller
//! decides the cadence; see [`sampler_task`](crate::sampler_task) for the
//! Embassy loop.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;
use embassy_time::Instant;
use embedded_hal::digital::InputPin;
use heapless::Vec;

use crate::config::SamplerConfig;
use crate::decoder::{ButtonGate, DecoderContext, PhaseState};
use crate::error::{QueueFull, SamplerError};
use crate::event::EncoderEvent;

/// Most events a single poll can produce: one step and one button press.
pub const MAX_EVENTS_PER_POLL: usize = 2;

/// Outcome of one [`Sampler::poll`] cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollReport {
    /// Events produced this cycle, in production order, whether or not
    /// the queue accepted them.
    pub events: Vec<EncoderEvent, MAX_EVENTS_PER_POLL>,
    /// How many of `events` were dropped because the queue was full.
    pub dropped: u8,
}

impl PollReport {
    /// Returns `true` if nothing happened this cycle.
    pub fn is_idle(&self) -> bool {
        self.events.is_empty()
    }
}

/// Running totals kept by the sampler.
///
/// Maintained independently of the feedback queue, so the step counts and
/// `position` stay exact even while feedback is being dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplerStats {
    pub clockwise: u32,
    pub counter_clockwise: u32,
    pub presses: u32,
    /// Events that could not be queued.
    pub dropped: u32,
    /// Net detent count, clockwise positive.
    pub position: i32,
}

impl SamplerStats {
    fn record(&mut self, event: EncoderEvent) {
        match event {
            EncoderEvent::StepClockwise => self.clockwise = self.clockwise.wrapping_add(1),
            EncoderEvent::StepCounterClockwise => {
                self.counter_clockwise = self.counter_clockwise.wrapping_add(1)
            }
            EncoderEvent::ButtonPressed => self.presses = self.presses.wrapping_add(1),
        }
        self.position = self.position.wrapping_add(event.delta());
    }
}

/// Quadrature sampler for one encoder.
///
/// Generic over the input pin type so the same code runs against
/// `embassy-rp` GPIO on target and plain mocks in host tests. All three
/// inputs share one pin type; the button is optional.
///
/// Phase inputs are read as-is (high = `true`). The button is active-low.
pub struct Sampler<'ch, M, I, const N: usize>
where
    M: RawMutex,
{
    primary: I,
    secondary: I,
    button: Option<I>,
    context: DecoderContext,
    gate: ButtonGate,
    sender: Sender<'ch, M, EncoderEvent, N>,
    stats: SamplerStats,
}

impl<'ch, M, I, const N: usize> Sampler<'ch, M, I, N>
where
    M: RawMutex,
    I: InputPin,
{
    /// Create a sampler and take the baseline reading of the primary phase.
    ///
    /// # Arguments
    /// * `primary` — phase A / CLK input
    /// * `secondary` — phase B / DT input
    /// * `button` — optional active-low push-button input
    /// * `sender` — producer end of the feedback queue
    /// * `config` — only `button_settle_ms` is used here; the poll cadence
    ///   belongs to the caller
    ///
    /// # Errors
    /// [`SamplerError::Pin`] if the baseline read fails.
    pub fn new(
        mut primary: I,
        secondary: I,
        button: Option<I>,
        sender: Sender<'ch, M, EncoderEvent, N>,
        config: &SamplerConfig,
    ) -> Result<Self, SamplerError<I::Error>> {
        let initial_a = primary.is_high()?;

        Ok(Self {
            primary,
            secondary,
            button,
            context: DecoderContext::new(initial_a),
            gate: ButtonGate::new(config.button_settle()),
            sender,
            stats: SamplerStats::default(),
        })
    }

    /// Run one sampling cycle at time `now`.
    ///
    /// 1. Read A, B and the button back to back.
    /// 2. Classify the phase pair; a rising edge on A yields a step.
    /// 3. Check the button against its settle window.
    /// 4. Queue each event with a non-blocking send. A full queue drops
    ///    the event and is reported in [`PollReport::dropped`]; the poll
    ///    never waits for space.
    ///
    /// Polling again with unchanged levels produces nothing.
    ///
    /// # Errors
    /// [`SamplerError::Pin`] if any input read fails. No state is updated
    /// in that case.
    pub fn poll(&mut self, now: Instant) -> Result<PollReport, SamplerError<I::Error>> {
        let phase = PhaseState::new(self.primary.is_high()?, self.secondary.is_high()?);
        let pressed = match self.button.as_mut() {
            Some(pin) => pin.is_low()?,
            None => false,
        };

        let mut report = PollReport::default();

        if let Some(event) = self.context.decode(phase) {
            self.dispatch(event, &mut report);
        }

        if self.gate.check(pressed, now) {
            self.dispatch(EncoderEvent::ButtonPressed, &mut report);
        }

        Ok(report)
    }

    /// Queue `event` without waiting.
    ///
    /// # Errors
    /// [`QueueFull`] if the queue has no free slot. The event is dropped.
    pub fn emit(&mut self, event: EncoderEvent) -> Result<(), QueueFull> {
        self.sender.try_send(event).map_err(|_| QueueFull)
    }

    /// Running totals since construction.
    pub fn stats(&self) -> SamplerStats {
        self.stats
    }

    /// Net detent count, clockwise positive.
    pub fn position(&self) -> i32 {
        self.stats.position
    }

    /// Decoder state, mainly for diagnostics.
    pub fn context(&self) -> &DecoderContext {
        &self.context
    }

    fn dispatch(&mut self, event: EncoderEvent, report: &mut PollReport) {
        self.stats.record(event);

        if self.emit(event).is_err() {
            self.stats.dropped = self.stats.dropped.wrapping_add(1);
            report.dropped += 1;
        }

        // At most one step and one press per poll, so this never overflows.
        let _ = report.events.push(event);
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────────
