//! LED feedback for encoder events.
//!
//! [`FeedbackDispatcher`] owns the two indicator outputs and renders one
//! pulse pattern per [`EncoderEvent`]:
//!
//! | Event                  | Pattern                                           |
//! |------------------------|---------------------------------------------------|
//! | `StepClockwise`        | CW LED: `pulse_count` × (`pulse_ms` on, `pulse_ms` off)  |
//! | `StepCounterClockwise` | CCW LED: same pattern                             |
//! | `ButtonPressed`        | both LEDs on for `button_pulse_ms`, then off for the same |
//!
//! A pattern always runs to completion. Events that arrive meanwhile wait
//! in the queue.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::config::FeedbackConfig;
use crate::error::DispatchError;
use crate::event::EncoderEvent;

/// Renders encoder events on a CW and a CCW indicator.
///
/// `delay` provides the pulse timing; on target this is
/// `embassy_time::Delay`.
pub struct FeedbackDispatcher<P, D> {
    cw: P,
    ccw: P,
    delay: D,
    config: FeedbackConfig,
}

impl<P, D> FeedbackDispatcher<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Create a dispatcher. Both indicators should already be driven low.
    pub fn new(cw: P, ccw: P, delay: D, config: FeedbackConfig) -> Self {
        Self {
            cw,
            ccw,
            delay,
            config,
        }
    }

    /// Render the pattern for a single event.
    ///
    /// # Errors
    /// [`DispatchError::Pin`] if an indicator cannot be driven. The
    /// pattern is abandoned at that point. If the button flash fails to
    /// light both indicators, both are driven low before returning.
    pub async fn render(
        &mut self,
        event: EncoderEvent,
    ) -> Result<(), DispatchError<P::Error>> {
        let FeedbackConfig {
            pulse_count,
            pulse_ms,
            button_pulse_ms,
        } = self.config;

        match event {
            EncoderEvent::StepClockwise => {
                pulse(&mut self.cw, &mut self.delay, pulse_count, pulse_ms).await
            }
            EncoderEvent::StepCounterClockwise => {
                pulse(&mut self.ccw, &mut self.delay, pulse_count, pulse_ms).await
            }
            EncoderEvent::ButtonPressed => {
                let lit = self.cw.set_high().and_then(|_| self.ccw.set_high());
                if let Err(e) = lit {
                    // Never leave one indicator stuck on.
                    let _ = self.cw.set_low();
                    let _ = self.ccw.set_low();
                    return Err(e.into());
                }
                self.delay.delay_ms(button_pulse_ms).await;
                self.cw.set_low()?;
                self.ccw.set_low()?;
                self.delay.delay_ms(button_pulse_ms).await;
                Ok(())
            }
        }
    }

    /// Consume events forever, in queue order.
    ///
    /// Waiting on the receiver is the only point where this loop blocks.
    /// Render failures are logged and the loop moves on to the next event.
    pub async fn run<M, const N: usize>(
        &mut self,
        receiver: Receiver<'_, M, EncoderEvent, N>,
    ) -> !
    where
        M: RawMutex,
    {
        #[cfg(feature = "defmt")]
        defmt::info!("Feedback dispatcher started");

        loop {
            let event = receiver.receive().await;

            #[cfg(feature = "defmt")]
            defmt::info!("{}", event.label());

            if let Err(_e) = self.render(event).await {
                #[cfg(feature = "defmt")]
                defmt::error!("Indicator output failed while rendering {}", event);
            }
        }
    }

    /// Give back the indicator outputs and the delay provider.
    pub fn release(self) -> (P, P, D) {
        (self.cw, self.ccw, self.delay)
    }
}

/// Blink one indicator `times` times with `ms` on and `ms` off.
async fn pulse<P, D>(
    pin: &mut P,
    delay: &mut D,
    times: u8,
    ms: u32,
) -> Result<(), DispatchError<P::Error>>
where
    P: OutputPin,
    D: DelayNs,
{
    for _ in 0..times {
        pin.set_high()?;
        delay.delay_ms(ms).await;
        pin.set_low()?;
        delay.delay_ms(ms).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::cell::RefCell;
    use core::convert::Infallible;

    use embassy_futures::block_on;
    use embassy_futures::select::select;
    use embassy_futures::yield_now;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::channel::Channel;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use heapless::Vec;

    /// Output pin that records every level it is driven to.
    #[derive(Default)]
    struct RecordingPin {
        levels: Vec<bool, 32>,
    }

    impl ErrorType for RecordingPin {
        type Error = Infallible;
    }

    impl OutputPin for RecordingPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            let _ = self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            let _ = self.levels.push(true);
            Ok(())
        }
    }

    /// Delay that returns immediately and adds up the requested time.
    #[derive(Default)]
    struct TallyDelay {
        total_ns: u64,
    }

    impl DelayNs for TallyDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    impl TallyDelay {
        fn total_ms(&self) -> u64 {
            self.total_ns / 1_000_000
        }
    }

    fn dispatcher() -> FeedbackDispatcher<RecordingPin, TallyDelay> {
        FeedbackDispatcher::new(
            RecordingPin::default(),
            RecordingPin::default(),
            TallyDelay::default(),
            FeedbackConfig::default(),
        )
    }

    #[test]
    fn clockwise_pulses_cw_indicator_twice() {
        let mut d = dispatcher();
        block_on(d.render(EncoderEvent::StepClockwise)).unwrap();

        let (cw, ccw, delay) = d.release();
        assert_eq!(cw.levels.as_slice(), &[true, false, true, false]);
        assert!(ccw.levels.is_empty());
        assert_eq!(delay.total_ms(), 200);
    }

    #[test]
    fn counter_clockwise_pulses_ccw_indicator_twice() {
        let mut d = dispatcher();
        block_on(d.render(EncoderEvent::StepCounterClockwise)).unwrap();

        let (cw, ccw, delay) = d.release();
        assert!(cw.levels.is_empty());
        assert_eq!(ccw.levels.as_slice(), &[true, false, true, false]);
        assert_eq!(delay.total_ms(), 200);
    }

    #[test]
    fn button_flashes_both_indicators_together() {
        let mut d = dispatcher();
        block_on(d.render(EncoderEvent::ButtonPressed)).unwrap();

        let (cw, ccw, delay) = d.release();
        assert_eq!(cw.levels.as_slice(), &[true, false]);
        assert_eq!(ccw.levels.as_slice(), &[true, false]);
        assert_eq!(delay.total_ms(), 200);
    }

    #[test]
    fn pulse_count_and_duration_follow_config() {
        let mut d = FeedbackDispatcher::new(
            RecordingPin::default(),
            RecordingPin::default(),
            TallyDelay::default(),
            FeedbackConfig {
                pulse_count: 3,
                pulse_ms: 40,
                button_pulse_ms: 100,
            },
        );
        block_on(d.render(EncoderEvent::StepClockwise)).unwrap();

        let (cw, _, delay) = d.release();
        assert_eq!(cw.levels.as_slice(), &[true, false, true, false, true, false]);
        assert_eq!(delay.total_ms(), 240);
    }

    #[test]
    fn events_render_in_queue_order() {
        let queue: Channel<NoopRawMutex, EncoderEvent, 4> = Channel::new();
        queue.try_send(EncoderEvent::StepCounterClockwise).unwrap();
        queue.try_send(EncoderEvent::StepClockwise).unwrap();
        queue.try_send(EncoderEvent::ButtonPressed).unwrap();

        let receiver = queue.receiver();
        let mut d = dispatcher();
        while let Ok(event) = receiver.try_receive() {
            block_on(d.render(event)).unwrap();
        }

        let (cw, ccw, delay) = d.release();
        assert_eq!(cw.levels.as_slice(), &[true, false, true, false, true, false]);
        assert_eq!(ccw.levels.as_slice(), &[true, false, true, false, true, false]);
        assert_eq!(delay.total_ms(), 600);
    }

    #[derive(Debug, PartialEq)]
    struct Stuck;

    impl embedded_hal::digital::Error for Stuck {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    struct StuckPin;

    impl ErrorType for StuckPin {
        type Error = Stuck;
    }

    impl OutputPin for StuckPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(Stuck)
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(Stuck)
        }
    }

    #[test]
    fn output_fault_abandons_pattern() {
        let mut d = FeedbackDispatcher::new(
            StuckPin,
            StuckPin,
            TallyDelay::default(),
            FeedbackConfig::default(),
        );
        let result = block_on(d.render(EncoderEvent::StepClockwise));
        assert!(matches!(result, Err(DispatchError::Pin(Stuck))));

        let (_, _, delay) = d.release();
        assert_eq!(delay.total_ns, 0);
    }

    // ── Event loop ───────────────────────────────────────────────────

    const CW: u8 = 0;
    const CCW: u8 = 1;

    type PinLog = RefCell<Vec<(u8, bool), 64>>;

    /// Output pin that appends `(id, level)` to a log shared with its
    /// sibling, so the order across both indicators is visible. Setting it
    /// high fails when `fail_high` is set.
    struct LoggedPin<'a> {
        id: u8,
        log: &'a PinLog,
        fail_high: bool,
    }

    impl<'a> LoggedPin<'a> {
        fn new(id: u8, log: &'a PinLog) -> Self {
            Self {
                id,
                log,
                fail_high: false,
            }
        }
    }

    impl ErrorType for LoggedPin<'_> {
        type Error = Stuck;
    }

    impl OutputPin for LoggedPin<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            let _ = self.log.borrow_mut().push((self.id, false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            if self.fail_high {
                return Err(Stuck);
            }
            let _ = self.log.borrow_mut().push((self.id, true));
            Ok(())
        }
    }

    /// Delay that hands control back to the executor once per call.
    struct YieldingDelay;

    impl DelayNs for YieldingDelay {
        async fn delay_ns(&mut self, _ns: u32) {
            yield_now().await;
        }
    }

    /// Run the dispatcher loop until `polls` yields have passed.
    fn run_for<P, D, const N: usize>(
        d: &mut FeedbackDispatcher<P, D>,
        queue: &Channel<NoopRawMutex, EncoderEvent, N>,
        polls: usize,
    ) where
        P: OutputPin,
        D: DelayNs,
    {
        block_on(select(d.run(queue.receiver()), async {
            for _ in 0..polls {
                yield_now().await;
            }
        }));
    }

    #[test]
    fn run_drains_queue_in_order() {
        let log = PinLog::default();
        let queue: Channel<NoopRawMutex, EncoderEvent, 4> = Channel::new();
        queue.try_send(EncoderEvent::StepCounterClockwise).unwrap();
        queue.try_send(EncoderEvent::StepClockwise).unwrap();

        let mut d = FeedbackDispatcher::new(
            LoggedPin::new(CW, &log),
            LoggedPin::new(CCW, &log),
            YieldingDelay,
            FeedbackConfig::default(),
        );
        run_for(&mut d, &queue, 64);

        assert!(queue.is_empty());
        assert_eq!(
            log.borrow().as_slice(),
            &[
                (CCW, true),
                (CCW, false),
                (CCW, true),
                (CCW, false),
                (CW, true),
                (CW, false),
                (CW, true),
                (CW, false),
            ]
        );
    }

    #[test]
    fn run_waits_on_empty_queue() {
        let log = PinLog::default();
        let queue: Channel<NoopRawMutex, EncoderEvent, 4> = Channel::new();

        let mut d = FeedbackDispatcher::new(
            LoggedPin::new(CW, &log),
            LoggedPin::new(CCW, &log),
            YieldingDelay,
            FeedbackConfig::default(),
        );
        run_for(&mut d, &queue, 16);
        assert!(log.borrow().is_empty());

        // Events queued later are picked up by a fresh loop.
        queue.try_send(EncoderEvent::ButtonPressed).unwrap();
        run_for(&mut d, &queue, 16);
        assert_eq!(
            log.borrow().as_slice(),
            &[(CW, true), (CCW, true), (CW, false), (CCW, false)]
        );
    }

    #[test]
    fn run_keeps_going_after_output_fault() {
        let queue: Channel<NoopRawMutex, EncoderEvent, 4> = Channel::new();
        queue.try_send(EncoderEvent::StepClockwise).unwrap();
        queue.try_send(EncoderEvent::ButtonPressed).unwrap();
        queue.try_send(EncoderEvent::StepCounterClockwise).unwrap();

        let mut d = FeedbackDispatcher::new(
            StuckPin,
            StuckPin,
            TallyDelay::default(),
            FeedbackConfig::default(),
        );
        run_for(&mut d, &queue, 8);

        assert!(queue.is_empty());
    }

    #[test]
    fn failed_button_flash_leaves_both_indicators_off() {
        let log = PinLog::default();
        let mut ccw = LoggedPin::new(CCW, &log);
        ccw.fail_high = true;

        let mut d = FeedbackDispatcher::new(
            LoggedPin::new(CW, &log),
            ccw,
            TallyDelay::default(),
            FeedbackConfig::default(),
        );
        let result = block_on(d.render(EncoderEvent::ButtonPressed));
        assert!(matches!(result, Err(DispatchError::Pin(Stuck))));

        assert_eq!(
            log.borrow().as_slice(),
            &[(CW, true), (CW, false), (CCW, false)]
        );
        let (_, _, delay) = d.release();
        assert_eq!(delay.total_ns, 0);
    }
}
