//! Embassy loops for the sampler and the dispatcher.
//!
//! These are regular `async fn`s, **not** Embassy `#[task]`s. Embassy tasks
//! cannot be generic, so callers create thin, concrete task wrappers:
//!
//! ```ignore
//! #[embassy_executor::task]
//! async fn encoder_task(
//!     sampler: Sampler<'static, CriticalSectionRawMutex, Input<'static>, QUEUE_CAPACITY>,
//!     config: SamplerConfig,
//! ) {
//!     sampler_task(sampler, config).await;
//! }
//! ```
//!
//! Neither loop ever returns.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;
use embassy_time::{Instant, Timer};
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::config::SamplerConfig;
use crate::dispatcher::FeedbackDispatcher;
use crate::event::EncoderEvent;
use crate::sampler::Sampler;

/// Fixed-cadence polling loop.
///
/// Polls once, then sleeps for `config.poll_interval()`. The sleep is what
/// lets other tasks run, so it is never zero. A failed pin read is logged
/// and sampling continues on the next period. Dropped feedback is logged
/// at `debug` only.
#[allow(clippy::needless_pass_by_value)] // config is small and consumed
pub async fn sampler_task<M, I, const N: usize>(
    mut sampler: Sampler<'_, M, I, N>,
    config: SamplerConfig,
) -> !
where
    M: RawMutex,
    I: InputPin,
{
    let period = config.poll_interval();

    #[cfg(feature = "defmt")]
    defmt::info!(
        "Encoder sampler started (poll {} ms, settle {} ms)",
        period.as_millis(),
        config.button_settle_ms
    );

    loop {
        match sampler.poll(Instant::now()) {
            Ok(_report) => {
                #[cfg(feature = "defmt")]
                if _report.dropped > 0 {
                    defmt::debug!(
                        "Feedback queue full, dropped {} event(s); position={}",
                        _report.dropped,
                        sampler.position()
                    );
                }
            }
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Encoder read failed");
            }
        }

        Timer::after(period).await;
    }
}

/// Feedback loop: drains `receiver` and renders each event in order.
pub async fn feedback_task<M, P, D, const N: usize>(
    mut dispatcher: FeedbackDispatcher<P, D>,
    receiver: Receiver<'_, M, EncoderEvent, N>,
) -> !
where
    M: RawMutex,
    P: OutputPin,
    D: DelayNs,
{
    dispatcher.run(receiver).await
}
