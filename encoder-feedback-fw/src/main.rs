//! encoder-feedback-fw
//!
//! Rotary encoder bench firmware for the Raspberry Pi Pico 2. Wires the
//! `encoder-feedback` library to real pins:
//!
//! 1. The encoder task polls A, B and the push-button every millisecond.
//! 2. Each rising edge of A becomes a clockwise or counter-clockwise step,
//!    each accepted press a button event. Events go into a bounded queue
//!    with a non-blocking send; when the queue is full they are dropped.
//! 3. The LED task waits on the queue and blinks the CW LED, the CCW LED,
//!    or both, for each event in order.
//!
//! # Wiring
//!
//! | Signal     | Pico 2 Pin | Notes                        |
//! |------------|------------|------------------------------|
//! | ENC A/CLK  | GP4        | Pull-up enabled              |
//! | ENC B/DT   | GP5        | Pull-up enabled              |
//! | ENC SW     | GP6        | Active-low, pull-up enabled  |
//! | LED CW     | GP2        | Active-high                  |
//! | LED CCW    | GP3        | Active-high                  |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use encoder_feedback::{
    feedback_task, sampler_task, EncoderEvent, FeedbackConfig, FeedbackDispatcher, Sampler,
    SamplerConfig, QUEUE_CAPACITY,
};

// ---------------------------------------------------------------------------
// Boot block
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Feedback queue. The encoder task holds the sender, the LED task the
/// receiver.
static FEEDBACK_QUEUE: StaticCell<FeedbackQueue> = StaticCell::new();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

type FeedbackQueue = Channel<CriticalSectionRawMutex, EncoderEvent, QUEUE_CAPACITY>;

type EncoderSampler =
    Sampler<'static, CriticalSectionRawMutex, Input<'static>, QUEUE_CAPACITY>;

type LedDispatcher = FeedbackDispatcher<Output<'static>, Delay>;

type FeedbackReceiver =
    Receiver<'static, CriticalSectionRawMutex, EncoderEvent, QUEUE_CAPACITY>;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Thin wrapper that monomorphises the generic `sampler_task` so it can be
/// spawned as a concrete Embassy task.
#[embassy_executor::task]
async fn encoder_task(sampler: EncoderSampler, config: SamplerConfig) {
    sampler_task(sampler, config).await;
}

/// Thin wrapper around the generic `feedback_task`.
#[embassy_executor::task]
async fn led_task(dispatcher: LedDispatcher, receiver: FeedbackReceiver) {
    feedback_task(dispatcher, receiver).await;
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("encoder-feedback-fw starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // ENC_A   → GP4  (p.PIN_4)   pull-up
    // ENC_B   → GP5  (p.PIN_5)   pull-up
    // ENC_SW  → GP6  (p.PIN_6)   active-low, pull-up
    // LED_CW  → GP2  (p.PIN_2)
    // LED_CCW → GP3  (p.PIN_3)
    // ———————————————————————————————————————————————————————————————————————

    let enc_a = Input::new(p.PIN_4, Pull::Up);
    let enc_b = Input::new(p.PIN_5, Pull::Up);
    let enc_sw = Input::new(p.PIN_6, Pull::Up);

    let led_cw = Output::new(p.PIN_2, Level::Low);
    let led_ccw = Output::new(p.PIN_3, Level::Low);

    let queue: &'static FeedbackQueue = FEEDBACK_QUEUE.init(Channel::new());

    // —— Sampler initialisation ————————————————————————————————————————————

    // Sampler::new reads A once so the first poll does not report a step
    // when the encoder rests with A high. RP2350 GPIO reads cannot fail.
    let sampler_config = SamplerConfig::default();
    let sampler = match Sampler::new(
        enc_a,
        enc_b,
        Some(enc_sw),
        queue.sender(),
        &sampler_config,
    ) {
        Ok(sampler) => sampler,
        Err(_) => {
            error!("Failed to read initial encoder state");
            return;
        }
    };
    info!("Initial A level: {}", sampler.context().previous_a());

    let dispatcher =
        FeedbackDispatcher::new(led_cw, led_ccw, Delay, FeedbackConfig::default());

    // —— Spawn tasks ————————————————————————————————————————————————————————

    // LED task first so the queue has a consumer before the first event.
    spawner.spawn(led_task(dispatcher, queue.receiver())).unwrap();
    spawner.spawn(encoder_task(sampler, sampler_config)).unwrap();

    info!("All tasks spawned");
}
