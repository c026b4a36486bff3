//! encmux-hw-interface
//!
//! Multiplexed SSI absolute-encoder acquisition firmware for the Raspberry
//! Pi Pico 2. Polls eight encoders on a shared SPI bus, validates every
//! word with the K1/K0 parity scheme, mirrors each channel's validity on a
//! status LED, and republishes the normalized array to a downstream bus
//! master that polls this device as an SPI slave:
//!
//! 1. Each channel is selected in index order and its frame clocked in.
//! 2. A parity failure substitutes the sentinel and turns the channel's
//!    LED off; the slot is never skipped.
//! 3. The completed array is written to the relay interface as one bulk
//!    block, then the loop sleeps briefly and starts over.
//!
//! # Wiring
//!
//! | Signal        | Pico 2 Pin | Notes                                  |
//! |---------------|------------|----------------------------------------|
//! | SPI1 SCK      | GP26       | Acquisition bus, 2 MHz master          |
//! | SPI1 TX       | GP11       | Command bytes to the encoders          |
//! | SPI1 RX       | GP8        | Encoder data, MSB first                |
//! | Encoder CS    | GP6 GP24 GP17 GP10 GP4 GP22 GP27 GP19 | Active-low, one per channel |
//! | Status LED    | GP7 GP25 GP18 GP12 GP5 GP23 GP16 GP9  | Active-high on valid reading |
//! | SPI0 SCK      | GP2        | Relay bus, clocked by external master  |
//! | SPI0 TX       | GP3        | Published block, LSByte-first words    |
//! | SPI0 CSn      | GP1        | Sampled by the peripheral (slave mode) |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::pac;
use embassy_rp::peripherals::{SPI0, SPI1};
use embassy_rp::spi::{self, Async, Phase, Polarity, Spi};
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use encmux_frame::{IntoReading, Reading, Snapshot};
#[cfg(feature = "multi-turn")]
use ssi_encoder_driver::MultiTurnReader;
#[cfg(not(feature = "multi-turn"))]
use ssi_encoder_driver::SingleTurnReader;
use ssi_encoder_driver::{EncoderBank, FrameReader, Relay};

mod config;
use config::{
    ACQUISITION_CLOCK_HZ, CHANNEL_COUNT, CYCLE_DELAY_US, RELAY_BLOCK_BYTES, RELAY_CLOCK_HZ,
};

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

/// Acquisition-side SPI (this device is the master).
type AcqSpi = Spi<'static, SPI1, Async>;

/// Relay-side SPI (this device is the slave).
type RelaySpi = Spi<'static, SPI0, Async>;

/// Frame reader selected for this deployment. The two variants are
/// mutually exclusive; the reader capability decides the byte sequence,
/// not a per-call flag.
#[cfg(not(feature = "multi-turn"))]
type Reader = SingleTurnReader<AcqSpi, Output<'static>, CHANNEL_COUNT>;
#[cfg(feature = "multi-turn")]
type Reader = MultiTurnReader<AcqSpi, Output<'static>, CHANNEL_COUNT>;

// ---------------------------------------------------------------------------
// Acquisition
// ---------------------------------------------------------------------------

/// Read, validate, and normalize every channel once, in index order.
///
/// The status LED is updated from the raw-word verdict immediately after
/// each channel's validation — before normalization, so it reflects the
/// wire word rather than the sentinel substitution. A failed channel still
/// occupies its array slot and the loop moves on unconditionally.
async fn acquire_cycle<R>(
    reader: &mut R,
    leds: &mut [Output<'static>; CHANNEL_COUNT],
) -> Snapshot<CHANNEL_COUNT>
where
    R: FrameReader,
{
    let mut readings = [Reading::from_raw(0); CHANNEL_COUNT];

    for channel in 0..CHANNEL_COUNT {
        let reading = match reader.read_frame(channel).await {
            Ok(frame) => frame.into_reading(),
            Err(_) => {
                error!("channel {} read failed", channel);
                // A transport fault stands in an all-zero word; parity
                // rejects it, so the slot carries the sentinel like any
                // stuck line would.
                Reading::from_raw(0)
            }
        };

        leds[channel].set_level(Level::from(reading.valid));
        readings[channel] = reading;
    }

    Snapshot::from_readings(&readings)
}

/// Steady-state acquisition loop. Never exits.
#[embassy_executor::task]
async fn acquisition_task(
    mut reader: Reader,
    mut leds: [Output<'static>; CHANNEL_COUNT],
    mut relay: Relay<RelaySpi>,
) {
    info!("acquisition task started");

    let mut block = [0u8; RELAY_BLOCK_BYTES];

    loop {
        let snapshot = acquire_cycle(&mut reader, &mut leds).await;

        snapshot.copy_to_le_bytes(&mut block);
        if relay.publish(&block).await.is_err() {
            warn!("relay publish failed");
        }
        debug!("published {}", snapshot.words());

        Timer::after(Duration::from_micros(CYCLE_DELAY_US)).await;
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("encmux-hw-interface starting");

    // —— Acquisition bus: SPI1 master, mode 0, MSB first ————————————————————

    let mut acq_config = spi::Config::default();
    acq_config.frequency = ACQUISITION_CLOCK_HZ;
    acq_config.polarity = Polarity::IdleLow;
    acq_config.phase = Phase::CaptureOnFirstTransition;
    let acq_spi = Spi::new(
        p.SPI1,
        p.PIN_26, // SCK
        p.PIN_11, // TX
        p.PIN_8,  // RX
        p.DMA_CH0,
        p.DMA_CH1,
        acq_config,
    );

    // Chip-select lines idle high; indicators start off. Array lengths are
    // checked against CHANNEL_COUNT by EncoderBank's const generic.
    let select = [
        Output::new(p.PIN_6, Level::High),
        Output::new(p.PIN_24, Level::High),
        Output::new(p.PIN_17, Level::High),
        Output::new(p.PIN_10, Level::High),
        Output::new(p.PIN_4, Level::High),
        Output::new(p.PIN_22, Level::High),
        Output::new(p.PIN_27, Level::High),
        Output::new(p.PIN_19, Level::High),
    ];
    let leds = [
        Output::new(p.PIN_7, Level::Low),
        Output::new(p.PIN_25, Level::Low),
        Output::new(p.PIN_18, Level::Low),
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_5, Level::Low),
        Output::new(p.PIN_23, Level::Low),
        Output::new(p.PIN_16, Level::Low),
        Output::new(p.PIN_9, Level::Low),
    ];

    #[cfg_attr(not(feature = "zero-on-boot"), allow(unused_mut))]
    let mut bank = EncoderBank::new(acq_spi, select);

    // —— Relay bus: SPI0 slave, clocked by the downstream master ————————————

    let mut relay_config = spi::Config::default();
    relay_config.frequency = RELAY_CLOCK_HZ;
    relay_config.polarity = Polarity::IdleLow;
    relay_config.phase = Phase::CaptureOnFirstTransition;
    let relay_spi = Spi::new_txonly(
        p.SPI0,
        p.PIN_2, // SCK
        p.PIN_3, // TX
        p.DMA_CH2,
        relay_config,
    );

    // The HAL only constructs masters. Disable the PL022, flip it to
    // slave, re-enable, and hand its CSn input (GP1) to the peripheral.
    pac::SPI0.cr1().modify(|w| w.set_sse(false));
    pac::SPI0.cr1().modify(|w| {
        w.set_ms(true);
        w.set_sse(true);
    });
    pac::IO_BANK0.gpio(1).ctrl().modify(|w| w.set_funcsel(1));

    let relay = Relay::new(relay_spi);

    // —— Pre-loop zero-point calibration —————————————————————————————————————

    // One-time maintenance step, never reachable from the steady-state
    // loop: each encoder takes 250 ms to commit its new zero.
    #[cfg(feature = "zero-on-boot")]
    {
        info!("zero-point calibration of {} channels", CHANNEL_COUNT);
        for channel in 0..CHANNEL_COUNT {
            if bank.set_zero_point(channel).await.is_err() {
                warn!("zero-set failed on channel {}", channel);
            }
        }
    }

    // —— Spawn the acquisition loop ——————————————————————————————————————————

    #[cfg(not(feature = "multi-turn"))]
    let reader = SingleTurnReader::new(bank);
    #[cfg(feature = "multi-turn")]
    let reader = MultiTurnReader::new(bank);

    spawner.spawn(acquisition_task(reader, leds, relay)).unwrap();

    info!("all tasks spawned");
}
