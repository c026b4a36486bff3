//! Low-level multiplexed-bus primitives.
//!
//! Implements chip-select sequencing and the settle delays the encoders
//! require around every transaction: one byte-transfer period after a
//! select edge and after every byte exchanged.
//!
//! This module is crate-private — consumers interact with
//! [`EncoderBank`](crate::EncoderBank) in `reader.rs` instead.

use embassy_time::{Duration, Timer};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

use crate::error::SsiError;
use crate::protocol::SETTLE_DELAY_US;

/// Shared SPI bus plus one chip-select line per channel.
///
/// Select lines idle high; exactly one is driven low for the duration of a
/// transaction. Selection is not reentrant — the single-owner `&mut`
/// methods make an overlapping selection unrepresentable.
pub(crate) struct SsiBus<SPI, CS, const N: usize> {
    spi: SPI,
    select: [CS; N],
}

impl<SPI, CS, const N: usize> SsiBus<SPI, CS, N>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    pub fn new(spi: SPI, select: [CS; N]) -> Self {
        Self { spi, select }
    }

    /// Drive `channel`'s select line active and wait the settle time.
    ///
    /// The caller validates `channel < N`.
    pub async fn select(&mut self, channel: usize) -> Result<(), SsiError<SPI::Error, CS::Error>> {
        self.select[channel].set_low().map_err(SsiError::Pin)?;
        Timer::after(Duration::from_micros(SETTLE_DELAY_US)).await;
        Ok(())
    }

    /// Return `channel`'s select line to its inactive state.
    pub fn release(&mut self, channel: usize) -> Result<(), SsiError<SPI::Error, CS::Error>> {
        self.select[channel].set_high().map_err(SsiError::Pin)
    }

    /// Clock one command byte out and one response byte in, then wait
    /// `settle_us` before the next protocol step.
    pub async fn exchange(
        &mut self,
        command: u8,
        settle_us: u64,
    ) -> Result<u8, SsiError<SPI::Error, CS::Error>> {
        let mut response = [0u8];
        self.spi
            .transfer(&mut response, &[command])
            .await
            .map_err(SsiError::Spi)?;
        Timer::after(Duration::from_micros(settle_us)).await;
        Ok(response[0])
    }

    /// Clock one command byte out, discarding the response, then wait
    /// `settle_us`.
    pub async fn command(
        &mut self,
        command: u8,
        settle_us: u64,
    ) -> Result<(), SsiError<SPI::Error, CS::Error>> {
        self.spi.write(&[command]).await.map_err(SsiError::Spi)?;
        Timer::after(Duration::from_micros(settle_us)).await;
        Ok(())
    }
}
