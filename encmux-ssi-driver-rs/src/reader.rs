//! High-level frame reads over the multiplexed bus.
//!
//! [`EncoderBank`] wraps the low-level bus primitives with channel
//! validation and the bit-exact byte sequences of the two frame formats.
//! The [`FrameReader`] trait is the configuration-time seam between them:
//! the acquisition loop is written against the trait and a deployment
//! wraps its bank in either [`SingleTurnReader`] or [`MultiTurnReader`].

use embassy_time::{Duration, Timer};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

use encmux_frame::{IntoReading, MultiTurnFrame};

use crate::bus::SsiBus;
use crate::error::SsiError;
use crate::protocol::{
    READ_COMMAND, READ_TURNS_COMMAND, SETTLE_DELAY_US, TURN_SETTLE_DELAY_US, ZERO_SET_COMMAND,
    ZERO_SET_COMMIT_MS,
};

/// A bank of `N` SSI encoders multiplexed onto one SPI bus.
///
/// Owns the SPI peripheral and the per-channel chip-select pins for
/// exclusive access. Words arrive most-significant byte first; a stuck or
/// disconnected line silently yields an all-zero or all-one word, which
/// the parity check downstream rejects — the transport itself has no
/// timeout and no error code of its own.
///
/// Every transaction releases its select line before returning, on the
/// error path too: at most one channel is ever selected, and a fault on
/// one channel cannot bleed into the rest of the cycle.
pub struct EncoderBank<SPI, CS, const N: usize> {
    bus: SsiBus<SPI, CS, N>,
}

impl<SPI, CS, const N: usize> EncoderBank<SPI, CS, N>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    /// Create a new encoder bank.
    ///
    /// # Arguments
    /// * `spi` — SPI peripheral (takes ownership for exclusive access)
    /// * `select` — chip-select output pins, one per channel, already in
    ///   their inactive (high) state
    pub fn new(spi: SPI, select: [CS; N]) -> Self {
        Self {
            bus: SsiBus::new(spi, select),
        }
    }

    /// Read the raw 16-bit position word of one channel.
    ///
    /// Sequence: select, clock in the most-significant byte, settle, clock
    /// in the least-significant byte, release.
    ///
    /// # Errors
    /// * [`SsiError::InvalidChannel`] if `channel >= N`
    /// * [`SsiError::Spi`] / [`SsiError::Pin`] on transport failure
    pub async fn read_position(
        &mut self,
        channel: usize,
    ) -> Result<u16, SsiError<SPI::Error, CS::Error>> {
        if channel >= N {
            return Err(SsiError::InvalidChannel);
        }

        self.bus.select(channel).await?;
        let word = self.position_word().await;
        // Unconditional: the select line goes inactive even when the byte
        // sequence failed mid-frame.
        self.bus.release(channel)?;
        word
    }

    /// Read the raw position and turn-count words of one multi-turn
    /// channel.
    ///
    /// The turn-latch command is clocked out together with the final
    /// position byte, then the encoder needs the longer settle before it
    /// can deliver the turn word.
    ///
    /// # Errors
    /// * [`SsiError::InvalidChannel`] if `channel >= N`
    /// * [`SsiError::Spi`] / [`SsiError::Pin`] on transport failure
    pub async fn read_position_and_turns(
        &mut self,
        channel: usize,
    ) -> Result<MultiTurnFrame, SsiError<SPI::Error, CS::Error>> {
        if channel >= N {
            return Err(SsiError::InvalidChannel);
        }

        self.bus.select(channel).await?;
        let frame = self.multi_turn_words().await;
        self.bus.release(channel)?;
        frame
    }

    /// Declare the channel's current shaft position as its zero point.
    ///
    /// One-time calibration, to be run before the acquisition loop starts
    /// — the encoder takes 250 ms to commit the new zero to its
    /// non-volatile store and must not be polled while it does.
    ///
    /// # Errors
    /// * [`SsiError::InvalidChannel`] if `channel >= N`
    /// * [`SsiError::Spi`] / [`SsiError::Pin`] on transport failure
    pub async fn set_zero_point(
        &mut self,
        channel: usize,
    ) -> Result<(), SsiError<SPI::Error, CS::Error>> {
        if channel >= N {
            return Err(SsiError::InvalidChannel);
        }

        self.bus.select(channel).await?;
        let result = self.zero_set_sequence().await;
        self.bus.release(channel)?;
        result
    }

    // -----------------------------------------------------------------------
    // Byte sequences (run with a channel selected)
    // -----------------------------------------------------------------------

    async fn position_word(&mut self) -> Result<u16, SsiError<SPI::Error, CS::Error>> {
        let hi = self.bus.exchange(READ_COMMAND, SETTLE_DELAY_US).await?;
        let lo = self.bus.exchange(READ_COMMAND, SETTLE_DELAY_US).await?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    async fn multi_turn_words(&mut self) -> Result<MultiTurnFrame, SsiError<SPI::Error, CS::Error>> {
        let pos_hi = self.bus.exchange(READ_COMMAND, SETTLE_DELAY_US).await?;
        let pos_lo = self
            .bus
            .exchange(READ_TURNS_COMMAND, TURN_SETTLE_DELAY_US)
            .await?;
        let turn_hi = self.bus.exchange(READ_COMMAND, SETTLE_DELAY_US).await?;
        let turn_lo = self.bus.exchange(READ_COMMAND, SETTLE_DELAY_US).await?;

        Ok(MultiTurnFrame {
            position: u16::from_be_bytes([pos_hi, pos_lo]),
            turns: u16::from_be_bytes([turn_hi, turn_lo]),
        })
    }

    async fn zero_set_sequence(&mut self) -> Result<(), SsiError<SPI::Error, CS::Error>> {
        self.bus.command(READ_COMMAND, SETTLE_DELAY_US).await?;
        self.bus.command(ZERO_SET_COMMAND, SETTLE_DELAY_US).await?;
        Timer::after(Duration::from_millis(ZERO_SET_COMMIT_MS)).await;
        Ok(())
    }
}

/// Configuration-time capability: one frame read per channel per cycle.
///
/// The two implementations are mutually exclusive per deployment — a bank
/// is wrapped in exactly one of them, not switched per call.
#[allow(async_fn_in_trait)]
pub trait FrameReader {
    /// Raw frame produced per channel.
    type Frame: IntoReading;
    /// Transport error type.
    type Error;

    /// Read one channel's frame.
    async fn read_frame(&mut self, channel: usize) -> Result<Self::Frame, Self::Error>;
}

/// Frame reader for single-turn encoders: one 16-bit position word per
/// channel per cycle.
pub struct SingleTurnReader<SPI, CS, const N: usize> {
    bank: EncoderBank<SPI, CS, N>,
}

impl<SPI, CS, const N: usize> SingleTurnReader<SPI, CS, N>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    pub fn new(bank: EncoderBank<SPI, CS, N>) -> Self {
        Self { bank }
    }
}

impl<SPI, CS, const N: usize> FrameReader for SingleTurnReader<SPI, CS, N>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    type Frame = u16;
    type Error = SsiError<SPI::Error, CS::Error>;

    async fn read_frame(&mut self, channel: usize) -> Result<u16, Self::Error> {
        self.bank.read_position(channel).await
    }
}

/// Frame reader for multi-turn encoders: a position word plus a turn-count
/// word per channel per cycle.
pub struct MultiTurnReader<SPI, CS, const N: usize> {
    bank: EncoderBank<SPI, CS, N>,
}

impl<SPI, CS, const N: usize> MultiTurnReader<SPI, CS, N>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    pub fn new(bank: EncoderBank<SPI, CS, N>) -> Self {
        Self { bank }
    }
}

impl<SPI, CS, const N: usize> FrameReader for MultiTurnReader<SPI, CS, N>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    type Frame = MultiTurnFrame;
    type Error = SsiError<SPI::Error, CS::Error>;

    async fn read_frame(&mut self, channel: usize) -> Result<MultiTurnFrame, Self::Error> {
        self.bank.read_position_and_turns(channel).await
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
