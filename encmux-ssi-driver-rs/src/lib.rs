//! Async driver for multiplexed SSI absolute rotary encoders.
//!
//! Up to `N` encoders share one SPI clock/data pair; each encoder has a
//! dedicated chip-select line. This crate drives that bus as master,
//! retrieves the 16-bit position word (and, for multi-turn encoders, the
//! 16-bit turn-count word) per channel, and publishes the assembled cycle
//! block on a second SPI interface where the device acts as slave.
//!
//! # Architecture
//!
//! The crate is split into two layers:
//!
//! - **`bus`** (crate-private) — Low-level select/settle/exchange
//!   primitives that handle chip-select sequencing and the inter-byte
//!   settle delays the encoders require.
//! - **[`EncoderBank`]** (public) — Validated, high-level API for frame
//!   reads and zero-point calibration.
//!
//! The two frame formats are exposed through the [`FrameReader`]
//! capability trait: wrap a bank in a [`SingleTurnReader`] or a
//! [`MultiTurnReader`] at configuration time and the acquisition loop
//! runs unchanged over either.
//!
//! # Quick start
//!
//! ```ignore
//! use ssi_encoder_driver::{EncoderBank, FrameReader, SingleTurnReader};
//!
//! // `spi` is any `embedded-hal-async` SpiBus, `select` an array of
//! // chip-select output pins, one per encoder.
//! let bank = EncoderBank::new(spi, select);
//! let mut reader = SingleTurnReader::new(bank);
//!
//! let raw = reader.read_frame(0).await?;
//! ```
//!
//! # Features
//!
//! - **`defmt`** — Enable [`defmt::Format`] implementations on error types
//!   for embedded logging.

#![cfg_attr(not(test), no_std)]

mod bus;
mod error;
mod protocol;
mod reader;
mod relay;

pub use error::SsiError;
pub use protocol::{
    READ_COMMAND, READ_TURNS_COMMAND, SETTLE_DELAY_US, TURN_SETTLE_DELAY_US, ZERO_SET_COMMAND,
    ZERO_SET_COMMIT_MS,
};
pub use reader::{EncoderBank, FrameReader, MultiTurnReader, SingleTurnReader};
pub use relay::Relay;
