//! Word-level logic for SSI absolute rotary encoders.
//!
//! This crate holds everything about an encoder reading that does not touch
//! hardware: the K1/K0 parity scheme, normalization, the per-channel
//! [`Reading`], the multi-turn frame types, and the per-cycle [`Snapshot`]
//! that is published to the downstream bus master.
//!
//! # Word layout
//!
//! Each encoder word is 16 bits, received most-significant byte first:
//!
//! ```text
//! | K1 K0 D13 D12 D11 D10 D9 D8 | D7 D6 D5 D4 D3 D2 D1 D0 |
//! ```
//!
//! K1 and K0 are parity bits computed over the alternating data bits:
//!
//! ```text
//! K1 = !(D13 ^ D11 ^ D9 ^ D7 ^ D5 ^ D3 ^ D1)
//! K0 = !(D12 ^ D10 ^ D8 ^ D6 ^ D4 ^ D2 ^ D0)
//! ```
//!
//! A word whose parity bits disagree with its data bits is replaced by the
//! sentinel [`SENTINEL`] (`0x7fff`) so the downstream consumer sees an
//! unambiguous out-of-range code instead of a corrupted position.
//!
//! # Cycle snapshot
//!
//! [`Snapshot`] is the ordered array of normalized readings for one
//! acquisition cycle. Its length is a const generic, so "the array is
//! always exactly `channel_count` long" holds by construction — a failed
//! channel occupies its slot with the sentinel, never a gap.
//!
//! # `no_std` compatibility
//!
//! No heap allocation; all storage is fixed-size arrays. The optional
//! `defmt` feature enables structured logging on embedded targets.

#![cfg_attr(not(test), no_std)]

mod snapshot;
mod word;

pub use snapshot::Snapshot;
pub use word::{
    normalize, parity_valid, with_parity, IntoReading, MultiTurnFrame, MultiTurnReading, Reading,
    DATA_MASK, SENTINEL,
};
