//! Compile-time deployment configuration.
//!
//! Channel count, clock rates, and the end-of-cycle delay live here; the
//! protocol-level settle delays belong to the driver crate. Pin
//! assignments are in `main.rs` next to the peripheral bring-up — the
//! select and indicator arrays there are tied to [`CHANNEL_COUNT`] by the
//! type system, so a miscounted pin list fails to compile rather than
//! misaddressing a channel.

/// Number of encoder channels on the acquisition bus.
pub const CHANNEL_COUNT: usize = 8;

/// Acquisition-side SPI clock (this device is the bus master).
pub const ACQUISITION_CLOCK_HZ: u32 = 2_000_000;

/// Relay-side SPI clock (this device is the slave; the downstream master
/// supplies the actual clock).
pub const RELAY_CLOCK_HZ: u32 = 4_000_000;

/// Pause between acquisition cycles.
pub const CYCLE_DELAY_US: u64 = 100;

/// Size of the published relay block: one 16-bit word per channel.
pub const RELAY_BLOCK_BYTES: usize = CHANNEL_COUNT * 2;
