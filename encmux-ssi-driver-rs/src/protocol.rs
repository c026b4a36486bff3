//! Command bytes and timing constants of the encoder's SSI dialect.

/// Null command clocked out while reading a word byte.
pub const READ_COMMAND: u8 = 0x00;

/// Latch the turn counter so the following two bytes carry the turn word.
/// Board-specific opcode from the encoder datasheet.
pub const READ_TURNS_COMMAND: u8 = 0x50;

/// Declare the current shaft position as the zero point.
pub const ZERO_SET_COMMAND: u8 = 0x70;

/// Settle time around chip-select edges and between byte transfers,
/// one byte-transfer period at the 2 MHz bus clock.
pub const SETTLE_DELAY_US: u64 = 3;

/// Longer settle after [`READ_TURNS_COMMAND`] while the encoder latches
/// its turn counter.
pub const TURN_SETTLE_DELAY_US: u64 = 40;

/// Time the encoder needs to commit a new zero point to its non-volatile
/// store.
pub const ZERO_SET_COMMIT_MS: u64 = 250;
