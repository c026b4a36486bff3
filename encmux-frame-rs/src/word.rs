//! Parity validation and normalization of raw encoder words.

/// Sentinel published in place of a reading that failed parity validation.
///
/// `0x7fff` is outside the 14-bit data range, so the downstream consumer can
/// always tell it apart from a genuine position.
pub const SENTINEL: u16 = 0x7fff;

/// Mask selecting the 14 data bits of a word (clears K1/K0).
pub const DATA_MASK: u16 = 0x3fff;

/// Check the K1/K0 parity bits of a raw word against its data bits.
///
/// Valid iff bit 15 (K1) equals the inverted XOR of the odd data bits and
/// bit 14 (K0) equals the inverted XOR of the even data bits. The same
/// check applies to position words and, in multi-turn mode, independently
/// to turn words.
///
/// Parity bits are fixed inputs from the encoder — they are never
/// recomputed here, only compared.
pub fn parity_valid(word: u16) -> bool {
    let bit = |i: u8| (word >> i) & 1 != 0;

    let k1 = !(bit(13) ^ bit(11) ^ bit(9) ^ bit(7) ^ bit(5) ^ bit(3) ^ bit(1));
    let k0 = !(bit(12) ^ bit(10) ^ bit(8) ^ bit(6) ^ bit(4) ^ bit(2) ^ bit(0));

    bit(15) == k1 && bit(14) == k0
}

/// Tag a 14-bit data value with its correct K1/K0 parity bits.
///
/// Bits 14 and 15 of `data` are ignored. The result always satisfies
/// [`parity_valid`]. Used to synthesize well-formed words in tests and
/// encoder simulations.
pub fn with_parity(data: u16) -> u16 {
    let data = data & DATA_MASK;
    let bit = |i: u8| (data >> i) & 1 != 0;

    let k1 = !(bit(13) ^ bit(11) ^ bit(9) ^ bit(7) ^ bit(5) ^ bit(3) ^ bit(1));
    let k0 = !(bit(12) ^ bit(10) ^ bit(8) ^ bit(6) ^ bit(4) ^ bit(2) ^ bit(0));

    data | (u16::from(k1) << 15) | (u16::from(k0) << 14)
}

/// Strip the parity bits from a validated word, or substitute the sentinel
/// for an invalid one.
pub fn normalize(word: u16, valid: bool) -> u16 {
    if valid {
        word & DATA_MASK
    } else {
        SENTINEL
    }
}

/// One validated channel reading.
///
/// Carries the raw word alongside its parity verdict so the status
/// indicator can reflect raw validity while the published value goes
/// through [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Raw 16-bit word as received, parity bits included.
    pub raw: u16,
    /// Parity verdict on the raw word.
    pub valid: bool,
}

impl Reading {
    /// Validate a raw word.
    pub fn from_raw(raw: u16) -> Self {
        Self {
            raw,
            valid: parity_valid(raw),
        }
    }

    /// The value published for this channel: the 14 data bits when valid,
    /// [`SENTINEL`] otherwise.
    pub fn value(&self) -> u16 {
        normalize(self.raw, self.valid)
    }
}

/// Raw position + turn-count word pair from a multi-turn frame read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MultiTurnFrame {
    /// Raw position word.
    pub position: u16,
    /// Raw accumulated-revolution word, parity-tagged with the same scheme.
    pub turns: u16,
}

impl MultiTurnFrame {
    /// Validate both words independently.
    pub fn validate(self) -> MultiTurnReading {
        MultiTurnReading {
            position: Reading::from_raw(self.position),
            turns: Reading::from_raw(self.turns),
        }
    }
}

/// A validated multi-turn frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MultiTurnReading {
    /// Validated position word.
    pub position: Reading,
    /// Validated turn-count word.
    pub turns: Reading,
}

impl MultiTurnReading {
    /// Collapse to a single position reading.
    ///
    /// The combined reading is valid only when *both* words validate: a
    /// channel whose turn counter is glitched is not trustworthy even if
    /// the position word happens to pass, so the sentinel is substituted
    /// and the status indicator goes inactive.
    pub fn combined(&self) -> Reading {
        Reading {
            raw: self.position.raw,
            valid: self.position.valid && self.turns.valid,
        }
    }
}

/// Conversion from a frame-reader result to the per-channel [`Reading`]
/// stored in the cycle snapshot.
///
/// This is the seam that lets the acquisition loop run unchanged over
/// either frame-reader variant.
pub trait IntoReading {
    /// Validate and collapse this frame to one channel reading.
    fn into_reading(self) -> Reading;
}

impl IntoReading for u16 {
    fn into_reading(self) -> Reading {
        Reading::from_raw(self)
    }
}

impl IntoReading for MultiTurnFrame {
    fn into_reading(self) -> Reading {
        self.validate().combined()
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Parity ───────────────────────────────────────────────────────

    #[test]
    fn constructed_parity_always_validates() {
        // Exhaustive over the full 14-bit data range.
        for data in 0u16..=DATA_MASK {
            let word = with_parity(data);
            assert!(parity_valid(word), "data {:#06x} should validate", data);
            assert_eq!(word & DATA_MASK, data);
        }
    }

    #[test]
    fn flipping_one_parity_bit_invalidates() {
        for data in [0u16, 1, 0x1555, 0x2aaa, 0x3fff, 0x1234] {
            let word = with_parity(data);
            assert!(!parity_valid(word ^ 0x8000), "K1 flip must invalidate");
            assert!(!parity_valid(word ^ 0x4000), "K0 flip must invalidate");
        }
    }

    #[test]
    fn hand_computed_scenario_0x4001() {
        // Word 0x4001: bit14 = 1, bit0 = 1, everything else 0.
        // K0 must equal !(bit0) = 0 but bit14 is 1 → invalid.
        // (K1 would also mismatch: !(0) = 1 but bit15 is 0.)
        assert!(!parity_valid(0x4001));

        // The correctly tagged form of data 0x0001 sets K1 and clears K0.
        assert_eq!(with_parity(0x0001), 0x8001);
        assert!(parity_valid(0x8001));
    }

    #[test]
    fn stuck_line_patterns_are_invalid() {
        // A disconnected or stuck data line reads back all-zero or all-one;
        // both must be rejected so the fault surfaces as the sentinel.
        assert!(!parity_valid(0x0000));
        assert!(!parity_valid(0xffff));
    }

    // ── Normalization ────────────────────────────────────────────────

    #[test]
    fn normalize_valid_strips_parity_bits() {
        for word in [0u16, 0x0001, 0x3fff, 0x8001, 0xc000, 0xffff] {
            assert_eq!(normalize(word, true), word & 0x3fff);
        }
    }

    #[test]
    fn normalize_invalid_substitutes_sentinel() {
        for word in [0u16, 0x0001, 0x3fff, 0x8001, 0xffff] {
            assert_eq!(normalize(word, false), SENTINEL);
        }
    }

    #[test]
    fn normalize_roundtrip_on_valid_words() {
        for data in (0u16..=DATA_MASK).step_by(37) {
            let word = with_parity(data);
            assert!(parity_valid(word));
            assert_eq!(normalize(word, parity_valid(word)), word & DATA_MASK);
        }
    }

    // ── Reading ──────────────────────────────────────────────────────

    #[test]
    fn reading_tracks_raw_validity() {
        let good = Reading::from_raw(with_parity(0x1234));
        assert!(good.valid);
        assert_eq!(good.value(), 0x1234);

        let bad = Reading::from_raw(0x4001);
        assert!(!bad.valid);
        assert_eq!(bad.value(), SENTINEL);
        // The raw word is preserved even when invalid.
        assert_eq!(bad.raw, 0x4001);
    }

    // ── Multi-turn ───────────────────────────────────────────────────

    #[test]
    fn multi_turn_words_validated_independently() {
        let frame = MultiTurnFrame {
            position: with_parity(0x0100),
            turns: 0x0000, // parity failure
        };
        let reading = frame.validate();
        assert!(reading.position.valid);
        assert!(!reading.turns.valid);
    }

    #[test]
    fn combined_requires_both_words_valid() {
        let both_good = MultiTurnFrame {
            position: with_parity(0x0100),
            turns: with_parity(0x0003),
        };
        let combined = both_good.validate().combined();
        assert!(combined.valid);
        assert_eq!(combined.value(), 0x0100);

        let bad_turns = MultiTurnFrame {
            position: with_parity(0x0100),
            turns: 0xffff,
        };
        let combined = bad_turns.validate().combined();
        assert!(!combined.valid);
        assert_eq!(combined.value(), SENTINEL);
    }

    // ── IntoReading seam ─────────────────────────────────────────────

    #[test]
    fn into_reading_matches_direct_validation() {
        let word = with_parity(0x2222);
        assert_eq!(word.into_reading(), Reading::from_raw(word));

        let frame = MultiTurnFrame {
            position: word,
            turns: with_parity(0x0001),
        };
        assert_eq!(frame.into_reading(), frame.validate().combined());
    }
}
