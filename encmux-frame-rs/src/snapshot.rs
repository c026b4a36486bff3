//! Per-cycle channel array.

use crate::word::Reading;

/// The normalized readings of one complete acquisition cycle.
///
/// Always exactly `N` words, in channel-index order: each slot holds either
/// a 14-bit position value or the sentinel. A snapshot is built once per
/// cycle from that cycle's validation results and handed to the relay by
/// value — there is no partial-update path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot<const N: usize> {
    words: [u16; N],
}

impl<const N: usize> Snapshot<N> {
    /// Build a snapshot from one cycle's readings.
    pub fn from_readings(readings: &[Reading; N]) -> Self {
        let mut words = [0u16; N];
        for (slot, reading) in words.iter_mut().zip(readings) {
            *slot = reading.value();
        }
        Self { words }
    }

    /// Validate and normalize raw words directly. Convenience for callers
    /// that do not need the intermediate [`Reading`]s.
    pub fn from_raw(raw: &[u16; N]) -> Self {
        let mut words = [0u16; N];
        for (slot, &word) in words.iter_mut().zip(raw) {
            *slot = Reading::from_raw(word).value();
        }
        Self { words }
    }

    /// The normalized words, in channel order.
    pub fn words(&self) -> &[u16; N] {
        &self.words
    }

    /// Serialize to the relay wire layout: `N` words, each least-significant
    /// byte first, no header or checksum.
    ///
    /// Only the first `2 * N` bytes of `out` are written.
    ///
    /// # Panics
    ///
    /// If `out` is shorter than `2 * N` bytes — a truncated block would
    /// silently desynchronize the downstream master.
    pub fn copy_to_le_bytes(&self, out: &mut [u8]) {
        assert!(
            out.len() >= 2 * N,
            "relay block needs {} bytes, got {}",
            2 * N,
            out.len()
        );
        for (chunk, word) in out.chunks_exact_mut(2).zip(self.words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::{with_parity, SENTINEL};

    #[test]
    fn snapshot_length_is_always_channel_count() {
        // All channels failing still yields a full-length array.
        let snapshot = Snapshot::<8>::from_raw(&[0u16; 8]);
        assert_eq!(snapshot.words().len(), 8);
        assert_eq!(snapshot.words(), &[SENTINEL; 8]);
    }

    #[test]
    fn valid_and_invalid_channels_coexist() {
        let raw = [
            with_parity(0x0010),
            0x0000, // parity failure
            with_parity(0x3fff),
            0x4001, // parity failure
        ];
        let snapshot = Snapshot::from_raw(&raw);
        assert_eq!(snapshot.words(), &[0x0010, SENTINEL, 0x3fff, SENTINEL]);
    }

    #[test]
    fn failing_channel_switches_to_sentinel_without_disturbing_others() {
        // Cycle K: channel 1 delivers a valid word.
        let cycle_k = [with_parity(0x0100), with_parity(0x0200), with_parity(0x0300)];
        let snap_k = Snapshot::from_raw(&cycle_k);
        assert_eq!(snap_k.words(), &[0x0100, 0x0200, 0x0300]);

        // Cycle K+1: channel 1 reads all-zero (disconnected line).
        let cycle_k1 = [with_parity(0x0100), 0x0000, with_parity(0x0300)];
        let snap_k1 = Snapshot::from_raw(&cycle_k1);
        assert_eq!(snap_k1.words(), &[0x0100, SENTINEL, 0x0300]);

        // The other channels are byte-identical across the two cycles.
        assert_eq!(snap_k.words()[0], snap_k1.words()[0]);
        assert_eq!(snap_k.words()[2], snap_k1.words()[2]);
    }

    #[test]
    fn from_readings_matches_from_raw() {
        let raw = [with_parity(0x0042), 0xffff];
        let readings = [
            crate::Reading::from_raw(raw[0]),
            crate::Reading::from_raw(raw[1]),
        ];
        assert_eq!(Snapshot::from_readings(&readings), Snapshot::from_raw(&raw));
    }

    #[test]
    #[should_panic(expected = "relay block needs 4 bytes")]
    fn short_wire_buffer_is_rejected() {
        let snapshot = Snapshot::<2>::from_raw(&[0u16; 2]);
        let mut buf = [0u8; 3];
        snapshot.copy_to_le_bytes(&mut buf);
    }

    #[test]
    fn wire_layout_is_little_endian_in_channel_order() {
        let snapshot = Snapshot::<2>::from_raw(&[with_parity(0x0201), 0x0000]);
        let mut buf = [0u8; 4];
        snapshot.copy_to_le_bytes(&mut buf);
        assert_eq!(buf, [0x01, 0x02, 0xff, 0x7f]);
    }
}
