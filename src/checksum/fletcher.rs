//! Fletcher-style running checksum.
//!
//! Two 8-bit sums are kept modulo 255. Each slot contributes the CRC-8 of its
//! position-tagged value to the low sum; the low sum is then added to the high
//! sum. The high sum's low six bits form the spacer of the next group and the
//! footer carries `(high << 8) | low`.

use std::fmt::{Display, Formatter};

use super::{table::integrity, MessageChecksum};
use crate::group::SIX_BIT_MASK;

const MODULUS: u32 = 255;

/// Fletcher checksum over CRC-8 lookups. This is the canonical RECE-232 format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fletcher;

impl Fletcher {
    fn split(state: u32) -> (u32, u32) {
        (state & 0xFF, (state >> 8) & 0xFF)
    }

    fn join(sum1: u32, sum2: u32) -> u32 {
        (sum2 << 8) | sum1
    }
}

impl MessageChecksum for Fletcher {
    fn name(&self) -> &str {
        "Fletcher-CRC8"
    }

    fn initial(&self) -> u32 {
        0
    }

    fn accumulate(&self, state: u32, slot: usize, value: u8) -> u32 {
        let (sum1, sum2) = Self::split(state);
        // Reducing on every byte is congruent to reducing once per group
        let sum1 = (sum1 + integrity(value, slot) as u32) % MODULUS;
        let sum2 = (sum2 + sum1) % MODULUS;
        Self::join(sum1, sum2)
    }

    fn partial(&self, state: u32) -> u8 {
        (Self::split(state).1 as u8) & SIX_BIT_MASK
    }

    fn finalize(&self, state: u32) -> u16 {
        let (sum1, sum2) = Self::split(state);
        Self::join(sum1, sum2) as u16
    }
}

impl Display for Fletcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (modulus: {})", self.name(), MODULUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::crc8;

    /// Reduction once per group, as a streaming encoder without per-byte
    /// reduction would compute it.
    fn per_group_reference(slots: &[u8]) -> u16 {
        let (mut sum1, mut sum2) = (0u32, 0u32);
        for group in slots.chunks(8) {
            for (slot, &value) in group.iter().enumerate() {
                sum1 += crc8(value | ((slot as u8 & 3) << 6)) as u32;
                sum2 += sum1;
            }
            sum1 %= 255;
            sum2 %= 255;
        }
        ((sum2 << 8) | sum1) as u16
    }

    #[test]
    fn test_initial_is_zero() {
        assert_eq!(Fletcher.finalize(Fletcher.initial()), 0);
        assert_eq!(Fletcher.partial(Fletcher.initial()), 0);
    }

    #[test]
    fn test_matches_per_group_reduction() {
        let slots: Vec<u8> = (0..48u32).map(|i| ((i * 37 + 11) % 64) as u8).collect();
        let state = Fletcher.checksum_slots(&slots);
        assert_eq!(Fletcher.finalize(state), per_group_reference(&slots));
    }

    #[test]
    fn test_partial_is_high_sum() {
        let state = Fletcher::join(0x12, 0xCA);
        assert_eq!(Fletcher.partial(state), 0xCA & 0x3F);
        assert_eq!(Fletcher.finalize(state), 0xCA12);
    }

    #[test]
    fn test_sums_stay_below_modulus() {
        let slots = [63u8; 64];
        let mut state = Fletcher.initial();
        for (i, &v) in slots.iter().enumerate() {
            state = Fletcher.accumulate(state, i % 8, v);
            let (sum1, sum2) = Fletcher::split(state);
            assert!(sum1 < 255 && sum2 < 255);
        }
    }
}
