//! CRC-8 lookup table used as the per-byte integrity value.
//!
//! The table is the reflected Dallas/Maxim 1-Wire CRC-8 (`x^8 + x^5 + x^4 + 1`,
//! reversed polynomial `0x8C`). It is generated once per process, on first use.

use std::sync::OnceLock;

/// Reversed form of the Dallas/Maxim polynomial 0x31
pub const CRC8_POLYNOMIAL: u8 = 0x8C;

static CRC8_TABLE: OnceLock<[u8; 256]> = OnceLock::new();

/// Generate the reflected lookup table for `polynomial`
fn generate_table(polynomial: u8) -> [u8; 256] {
    let mut table = [0u8; 256];

    for (i, entry) in table.iter_mut().enumerate() {
        let mut crc = i as u8;
        for _ in 0..8 {
            crc = (crc >> 1) ^ (if (crc & 1) != 0 { polynomial } else { 0 });
        }
        *entry = crc;
    }

    table
}

/// Look up the CRC-8 of a single byte
pub fn crc8(index: u8) -> u8 {
    CRC8_TABLE.get_or_init(|| generate_table(CRC8_POLYNOMIAL))[index as usize]
}

/// Integrity value of a normalized slot value at `slot` within its group
pub fn integrity(value: u8, slot: usize) -> u8 {
    crc8(super::tagged(slot, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_entries() {
        assert_eq!(crc8(0), 0);
        assert_eq!(crc8(1), 94);
        assert_eq!(crc8(2), 188);
        assert_eq!(crc8(16), 157);
        assert_eq!(crc8(128), 140);
        assert_eq!(crc8(255), 53);
    }

    #[test]
    fn test_table_is_a_permutation() {
        let mut seen = [false; 256];
        for i in 0..=255u8 {
            seen[crc8(i) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_integrity_uses_slot_tag() {
        assert_eq!(integrity(1, 0), crc8(0x01));
        assert_eq!(integrity(1, 1), crc8(0x41));
        assert_eq!(integrity(1, 5), crc8(0x41));
        assert_eq!(integrity(63, 7), crc8(0xFF));
    }
}
