//! CRC-16-DNP running checksum, folded four bits at a time.
//!
//! The register is seeded with [`CRC16_DNP_INIT`] and uses the reflected DNP
//! polynomial [`CRC16_DNP_POLYNOMIAL`]. Each slot feeds its position-tagged byte
//! as two nibbles, low nibble first. The spacer projection concatenates register
//! bits 0-1, 5-6 and 10-11; the footer carries the whole register.

use std::fmt::{Display, Formatter};

use super::{tagged, MessageChecksum};

/// Bit-reversed form of the DNP polynomial 0x3D65
pub const CRC16_DNP_POLYNOMIAL: u16 = 0xA6BC;
/// Register seed
pub const CRC16_DNP_INIT: u16 = 0x1AF7;

/// CRC-16-DNP with a 16-entry nibble table.
#[derive(Debug, Clone)]
pub struct Crc16Dnp {
    /// Generator polynomial (reflected)
    polynomial: u16,
    /// Initial register value
    initial_value: u16,
    /// Lookup table indexed by the low nibble of `register ^ input`
    table: [u16; 16],
}

impl Default for Crc16Dnp {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc16Dnp {
    /// Create the checksum with the standard polynomial and seed
    pub fn new() -> Self {
        Self::with_parameters(CRC16_DNP_POLYNOMIAL, CRC16_DNP_INIT)
    }

    /// Create the checksum with a custom reflected polynomial and seed
    pub fn with_parameters(polynomial: u16, initial_value: u16) -> Self {
        Self {
            polynomial,
            initial_value,
            table: Self::generate_table(polynomial),
        }
    }

    /// Generate the nibble table: four bit-serial steps per entry
    fn generate_table(polynomial: u16) -> [u16; 16] {
        let mut table = [0u16; 16];

        for (i, entry) in table.iter_mut().enumerate() {
            let mut crc = i as u16;
            for _ in 0..4 {
                crc = (crc >> 1) ^ (if (crc & 1) != 0 { polynomial } else { 0 });
            }
            *entry = crc;
        }

        table
    }

    fn fold_nibble(&self, crc: u16, nibble: u8) -> u16 {
        (crc >> 4) ^ self.table[((crc ^ nibble as u16) & 0x0F) as usize]
    }

    /// Get the polynomial used by the algorithm
    pub fn polynomial(&self) -> u16 {
        self.polynomial
    }
}

impl MessageChecksum for Crc16Dnp {
    fn name(&self) -> &str {
        "CRC-16-DNP/4"
    }

    fn initial(&self) -> u32 {
        self.initial_value as u32
    }

    fn accumulate(&self, state: u32, slot: usize, value: u8) -> u32 {
        let byte = tagged(slot, value);
        let crc = self.fold_nibble(state as u16, byte & 0x0F);
        self.fold_nibble(crc, byte >> 4) as u32
    }

    fn partial(&self, state: u32) -> u8 {
        let r = state as u16;
        ((r & 0b11) | (((r >> 5) & 0b11) << 2) | (((r >> 10) & 0b11) << 4)) as u8
    }

    fn finalize(&self, state: u32) -> u16 {
        state as u16
    }
}

impl Display for Crc16Dnp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (polynomial: 0x{:04X})", self.name(), self.polynomial)
    }
}
