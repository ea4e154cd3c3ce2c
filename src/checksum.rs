//! Running message checksums.
//!
//! Every slot value of a message is folded into a running checksum. The checksum
//! serves two purposes:
//! - after each group, a 6-bit projection of it becomes the next group's spacer
//! - after the last group, its 16-bit value is written to the footer
//!
//! Two strategies are provided:
//! - [`Fletcher`]: two mod-255 sums over CRC-8 lookups (the canonical wire format)
//! - [`Crc16Dnp`]: a reflected CRC-16-DNP register folded one nibble at a time
//!
//! The strategies produce different wire formats. An encoder and a decoder must
//! be built with the same one.
//!
//! # Examples
//!
//! ```
//! use rece232::checksum::{Fletcher, MessageChecksum};
//!
//! let fletcher = Fletcher;
//! let state = fletcher.checksum_slots(&[31, 63, 31, 63, 31, 63, 31, 0]);
//! assert!(fletcher.partial(state) < 64);
//! ```

use std::fmt::Debug;

use crate::group::{GROUP_LEN, SIX_BIT_MASK};

pub mod crc16;
pub mod fletcher;
pub mod table;

pub use crc16::Crc16Dnp;
pub use fletcher::Fletcher;
pub use table::{crc8, integrity};

/// A running checksum over the slot values of a message.
///
/// The state is an opaque register owned by the caller, so encoder and decoder
/// can snapshot it freely.
pub trait MessageChecksum: Debug {
    /// Get name of the checksum algorithm
    fn name(&self) -> &str;

    /// Register value before the first slot
    fn initial(&self) -> u32;

    /// Fold one normalized slot value into the register.
    ///
    /// `slot` is the position of the value inside its group (0..8).
    fn accumulate(&self, state: u32, slot: usize, value: u8) -> u32;

    /// 6-bit projection of the register, used as the next group's spacer
    fn partial(&self, state: u32) -> u8;

    /// 16-bit value written to the footer
    fn finalize(&self, state: u32) -> u16;

    /// Fold a whole group into the register
    fn accumulate_group(&self, state: u32, group: &[u8; GROUP_LEN]) -> u32 {
        group
            .iter()
            .enumerate()
            .fold(state, |acc, (slot, &value)| self.accumulate(acc, slot, value))
    }

    /// Checksum a run of slots starting at the first slot of a group
    fn checksum_slots(&self, slots: &[u8]) -> u32 {
        slots.iter().enumerate().fold(self.initial(), |acc, (i, &value)| {
            self.accumulate(acc, i % GROUP_LEN, value)
        })
    }
}

/// Position tag mixed into each slot value: slot index modulo 4 in the top two bits.
pub(crate) fn tagged(slot: usize, value: u8) -> u8 {
    (value & SIX_BIT_MASK) | (((slot & 0b11) as u8) << 6)
}
