//! Footer error signatures.
//!
//! The footer has no following spacer to cross-check against, so instead of the
//! general walk its three characters are classified independently and matched
//! against a fixed table. Each character is judged 5-bit, 6-bit or invalid:
//!
//! | classes | reading                    | trusted bits |
//! |---------|----------------------------|--------------|
//! | 5 6 5   | intact                     | all          |
//! | ! 6 5   | character 0 corrupted      | 5..16        |
//! | 5 ! 5   | character 1 corrupted      | 0..5, 11..16 |
//! | 5 6 !   | character 2 corrupted      | 0..11        |
//! | 6 6 5   | character 0 dropped        | 5..16        |
//! | 6 5 5   | character 1 dropped        | 0..5, 11..16 |
//! | 6 5 6   | character 2 dropped        | 0..11        |
//!
//! In the "dropped" rows the first of the last three bytes is really the parity
//! character of the final group, so the payload extends one byte further.

use crate::error::DecodeError;
use crate::group::{SlotClass, FOOTER_LEN};

/// Every footer bit trusted
pub const FULL_MASK: u16 = 0b11111_111111_11111;
const MASK_WITHOUT_LOW: u16 = 0b11111_111111_00000;
const MASK_WITHOUT_MID: u16 = 0b11111_000000_11111;
const MASK_WITHOUT_HIGH: u16 = 0b00000_111111_11111;

/// Which footer character, if any, was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterSignature {
    /// All three characters intact
    Intact,
    /// The character at this position is outside the alphabet
    Corrupted(usize),
    /// The character at this position is missing from the stream
    Dropped(usize),
}

/// A classified footer: recovered checksum bits and which of them to trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterReading {
    pub signature: FooterSignature,
    pub value: u16,
    pub mask: u16,
}

impl FooterReading {
    pub fn is_intact(&self) -> bool {
        self.signature == FooterSignature::Intact
    }

    /// Whether a recomputed checksum agrees on every trusted bit
    pub fn matches(&self, checksum: u16) -> bool {
        checksum & self.mask == self.value
    }

    /// Number of trailing bytes that are not payload, most likely first.
    ///
    /// A dropped first character reads exactly like a first character whose
    /// bit 6 flipped, so that signature also tries the regular layout.
    pub fn footer_widths(&self) -> &'static [usize] {
        match self.signature {
            FooterSignature::Dropped(0) => &[FOOTER_LEN - 1, FOOTER_LEN],
            FooterSignature::Dropped(_) => &[FOOTER_LEN - 1],
            _ => &[FOOTER_LEN],
        }
    }
}

/// Signature code: one nibble per character, `0` 5-bit, `1` 6-bit, `F` invalid.
fn signature_code(classes: &[SlotClass; FOOTER_LEN]) -> u16 {
    classes.iter().fold(0u16, |code, class| {
        let nibble = match class {
            SlotClass::FiveBit => 0x0,
            SlotClass::SixBit => 0x1,
            SlotClass::Invalid => 0xF,
        };
        (code << 4) | nibble
    })
}

/// Classify the last three bytes of a message.
///
/// # Errors
/// [`DecodeError::UnrecoverableFooter`] for any pattern outside the table above
pub fn classify_footer(
    tail: &[u8; FOOTER_LEN],
    convert_tabs: bool,
) -> Result<FooterReading, DecodeError> {
    let classes = tail.map(|byte| SlotClass::of(byte, convert_tabs));
    let b: [u16; FOOTER_LEN] = std::array::from_fn(|i| {
        let byte = crate::group::convert_input(tail[i], convert_tabs);
        classes[i].normalize(byte).unwrap_or(0) as u16
    });

    use FooterSignature::*;
    let (signature, value, mask) = match signature_code(&classes) {
        0x010 => (Intact, b[2] << 11 | b[1] << 5 | b[0], FULL_MASK),
        0xF10 => (Corrupted(0), b[2] << 11 | b[1] << 5, MASK_WITHOUT_LOW),
        0x0F0 => (Corrupted(1), b[2] << 11 | b[0], MASK_WITHOUT_MID),
        0x01F => (Corrupted(2), b[1] << 5 | b[0], MASK_WITHOUT_HIGH),
        0x110 => (Dropped(0), b[2] << 11 | b[1] << 5, MASK_WITHOUT_LOW),
        0x100 => (Dropped(1), b[2] << 11 | b[1], MASK_WITHOUT_MID),
        0x101 => (Dropped(2), b[2] << 5 | b[1], MASK_WITHOUT_HIGH),
        signature => return Err(DecodeError::UnrecoverableFooter { signature }),
    };

    Ok(FooterReading {
        signature,
        value,
        mask,
    })
}
