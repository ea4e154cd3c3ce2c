//! Character groups: one longword as eight ASCII characters.
//!
//! A group has eight slots. Even slots carry 5-bit values rendered as
//! `0x20..=0x3F`; odd slots carry 6-bit values rendered as `0x40..=0x7F`.
//!
//! | slot | width | content                     |
//! |------|-------|-----------------------------|
//! | 0    | 5     | bits 0-4                    |
//! | 1    | 6     | bits 5-10                   |
//! | 2    | 5     | bits 11-15                  |
//! | 3    | 6     | spacer                      |
//! | 4    | 5     | bits 16-20                  |
//! | 5    | 6     | bits 21-26                  |
//! | 6    | 5     | bits 27-31                  |
//! | 7    | 6     | parity                      |
//!
//! The parity slot makes the XOR of all eight values equal to `0b111111`, so
//! any single missing value can be recomputed exactly from the other seven.
//!
//! Because the widths alternate, a dropped character shifts every following
//! character into a slot of the wrong width, which is what lets the decoder
//! tell a drop from a corruption.

/// Characters per group
pub const GROUP_LEN: usize = 8;
/// Characters in the footer
pub const FOOTER_LEN: usize = 3;
/// Slot that carries the header or the running-checksum spacer
pub const SPACER_SLOT: usize = 3;
/// Slot that carries the group parity
pub const PARITY_SLOT: usize = 7;

pub const FIVE_BIT_MASK: u8 = 0b01_1111;
pub const SIX_BIT_MASK: u8 = 0b11_1111;
/// XOR of all eight slot values of a valid group
pub const PARITY_TARGET: u8 = SIX_BIT_MASK;

const FIVE_BIT_BASE: u8 = 0x20;
const SIX_BIT_BASE: u8 = 0x40;
/// ASCII DEL, the rendering of the 6-bit value 63
pub const DEL: u8 = 0x7F;
/// Printable stand-in for DEL when tabs are enabled
pub const TAB: u8 = b'\t';

/// Alphabet class of a received character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotClass {
    /// `0x20..=0x3F`
    FiveBit,
    /// `0x40..=0x7F`
    SixBit,
    /// Anything else
    Invalid,
}

impl SlotClass {
    /// Classify a received byte. With `convert_tabs`, a tab is read as DEL.
    pub fn of(byte: u8, convert_tabs: bool) -> Self {
        match convert_input(byte, convert_tabs) {
            0x20..=0x3F => SlotClass::FiveBit,
            0x40..=0x7F => SlotClass::SixBit,
            _ => SlotClass::Invalid,
        }
    }

    /// Class a slot position is rendered in
    pub fn expected(slot: usize) -> Self {
        if slot % 2 == 0 {
            SlotClass::FiveBit
        } else {
            SlotClass::SixBit
        }
    }

    /// Strip the alphabet base from a byte of this class
    pub fn normalize(self, byte: u8) -> Option<u8> {
        match self {
            SlotClass::FiveBit => Some(byte - FIVE_BIT_BASE),
            SlotClass::SixBit => Some(byte - SIX_BIT_BASE),
            SlotClass::Invalid => None,
        }
    }

    /// Largest value a slot of this class can hold
    pub fn max_value(self) -> u8 {
        match self {
            SlotClass::FiveBit => FIVE_BIT_MASK,
            _ => SIX_BIT_MASK,
        }
    }
}

/// Map tab to DEL when tab conversion is enabled
pub fn convert_input(byte: u8, convert_tabs: bool) -> u8 {
    if convert_tabs && byte == TAB {
        DEL
    } else {
        byte
    }
}

/// Render a normalized value for the given slot position
pub fn render_slot(slot: usize, value: u8) -> u8 {
    match SlotClass::expected(slot) {
        SlotClass::FiveBit => (value & FIVE_BIT_MASK) | FIVE_BIT_BASE,
        _ => (value & SIX_BIT_MASK) | SIX_BIT_BASE,
    }
}

/// XOR of `values`, inverted over six bits.
///
/// Over seven values this is the parity slot (or the value of a missing slot);
/// over a full group it is the correction delta, zero when the group is valid.
pub fn group_parity(values: &[u8]) -> u8 {
    values.iter().fold(0, |acc, &v| acc ^ v) ^ PARITY_TARGET
}

/// Whether a full group satisfies the parity invariant
pub fn parity_ok(group: &[u8]) -> bool {
    group_parity(group) == 0
}

/// Whether each slot holds a value that fits its width
pub fn widths_ok(group: &[u8]) -> bool {
    group
        .iter()
        .enumerate()
        .all(|(slot, &v)| v <= SlotClass::expected(slot).max_value())
}

/// Split a longword and a spacer into the eight normalized slot values
pub fn encode_group(value: i32, spacer: u8) -> [u8; GROUP_LEN] {
    let bits = value as u32;
    let mut group = [
        (bits & 0x1F) as u8,
        ((bits >> 5) & 0x3F) as u8,
        ((bits >> 11) & 0x1F) as u8,
        spacer & SIX_BIT_MASK,
        ((bits >> 16) & 0x1F) as u8,
        ((bits >> 21) & 0x3F) as u8,
        ((bits >> 27) & 0x1F) as u8,
        0,
    ];
    group[PARITY_SLOT] = group_parity(&group[..PARITY_SLOT]);
    group
}

/// Render normalized slot values as ASCII
pub fn render_group(group: &[u8; GROUP_LEN]) -> [u8; GROUP_LEN] {
    let mut ascii = [0u8; GROUP_LEN];
    for (slot, (out, &value)) in ascii.iter_mut().zip(group.iter()).enumerate() {
        *out = render_slot(slot, value);
    }
    ascii
}

/// Reassemble the longword carried by a group of normalized values.
///
/// Returns the value and whether the group's parity holds. The spacer and parity
/// slots are not part of the payload.
pub fn decode_group(group: &[u8; GROUP_LEN]) -> (i32, bool) {
    (longword(group), parity_ok(group))
}

pub(crate) fn longword(group: &[u8]) -> i32 {
    let bits = (group[0] as u32)
        | (group[1] as u32) << 5
        | (group[2] as u32) << 11
        | (group[4] as u32) << 16
        | (group[5] as u32) << 21
        | (group[6] as u32) << 27;
    bits as i32
}

/// Parse eight ASCII characters back into normalized values.
///
/// Returns `None` if any character is outside its slot's class.
pub fn parse_group(ascii: &[u8; GROUP_LEN], convert_tabs: bool) -> Option<[u8; GROUP_LEN]> {
    let mut group = [0u8; GROUP_LEN];
    for (slot, (out, &byte)) in group.iter_mut().zip(ascii.iter()).enumerate() {
        let byte = convert_input(byte, convert_tabs);
        let class = SlotClass::of(byte, false);
        if class != SlotClass::expected(slot) {
            return None;
        }
        *out = class.normalize(byte)?;
    }
    Some(group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_ones() {
        let group = encode_group(-1, 0x3F);
        assert_eq!(group, [31, 63, 31, 63, 31, 63, 31, 0]);
        assert_eq!(&render_group(&group), b"?\x7F?\x7F?\x7F?@");
    }

    #[test]
    fn test_zero() {
        let group = encode_group(0, 0);
        assert_eq!(&render_group(&group), b" @ @ @ \x7F");
    }

    #[test]
    fn test_decode_group() {
        for value in [0, 1, -1, i32::MAX, i32::MIN, 425364522, -234567865] {
            let group = encode_group(value, 0x15);
            assert_eq!(decode_group(&group), (value, true));
            assert_eq!(group[SPACER_SLOT], 0x15);
        }
    }

    #[test]
    fn test_parity_detects_single_change() {
        let mut group = encode_group(1243546544, 7);
        assert!(parity_ok(&group));
        group[2] ^= 0b100;
        let (_, ok) = decode_group(&group);
        assert!(!ok);
        assert_eq!(group_parity(&group), 0b100);
    }

    #[test]
    fn test_missing_value_recomputed_from_parity() {
        let group = encode_group(145687, 0x2A);
        for missing in 0..GROUP_LEN {
            let others: Vec<u8> = group
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != missing)
                .map(|(_, &v)| v)
                .collect();
            assert_eq!(group_parity(&others), group[missing]);
        }
    }

    #[test]
    fn test_slot_class() {
        assert_eq!(SlotClass::of(b' ', false), SlotClass::FiveBit);
        assert_eq!(SlotClass::of(b'?', false), SlotClass::FiveBit);
        assert_eq!(SlotClass::of(b'@', false), SlotClass::SixBit);
        assert_eq!(SlotClass::of(DEL, false), SlotClass::SixBit);
        assert_eq!(SlotClass::of(TAB, false), SlotClass::Invalid);
        assert_eq!(SlotClass::of(TAB, true), SlotClass::SixBit);
        assert_eq!(SlotClass::of(0xA0, false), SlotClass::Invalid);
        assert_eq!(SlotClass::of(0x1F, false), SlotClass::Invalid);
    }

    #[test]
    fn test_parse_group() {
        let ascii = render_group(&encode_group(-1, 0x3F));
        assert_eq!(parse_group(&ascii, false), Some(encode_group(-1, 0x3F)));

        let tabbed = *b"?\t?\t?\t?@";
        assert_eq!(parse_group(&tabbed, false), None);
        assert_eq!(parse_group(&tabbed, true), Some(encode_group(-1, 0x3F)));
    }

    #[test]
    fn test_widths_ok() {
        assert!(widths_ok(&encode_group(-1, 63)));
        let mut group = encode_group(0, 0);
        group[0] = 32;
        assert!(!widths_ok(&group));
    }
}
