//! Stateful message decoder.
//!
//! Decoding runs in four stages:
//! 1. classify the footer into an error signature ([`footer`])
//! 2. align the payload bytes to group slots, locating gaps ([`classify`])
//! 3. fill gaps from group parity and flag groups whose parity fails
//! 4. repair flagged groups and verify the message checksum ([`correct`])
//!
//! Either the whole message is recovered or nothing is: a failed `load` leaves
//! the decoder empty.
//!
//! # Examples
//!
//! ```
//! use rece232::decoder::Decoder;
//! use rece232::encoder::Encoder;
//!
//! let mut message = Encoder::default().encode(0x01, &[425364522; 3]).unwrap();
//! message[10] ^= 0x80;
//!
//! let mut decoder = Decoder::default();
//! decoder.load(&message).unwrap();
//! assert_eq!(decoder.header(), Some(0x01));
//! assert_eq!(decoder.longwords(), &[425364522; 3]);
//! ```

use log::debug;

use crate::checksum::{Fletcher, MessageChecksum};
use crate::error::DecodeError;
use crate::group::{longword, FOOTER_LEN, GROUP_LEN, SPACER_SLOT};
use crate::options::DecoderOptions;

pub mod classify;
pub mod correct;
pub mod footer;

use correct::{Corrector, Snapshot};
use footer::{classify_footer, FooterReading};

/// Shortest payload that can still hold one group with a dropped character
pub const MIN_PAYLOAD_LEN: usize = GROUP_LEN - 1;

/// A recovered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    header: u8,
    longwords: Vec<i32>,
}

impl Message {
    fn from_slots(slots: &[u8]) -> Self {
        Self {
            header: slots[SPACER_SLOT],
            longwords: slots.chunks(GROUP_LEN).map(longword).collect(),
        }
    }

    /// 6-bit header
    pub fn header(&self) -> u8 {
        self.header
    }

    pub fn longwords(&self) -> &[i32] {
        &self.longwords
    }

    pub fn into_longwords(self) -> Vec<i32> {
        self.longwords
    }
}

/// Recovers messages produced by an [`Encoder`](crate::encoder::Encoder) built
/// with the same checksum strategy.
#[derive(Debug)]
pub struct Decoder<C: MessageChecksum = Fletcher> {
    options: DecoderOptions,
    checksum: C,
    message: Option<Message>,
}

impl Default for Decoder<Fletcher> {
    fn default() -> Self {
        Self::new(DecoderOptions::default())
    }
}

impl Decoder<Fletcher> {
    /// Create a decoder for the canonical Fletcher checksum
    pub fn new(options: DecoderOptions) -> Self {
        Self::with_checksum(options, Fletcher)
    }
}

impl<C: MessageChecksum> Decoder<C> {
    /// Create a decoder with an explicit checksum strategy
    pub fn with_checksum(options: DecoderOptions, checksum: C) -> Self {
        Self {
            options,
            checksum,
            message: None,
        }
    }

    pub fn options(&self) -> DecoderOptions {
        self.options
    }

    /// Decode `bytes`, replacing whatever the previous call recovered.
    ///
    /// # Errors
    /// - [`DecodeError::TooShort`] if fewer than 7 bytes precede the footer
    /// - [`DecodeError::CorruptedChecksum`] if the footer is damaged and the
    ///   decoder is set to fail on that
    /// - [`DecodeError::UnrecoverableFooter`] if the footer matches no signature
    /// - [`DecodeError::Misaligned`] if the payload cannot be aligned to groups
    /// - [`DecodeError::ChecksumMismatch`] if no repair satisfies the checksums
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        self.message = None;
        let slots = self.recover(bytes)?;
        self.message = Some(Message::from_slots(&slots));
        Ok(())
    }

    /// Decode `bytes` into an owned message
    pub fn decode(&mut self, bytes: &[u8]) -> Result<Message, DecodeError> {
        self.load(bytes)?;
        self.message.clone().ok_or(DecodeError::ChecksumMismatch)
    }

    fn recover(&self, bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
        let len = bytes.len();
        if len < FOOTER_LEN + MIN_PAYLOAD_LEN {
            return Err(DecodeError::TooShort { len });
        }

        let mut tail = [0u8; FOOTER_LEN];
        tail.copy_from_slice(&bytes[len - FOOTER_LEN..]);
        let footer = classify_footer(&tail, self.options.converts_tabs());
        if self.options.fails_on_corrupted_checksum()
            && !matches!(&footer, Ok(reading) if reading.is_intact())
        {
            return Err(DecodeError::CorruptedChecksum);
        }
        let footer = footer?;

        let word_count = (len - FOOTER_LEN).div_ceil(GROUP_LEN);
        debug!(
            "decoding {} bytes as {} longwords, footer {:?}",
            len, word_count, footer.signature
        );

        let mut outcome = Err(DecodeError::Misaligned);
        for &footer_width in footer.footer_widths() {
            let payload = &bytes[..len - footer_width];
            let Some(alignment) =
                classify::align(payload, word_count, self.options.converts_tabs())
            else {
                continue;
            };

            let snapshot = Snapshot::from_gaps(alignment.slots, &alignment.gaps);
            debug!(
                "aligned with {} dropped, bad groups {:?}",
                alignment.dropped,
                bad_groups(&snapshot)
            );

            match self.repair(&snapshot, &footer) {
                Some(slots) => return Ok(slots),
                None => outcome = Err(DecodeError::ChecksumMismatch),
            }
        }

        debug!("decode failed: {:?}", outcome);
        outcome
    }

    fn repair(&self, snapshot: &Snapshot, footer: &FooterReading) -> Option<Vec<u8>> {
        let search =
            footer.is_intact() || !self.options.skips_recovery_on_corrupted_checksum();
        Corrector::new(&self.checksum, footer, search).correct(snapshot)
    }

    /// Header of the last recovered message
    pub fn header(&self) -> Option<u8> {
        self.message.as_ref().map(Message::header)
    }

    /// Number of longwords in the last recovered message, zero if none
    pub fn word_count(&self) -> usize {
        self.message.as_ref().map_or(0, |m| m.longwords.len())
    }

    /// Longword `index` of the last recovered message
    pub fn longword(&self, index: usize) -> Option<i32> {
        self.message.as_ref()?.longwords.get(index).copied()
    }

    /// All longwords of the last recovered message
    pub fn longwords(&self) -> &[i32] {
        self.message
            .as_ref()
            .map(Message::longwords)
            .unwrap_or_default()
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

fn bad_groups(snapshot: &Snapshot) -> Vec<usize> {
    snapshot
        .bad
        .iter()
        .enumerate()
        .filter_map(|(n, &bad)| bad.then_some(n))
        .collect()
}
