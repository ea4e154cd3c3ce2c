//! Stateful message encoder.
//!
//! A message is built in three steps:
//! 1. [`Encoder::init`] with a 6-bit header and the number of longwords
//! 2. [`Encoder::append_longword`] once per longword
//! 3. [`Encoder::finish`] to append the footer and take the bytes
//!
//! The header becomes the spacer of the first group; every later spacer is a
//! projection of the running checksum over all groups before it.
//!
//! # Examples
//!
//! ```
//! use rece232::encoder::Encoder;
//!
//! let mut encoder = Encoder::default();
//! encoder.init(0x01, 2).unwrap();
//! encoder.append_longword(7).unwrap();
//! encoder.append_longword(-7).unwrap();
//! let message = encoder.finish().unwrap();
//! assert_eq!(message.len(), 19);
//! ```

use crate::checksum::{Fletcher, MessageChecksum};
use crate::error::EncodeError;
use crate::group::{
    encode_group, render_group, render_slot, DEL, FOOTER_LEN, GROUP_LEN, SIX_BIT_MASK, TAB,
};
use crate::options::EncoderOptions;

/// Length of an encoded message carrying `word_count` longwords
pub fn encoded_len(word_count: usize) -> usize {
    GROUP_LEN * word_count + FOOTER_LEN
}

/// Render the 16-bit message checksum as a 5/6/5-bit footer
pub(crate) fn render_footer(checksum: u16) -> [u8; FOOTER_LEN] {
    let value = checksum as u32;
    [
        render_slot(0, (value & 0x1F) as u8),
        render_slot(1, ((value >> 5) & 0x3F) as u8),
        render_slot(2, ((value >> 11) & 0x1F) as u8),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncoderState {
    Uninitialized,
    Ready { remaining: usize },
    Finished,
}

/// Builds one message at a time. Reusable: call `init` again after `finish`.
#[derive(Debug)]
pub struct Encoder<C: MessageChecksum = Fletcher> {
    options: EncoderOptions,
    checksum: C,
    state: EncoderState,
    word_count: usize,
    ascii: Vec<u8>,
    running: u32,
    spacer: u8,
}

impl Default for Encoder<Fletcher> {
    fn default() -> Self {
        Self::new(EncoderOptions::default())
    }
}

impl Encoder<Fletcher> {
    /// Create an encoder using the canonical Fletcher checksum
    pub fn new(options: EncoderOptions) -> Self {
        Self::with_checksum(options, Fletcher)
    }
}

impl<C: MessageChecksum> Encoder<C> {
    /// Create an encoder with an explicit checksum strategy
    pub fn with_checksum(options: EncoderOptions, checksum: C) -> Self {
        let running = checksum.initial();
        Self {
            options,
            checksum,
            state: EncoderState::Uninitialized,
            word_count: 0,
            ascii: Vec::new(),
            running,
            spacer: 0,
        }
    }

    pub fn options(&self) -> EncoderOptions {
        self.options
    }

    /// Start a new message.
    ///
    /// Only the low six bits of `header` are kept. Any message in progress is
    /// discarded.
    ///
    /// # Errors
    /// [`EncodeError::EmptyMessage`] if `word_count` is zero
    pub fn init(&mut self, header: u8, word_count: usize) -> Result<&mut Self, EncodeError> {
        if word_count == 0 {
            return Err(EncodeError::EmptyMessage);
        }

        self.word_count = word_count;
        self.running = self.checksum.initial();
        self.spacer = header & SIX_BIT_MASK;
        self.ascii = Vec::with_capacity(encoded_len(word_count));
        self.state = EncoderState::Ready {
            remaining: word_count,
        };
        Ok(self)
    }

    /// Append the next longword as one group.
    ///
    /// # Errors
    /// - [`EncodeError::NotInitialized`] before `init`
    /// - [`EncodeError::TooManyLongwords`] once every announced longword is in
    /// - [`EncodeError::AlreadyFinished`] after `finish`
    pub fn append_longword(&mut self, value: i32) -> Result<&mut Self, EncodeError> {
        let remaining = match self.state {
            EncoderState::Uninitialized => return Err(EncodeError::NotInitialized),
            EncoderState::Finished => return Err(EncodeError::AlreadyFinished),
            EncoderState::Ready { remaining: 0 } => {
                return Err(EncodeError::TooManyLongwords {
                    expected: self.word_count,
                })
            }
            EncoderState::Ready { remaining } => remaining,
        };

        let group = encode_group(value, self.spacer);
        self.running = self.checksum.accumulate_group(self.running, &group);
        self.ascii.extend_from_slice(&render_group(&group));
        self.spacer = self.checksum.partial(self.running);
        self.state = EncoderState::Ready {
            remaining: remaining - 1,
        };
        Ok(self)
    }

    /// Append the footer and hand out the finished message.
    ///
    /// # Errors
    /// - [`EncodeError::NotInitialized`] before `init`
    /// - [`EncodeError::MissingLongwords`] if longwords are still owed
    /// - [`EncodeError::AlreadyFinished`] if called twice
    pub fn finish(&mut self) -> Result<Vec<u8>, EncodeError> {
        match self.state {
            EncoderState::Uninitialized => return Err(EncodeError::NotInitialized),
            EncoderState::Finished => return Err(EncodeError::AlreadyFinished),
            EncoderState::Ready { remaining } if remaining > 0 => {
                return Err(EncodeError::MissingLongwords { remaining })
            }
            EncoderState::Ready { .. } => {}
        }

        let footer = render_footer(self.checksum.finalize(self.running));
        self.ascii.extend_from_slice(&footer);
        self.state = EncoderState::Finished;

        let mut ascii = std::mem::take(&mut self.ascii);
        if self.options.uses_tabs() {
            for byte in ascii.iter_mut().filter(|b| **b == DEL) {
                *byte = TAB;
            }
        }
        Ok(ascii)
    }

    /// Encode a whole message in one call
    pub fn encode(&mut self, header: u8, longwords: &[i32]) -> Result<Vec<u8>, EncodeError> {
        self.init(header, longwords.len())?;
        for &value in longwords {
            self.append_longword(value)?;
        }
        self.finish()
    }
}
