//! RECE-232: error-correcting ASCII encoding of 32-bit words.
//!
//! Messages are meant for plain ASCII serial links (RS-232 and the like) where
//! characters are sometimes corrupted or silently dropped. Each longword becomes
//! an eight-character group with its own parity, groups are chained by a running
//! checksum, and a three-character footer closes the message.
//!
//! The decoder recovers from:
//! - any single dropped character
//! - any single corrupted character in the groups
//! - a footer with one corrupted or missing character
//!
//! # Examples
//!
//! ```
//! use rece232::{decode, encode, DecoderOptions, EncoderOptions};
//!
//! let mut message = encode(0x01, &[425364522, -7, 0], EncoderOptions::default()).unwrap();
//! message.remove(5);
//!
//! let decoded = decode(&message, DecoderOptions::default()).unwrap();
//! assert_eq!(decoded.header(), 0x01);
//! assert_eq!(decoded.longwords(), &[425364522, -7, 0]);
//! ```

pub mod channel;
pub mod checksum;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod group;
pub mod options;
pub mod simulation;

pub use checksum::{Crc16Dnp, Fletcher, MessageChecksum};
pub use decoder::{Decoder, Message};
pub use encoder::{encoded_len, Encoder};
pub use error::{DecodeError, EncodeError, Error, Result};
pub use options::{DecoderOptions, EncoderOptions};

/// Encode a whole message with the canonical checksum
pub fn encode(header: u8, longwords: &[i32], options: EncoderOptions) -> Result<Vec<u8>> {
    Ok(Encoder::new(options).encode(header, longwords)?)
}

/// Decode a whole message with the canonical checksum
pub fn decode(bytes: &[u8], options: DecoderOptions) -> Result<Message> {
    Ok(Decoder::new(options).decode(bytes)?)
}
