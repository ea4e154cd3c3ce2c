//! Error types for the RECE-232 codec.
//!
//! Encoder errors are caller contract violations (calls out of sequence, wrong
//! number of longwords). Decoder errors describe the quality of the received data.
//! The two are kept apart so that misuse is never mistaken for line noise.

use thiserror::Error;

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Encoder was driven out of sequence
    #[error("encoder error: {0}")]
    Encode(#[from] EncodeError),

    /// Received message could not be recovered
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Invalid argument
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Encoder state-contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// `append_longword` or `finish` called before `init`
    #[error("encoder has not been initialized")]
    NotInitialized,

    /// `init` called with a word count of zero
    #[error("must encode at least one longword")]
    EmptyMessage,

    /// More longwords appended than announced in `init`
    #[error("exceeded the {expected} longwords announced at init")]
    TooManyLongwords { expected: usize },

    /// `finish` called before every announced longword was appended
    #[error("expected {remaining} more longwords")]
    MissingLongwords { remaining: usize },

    /// `append_longword` or `finish` called after the message was finished
    #[error("message already finished; call init to start another")]
    AlreadyFinished,
}

/// Reasons a received message could not be recovered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer bytes than the smallest recoverable message
    #[error("message too short: {len} bytes")]
    TooShort { len: usize },

    /// Footer bytes match none of the recoverable error signatures
    #[error("unrecoverable footer signature {signature:#05x}")]
    UnrecoverableFooter { signature: u16 },

    /// Footer was not received intact and the decoder is set to reject that
    #[error("footer checksum corrupted")]
    CorruptedChecksum,

    /// No byte walk fits the expected group layout
    #[error("could not align payload bytes to groups")]
    Misaligned,

    /// No combination of repairs agrees with the message checksum
    #[error("message checksum mismatch")]
    ChecksumMismatch,
}

/// Type alias for Result with the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
