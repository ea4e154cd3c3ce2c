//! Encoder and decoder configuration.
//!
//! Options are plain `Copy` structs configured builder-style and handed to the
//! encoder or decoder at construction:
//!
//! ```
//! use rece232::options::{DecoderOptions, EncoderOptions};
//!
//! let enc = EncoderOptions::new().use_tabs(true);
//! let dec = DecoderOptions::new()
//!     .convert_tabs(true)
//!     .skip_recovery_on_corrupted_checksum(true);
//! assert!(enc.uses_tabs());
//! assert!(dec.converts_tabs());
//! assert!(!dec.fails_on_corrupted_checksum());
//! ```

/// Encoder configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncoderOptions {
    use_tabs: bool,
}

impl EncoderOptions {
    /// Creates options with every flag off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a tab wherever a character would be the non-printable DEL (0x7F).
    pub fn use_tabs(mut self, use_tabs: bool) -> Self {
        self.use_tabs = use_tabs;
        self
    }

    pub fn uses_tabs(&self) -> bool {
        self.use_tabs
    }
}

/// Decoder configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderOptions {
    convert_tabs: bool,
    fail_on_corrupted_checksum: bool,
    skip_recovery_on_corrupted_checksum: bool,
}

impl DecoderOptions {
    /// Creates options with every flag off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a tab as DEL (0x7F). Pairs with [`EncoderOptions::use_tabs`].
    pub fn convert_tabs(mut self, convert_tabs: bool) -> Self {
        self.convert_tabs = convert_tabs;
        self
    }

    /// Reject the message unless all three footer characters arrived intact.
    ///
    /// By default a footer with one corrupted or missing character is accepted
    /// and only its intact bits are compared.
    pub fn fail_on_corrupted_checksum(mut self, fail: bool) -> Self {
        self.fail_on_corrupted_checksum = fail;
        self
    }

    /// Do not attempt group repairs when the footer is only partially trusted.
    ///
    /// Repairs are validated against the footer; with part of it missing, a
    /// wrong repair is more likely to slip through.
    pub fn skip_recovery_on_corrupted_checksum(mut self, skip: bool) -> Self {
        self.skip_recovery_on_corrupted_checksum = skip;
        self
    }

    pub fn converts_tabs(&self) -> bool {
        self.convert_tabs
    }

    pub fn fails_on_corrupted_checksum(&self) -> bool {
        self.fail_on_corrupted_checksum
    }

    pub fn skips_recovery_on_corrupted_checksum(&self) -> bool {
        self.skip_recovery_on_corrupted_checksum
    }
}
