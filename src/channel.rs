//! Noisy serial channel model.
//!
//! Each byte is dropped with probability `drop_probability`; each bit of a byte
//! that survives is flipped with probability `bit_flip_probability`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

/// What one pass through the channel did to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmission {
    pub bytes: Vec<u8>,
    pub flipped_bits: usize,
    pub dropped_bytes: usize,
}

impl Transmission {
    pub fn is_modified(&self) -> bool {
        self.flipped_bits > 0 || self.dropped_bytes > 0
    }
}

/// Seeded channel that corrupts and drops bytes.
#[derive(Debug, Clone)]
pub struct NoisyChannel {
    bit_flip_probability: f64,
    drop_probability: f64,
    rng: StdRng,
}

impl NoisyChannel {
    /// Creates a channel.
    ///
    /// # Errors
    /// [`Error::InvalidInput`] if a probability is outside `0.0..=1.0`
    pub fn new(bit_flip_probability: f64, drop_probability: f64, seed: u64) -> Result<Self> {
        for (name, p) in [
            ("bit flip", bit_flip_probability),
            ("drop", drop_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::InvalidInput(format!(
                    "{} probability {} is outside [0, 1]",
                    name, p
                )));
            }
        }

        Ok(Self {
            bit_flip_probability,
            drop_probability,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Pass `message` through the channel
    pub fn transmit(&mut self, message: &[u8]) -> Transmission {
        let mut bytes = Vec::with_capacity(message.len());
        let mut flipped_bits = 0;
        let mut dropped_bytes = 0;

        for &byte in message {
            if self.rng.gen_bool(self.drop_probability) {
                dropped_bytes += 1;
                continue;
            }
            let mut byte = byte;
            for bit in 0..8 {
                if self.rng.gen_bool(self.bit_flip_probability) {
                    byte ^= 1 << bit;
                    flipped_bits += 1;
                }
            }
            bytes.push(byte);
        }

        Transmission {
            bytes,
            flipped_bits,
            dropped_bytes,
        }
    }

    /// Borrow the channel's random source, e.g. to draw message contents
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
