//! Transmission simulator.
//!
//! Random messages are encoded, sent through a [`NoisyChannel`] and decoded
//! again. Work is split across rayon workers, each owning its own encoder,
//! decoder and seeded channel, and the per-worker statistics are merged at the
//! end. A run is reproducible from its seed and worker count.

use std::fmt::{Display, Formatter};

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::channel::NoisyChannel;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{Error, Result};
use crate::options::{DecoderOptions, EncoderOptions};

/// Parameters of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialConfig {
    /// Fewest longwords per message
    pub min_words: usize,
    /// Most longwords per message
    pub max_words: usize,
    /// Messages across all workers
    pub messages: usize,
    /// Probability that any single bit is flipped
    pub bit_flip_probability: f64,
    /// Probability that any single byte is dropped
    pub drop_probability: f64,
    /// Seed for the per-worker seeds
    pub seed: u64,
    pub workers: usize,
    pub decoder: DecoderOptions,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            min_words: 1,
            max_words: 7,
            messages: 100_000,
            bit_flip_probability: 0.001,
            drop_probability: 0.0025,
            seed: 6720522,
            workers: 8,
            decoder: DecoderOptions::default(),
        }
    }
}

impl TrialConfig {
    /// Check the configuration before any work starts.
    ///
    /// # Errors
    /// [`Error::InvalidInput`] describing the first offending field
    pub fn validate(&self) -> Result<()> {
        if self.min_words == 0 {
            return Err(Error::InvalidInput(
                "messages need at least one longword".to_string(),
            ));
        }
        if self.min_words > self.max_words {
            return Err(Error::InvalidInput(format!(
                "min_words {} exceeds max_words {}",
                self.min_words, self.max_words
            )));
        }
        if self.workers == 0 {
            return Err(Error::InvalidInput("need at least one worker".to_string()));
        }
        // Probabilities are checked by the channel itself
        NoisyChannel::new(self.bit_flip_probability, self.drop_probability, self.seed)?;
        Ok(())
    }
}

/// Outcome counts of a simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialStats {
    pub messages: usize,
    /// Messages the channel touched at all
    pub modified: usize,
    /// Modified messages decoded to the original content
    pub recovered: usize,
    /// Modified messages the decoder rejected
    pub unrecoverable: usize,
    /// Modified messages decoded to the wrong content
    pub undetected: usize,
    pub flipped_bits: usize,
    pub dropped_bytes: usize,
    /// Sum of encoded message lengths
    pub total_length: usize,
}

impl TrialStats {
    /// Combine the counts of two runs
    pub fn merge(self, other: Self) -> Self {
        Self {
            messages: self.messages + other.messages,
            modified: self.modified + other.modified,
            recovered: self.recovered + other.recovered,
            unrecoverable: self.unrecoverable + other.unrecoverable,
            undetected: self.undetected + other.undetected,
            flipped_bits: self.flipped_bits + other.flipped_bits,
            dropped_bytes: self.dropped_bytes + other.dropped_bytes,
            total_length: self.total_length + other.total_length,
        }
    }

    pub fn average_length(&self) -> f64 {
        if self.messages == 0 {
            return 0.0;
        }
        self.total_length as f64 / self.messages as f64
    }

    /// `count` as a percentage of `total`
    fn percent(count: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        100.0 * count as f64 / total as f64
    }
}

impl Display for TrialStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let width = self.messages.to_string().len();
        // Outcomes only make sense for messages the channel touched
        let rows = [
            ("Modified", self.modified, self.messages),
            ("Recovered", self.recovered, self.modified),
            ("Unrecoverable", self.unrecoverable, self.modified),
            ("Undetected", self.undetected, self.modified),
        ];

        writeln!(f, "Messages:       {}", self.messages)?;
        writeln!(f, "Average length: {:.2}", self.average_length())?;
        writeln!(f, "Flipped bits:   {}", self.flipped_bits)?;
        writeln!(f, "Dropped bytes:  {}", self.dropped_bytes)?;
        for (label, count, total) in rows {
            writeln!(
                f,
                "{:<15} {:>width$} / {} ({:.5}%)",
                format!("{}:", label),
                count,
                total,
                Self::percent(count, total),
                width = width
            )?;
        }
        Ok(())
    }
}

/// Run a full simulation.
///
/// # Errors
/// [`Error::InvalidInput`] if `config` does not validate
pub fn run_trials(config: &TrialConfig) -> Result<TrialStats> {
    config.validate()?;

    let mut seeder = StdRng::seed_from_u64(config.seed);
    let share = config.messages / config.workers;
    let extra = config.messages % config.workers;
    let jobs: Vec<(usize, u64)> = (0..config.workers)
        .map(|i| (share + usize::from(i < extra), seeder.gen()))
        .collect();

    let per_worker = jobs
        .into_par_iter()
        .map(|(messages, seed)| run_worker(config, messages, seed))
        .collect::<Result<Vec<TrialStats>>>()?;

    Ok(per_worker
        .into_iter()
        .fold(TrialStats::default(), TrialStats::merge))
}

fn run_worker(config: &TrialConfig, messages: usize, seed: u64) -> Result<TrialStats> {
    let mut channel =
        NoisyChannel::new(config.bit_flip_probability, config.drop_probability, seed)?;
    let mut encoder = Encoder::new(EncoderOptions::default());
    let mut decoder = Decoder::new(config.decoder);
    let mut stats = TrialStats::default();

    for _ in 0..messages {
        let rng = channel.rng();
        let header: u8 = rng.gen_range(0..64);
        let count = rng.gen_range(config.min_words..=config.max_words);
        let words: Vec<i32> = (0..count).map(|_| rng.gen()).collect();

        let sent = encoder.encode(header, &words)?;
        let received = channel.transmit(&sent);

        stats.messages += 1;
        stats.total_length += sent.len();
        stats.flipped_bits += received.flipped_bits;
        stats.dropped_bytes += received.dropped_bytes;
        if !received.is_modified() {
            continue;
        }
        stats.modified += 1;

        match decoder.decode(&received.bytes) {
            Ok(message) if message.header() == header && message.longwords() == words => {
                stats.recovered += 1
            }
            Ok(_) => {
                warn!(
                    "undetected corruption: sent {:?}, received {:?}",
                    String::from_utf8_lossy(&sent),
                    String::from_utf8_lossy(&received.bytes)
                );
                stats.undetected += 1;
            }
            Err(_) => stats.unrecoverable += 1,
        }
    }

    debug!("worker {:#x} done: {:?}", seed, stats);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(bit_flip_probability: f64, drop_probability: f64) -> TrialConfig {
        TrialConfig {
            messages: 2_000,
            workers: 4,
            bit_flip_probability,
            drop_probability,
            ..TrialConfig::default()
        }
    }

    #[test]
    fn test_clean_channel() {
        let stats = run_trials(&small(0.0, 0.0)).unwrap();
        assert_eq!(stats.messages, 2_000);
        assert_eq!(stats.modified, 0);
        assert_eq!(stats.flipped_bits, 0);
        assert!(stats.average_length() >= 11.0);
        assert!(stats.average_length() <= 59.0);
    }

    #[test]
    fn test_outcomes_add_up() {
        let stats = run_trials(&small(0.002, 0.005)).unwrap();
        assert!(stats.modified > 0);
        assert_eq!(
            stats.recovered + stats.unrecoverable + stats.undetected,
            stats.modified
        );
        assert!(stats.recovered > stats.unrecoverable);
    }

    #[test]
    fn test_reproducible() {
        let config = small(0.002, 0.005);
        assert_eq!(run_trials(&config).unwrap(), run_trials(&config).unwrap());
    }

    #[test]
    fn test_uneven_split() {
        let config = TrialConfig {
            messages: 10,
            workers: 3,
            ..small(0.0, 0.0)
        };
        assert_eq!(run_trials(&config).unwrap().messages, 10);
    }

    #[test]
    fn test_invalid_config() {
        let bad = [
            TrialConfig {
                min_words: 0,
                ..TrialConfig::default()
            },
            TrialConfig {
                min_words: 5,
                max_words: 4,
                ..TrialConfig::default()
            },
            TrialConfig {
                workers: 0,
                ..TrialConfig::default()
            },
            TrialConfig {
                drop_probability: 2.0,
                ..TrialConfig::default()
            },
        ];
        for config in bad {
            assert!(matches!(run_trials(&config), Err(Error::InvalidInput(_))));
        }
    }

    #[test]
    fn test_merge_and_report() {
        let a = TrialStats {
            messages: 3,
            modified: 2,
            recovered: 2,
            total_length: 33,
            ..TrialStats::default()
        };
        let merged = a.merge(a);
        assert_eq!(merged.messages, 6);
        assert_eq!(merged.recovered, 4);
        assert_eq!(merged.average_length(), 11.0);

        let report = merged.to_string();
        assert!(report.contains("Modified:"));
        assert!(report.contains("4 / 6 (66.66667%)"));
        assert!(report.contains("4 / 4 (100.00000%)"));
        assert!(report.contains("0 / 4 (0.00000%)"));
    }

    #[test]
    fn test_report_without_modified_messages() {
        let stats = TrialStats {
            messages: 5,
            total_length: 55,
            ..TrialStats::default()
        };
        let report = stats.to_string();
        assert!(report.contains("0 / 5 (0.00000%)"));
        assert!(report.contains("0 / 0 (0.00000%)"));
    }
}
