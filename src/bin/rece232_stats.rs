//! Error-rate statistics over a simulated noisy serial link.
//!
//! Usage: `rece232-stats [MIN-MAX] [FLIP%] [DROP%] [messages=N] [workers=N] [seed=N] [skip] [strict]`
//!
//! `skip` disables group repair when the footer is damaged, `strict` rejects any
//! damaged footer.

use std::env;
use std::process;

use rece232::simulation::{run_trials, TrialConfig};
use rece232::DecoderOptions;

fn parse_args(args: &[String]) -> Result<TrialConfig, String> {
    let mut config = TrialConfig::default();
    let mut decoder = DecoderOptions::new();
    let mut positional = 0;

    for arg in args {
        match arg.as_str() {
            "skip" => decoder = decoder.skip_recovery_on_corrupted_checksum(true),
            "strict" => decoder = decoder.fail_on_corrupted_checksum(true),
            _ if arg.contains('=') => {
                let (key, value) = arg.split_once('=').unwrap_or_default();
                let value: u64 = value
                    .parse()
                    .map_err(|_| format!("bad value for {}: {}", key, value))?;
                match key {
                    "messages" => config.messages = value as usize,
                    "workers" => config.workers = value as usize,
                    "seed" => config.seed = value,
                    _ => return Err(format!("unknown option: {}", key)),
                }
            }
            _ => {
                match positional {
                    0 => {
                        let (min, max) = arg
                            .split_once('-')
                            .ok_or_else(|| format!("expected MIN-MAX, got {}", arg))?;
                        config.min_words = min.parse().map_err(|_| format!("bad MIN: {}", min))?;
                        config.max_words = max.parse().map_err(|_| format!("bad MAX: {}", max))?;
                    }
                    1 => config.bit_flip_probability = percent(arg)?,
                    2 => config.drop_probability = percent(arg)?,
                    _ => return Err(format!("unexpected argument: {}", arg)),
                }
                positional += 1;
            }
        }
    }

    config.decoder = decoder;
    Ok(config)
}

fn percent(arg: &str) -> Result<f64, String> {
    arg.trim_end_matches('%')
        .parse::<f64>()
        .map(|p| p / 100.0)
        .map_err(|_| format!("bad percentage: {}", arg))
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    println!(
        "RECE-232 summary: {}-{} longwords, {}% bit flips, {}% drops{}{}",
        config.min_words,
        config.max_words,
        config.bit_flip_probability * 100.0,
        config.drop_probability * 100.0,
        if config.decoder.skips_recovery_on_corrupted_checksum() {
            ", skip recovery on damaged footer"
        } else {
            ""
        },
        if config.decoder.fails_on_corrupted_checksum() {
            ", strict footer"
        } else {
            ""
        },
    );

    match run_trials(&config) {
        Ok(stats) => print!("{}", stats),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
