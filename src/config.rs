//! Command-line configuration
//!
//! Every flag has an `ALGOSCOPE_*` environment fallback. Flags that do not
//! apply to the chosen algorithm are ignored; flags left out keep the
//! algorithm's sample parameters.

use crate::player::{scheduler::DEFAULT_RESOLUTION, PlayerConfig, Scheduler, Speed, TickMode};
use crate::recorder::{AlgorithmId, Params, RecordConfig, DEFAULT_STEP_BUDGET};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Step-by-step algorithm animations in the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "algoscope")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Algorithm to record first
    #[arg(
        long,
        short = 'a',
        value_enum,
        env = "ALGOSCOPE_ALGORITHM",
        default_value = "bubble-sort"
    )]
    pub algorithm: AlgorithmId,

    /// Comma-separated integers (array, search values, gcd operands, base,exponent,modulus)
    #[arg(
        long,
        short = 'v',
        value_delimiter = ',',
        allow_hyphen_values = true,
        env = "ALGOSCOPE_VALUES"
    )]
    pub values: Option<Vec<i64>>,

    /// Search target, subset-sum target, knapsack capacity or graph target node
    #[arg(long, short = 't', allow_hyphen_values = true, env = "ALGOSCOPE_TARGET")]
    pub target: Option<i64>,

    /// Text to search (first string for LCS)
    #[arg(long, env = "ALGOSCOPE_TEXT")]
    pub text: Option<String>,

    /// Pattern to find (second string for LCS)
    #[arg(long, env = "ALGOSCOPE_PATTERN")]
    pub pattern: Option<String>,

    /// Size parameter: Fibonacci n, board size, sieve bound, point count
    #[arg(long, short = 'n', env = "ALGOSCOPE_N")]
    pub n: Option<usize>,

    /// Seed for randomized inputs (maze carving, point sets)
    #[arg(long, env = "ALGOSCOPE_SEED")]
    pub seed: Option<u64>,

    /// Playback speed multiplier (0.25 to 16)
    #[arg(long, short = 's', env = "ALGOSCOPE_SPEED", default_value = "1.0")]
    pub speed: f64,

    /// Delay between snapshots at 1x speed (milliseconds)
    #[arg(long, env = "ALGOSCOPE_BASE_DELAY_MS", default_value = "400")]
    pub base_delay_ms: u64,

    /// Scheduler tick resolution (milliseconds)
    #[arg(long, env = "ALGOSCOPE_TICK_MS", default_value_t = DEFAULT_RESOLUTION.as_millis() as u64)]
    pub tick_ms: u64,

    /// How ticks advance the timeline
    #[arg(long, value_enum, env = "ALGOSCOPE_TICK_MODE", default_value = "elapsed-time")]
    pub tick_mode: TickMode,

    /// Maximum snapshots recorded before a run is cut short
    #[arg(long, env = "ALGOSCOPE_STEP_BUDGET", default_value_t = DEFAULT_STEP_BUDGET)]
    pub step_budget: usize,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, short = 'l', env = "ALGOSCOPE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Write logs to this file
    #[arg(long, env = "ALGOSCOPE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Print every snapshot's narration and exit instead of opening the TUI
    #[arg(long)]
    pub dump: bool,
}

/// Flag value that cannot be turned into parameters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("--{flag} must not be negative for {algorithm}, got {value}")]
    Negative {
        flag: &'static str,
        algorithm: &'static str,
        value: i64,
    },

    #[error("--values for {algorithm} needs {expected} numbers, got {got}")]
    Arity {
        algorithm: &'static str,
        expected: usize,
        got: usize,
    },
}

impl Config {
    /// Parameters for [`Config::algorithm`]: its sample set with any given
    /// flags applied on top
    pub fn params(&self) -> Result<Params, ConfigError> {
        let name = self.algorithm.name();
        let unsigned = |flag: &'static str, value: i64| {
            u64::try_from(value).map_err(|_| ConfigError::Negative {
                flag,
                algorithm: name,
                value,
            })
        };
        let operands = |expected: usize| -> Result<Option<Vec<u64>>, ConfigError> {
            let Some(values) = &self.values else {
                return Ok(None);
            };
            if values.len() != expected {
                return Err(ConfigError::Arity {
                    algorithm: name,
                    expected,
                    got: values.len(),
                });
            }
            values
                .iter()
                .map(|&v| unsigned("values", v))
                .collect::<Result<Vec<_>, _>>()
                .map(Some)
        };

        let params = match self.algorithm.default_params() {
            Params::Array { values } => Params::Array {
                values: self.values.clone().unwrap_or(values),
            },
            Params::Search { values, target } => Params::Search {
                values: self.values.clone().unwrap_or(values),
                target: self.target.unwrap_or(target),
            },
            Params::SubsetSum { values, target } => Params::SubsetSum {
                values: self.values.clone().unwrap_or(values),
                target: self.target.unwrap_or(target),
            },
            Params::Graph {
                nodes,
                edges,
                start,
                target,
            } => Params::Graph {
                nodes,
                edges,
                start,
                target: match self.target {
                    Some(t) => Some(unsigned("target", t)? as usize),
                    None => target,
                },
            },
            Params::Fibonacci { n } => Params::Fibonacci {
                n: self.n.unwrap_or(n),
            },
            Params::Board { n } => Params::Board {
                n: self.n.unwrap_or(n),
            },
            Params::Bound { limit } => Params::Bound {
                limit: self.n.unwrap_or(limit),
            },
            Params::Strings { a, b } => Params::Strings {
                a: self.text.clone().unwrap_or(a),
                b: self.pattern.clone().unwrap_or(b),
            },
            Params::Text { text, pattern } => Params::Text {
                text: self.text.clone().unwrap_or(text),
                pattern: self.pattern.clone().unwrap_or(pattern),
            },
            Params::Knapsack {
                weights,
                values,
                capacity,
            } => Params::Knapsack {
                weights,
                values,
                capacity: match self.target {
                    Some(t) => unsigned("target", t)?,
                    None => capacity,
                },
            },
            Params::Pair { a, b } => match operands(2)? {
                Some(v) => Params::Pair { a: v[0], b: v[1] },
                None => Params::Pair { a, b },
            },
            Params::Power {
                base,
                exponent,
                modulus,
            } => match operands(3)? {
                Some(v) => Params::Power {
                    base: v[0],
                    exponent: v[1],
                    modulus: v[2],
                },
                None => Params::Power {
                    base,
                    exponent,
                    modulus,
                },
            },
            Params::Maze { rows, cols, seed } => Params::Maze {
                rows: self.n.unwrap_or(rows),
                cols: self.n.unwrap_or(cols),
                seed: self.seed.unwrap_or(seed),
            },
            Params::RandomPoints { count, seed } => Params::RandomPoints {
                count: self.n.unwrap_or(count),
                seed: self.seed.unwrap_or(seed),
            },
            other => other,
        };
        Ok(params)
    }

    pub fn record_config(&self) -> RecordConfig {
        RecordConfig {
            step_budget: self.step_budget,
        }
    }

    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            base_delay: Duration::from_millis(self.base_delay_ms.max(1)),
            speed: Speed::new(self.speed),
            mode: self.tick_mode,
        }
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(Duration::from_millis(self.tick_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("algoscope").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn flags_override_sample_parameters() {
        let config = parse(&["--algorithm", "linear-search", "--values", "9,4,7,2", "-t", "7"]);
        assert_eq!(
            config.params().unwrap(),
            Params::Search {
                values: vec![9, 4, 7, 2],
                target: 7
            }
        );
    }

    #[test]
    fn missing_flags_keep_the_samples() {
        let config = parse(&["--algorithm", "gcd"]);
        assert_eq!(config.params().unwrap(), Params::Pair { a: 48, b: 18 });
        assert_eq!(config.tick_mode, TickMode::ElapsedTime);
        assert_eq!(config.step_budget, DEFAULT_STEP_BUDGET);
    }

    #[test]
    fn negative_operands_are_rejected() {
        let config = parse(&["--algorithm", "mod-pow", "--values", "2,-1,5"]);
        assert!(matches!(
            config.params(),
            Err(ConfigError::Negative { flag: "values", .. })
        ));
    }

    #[test]
    fn speed_is_clamped() {
        let config = parse(&["--speed", "100"]);
        assert_eq!(config.player_config().speed.get(), Speed::MAX);
    }
}
