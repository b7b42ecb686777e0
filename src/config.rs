//! Search parameters

use crate::{error::Error, weights::Weights};
use std::str::FromStr;

/// Budget and scoring parameters of one search run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    /// Number of random restarts.
    ///
    /// Default: 300; Range: 1..
    pub max_tries: usize,

    /// Flips attempted per restart.
    ///
    /// Default: 300; Range: 1..
    pub max_flips: usize,

    /// Make/break exponents.
    ///
    /// Default: cm 0.0, cb 2.3
    pub weights: Weights,
}

impl SolverConfig {
    pub const DEFAULT_MAX_TRIES: usize = 300;
    pub const DEFAULT_MAX_FLIPS: usize = 300;

    pub fn new(max_tries: usize, max_flips: usize, cm: f64, cb: f64) -> Result<Self, Error> {
        if max_tries == 0 {
            return Err(Error::config("max_tries", max_tries, "must be positive"));
        }
        if max_flips == 0 {
            return Err(Error::config("max_flips", max_flips, "must be positive"));
        }
        Ok(Self {
            max_tries,
            max_flips,
            weights: Weights::new(cm, cb)?,
        })
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_tries: Self::DEFAULT_MAX_TRIES,
            max_flips: Self::DEFAULT_MAX_FLIPS,
            weights: Weights::default(),
        }
    }
}

/// How satisfied clauses are tracked between flips
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Per-clause true-literal counters, updated through occurrence lists
    Incremental,
    /// Re-evaluate every clause for every candidate flip
    Recompute,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Incremental
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incremental" => Ok(Strategy::Incremental),
            "recompute" => Ok(Strategy::Recompute),
            _ => Err(Error::config(
                "strategy",
                s,
                "expected `incremental` or `recompute`",
            )),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Strategy::Incremental => write!(f, "incremental"),
            Strategy::Recompute => write!(f, "recompute"),
        }
    }
}

/// How often, and from which seed, the search is repeated on one formula
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunPlan {
    pub config: SolverConfig,
    pub strategy: Strategy,
    /// Run `i` is seeded with `seed + i`
    pub seed: u64,
    pub repeat: usize,
}

impl RunPlan {
    pub fn new(config: SolverConfig, strategy: Strategy, seed: u64, repeat: usize) -> Result<Self, Error> {
        if repeat == 0 {
            return Err(Error::config("repeat", repeat, "must be positive"));
        }
        Ok(Self {
            config,
            strategy,
            seed,
            repeat,
        })
    }
}

#[test]
fn defaults() {
    let config = SolverConfig::default();
    assert_eq!(config.max_tries, 300);
    assert_eq!(config.max_flips, 300);
    assert_eq!(config.weights, Weights::default());
    assert_eq!(Strategy::default(), Strategy::Incremental);
}

#[test]
fn validation() {
    assert!(matches!(
        SolverConfig::new(0, 10, 0.0, 2.3),
        Err(Error::Config {
            flag: "max_tries",
            ..
        })
    ));
    assert!(matches!(
        SolverConfig::new(10, 0, 0.0, 2.3),
        Err(Error::Config {
            flag: "max_flips",
            ..
        })
    ));
    assert!(matches!(
        SolverConfig::new(10, 10, f64::NAN, 2.3),
        Err(Error::Config { flag: "cm", .. })
    ));
    assert!(matches!(
        RunPlan::new(SolverConfig::default(), Strategy::Incremental, 0, 0),
        Err(Error::Config { flag: "repeat", .. })
    ));
}

#[test]
fn strategy_names() -> Result<(), Error> {
    assert_eq!("recompute".parse::<Strategy>()?, Strategy::Recompute);
    assert_eq!(Strategy::Incremental.to_string(), "incremental");
    assert!("fastest".parse::<Strategy>().is_err());
    Ok(())
}
