use std::time::Duration;

use crate::error::{Error, Result};
use crate::random::rand_inclusive;

/// 考える時間や食べる時間の範囲 (ミリ秒)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DurationRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        DurationRange { min_ms, max_ms }
    }

    pub const fn zero() -> Self {
        DurationRange::new(0, 0)
    }

    pub fn sample(&self) -> Duration {
        Duration::from_millis(rand_inclusive(self.min_ms, self.max_ms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Runtime {
    /// 哲学者 1 人につき OS スレッド 1 つ
    Threads,
    /// 哲学者 1 人につき tokio タスク 1 つ
    Tokio,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub philosophers: usize,
    pub think: DurationRange,
    pub eat: DurationRange,
    /// None なら無限に繰り返す
    pub rounds: Option<u64>,
    pub runtime: Runtime,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            philosophers: 5,
            think: DurationRange::new(2000, 3000),
            eat: DurationRange::new(2000, 3000),
            rounds: None,
            runtime: Runtime::Threads,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.philosophers < 2 {
            return Err(Error::TooFewPhilosophers(self.philosophers));
        }
        Ok(())
    }
}
