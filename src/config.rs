use std::time::Duration;

use crate::error::ConfigError;
use crate::speed::LinkSpeed;

pub const DEFAULT_START_LEN: usize = 64;
pub const DEFAULT_END_LEN: usize = 1024;
pub const DEFAULT_ITERATIONS: usize = 100;
pub const MAX_ITERATIONS: usize = 1_000_000;
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_millis(1000);

/// Whether a mode change waits for the remote to echo the tag back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckPolicy {
    /// Fire-and-forget, for remote firmware that never acknowledges.
    Disabled,
    Wait(Duration),
}

/// Sweep parameters.
///
/// Defaults: payloads 64..=1024 bytes, 100 iterations per bucket, every
/// [`LinkSpeed`], mode changes acknowledged within one second.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub start_len: usize,
    pub end_len: usize,
    pub iterations: usize,
    pub speeds: Vec<LinkSpeed>,
    pub ack: AckPolicy,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            start_len: DEFAULT_START_LEN,
            end_len: DEFAULT_END_LEN,
            iterations: DEFAULT_ITERATIONS,
            speeds: LinkSpeed::ALL.to_vec(),
            ack: AckPolicy::Wait(DEFAULT_ACK_TIMEOUT),
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_len == 0 {
            return Err(ConfigError::ZeroStart);
        }
        if self.end_len < self.start_len {
            return Err(ConfigError::EndBelowStart {
                start: self.start_len,
                end: self.end_len,
            });
        }
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(ConfigError::TooManyIterations {
                iterations: self.iterations,
                max: MAX_ITERATIONS,
            });
        }
        if self.speeds.is_empty() {
            return Err(ConfigError::NoSpeeds);
        }
        Ok(())
    }

    pub fn payload_sizes(&self) -> PayloadSizes {
        PayloadSizes::new(self.start_len, self.end_len)
    }
}

/// Geometric progression `start * 2^j`, stopping before the first value
/// above `end`.
#[derive(Debug, Clone)]
pub struct PayloadSizes {
    next: Option<usize>,
    end: usize,
}

impl PayloadSizes {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            next: (start > 0).then_some(start),
            end,
        }
    }
}

impl Iterator for PayloadSizes {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let cur = self.next.filter(|&n| n <= self.end)?;
        self.next = cur.checked_mul(2);
        Some(cur)
    }
}
