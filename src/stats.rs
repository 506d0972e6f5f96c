use std::fmt;
use std::time::Instant;

use crate::error::InsufficientData;
use crate::speed::LinkSpeed;

// Up-front reservation per bucket; larger buckets grow on demand.
const PREALLOC_SAMPLES: usize = 1024;

/// Timestamps for one (speed, size) bucket, in microseconds since the
/// bucket was opened. Holds at most `capacity` samples.
#[derive(Debug, Clone)]
pub struct LatencyBucket {
    pub speed: LinkSpeed,
    pub size: usize,
    capacity: usize,
    samples: Vec<u64>,
    truncated: bool,
    t0: Instant,
}

impl LatencyBucket {
    pub fn new(speed: LinkSpeed, size: usize, capacity: usize) -> Self {
        Self {
            speed,
            size,
            capacity,
            samples: Vec::with_capacity(capacity.min(PREALLOC_SAMPLES)),
            truncated: false,
            t0: Instant::now(),
        }
    }

    /// Record "now". Ignored once the bucket is full.
    pub fn stamp(&mut self) {
        let us = self.t0.elapsed().as_micros() as u64;
        self.push(us);
    }

    pub fn push(&mut self, us: u64) {
        if self.samples.len() < self.capacity {
            self.samples.push(us);
        }
    }

    /// The iteration loop stopped on a transfer error.
    pub fn mark_truncated(&mut self) {
        self.truncated = true;
    }

    pub fn samples(&self) -> &[u64] {
        &self.samples
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn report(&self) -> BucketReport {
        BucketReport {
            speed: self.speed,
            size: self.size,
            samples: self.samples.len(),
            iterations: self.capacity,
            latency: match average_interval(self.samples()) {
                Ok(us) => Latency::Average(us),
                Err(InsufficientData { .. }) => Latency::NoData,
            },
        }
    }
}

/// Mean gap between consecutive timestamps, integer microseconds.
pub fn average_interval(timestamps: &[u64]) -> Result<u64, InsufficientData> {
    if timestamps.len() < 2 {
        return Err(InsufficientData {
            samples: timestamps.len(),
        });
    }
    let sum: u64 = timestamps
        .windows(2)
        .map(|w| w[1].saturating_sub(w[0]))
        .sum();
    Ok(sum / (timestamps.len() as u64 - 1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Latency {
    Average(u64),
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketReport {
    pub speed: LinkSpeed,
    pub size: usize,
    pub samples: usize,
    pub iterations: usize,
    pub latency: Latency,
}

impl BucketReport {
    pub fn is_partial(&self) -> bool {
        self.samples < self.iterations
    }
}

impl fmt::Display for BucketReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, ", self.speed.baud(), self.size)?;
        match self.latency {
            Latency::NoData => write!(f, "no data ({}/{} samples)", self.samples, self.iterations),
            Latency::Average(us) if self.is_partial() => write!(
                f,
                "{} (partial: {}/{} samples)",
                us, self.samples, self.iterations
            ),
            Latency::Average(us) => write!(f, "{}", us),
        }
    }
}
