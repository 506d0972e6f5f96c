use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::speed::LinkSpeed;

/// Opening or reconfiguring the device failed.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },
    #[error("flush {path}: {source}")]
    Flush {
        path: String,
        #[source]
        source: serialport::Error,
    },
    #[error("set speed {speed}: {source}")]
    SetSpeed {
        speed: LinkSpeed,
        #[source]
        source: serialport::Error,
    },
}

/// A single send or receive did not complete.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("write failed: {0}")]
    Send(#[source] io::Error),
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },
    #[error("read failed after {received} of {expected} bytes: {source}")]
    Recv {
        received: usize,
        expected: usize,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ModeError {
    #[error("control frame: {0}")]
    Transport(#[from] TransportError),
    #[error("no ack for mode '{tag}' within {timeout:?}")]
    AckTimeout { tag: char, timeout: Duration },
    #[error("ack mismatch: expected '{expected}', got 0x{got:02X}")]
    AckMismatch { expected: char, got: u8 },
}

/// Conditions that stop a whole sweep. Per-bucket and per-speed failures
/// never end up here.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("entering mode: {0}")]
    Enter(#[source] ModeError),
    #[error("writing report: {0}")]
    Output(#[from] io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("start length must be > 0")]
    ZeroStart,
    #[error("end length {end} is below start length {start}")]
    EndBelowStart { start: usize, end: usize },
    #[error("iteration count must be > 0")]
    ZeroIterations,
    #[error("iteration count {iterations} exceeds {max}")]
    TooManyIterations { iterations: usize, max: usize },
    #[error("no link speeds selected")]
    NoSpeeds,
    #[error("unknown link speed: {0}")]
    UnknownSpeed(String),
}

/// Fewer than two timestamps, so no interval can be formed.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
#[error("insufficient data: {samples} sample(s)")]
pub struct InsufficientData {
    pub samples: usize,
}
