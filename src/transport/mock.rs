//! In-memory transports for tests.

use std::collections::VecDeque;
use std::io;

use super::Transport;
use crate::error::DeviceError;
use crate::frame::{CONTROL_FRAME_LEN, FILLER, ModeTag};
use crate::speed::LinkSpeed;

fn speed_error(speed: LinkSpeed) -> DeviceError {
    DeviceError::SetSpeed {
        speed,
        source: serialport::Error::new(serialport::ErrorKind::InvalidInput, "rejected by mock"),
    }
}

fn is_control_frame(buf: &[u8]) -> bool {
    buf.len() == CONTROL_FRAME_LEN
        && [ModeTag::EnterLoopback, ModeTag::EnterSendOnly, ModeTag::ExitIdle]
            .iter()
            .any(|t| t.byte() == buf[0])
        && buf[1..].iter().all(|&b| b == FILLER)
}

#[derive(Debug)]
pub enum Step {
    /// `n` filler bytes (or zero, a would-block chunk).
    Chunk(usize),
    Bytes(Vec<u8>),
    Fail(io::ErrorKind),
}

/// Replays a fixed list of read results. An exhausted script reads as
/// zero-length chunks forever.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    pub reads: VecDeque<Step>,
    pub recv_calls: usize,
    pub writes: Vec<Vec<u8>>,
    /// Report at most this many bytes written per call.
    pub write_limit: Option<usize>,
    pub fail_writes: bool,
    pub speeds: Vec<LinkSpeed>,
    /// `writes.len()` at each `set_speed` call.
    pub writes_at_speed: Vec<usize>,
}

impl ScriptedTransport {
    pub fn new(reads: impl IntoIterator<Item = Step>) -> Self {
        Self {
            reads: reads.into_iter().collect(),
            ..Default::default()
        }
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock write failure"));
        }
        self.writes.push(buf.to_vec());
        Ok(self.write_limit.map_or(buf.len(), |l| l.min(buf.len())))
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.recv_calls += 1;
        match self.reads.pop_front() {
            None | Some(Step::Chunk(0)) => Ok(0),
            Some(Step::Chunk(n)) => {
                assert!(n <= buf.len(), "scripted chunk larger than read buffer");
                buf[..n].fill(FILLER);
                Ok(n)
            }
            Some(Step::Bytes(bytes)) => {
                assert!(bytes.len() <= buf.len(), "scripted bytes larger than read buffer");
                buf[..bytes.len()].copy_from_slice(&bytes);
                Ok(bytes.len())
            }
            Some(Step::Fail(kind)) => Err(io::Error::new(kind, "mock read failure")),
        }
    }

    fn set_speed(&mut self, speed: LinkSpeed) -> Result<(), DeviceError> {
        self.speeds.push(speed);
        self.writes_at_speed.push(self.writes.len());
        Ok(())
    }
}

/// A remote in loopback mode: data frames come back verbatim, control
/// frames are consumed and optionally acknowledged with their tag byte.
#[derive(Debug, Default)]
pub struct EchoTransport {
    pub(crate) pending: VecDeque<u8>,
    pub ack_control: bool,
    /// Return reads in chunks of at most this many bytes.
    pub chunk: Option<usize>,
    pub writes: Vec<Vec<u8>>,
    pub data_sends: usize,
    pub recv_calls: usize,
    /// Fail the data send with this zero-based index.
    pub fail_data_send: Option<usize>,
    pub rejected_speeds: Vec<LinkSpeed>,
    pub speeds: Vec<LinkSpeed>,
}

impl EchoTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn control_tags(&self) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|w| is_control_frame(w))
            .map(|w| w[0])
            .collect()
    }
}

impl Transport for EchoTransport {
    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes.push(buf.to_vec());
        if is_control_frame(buf) {
            if self.ack_control {
                self.pending.push_back(buf[0]);
            }
            return Ok(buf.len());
        }
        let idx = self.data_sends;
        self.data_sends += 1;
        if self.fail_data_send == Some(idx) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock write failure"));
        }
        self.pending.extend(buf.iter().copied());
        Ok(buf.len())
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.recv_calls += 1;
        if self.pending.is_empty() {
            // Nothing will ever arrive; fail rather than spin.
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "echo queue empty"));
        }
        let n = buf
            .len()
            .min(self.pending.len())
            .min(self.chunk.unwrap_or(usize::MAX));
        for (dst, src) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }

    fn set_speed(&mut self, speed: LinkSpeed) -> Result<(), DeviceError> {
        if self.rejected_speeds.contains(&speed) {
            return Err(speed_error(speed));
        }
        self.speeds.push(speed);
        Ok(())
    }
}
