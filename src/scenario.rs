use tracing::warn;

use crate::config::AckPolicy;
use crate::error::{ModeError, TransportError};
use crate::frame::ModeTag;
use crate::mode::set_mode;
use crate::speed::LinkSpeed;
use crate::stats::LatencyBucket;
use crate::transport::Transport;
use crate::xfer::{recv_exact, send_exact};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    Loopback,
    PlainSweep,
    ReceiveOnly,
}

impl ScenarioKind {
    pub fn title(self) -> &'static str {
        match self {
            ScenarioKind::Loopback => "Rpmsg Loop back test",
            ScenarioKind::PlainSweep => "Rpmsg sweep test",
            ScenarioKind::ReceiveOnly => "Receive test",
        }
    }

    /// Loopback-style runs repeat the column header at every speed.
    pub fn header_per_speed(self) -> bool {
        !matches!(self, ScenarioKind::ReceiveOnly)
    }

    /// The remote starts streaming on the mode frame, so the link must
    /// already run at the first rate when it is sent.
    pub fn speed_before_enter(self) -> bool {
        matches!(self, ScenarioKind::ReceiveOnly)
    }
}

/// What the sweep drives for each (speed, size) bucket.
pub trait BucketRunner {
    fn kind(&self) -> ScenarioKind;

    /// Put the remote into the mode this runner measures.
    fn enter<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<(), ModeError>;

    fn exit<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<(), ModeError>;

    fn run_bucket<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        speed: LinkSpeed,
        size: usize,
        iterations: usize,
    ) -> LatencyBucket;
}

/// A measurement strategy: optional mode handshake, then per iteration an
/// optional send phase followed by an optional receive phase.
#[derive(Debug, Clone)]
pub struct Scenario {
    kind: ScenarioKind,
    enter: Option<ModeTag>,
    exit: Option<ModeTag>,
    send: bool,
    recv: bool,
    ack: AckPolicy,
}

impl Scenario {
    /// Round trip through a remote echoing in loopback mode.
    pub fn loopback(ack: AckPolicy) -> Self {
        Self {
            kind: ScenarioKind::Loopback,
            enter: Some(ModeTag::EnterLoopback),
            exit: Some(ModeTag::ExitIdle),
            send: true,
            recv: true,
            ack,
        }
    }

    /// Round trip without control frames; the remote must already echo.
    pub fn plain_sweep() -> Self {
        Self {
            kind: ScenarioKind::PlainSweep,
            enter: None,
            exit: None,
            send: true,
            recv: true,
            ack: AckPolicy::Disabled,
        }
    }

    /// Remote streams frames unprompted, host only receives. The remote is
    /// left streaming afterwards.
    pub fn receive_only(ack: AckPolicy) -> Self {
        Self {
            kind: ScenarioKind::ReceiveOnly,
            enter: Some(ModeTag::EnterSendOnly),
            exit: None,
            send: false,
            recv: true,
            ack,
        }
    }

    fn transfer<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        buf: &mut [u8],
        tag: u8,
    ) -> Result<(), TransportError> {
        if self.send {
            send_exact(transport, buf.len(), tag)?;
        }
        if self.recv {
            recv_exact(transport, buf)?;
        }
        Ok(())
    }
}

impl BucketRunner for Scenario {
    fn kind(&self) -> ScenarioKind {
        self.kind
    }

    fn enter<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<(), ModeError> {
        match self.enter {
            Some(tag) => set_mode(transport, tag, self.ack),
            None => Ok(()),
        }
    }

    fn exit<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<(), ModeError> {
        match self.exit {
            Some(tag) => set_mode(transport, tag, self.ack),
            None => Ok(()),
        }
    }

    fn run_bucket<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        speed: LinkSpeed,
        size: usize,
        iterations: usize,
    ) -> LatencyBucket {
        let mut bucket = LatencyBucket::new(speed, size, iterations);
        let mut buf = vec![0u8; size];

        for i in 0..iterations {
            // tag is the low byte of the iteration index
            if let Err(e) = self.transfer(transport, &mut buf, i as u8) {
                warn!(
                    baud = speed.baud(),
                    size,
                    iteration = i,
                    "transfer failed, ending bucket early: {e}"
                );
                bucket.mark_truncated();
                break;
            }
            bucket.stamp();
        }
        bucket
    }
}
