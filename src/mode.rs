use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::AckPolicy;
use crate::error::{ModeError, TransportError};
use crate::frame::{ModeTag, control_frame};
use crate::transport::Transport;
use crate::xfer::send_frame;

// Idle back-off between empty polls while waiting for an ack.
const ACK_POLL: Duration = Duration::from_millis(1);

/// Send the control frame for `tag`, then wait for the remote to echo
/// the tag byte unless acks are disabled.
pub fn set_mode<T: Transport + ?Sized>(
    transport: &mut T,
    tag: ModeTag,
    ack: AckPolicy,
) -> Result<(), ModeError> {
    send_frame(transport, &control_frame(tag))?;
    match ack {
        AckPolicy::Disabled => debug!(tag = %char::from(tag.byte()), "mode sent, ack disabled"),
        AckPolicy::Wait(timeout) => wait_for_ack(transport, tag, timeout)?,
    }
    info!(tag = %char::from(tag.byte()), "mode {:?} set", tag);
    Ok(())
}

fn wait_for_ack<T: Transport + ?Sized>(
    transport: &mut T,
    tag: ModeTag,
    timeout: Duration,
) -> Result<(), ModeError> {
    let start = Instant::now();
    let mut byte = [0u8; 1];
    while start.elapsed() < timeout {
        let n = transport
            .recv(&mut byte)
            .map_err(|source| TransportError::Recv {
                received: 0,
                expected: 1,
                source,
            })?;
        if n == 0 {
            std::thread::sleep(ACK_POLL);
            continue;
        }
        if byte[0] != tag.byte() {
            return Err(ModeError::AckMismatch {
                expected: char::from(tag.byte()),
                got: byte[0],
            });
        }
        debug!(elapsed_us = start.elapsed().as_micros() as u64, "mode ack");
        return Ok(());
    }
    Err(ModeError::AckTimeout {
        tag: char::from(tag.byte()),
        timeout,
    })
}
