use std::io::{self, ErrorKind, Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use super::Transport;
use crate::error::DeviceError;
use crate::speed::LinkSpeed;

// Poll granularity only. A timed-out read surfaces as a zero-length chunk.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    path: String,
}

/// Open the RPMsg TTY raw and exclusive, with both queues flushed.
pub fn open_transport(path: &str, speed: LinkSpeed) -> Result<SerialTransport, DeviceError> {
    let port = serialport::new(path, speed.baud())
        .timeout(POLL_TIMEOUT)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .open()
        .map_err(|source| DeviceError::Open {
            path: path.to_string(),
            source,
        })?;

    port.clear(ClearBuffer::All)
        .map_err(|source| DeviceError::Flush {
            path: path.to_string(),
            source,
        })?;

    info!(dev = path, baud = speed.baud(), "transport opened");
    Ok(SerialTransport {
        port,
        path: path.to_string(),
    })
}

impl SerialTransport {
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn set_speed(&mut self, speed: LinkSpeed) -> Result<(), DeviceError> {
        self.port
            .set_baud_rate(speed.baud())
            .map_err(|source| DeviceError::SetSpeed { speed, source })?;
        debug!(dev = %self.path, baud = speed.baud(), "speed set");
        Ok(())
    }
}
