use std::io;

use crate::error::DeviceError;
use crate::speed::LinkSpeed;

mod serial;

#[cfg(test)]
pub mod mock;

pub use serial::open_transport;

/// Blocking duplex byte channel under test.
///
/// `send` and `recv` report how many bytes moved in one call, which may
/// be fewer than requested (including zero on `recv`).
pub trait Transport {
    fn send(&mut self, buf: &[u8]) -> io::Result<usize>;
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    fn set_speed(&mut self, speed: LinkSpeed) -> Result<(), DeviceError>;
}
