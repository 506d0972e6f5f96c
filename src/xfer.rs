use crate::error::TransportError;
use crate::frame::data_frame;
use crate::transport::Transport;

/// Write a `length`-byte data frame tagged with `tag` in a single call.
pub fn send_exact<T: Transport + ?Sized>(
    transport: &mut T,
    length: usize,
    tag: u8,
) -> Result<usize, TransportError> {
    let frame = data_frame(length, tag);
    send_frame(transport, &frame)
}

/// One `send` call, no retry. Anything less than the whole frame is an error.
pub fn send_frame<T: Transport + ?Sized>(
    transport: &mut T,
    frame: &[u8],
) -> Result<usize, TransportError> {
    let written = transport.send(frame).map_err(TransportError::Send)?;
    if written != frame.len() {
        return Err(TransportError::ShortWrite {
            written,
            expected: frame.len(),
        });
    }
    Ok(written)
}

/// Fill `buf` completely, accumulating however many bytes each read
/// reports. The first failed read aborts.
pub fn recv_exact<T: Transport + ?Sized>(
    transport: &mut T,
    buf: &mut [u8],
) -> Result<(), TransportError> {
    let expected = buf.len();
    let mut received = 0;
    while received < expected {
        match transport.recv(&mut buf[received..]) {
            Ok(n) => received += n,
            Err(source) => {
                return Err(TransportError::Recv {
                    received,
                    expected,
                    source,
                });
            }
        }
    }
    Ok(())
}
