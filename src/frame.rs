pub const FILLER: u8 = 0xFF;
pub const CONTROL_FRAME_LEN: usize = 4;

/// Operating mode requested from the remote, tagged by the first byte of
/// a control frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTag {
    EnterLoopback,
    /// Remote streams, host only receives.
    EnterSendOnly,
    ExitIdle,
}

impl ModeTag {
    pub fn byte(self) -> u8 {
        match self {
            ModeTag::EnterLoopback => b'l',
            ModeTag::EnterSendOnly => b'a',
            ModeTag::ExitIdle => b'e',
        }
    }
}

pub fn control_frame(tag: ModeTag) -> [u8; CONTROL_FRAME_LEN] {
    let mut frame = [FILLER; CONTROL_FRAME_LEN];
    frame[0] = tag.byte();
    frame
}

/// `len` bytes of filler with `tag` in byte 0. Empty when `len == 0`.
pub fn data_frame(len: usize, tag: u8) -> Vec<u8> {
    let mut frame = vec![FILLER; len];
    if let Some(first) = frame.first_mut() {
        *first = tag;
    }
    frame
}
