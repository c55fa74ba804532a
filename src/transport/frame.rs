//! Minimal frame codec: unfragmented text frames out, masked text/binary
//! frames in. No ping/pong, no continuation, no 64-bit lengths.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::FrameError;

pub const CLOSE_NORMAL: u16 = 1000;
pub const CLOSE_UNSUPPORTED: u16 = 1003;
pub const CLOSE_INTERNAL: u16 = 1011;

/// Largest payload a 16-bit extended length can describe.
pub const MAX_OUTBOUND_PAYLOAD: usize = 0xFFFF;

/// Default cap on an inbound request frame.
pub const MAX_INBOUND_PAYLOAD: usize = 4096;

const FIN: u8 = 0x80;
const MASK_BIT: u8 = 0x80;
const LEN_16: u8 = 126;
const LEN_64: u8 = 127;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Continuation,
    Text,
    Binary,
    Close,
    Ping,
    Pong,
}

impl Opcode {
    pub fn bits(self) -> u8 {
        match self {
            Opcode::Continuation => 0x0,
            Opcode::Text => 0x1,
            Opcode::Binary => 0x2,
            Opcode::Close => 0x8,
            Opcode::Ping => 0x9,
            Opcode::Pong => 0xA,
        }
    }

    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x0 => Some(Opcode::Continuation),
            0x1 => Some(Opcode::Text),
            0x2 => Some(Opcode::Binary),
            0x8 => Some(Opcode::Close),
            0x9 => Some(Opcode::Ping),
            0xA => Some(Opcode::Pong),
            _ => None,
        }
    }
}

/// A decoded inbound data frame with the mask already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: Opcode,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn into_text(self) -> Result<String, FrameError> {
        String::from_utf8(self.payload).map_err(|_| FrameError::InvalidUtf8)
    }
}

/// Server-to-client text frame: FIN set, unmasked.
pub fn encode_text(payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    encode(Opcode::Text, payload, None)
}

/// Client-to-server frame with the given mask applied.
pub fn encode_masked(opcode: Opcode, payload: &[u8], mask: [u8; 4]) -> Result<Vec<u8>, FrameError> {
    encode(opcode, payload, Some(mask))
}

/// Close frame carrying a two-byte status code.
pub fn encode_close(code: u16) -> [u8; 4] {
    let [hi, lo] = code.to_be_bytes();
    [FIN | Opcode::Close.bits(), 2, hi, lo]
}

/// XOR the payload with the rotating 4-byte key. Applying it twice is a no-op.
pub fn apply_mask(payload: &mut [u8], mask: [u8; 4]) {
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte ^= mask[i % 4];
    }
}

fn encode(opcode: Opcode, payload: &[u8], mask: Option<[u8; 4]>) -> Result<Vec<u8>, FrameError> {
    let len = payload.len();
    if len > MAX_OUTBOUND_PAYLOAD {
        return Err(FrameError::MessageTooLarge(len));
    }
    let mask_bit = if mask.is_some() { MASK_BIT } else { 0 };

    let mut out = Vec::with_capacity(len + 8);
    out.push(FIN | opcode.bits());
    if len < LEN_16 as usize {
        out.push(mask_bit | len as u8);
    } else {
        out.push(mask_bit | LEN_16);
        out.extend_from_slice(&(len as u16).to_be_bytes());
    }

    match mask {
        Some(key) => {
            out.extend_from_slice(&key);
            let start = out.len();
            out.extend_from_slice(payload);
            apply_mask(&mut out[start..], key);
        }
        None => out.extend_from_slice(payload),
    }
    Ok(out)
}

/// Read one data frame. Close frames and control/continuation opcodes are
/// errors; so are 64-bit lengths and payloads above `max_payload`.
pub async fn read_frame<R>(reader: &mut R, max_payload: usize) -> Result<Frame, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut head = [0u8; 2];
    reader.read_exact(&mut head).await?;

    let bits = head[0] & 0x0F;
    let opcode = match Opcode::from_bits(bits) {
        Some(Opcode::Close) => return Err(FrameError::CloseReceived),
        Some(op @ (Opcode::Text | Opcode::Binary)) => op,
        _ => return Err(FrameError::UnsupportedOpcode(bits)),
    };

    let masked = head[1] & MASK_BIT != 0;
    let len = match head[1] & 0x7F {
        LEN_16 => {
            let mut ext = [0u8; 2];
            reader.read_exact(&mut ext).await?;
            u16::from_be_bytes(ext) as usize
        }
        LEN_64 => return Err(FrameError::UnsupportedLength),
        short => short as usize,
    };

    let mut mask = [0u8; 4];
    if masked {
        reader.read_exact(&mut mask).await?;
    }
    if len > max_payload {
        return Err(FrameError::PayloadTooLarge { len, max: max_payload });
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    if masked {
        apply_mask(&mut payload, mask);
    }
    Ok(Frame { opcode, payload })
}
