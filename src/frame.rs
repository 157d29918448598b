//! The 18-byte frame header and its codec (component C1): pack/unpack the
//! fixed-width little-endian fields the way the teacher's `context.rs`
//! packs/unpacks its own wire header, byte by byte, with an explicit state
//! for every field instead of relying on an external serialization crate.

use crate::checksum::calculate_checksum;

pub const HEADER_LEN: usize = 18;
pub const VERSION: u8 = 1;
/// QR code payload capacity the encoder will not exceed (2.5 KiB).
pub const MAX_FRAME_SIZE: usize = 2560;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    StartConnection,
    ConfirmConnection,
    SendData,
    ConfirmData,
    RepeatData,
    Finish,
    ConfirmFinish,
}

impl RequestType {
    pub fn value(self) -> u8 {
        match self {
            RequestType::StartConnection => 1,
            RequestType::ConfirmConnection => 2,
            RequestType::SendData => 3,
            RequestType::ConfirmData => 4,
            RequestType::RepeatData => 5,
            RequestType::Finish => 6,
            RequestType::ConfirmFinish => 7,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(RequestType::StartConnection),
            2 => Some(RequestType::ConfirmConnection),
            3 => Some(RequestType::SendData),
            4 => Some(RequestType::ConfirmData),
            5 => Some(RequestType::RepeatData),
            6 => Some(RequestType::Finish),
            7 => Some(RequestType::ConfirmFinish),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub request_type: RequestType,
    pub sequence_number: i32,
    pub payload_length: i32,
    pub checksum: [u8; 8],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub header: Header,
    pub payload: Vec<u8>,
}

/// Reason a raw byte blob failed to parse into a `Frame`. The driver loop
/// treats every variant identically: the tick proceeds as if nothing had
/// arrived. Checksum validity is deliberately not one of these — it is only
/// meaningful for `send_data` payloads, and is checked there explicitly by
/// the peer state machine instead (`Frame::checksum_valid`), matching the
/// asymmetry in `SPEC_FULL.md` §4.1's `ReceivingData` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidFrame {
    TooShort,
    UnknownRequestType,
    LengthMismatch,
}

impl Frame {
    /// Builds a frame and computes its checksum, `payload` being `None` when
    /// the message carries no data (matches the checksum feed distinction
    /// between "no payload" and "an empty payload").
    pub fn new(request_type: RequestType, sequence_number: i32, payload: Option<Vec<u8>>) -> Self {
        let payload_bytes = payload.as_deref();
        let checksum = calculate_checksum(VERSION, request_type.value(), sequence_number, payload_bytes);
        let payload = payload.unwrap_or_default();
        Frame {
            header: Header {
                version: VERSION,
                request_type,
                sequence_number,
                payload_length: payload.len() as i32,
                checksum,
            },
            payload,
        }
    }

    /// Encodes the frame to its on-wire bytes. Returns `None` if the result
    /// would exceed the QR code's payload capacity (fatal misconfiguration
    /// per the error-handling design, since `CHUNK_SIZE + HEADER_LEN` is far
    /// below this bound in practice).
    pub fn encode(&self) -> Option<Vec<u8>> {
        let total = HEADER_LEN + self.payload.len();
        if total > MAX_FRAME_SIZE {
            return None;
        }
        let mut out = Vec::with_capacity(total);
        out.push(self.header.version);
        out.push(self.header.request_type.value());
        out.extend_from_slice(&self.header.sequence_number.to_le_bytes());
        out.extend_from_slice(&self.header.payload_length.to_le_bytes());
        out.extend_from_slice(&self.header.checksum);
        out.extend_from_slice(&self.payload);
        Some(out)
    }

    /// Decodes raw bytes into a frame, or `InvalidFrame` if any invariant in
    /// `SPEC_FULL.md` §3 is violated.
    pub fn decode(raw: &[u8]) -> Result<Frame, InvalidFrame> {
        if raw.len() < HEADER_LEN {
            return Err(InvalidFrame::TooShort);
        }

        let version = raw[0];
        let request_type = RequestType::from_value(raw[1]).ok_or(InvalidFrame::UnknownRequestType)?;
        let sequence_number = i32::from_le_bytes([raw[2], raw[3], raw[4], raw[5]]);
        let payload_length = i32::from_le_bytes([raw[6], raw[7], raw[8], raw[9]]);
        let mut checksum = [0u8; 8];
        checksum.copy_from_slice(&raw[10..18]);
        let payload = raw[HEADER_LEN..].to_vec();

        if payload.len() as i64 != payload_length as i64 {
            return Err(InvalidFrame::LengthMismatch);
        }

        Ok(Frame {
            header: Header {
                version,
                request_type,
                sequence_number,
                payload_length,
                checksum,
            },
            payload,
        })
    }

    /// Recomputes the checksum over this frame's own fields and compares it
    /// against the header's recorded value. A zero-length payload is always
    /// hashed as `None` (see `Frame::new`, which never sends `Some(vec![])`
    /// for a control frame), so this recovers that distinction purely from
    /// length.
    pub fn checksum_valid(&self) -> bool {
        let payload = if self.payload.is_empty() { None } else { Some(self.payload.as_slice()) };
        let expected = calculate_checksum(
            self.header.version,
            self.header.request_type.value(),
            self.header.sequence_number,
            payload,
        );
        self.header.checksum == expected
    }
}
