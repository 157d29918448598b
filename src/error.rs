//! Crate-wide error type (component C9), ambient over the teacher's own
//! `pub enum Error`: one tagged variant per disposition named in
//! `SPEC_FULL.md` §4.7/§7, so the driver loop can match fatal vs. recoverable
//! exhaustively instead of stringly-typed errors. `InvalidFrame` and
//! `ContiguityGap` wrap the dedicated error types `frame::InvalidFrame` and
//! `chunk::ContiguityError` raise on their own, so callers that want the
//! crate-wide view can convert with `.into()`/`?` instead of matching two
//! separate error hierarchies.

use thiserror::Error;

use crate::chunk::ContiguityError;
use crate::frame::InvalidFrame;

#[derive(Debug, Error)]
pub enum QrxferError {
    /// A raw capture failed to parse into a frame. Non-fatal: the driver
    /// loop logs it (rate-limited) and treats the tick as if nothing had
    /// arrived.
    #[error("invalid frame: {0:?}")]
    InvalidFrame(InvalidFrame),

    /// `finish` arrived with a hole in the chunk map. Non-fatal: drives a
    /// `repeat_data` for the first missing index.
    #[error("chunk map has a gap: first missing index {min_missing}")]
    ContiguityGap { min_missing: i32 },

    /// The encoder was asked to build a frame above the QR code's payload
    /// capacity. Only arises from misconfiguration, since `CHUNK_SIZE +
    /// HEADER_LEN` sits far below the cap in normal operation.
    #[error("frame of {len} bytes exceeds the {max}-byte QR code capacity")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("camera is unavailable")]
    CameraUnavailable,

    #[error("failed to write received file {path}: {source}")]
    InboxWriteFailed { path: String, #[source] source: std::io::Error },

    /// The outbox file was gone by the time a completed transfer tried to
    /// delete it. Non-fatal: logged, the session still resets to `Waiting`.
    #[error("outbox file {path} was already gone at delete time: {source}")]
    OutboxFileMissing { path: String, #[source] source: std::io::Error },
}

impl From<InvalidFrame> for QrxferError {
    fn from(reason: InvalidFrame) -> Self {
        QrxferError::InvalidFrame(reason)
    }
}

impl From<ContiguityError> for QrxferError {
    fn from(gap: ContiguityError) -> Self {
        QrxferError::ContiguityGap { min_missing: gap.min_missing }
    }
}

pub type Result<T> = std::result::Result<T, QrxferError>;
