//! The peer state machine (component C6) — the core of this crate. A
//! deterministic Mealy machine over `(status, incoming frame or none)`
//! pairs, generalizing the teacher's byte-level `RxState` machine from a
//! UART stream to a stop-and-wait file transfer. Exactly one outgoing frame
//! is produced per tick.

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::{debug, warn};

use crate::chunk;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::{QrxferError, Result};
use crate::frame::{Frame, RequestType};
use crate::inbox;
use crate::outbox;
use crate::ratelimit::RateLimiter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Waiting,
    WaitingToSendFile,
    SentData,
    Finished,
    ReceivingData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Idle,
    Sender,
    Receiver,
}

impl Status {
    pub fn role(self) -> Role {
        match self {
            Status::Waiting => Role::Idle,
            Status::WaitingToSendFile | Status::SentData | Status::Finished => Role::Sender,
            Status::ReceivingData => Role::Receiver,
        }
    }
}

/// An external clock for wall-clock file-name timestamps, decoupled from the
/// monotonic `Clock` used for timeouts (`chrono::Local::now` has no
/// `Instant`-compatible counterpart).
pub trait Timestamper {
    fn iso_now(&self) -> String;
}

pub struct ChronoTimestamper;

impl Timestamper for ChronoTimestamper {
    fn iso_now(&self) -> String {
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

pub struct Peer<C: Clock + Clone, T: Timestamper> {
    config: Config,
    clock: C,
    timestamper: T,
    rate_limiter: RateLimiter<C>,

    status: Status,
    sequence: i32,
    chunks: BTreeMap<i32, Vec<u8>>,
    file_path: Option<PathBuf>,
    file_suffix: Option<String>,
    current_image: Option<Vec<u8>>,
    last_build_at: Option<std::time::Instant>,
}

impl<C: Clock + Clone, T: Timestamper> Peer<C, T> {
    pub fn new(config: Config, clock: C, timestamper: T) -> Self {
        let rate_limiter = RateLimiter::new(clock.clone(), config.print_interval);
        Peer {
            config,
            clock,
            timestamper,
            rate_limiter,
            status: Status::Waiting,
            sequence: 0,
            chunks: BTreeMap::new(),
            file_path: None,
            file_suffix: None,
            current_image: None,
            last_build_at: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn current_image(&self) -> Option<&[u8]> {
        self.current_image.as_deref()
    }

    /// Resets to a `no frame decoded this tick`-equivalent structural
    /// failure: logs it (rate-limited) so the caller can feed `None` into
    /// `handle_event`.
    pub fn log_invalid_frame(&mut self, reason: &str) {
        let message = format!("received invalid frame: {reason}");
        if self.rate_limiter.should_emit(&message) {
            warn!("{message}");
        }
    }

    /// Resets session state fully back to `Waiting`. Shared by the
    /// successful-completion path and the timeout path.
    fn reset_session(&mut self) {
        self.status = Status::Waiting;
        self.sequence = 0;
        self.chunks.clear();
        self.file_path = None;
        self.file_suffix = None;
        self.current_image = None;
        self.last_build_at = None;
    }

    /// Checks the session-wide idle timeout (`SPEC_FULL.md` §4.1, last
    /// row). Returns `true` if a reset just happened, so the driver loop
    /// knows to clear the display and sleep.
    pub fn check_timeout(&mut self) -> bool {
        if self.status == Status::Waiting {
            return false;
        }
        let Some(last_build_at) = self.last_build_at else { return false };
        if self.clock.now().duration_since(last_build_at) > self.config.waiting_timeout {
            warn!("took too long waiting for a reply, resetting session");
            self.reset_session();
            true
        } else {
            false
        }
    }

    fn send(&mut self, request_type: RequestType, sequence_number: i32, payload: Option<Vec<u8>>) -> Result<()> {
        let frame = Frame::new(request_type, sequence_number, payload);
        let payload_len = frame.payload.len();
        let encoded = frame.encode().ok_or(QrxferError::PayloadTooLarge {
            len: crate::frame::HEADER_LEN + payload_len,
            max: self.config.max_frame_size,
        })?;
        debug!(
            "building frame: request={:?}, sequence={}, payload_length={}",
            request_type, sequence_number, payload_len
        );
        self.current_image = Some(encoded);
        self.last_build_at = Some(self.clock.now());
        Ok(())
    }

    fn decode_suffix(payload: &[u8]) -> Option<String> {
        if payload.len() > 10 {
            return None;
        }
        std::str::from_utf8(payload).ok().map(|s| s.to_string())
    }

    /// Consumes one tick's event: either a successfully parsed frame, or
    /// `None` ("no frame arrived or it failed to parse this tick").
    pub fn handle_event(&mut self, event: Option<Frame>) -> Result<()> {
        match self.status {
            Status::Waiting => self.handle_waiting(event),
            Status::WaitingToSendFile => self.handle_waiting_to_send_file(event),
            Status::SentData => self.handle_sent_data(event),
            Status::Finished => self.handle_finished(event),
            Status::ReceivingData => self.handle_receiving_data(event),
        }
    }

    fn handle_waiting(&mut self, event: Option<Frame>) -> Result<()> {
        match event {
            Some(frame) if frame.header.request_type == RequestType::StartConnection => {
                self.file_suffix = Self::decode_suffix(&frame.payload);
                self.sequence = 0;
                self.chunks.clear();
                self.status = Status::ReceivingData;
                self.send(RequestType::ConfirmConnection, 0, None)
            }
            Some(_) => {
                // Any other inbound kind is ignored while idle.
                Ok(())
            }
            None => match outbox::next_file(&self.config.send_dir) {
                Some((contents, path)) => {
                    let chunks = chunk::split(&contents, self.config.chunk_size);
                    self.chunks = chunk::to_map(&chunks);
                    let suffix = path
                        .extension()
                        .map(|ext| format!(".{}", ext.to_string_lossy()));
                    self.file_path = Some(path);
                    self.file_suffix = suffix.clone();
                    self.sequence = 0;
                    self.status = Status::WaitingToSendFile;
                    self.send(RequestType::StartConnection, 0, suffix.map(|s| s.into_bytes()))
                }
                None => {
                    self.current_image = None;
                    Ok(())
                }
            },
        }
    }

    fn handle_waiting_to_send_file(&mut self, event: Option<Frame>) -> Result<()> {
        if let Some(frame) = event {
            if frame.header.request_type == RequestType::ConfirmConnection {
                self.sequence = 0;
                if self.chunks.is_empty() {
                    // Zero-byte file: nothing to send, go straight to
                    // finish rather than reproducing the source's
                    // defaultdict side effect of sending a spurious empty
                    // chunk (see DESIGN.md).
                    self.status = Status::Finished;
                    return self.send(RequestType::Finish, 0, None);
                }
                let first_chunk = self.chunks.get(&0).cloned().unwrap_or_default();
                self.status = Status::SentData;
                return self.send(RequestType::SendData, 0, Some(first_chunk));
            }
        }
        Ok(())
    }

    fn handle_sent_data(&mut self, event: Option<Frame>) -> Result<()> {
        let Some(frame) = event else { return Ok(()) };
        match frame.header.request_type {
            RequestType::ConfirmData if frame.header.sequence_number == self.sequence => {
                self.sequence += 1;
                if self.sequence as usize == self.chunks.len() {
                    self.status = Status::Finished;
                    self.send(RequestType::Finish, 0, None)
                } else {
                    let chunk = self.chunks.get(&self.sequence).cloned().unwrap_or_default();
                    self.send(RequestType::SendData, self.sequence, Some(chunk))
                }
            }
            RequestType::RepeatData if self.in_range(frame.header.sequence_number) => {
                self.sequence = frame.header.sequence_number;
                let chunk = self.chunks.get(&self.sequence).cloned().unwrap_or_default();
                self.send(RequestType::SendData, self.sequence, Some(chunk))
            }
            _ => Ok(()),
        }
    }

    fn in_range(&self, seq: i32) -> bool {
        seq >= 0 && (seq as usize) < self.chunks.len()
    }

    fn handle_finished(&mut self, event: Option<Frame>) -> Result<()> {
        let Some(frame) = event else { return Ok(()) };
        match frame.header.request_type {
            RequestType::RepeatData if self.in_range(frame.header.sequence_number) => {
                let seq = frame.header.sequence_number;
                let chunk = self.chunks.get(&seq).cloned().unwrap_or_default();
                self.send(RequestType::SendData, seq, Some(chunk))
            }
            RequestType::ConfirmFinish => {
                if let Some(path) = &self.file_path {
                    if let Err(source) = outbox::remove(path) {
                        let err = QrxferError::OutboxFileMissing { path: path.display().to_string(), source };
                        warn!("{err}");
                    }
                }
                self.reset_session();
                Ok(())
            }
            RequestType::ConfirmData => self.send(RequestType::Finish, 0, None),
            _ => Ok(()),
        }
    }

    fn handle_receiving_data(&mut self, event: Option<Frame>) -> Result<()> {
        let Some(frame) = event else { return Ok(()) };
        match frame.header.request_type {
            RequestType::SendData => {
                if !frame.checksum_valid() {
                    self.log_invalid_frame("checksum failed");
                    return self.send(RequestType::RepeatData, frame.header.sequence_number, None);
                }
                let seq = frame.header.sequence_number;
                if !self.chunks.contains_key(&seq) {
                    debug!("received data for sequence {seq}");
                    self.chunks.insert(seq, frame.payload);
                    return self.send(RequestType::ConfirmData, seq, None);
                }
                // Duplicate for an index already held: acknowledged by
                // inaction; the sender's own timeout drives retransmission.
                Ok(())
            }
            RequestType::Finish => {
                if self.chunks.is_empty() {
                    self.reset_session_to_waiting_after_send(RequestType::ConfirmData, frame.header.sequence_number)
                } else if let Some(missing) = chunk::first_missing_index(&self.chunks) {
                    self.send(RequestType::RepeatData, missing, None)
                } else {
                    let data = chunk::reassemble(&self.chunks)?;
                    let timestamp = self.timestamper.iso_now();
                    inbox::write_file(&self.config.receive_dir, &timestamp, self.file_suffix.as_deref(), &data)?;
                    self.reset_session_to_waiting_after_send(RequestType::ConfirmData, frame.header.sequence_number)
                }
            }
            _ => Ok(()),
        }
    }

    /// Sends a final acknowledgement and then resets to `Waiting`,
    /// preserving the outgoing frame that was just built (the reset must
    /// not clear `current_image` before the driver has a chance to render
    /// it).
    fn reset_session_to_waiting_after_send(&mut self, request_type: RequestType, sequence_number: i32) -> Result<()> {
        self.send(request_type, sequence_number, None)?;
        let current_image = self.current_image.take();
        self.reset_session();
        self.current_image = current_image;
        Ok(())
    }
}
