//! The external collaborator boundary to the camera/QR subsystem (component
//! C5). Capture and QR decode/render live outside this crate's scope
//! (`SPEC_FULL.md` §1); this trait is the contract the driver loop and the
//! peer state machine are written against, mirroring the way the teacher's
//! `Interface` trait stands in for the UART hardware.

/// Best-effort capture/render/clear over a half-duplex optical link.
pub trait ChannelIo {
    /// Returns the decoded payload of exactly one QR code visible this
    /// tick, or `None` (no code, more than one code, or a decode failure).
    fn capture(&mut self) -> Option<Vec<u8>>;

    /// Displays a QR code encoding `payload`. Precondition: `payload.len()
    /// <= qrxfer::frame::MAX_FRAME_SIZE`.
    fn render(&mut self, payload: &[u8]);

    /// Clears the display (no frame to show).
    fn clear(&mut self);

    /// `true` while the capture source is live.
    fn is_capturing(&self) -> bool;
}

/// Always-empty capture, no-op render; used where a channel is required but
/// never expected to produce traffic.
pub struct NullChannelIo {
    capturing: bool,
}

impl NullChannelIo {
    pub fn new() -> Self {
        NullChannelIo { capturing: true }
    }

    pub fn stop(&mut self) {
        self.capturing = false;
    }
}

impl ChannelIo for NullChannelIo {
    fn capture(&mut self) -> Option<Vec<u8>> {
        None
    }

    fn render(&mut self, _payload: &[u8]) {}

    fn clear(&mut self) {}

    fn is_capturing(&self) -> bool {
        self.capturing
    }
}

/// Replays a scripted sequence of capture results (`SPEC_FULL.md` §9
/// "Capture source as an interface"). Records every rendered payload for
/// assertions. Reports `is_capturing() == false` once the script and any
/// rendered output have both been drained, so the driver loop terminates
/// deterministically in tests.
pub struct ScriptedChannelIo {
    script: std::collections::VecDeque<Option<Vec<u8>>>,
    pub rendered: Vec<Vec<u8>>,
    pub cleared_count: usize,
    extra_ticks_after_script: usize,
}

impl ScriptedChannelIo {
    pub fn new(script: Vec<Option<Vec<u8>>>) -> Self {
        ScriptedChannelIo {
            script: script.into(),
            rendered: Vec::new(),
            cleared_count: 0,
            extra_ticks_after_script: 0,
        }
    }

    /// Keeps `is_capturing()` true for `n` additional ticks after the
    /// scripted captures are exhausted, so the driver gets a chance to
    /// react to the last queued response before the loop ends.
    pub fn with_trailing_ticks(mut self, n: usize) -> Self {
        self.extra_ticks_after_script = n;
        self
    }
}

impl ChannelIo for ScriptedChannelIo {
    fn capture(&mut self) -> Option<Vec<u8>> {
        match self.script.pop_front() {
            Some(result) => result,
            None => {
                if self.extra_ticks_after_script > 0 {
                    self.extra_ticks_after_script -= 1;
                }
                None
            }
        }
    }

    fn render(&mut self, payload: &[u8]) {
        self.rendered.push(payload.to_vec());
    }

    fn clear(&mut self) {
        self.cleared_count += 1;
    }

    fn is_capturing(&self) -> bool {
        !self.script.is_empty() || self.extra_ticks_after_script > 0
    }
}
