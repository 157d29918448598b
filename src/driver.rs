//! The event loop (component C8): ticks the peer state machine against a
//! `ChannelIo`, with exactly three suspension points per iteration (capture,
//! render, the post-timeout sleep), mirroring the teacher's own
//! single-threaded `run` loop in `transport.rs` generalized from a byte
//! stream to a stop-and-wait session.

use std::time::Duration;

use log::info;

use crate::channel::ChannelIo;
use crate::clock::Clock;
use crate::error::QrxferError;
use crate::frame::Frame;
use crate::peer::{Peer, Timestamper};

/// Wall-clock sleep after an idle-timeout reset, injectable so tests never
/// actually block (`SPEC_FULL.md` §4.11 applies to this delay too, even
/// though it isn't driven by `Clock`).
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealSleeper;

impl Sleeper for RealSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSleeper;

impl Sleeper for NoopSleeper {
    fn sleep(&self, _duration: Duration) {}
}

const POST_RESET_SLEEP: Duration = Duration::from_secs(5);

/// Runs the session loop until `channel.is_capturing()` goes false. Returns
/// on the first fatal error from the peer (e.g. a frame too large to
/// encode, or a filesystem failure writing a received file).
pub fn run<C, T, Ch, S>(peer: &mut Peer<C, T>, channel: &mut Ch, sleeper: &S) -> crate::error::Result<()>
where
    C: Clock + Clone,
    T: Timestamper,
    Ch: ChannelIo,
    S: Sleeper,
{
    while channel.is_capturing() {
        match peer.current_image() {
            Some(bytes) => channel.render(bytes),
            None => channel.clear(),
        }

        if peer.check_timeout() {
            channel.clear();
            sleeper.sleep(POST_RESET_SLEEP);
        }

        let raw = channel.capture();
        let event = raw.and_then(|bytes| match Frame::decode(&bytes) {
            Ok(frame) => Some(frame),
            Err(reason) => {
                let err: QrxferError = reason.into();
                peer.log_invalid_frame(&err.to_string());
                None
            }
        });

        peer.handle_event(event)?;
    }

    info!("channel stopped capturing, driver loop exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ScriptedChannelIo;
    use crate::clock::FakeClock;
    use crate::config::Config;
    use crate::frame::RequestType;
    use crate::peer::ChronoTimestamper;

    struct FixedTimestamper;
    impl Timestamper for FixedTimestamper {
        fn iso_now(&self) -> String {
            "2024-01-01T00-00-00".to_string()
        }
    }

    #[test]
    fn full_receive_session_runs_to_completion() {
        let send_dir = tempfile::tempdir().unwrap();
        let receive_dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.send_dir = send_dir.path().to_path_buf();
        config.receive_dir = receive_dir.path().to_path_buf();

        let clock = FakeClock::new();
        let mut peer = Peer::new(config, clock, FixedTimestamper);

        let start = Frame::new(RequestType::StartConnection, 0, Some(b".txt".to_vec())).encode().unwrap();
        let data = Frame::new(RequestType::SendData, 0, Some(b"hi".to_vec())).encode().unwrap();
        let finish = Frame::new(RequestType::Finish, 0, None).encode().unwrap();

        let mut channel = ScriptedChannelIo::new(vec![Some(start), Some(data), Some(finish)]).with_trailing_ticks(1);
        run(&mut peer, &mut channel, &NoopSleeper).unwrap();

        assert_eq!(peer.status(), crate::peer::Status::Waiting);
        assert_eq!(std::fs::read_dir(receive_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn real_sleeper_does_not_panic() {
        RealSleeper.sleep(Duration::from_millis(0));
    }

    #[test]
    fn chrono_timestamper_produces_nonempty_string() {
        assert!(!ChronoTimestamper.iso_now().is_empty());
    }
}
