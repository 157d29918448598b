//! End-to-end scenarios driving the full `driver::run` loop over a scripted
//! optical channel, asserting on the sequence of frames actually rendered
//! rather than on `Peer`'s internal state.

use std::time::Duration;

use qrxfer::channel::ScriptedChannelIo;
use qrxfer::clock::FakeClock;
use qrxfer::config::Config;
use qrxfer::driver::{self, NoopSleeper};
use qrxfer::frame::{Frame, RequestType};
use qrxfer::peer::{Peer, Status, Timestamper};

struct FixedTimestamper(&'static str);

impl Timestamper for FixedTimestamper {
    fn iso_now(&self) -> String {
        self.0.to_string()
    }
}

fn rendered_types(channel: &ScriptedChannelIo) -> Vec<RequestType> {
    channel
        .rendered
        .iter()
        .map(|bytes| Frame::decode(bytes).unwrap().header.request_type)
        .collect()
}

#[test]
fn happy_receiver_acknowledges_and_confirms() {
    let send_dir = tempfile::tempdir().unwrap();
    let receive_dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.send_dir = send_dir.path().to_path_buf();
    config.receive_dir = receive_dir.path().to_path_buf();

    let mut peer = Peer::new(config, FakeClock::new(), FixedTimestamper("2024-03-01T10-00-00"));

    let script = vec![
        Some(Frame::new(RequestType::StartConnection, 0, Some(b".dat".to_vec())).encode().unwrap()),
        Some(Frame::new(RequestType::SendData, 0, Some(b"payload-one".to_vec())).encode().unwrap()),
        Some(Frame::new(RequestType::Finish, 0, None).encode().unwrap()),
    ];
    let mut channel = ScriptedChannelIo::new(script).with_trailing_ticks(1);

    driver::run(&mut peer, &mut channel, &NoopSleeper).unwrap();

    assert_eq!(
        rendered_types(&channel),
        vec![RequestType::ConfirmConnection, RequestType::ConfirmData, RequestType::ConfirmData]
    );
    assert_eq!(peer.status(), Status::Waiting);

    let written: Vec<_> = std::fs::read_dir(receive_dir.path()).unwrap().collect();
    assert_eq!(written.len(), 1);
    assert_eq!(std::fs::read(written[0].as_ref().unwrap().path()).unwrap(), b"payload-one");
}

#[test]
fn receiver_recovers_from_one_bad_checksum() {
    let send_dir = tempfile::tempdir().unwrap();
    let receive_dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.send_dir = send_dir.path().to_path_buf();
    config.receive_dir = receive_dir.path().to_path_buf();
    let mut peer = Peer::new(config, FakeClock::new(), FixedTimestamper("ts"));

    let mut corrupted = Frame::new(RequestType::SendData, 0, Some(b"x".to_vec())).encode().unwrap();
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0xff;

    let script = vec![
        Some(Frame::new(RequestType::StartConnection, 0, None).encode().unwrap()),
        Some(corrupted),
        Some(Frame::new(RequestType::SendData, 0, Some(b"x".to_vec())).encode().unwrap()),
        Some(Frame::new(RequestType::Finish, 0, None).encode().unwrap()),
    ];
    let mut channel = ScriptedChannelIo::new(script).with_trailing_ticks(1);

    driver::run(&mut peer, &mut channel, &NoopSleeper).unwrap();

    assert_eq!(
        rendered_types(&channel),
        vec![
            RequestType::ConfirmConnection,
            RequestType::RepeatData,
            RequestType::ConfirmData,
            RequestType::ConfirmData,
        ]
    );
}

#[test]
fn happy_sender_walks_every_chunk_to_completion() {
    let send_dir = tempfile::tempdir().unwrap();
    std::fs::write(send_dir.path().join("report.csv"), vec![b'x'; 450]).unwrap();
    let mut config = Config::default();
    config.send_dir = send_dir.path().to_path_buf();
    let mut peer = Peer::new(config, FakeClock::new(), FixedTimestamper("ts"));

    let script = vec![
        None,
        Some(Frame::new(RequestType::ConfirmConnection, 0, None).encode().unwrap()),
        Some(Frame::new(RequestType::ConfirmData, 0, None).encode().unwrap()),
        Some(Frame::new(RequestType::ConfirmData, 1, None).encode().unwrap()),
        Some(Frame::new(RequestType::ConfirmData, 2, None).encode().unwrap()),
        Some(Frame::new(RequestType::ConfirmFinish, 0, None).encode().unwrap()),
    ];
    let mut channel = ScriptedChannelIo::new(script).with_trailing_ticks(1);

    driver::run(&mut peer, &mut channel, &NoopSleeper).unwrap();

    assert_eq!(
        rendered_types(&channel),
        vec![
            RequestType::StartConnection,
            RequestType::SendData,
            RequestType::SendData,
            RequestType::SendData,
            RequestType::Finish,
        ]
    );
    assert_eq!(peer.status(), Status::Waiting);
    assert!(!send_dir.path().join("report.csv").exists());
}

#[test]
fn sender_resends_on_repeat_data_request() {
    let send_dir = tempfile::tempdir().unwrap();
    std::fs::write(send_dir.path().join("a.bin"), vec![b'y'; 450]).unwrap();
    let mut config = Config::default();
    config.send_dir = send_dir.path().to_path_buf();
    let mut peer = Peer::new(config, FakeClock::new(), FixedTimestamper("ts"));

    let script = vec![
        None,
        Some(Frame::new(RequestType::ConfirmConnection, 0, None).encode().unwrap()),
        Some(Frame::new(RequestType::RepeatData, 0, None).encode().unwrap()),
        Some(Frame::new(RequestType::ConfirmData, 0, None).encode().unwrap()),
    ];
    let mut channel = ScriptedChannelIo::new(script).with_trailing_ticks(1);

    driver::run(&mut peer, &mut channel, &NoopSleeper).unwrap();

    assert_eq!(
        rendered_types(&channel),
        vec![RequestType::StartConnection, RequestType::SendData, RequestType::SendData, RequestType::SendData]
    );
    assert_eq!(peer.status(), Status::SentData);
}

#[test]
fn sender_times_out_and_resets_display() {
    let send_dir = tempfile::tempdir().unwrap();
    std::fs::write(send_dir.path().join("a.bin"), b"short").unwrap();
    let mut config = Config::default();
    config.send_dir = send_dir.path().to_path_buf();
    let clock = FakeClock::new();
    let mut peer = Peer::new(config, clock.clone(), FixedTimestamper("ts"));

    peer.handle_event(None).unwrap();
    assert_eq!(peer.status(), Status::WaitingToSendFile);

    clock.advance(Duration::from_secs(11));
    let mut channel = ScriptedChannelIo::new(vec![None]).with_trailing_ticks(1);
    driver::run(&mut peer, &mut channel, &NoopSleeper).unwrap();

    // The source file is still sitting in send_dir, so the very next tick
    // after the reset immediately starts a fresh send; what matters here is
    // that the stalled session's display got cleared on the way.
    assert!(channel.cleared_count >= 1);
}

#[test]
fn receiver_times_out_and_discards_partial_transfer() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.send_dir = dir.path().to_path_buf();
    let clock = FakeClock::new();
    let mut peer = Peer::new(config, clock.clone(), FixedTimestamper("ts"));

    peer.handle_event(Some(Frame::new(RequestType::StartConnection, 0, None))).unwrap();
    peer.handle_event(Some(Frame::new(RequestType::SendData, 0, Some(b"partial".to_vec())))).unwrap();
    assert_eq!(peer.status(), Status::ReceivingData);

    clock.advance(Duration::from_secs(11));
    let mut channel = ScriptedChannelIo::new(vec![None]).with_trailing_ticks(1);
    driver::run(&mut peer, &mut channel, &NoopSleeper).unwrap();

    assert_eq!(peer.status(), Status::Waiting);
    assert!(channel.cleared_count >= 1);
}
