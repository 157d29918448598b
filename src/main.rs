//! Binary entry point (component C10). Wires the CLI, config, logger, peer
//! state machine, and driver loop together. Capturing and rendering QR codes
//! through an actual webcam and display is outside this crate's scope
//! (`SPEC_FULL.md` §1) — integrators link against the library and supply
//! their own `qrxfer::channel::ChannelIo`. This binary runs with a channel
//! that never captures anything, purely to exercise the wiring.

use std::process::ExitCode;

use clap::Parser;

use qrxfer::channel::NullChannelIo;
use qrxfer::cli::Cli;
use qrxfer::clock::SystemClock;
use qrxfer::config::Config;
use qrxfer::driver::{self, RealSleeper};
use qrxfer::peer::{ChronoTimestamper, Peer};

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::new().filter_level(cli.log_level()).init();

    let config = cli.apply(Config::default());
    let mut peer = Peer::new(config, SystemClock, ChronoTimestamper);

    let mut channel = NullChannelIo::new();
    channel.stop();
    log::warn!("no camera/display backend wired in; exiting immediately (link your own ChannelIo to drive a real session)");

    match driver::run(&mut peer, &mut channel, &RealSleeper) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("fatal error: {err}");
            ExitCode::FAILURE
        }
    }
}
