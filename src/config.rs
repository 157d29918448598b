//! Bundles the tunables the original protocol hardcodes as constants
//! (component C11). `Config::default()` reproduces `SPEC_FULL.md`'s literal
//! values exactly; the CLI (C10) only ever overrides the folder paths and
//! camera index, so running with no flags matches the spec's hardcoded
//! behavior.

use std::path::PathBuf;
use std::time::Duration;

use crate::chunk::CHUNK_SIZE;
use crate::frame::MAX_FRAME_SIZE;

#[derive(Debug, Clone)]
pub struct Config {
    pub send_dir: PathBuf,
    pub receive_dir: PathBuf,
    pub camera_index: u32,
    pub chunk_size: usize,
    pub waiting_timeout: Duration,
    pub print_interval: Duration,
    pub max_frame_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            send_dir: PathBuf::from("send-files"),
            receive_dir: PathBuf::from("received-files"),
            camera_index: 0,
            chunk_size: CHUNK_SIZE,
            waiting_timeout: Duration::from_secs(10),
            print_interval: Duration::from_secs(5),
            max_frame_size: MAX_FRAME_SIZE,
        }
    }
}
