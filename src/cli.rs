//! CLI surface (component C10). The protocol itself takes no flags
//! (`SPEC_FULL.md` §6); these only let a shippable binary point at
//! non-default folders or a non-default camera without editing source.
//! Running with no flags reproduces the spec's hardcoded defaults exactly.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "qrxfer", about = "Transfer files over a QR-code/camera optical link")]
pub struct Cli {
    /// Directory scanned for the next file to send.
    #[arg(long)]
    pub send_dir: Option<PathBuf>,

    /// Directory received files are written under.
    #[arg(long)]
    pub receive_dir: Option<PathBuf>,

    /// Index of the camera device to capture from.
    #[arg(long)]
    pub camera_index: Option<u32>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.send_dir {
            config.send_dir = dir.clone();
        }
        if let Some(dir) = &self.receive_dir {
            config.receive_dir = dir.clone();
        }
        if let Some(index) = self.camera_index {
            config.camera_index = index;
        }
        config
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_leaves_defaults_untouched() {
        let cli = Cli { send_dir: None, receive_dir: None, camera_index: None, verbose: 0 };
        let config = cli.apply(Config::default());
        assert_eq!(config.send_dir, Config::default().send_dir);
        assert_eq!(config.camera_index, 0);
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli {
            send_dir: Some(PathBuf::from("/tmp/out")),
            receive_dir: None,
            camera_index: Some(2),
            verbose: 2,
        };
        let config = cli.apply(Config::default());
        assert_eq!(config.send_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.camera_index, 2);
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
    }
}
