//! `qrxfer`: moves a file between two machines with no network link by
//! treating a screen and a webcam as a half-duplex serial line, one QR code
//! per tick. A stop-and-wait state machine (`peer`) drives which side is
//! sending, which is receiving, and when to give up and reset.

pub mod channel;
pub mod checksum;
pub mod chunk;
pub mod cli;
pub mod clock;
pub mod config;
pub mod crc64;
pub mod driver;
pub mod error;
pub mod frame;
pub mod inbox;
pub mod outbox;
pub mod peer;
pub mod ratelimit;
