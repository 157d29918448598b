//! Bit-at-a-time CRC-64 (the reflected CRC-64/ISO variant — polynomial 0x1B,
//! reflected to 0xD800000000000000 — the algorithm behind Python's
//! `crc64iso` package), in the same shift-register style as the sibling
//! CRC-32 implementations this crate grew from.

const POLYNOMIAL_REVERSED: u64 = 0xd800_0000_0000_0000;
const SEED: u64 = 0xffff_ffff_ffff_ffff;

pub struct Crc64Context {
    crc: u64,
}

impl Crc64Context {
    pub fn new() -> Self {
        Crc64Context { crc: SEED }
    }

    pub fn step(&mut self, byte: u8) {
        self.crc ^= byte as u64;
        for _ in 0..8 {
            if self.crc & 1 == 1 {
                self.crc = (self.crc >> 1) ^ POLYNOMIAL_REVERSED;
            } else {
                self.crc >>= 1;
            }
        }
    }

    pub fn step_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.step(byte);
        }
    }

    pub fn finalize(&self) -> u64 {
        !self.crc
    }
}

/// Computes the CRC-64 of `bytes` in one shot.
pub fn crc64(bytes: &[u8]) -> u64 {
    let mut ctx = Crc64Context::new();
    ctx.step_all(bytes);
    ctx.finalize()
}
