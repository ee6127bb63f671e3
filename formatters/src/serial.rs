// Volume serial sources

use espfat_core::SerialSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

/// Low 32 bits of a random v4 UUID. Unique enough to tell disks apart.
#[derive(Debug, Default)]
pub struct UuidSerial;

impl SerialSource for UuidSerial {
    fn next_serial(&mut self) -> u32 {
        Uuid::new_v4().as_u128() as u32
    }
}

/// Deterministic serials from a fixed seed, for reproducible images.
#[derive(Debug)]
pub struct SeededSerial {
    rng: StdRng,
}

impl SeededSerial {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl SerialSource for SeededSerial {
    fn next_serial(&mut self) -> u32 {
        self.rng.gen()
    }
}

/// Always the same serial, for a caller-chosen volume ID.
#[derive(Debug, Clone, Copy)]
pub struct FixedSerial(pub u32);

impl SerialSource for FixedSerial {
    fn next_serial(&mut self) -> u32 {
        self.0
    }
}
