// src/common/checksum.rs

//! Frame checksum used by ELCOM.
//!
//! The protocol layer treats the checksum as an opaque 16-bit function over a
//! byte range. Encoding and decoding only require that the same engine is used
//! on both ends; [`CrcChecksum`] is the default engine.

use core::fmt;

use crc::{Algorithm, Crc};

/// Default 16-bit CRC for ELCOM frames (CRC-16/ARC parameters).
/// Polynomial: 0x8005 (reflected 0xA001)
/// Initial Value: 0x0000
/// Input Reflected: true
/// Output Reflected: true
/// Final XOR: 0x0000
/// Check Value: 0xBB3D (for "123456789")
/// Residue: 0x0000
pub const ELCOM_CRC: Algorithm<u16> = Algorithm {
    width: 16,
    poly: 0x8005,
    init: 0x0000,
    refin: true,
    refout: true,
    xorout: 0x0000,
    check: 0xBB3D,
    residue: 0x0000,
};

/// A pluggable 16-bit checksum over a byte range.
///
/// Any `Fn(&[u8]) -> u16` is a checksum engine, which makes it easy to plug in
/// the exact routine a given sensor firmware uses.
pub trait ChecksumEngine {
    /// Computes the checksum of `bytes`.
    fn compute(&self, bytes: &[u8]) -> u16;
}

impl<F> ChecksumEngine for F
where
    F: Fn(&[u8]) -> u16,
{
    #[inline]
    fn compute(&self, bytes: &[u8]) -> u16 {
        self(bytes)
    }
}

/// Table-driven CRC-16 engine built on the `crc` crate.
pub struct CrcChecksum {
    algorithm: &'static Algorithm<u16>,
    crc: Crc<u16>,
}

impl CrcChecksum {
    /// Creates an engine for any 16-bit algorithm from the `crc` catalog
    /// (e.g. `&crc::CRC_16_MODBUS`) or a custom one.
    pub const fn new(algorithm: &'static Algorithm<u16>) -> Self {
        CrcChecksum {
            algorithm,
            crc: Crc::<u16>::new(algorithm),
        }
    }

    /// The algorithm parameters this engine was built with.
    pub fn algorithm(&self) -> &'static Algorithm<u16> {
        self.algorithm
    }
}

impl Default for CrcChecksum {
    fn default() -> Self {
        CrcChecksum::new(&ELCOM_CRC)
    }
}

impl ChecksumEngine for CrcChecksum {
    #[inline]
    fn compute(&self, bytes: &[u8]) -> u16 {
        self.crc.checksum(bytes)
    }
}

impl fmt::Debug for CrcChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrcChecksum")
            .field("poly", &self.algorithm.poly)
            .field("init", &self.algorithm.init)
            .finish()
    }
}
