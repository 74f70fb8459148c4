// src/lib.rs

#![cfg_attr(not(test), no_std)] // no_std outside of unit tests

pub mod common;
pub mod host;

// Re-export key types for convenience
pub use common::{ElcomError, ErrorCode, Packet, SlaveErrorCode};
pub use host::{ElcomSensor, Reading, SensorInfo};
