// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod checksum;
pub mod command;
pub mod config;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod packet;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From checksum.rs
pub use checksum::{ChecksumEngine, CrcChecksum, ELCOM_CRC};

// From command.rs
pub use command::Command;

// From config.rs
pub use config::Config;

// From error.rs
pub use error::{ElcomError, ErrorCode, SlaveErrorCode};

// From hal_traits.rs
pub use hal_traits::{ElcomInstant, ElcomSerial, ElcomTimer, Link};

// From packet.rs
pub use packet::{decode_packet, encode_packet, is_response_complete, FrameBuffer, Packet, PacketError};

// From types.rs
pub use types::{DataFormat, Fallback, QueryResultExt, SensorData, SensorStatus, Text};

// Frame layout constants stay behind `common::frame::*`.

#[cfg(feature = "impl-generic-hal")]
pub use hal_traits::{DelayClock, DelayInstant};
