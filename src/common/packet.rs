// src/common/packet.rs

//! ELCOM packet type and frame codec.

use arrayvec::ArrayVec;
use core::fmt::Debug;

use super::checksum::ChecksumEngine;
use super::command::Command;
use super::error::{ElcomError, ErrorCode, SlaveErrorCode};
use super::frame::*;

/// Byte buffer large enough for any encoded ELCOM frame.
pub type FrameBuffer = ArrayVec<u8, FRAME_MAX_SIZE>;

/// Payload storage of a packet; its capacity is the protocol's maximum data size.
pub type PacketData = heapless::Vec<u8, MAX_DATA_SIZE>;

/// Error building a [`Packet`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum PacketError {
    /// Payload does not fit in a single frame.
    #[error("Packet data too long: {len} bytes, max {max}")]
    DataTooLong { len: usize, max: usize },
}

/// A logical ELCOM packet: a command byte and up to [`MAX_DATA_SIZE`] data bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Packet {
    command: u8,
    data: PacketData,
}

impl Packet {
    /// Creates a packet, rejecting payloads longer than [`MAX_DATA_SIZE`].
    pub fn new(command: impl Into<u8>, data: &[u8]) -> Result<Self, PacketError> {
        let data = PacketData::from_slice(data).map_err(|_| PacketError::DataTooLong {
            len: data.len(),
            max: MAX_DATA_SIZE,
        })?;
        Ok(Packet {
            command: command.into(),
            data,
        })
    }

    /// Creates a packet without data.
    pub fn empty(command: impl Into<u8>) -> Self {
        Packet {
            command: command.into(),
            data: PacketData::new(),
        }
    }

    /// Creates a request addressed to one sensor of the module: the data is
    /// the single sensor index byte.
    pub fn indexed(command: impl Into<u8>, sensor_index: u8) -> Self {
        let mut data = PacketData::new();
        let _ = data.push(sensor_index);
        Packet {
            command: command.into(),
            data,
        }
    }

    /// Builds the slave error response a sensor sends after failing to handle
    /// a request for the given reason.
    pub fn slave_error(reason: ErrorCode) -> Self {
        let code = SlaveErrorCode::for_error(reason);
        let mut data = PacketData::new();
        // Capacity is MAX_DATA_SIZE, a single byte always fits
        let _ = data.push(code.as_u8());
        Packet {
            command: Command::SlaveError.code(),
            data,
        }
    }

    #[inline]
    pub fn command(&self) -> u8 {
        self.command
    }

    /// The command byte as a known [`Command`], if it is one.
    pub fn known_command(&self) -> Option<Command> {
        Command::from_u8(self.command)
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Value of the length field for this packet.
    #[inline]
    pub fn data_length(&self) -> u8 {
        // Bounded by MAX_DATA_SIZE < 256
        self.data.len() as u8
    }

    #[inline]
    pub fn is_slave_error(&self) -> bool {
        self.command == Command::SlaveError.code()
    }

    /// Slave error code carried by a slave error packet.
    pub fn slave_error_code(&self) -> Option<SlaveErrorCode> {
        if !self.is_slave_error() {
            return None;
        }
        Some(
            self.data
                .first()
                .copied()
                .and_then(SlaveErrorCode::from_u8)
                .unwrap_or(SlaveErrorCode::Unknown),
        )
    }
}

/// Encodes `packet` into `out` and returns the number of bytes to transmit.
///
/// `out` is cleared first. The checksum covers every byte from the start
/// marker through the end of the data and is written little-endian.
pub fn encode_packet<C>(packet: &Packet, checksum: &C, out: &mut FrameBuffer) -> usize
where
    C: ChecksumEngine + ?Sized,
{
    out.clear();

    out.push(START_OF_PACKET_VALUE);
    out.push(VERSION_VALUE);
    out.push(packet.command);
    out.push(packet.data_length());
    out.extend(packet.data.iter().copied());

    let crc = checksum.compute(out.as_slice());
    out.extend(crc.to_le_bytes());

    out.push(END_OF_PACKET_VALUE);

    out.len()
}

/// Validates a received frame and extracts its packet.
///
/// Checks run in a fixed order and stop at the first failure: header, end
/// marker, checksum. A slave error frame decodes fully and is returned as
/// [`ElcomError::SlaveError`] with the packet attached.
pub fn decode_packet<E, C>(frame: &[u8], checksum: &C) -> Result<Packet, ElcomError<E>>
where
    E: Debug,
    C: ChecksumEngine + ?Sized,
{
    // 1. Header
    let start = frame.get(START_OF_PACKET_POS).copied();
    let version = frame.get(VERSION_POS).copied();
    if start != Some(START_OF_PACKET_VALUE) || version != Some(VERSION_VALUE) {
        return Err(ElcomError::InvalidStartMarker);
    }
    // Unreachable while the start check above also covers the version byte
    if version != Some(VERSION_VALUE) {
        return Err(ElcomError::InvalidVersion);
    }

    // 2. Footer, located through the length field
    let data_length = match frame.get(LENGTH_POS) {
        Some(&len) => usize::from(len),
        None => return Err(ElcomError::InvalidEndMarker),
    };
    if frame.get(end_of_packet_pos(data_length)) != Some(&END_OF_PACKET_VALUE) {
        return Err(ElcomError::InvalidEndMarker);
    }

    // 3. Checksum
    let crc_pos = checksum_pos(data_length);
    let (covered, received) = match (frame.get(..crc_pos), frame.get(crc_pos..crc_pos + CHECKSUM_SIZE)) {
        (Some(covered), Some(&[lo, hi])) => (covered, u16::from_le_bytes([lo, hi])),
        _ => return Err(ElcomError::InvalidEndMarker),
    };
    let calculated = checksum.compute(covered);
    if received != calculated {
        log::debug!("ELCOM checksum mismatch: received {:#06x}, calculated {:#06x}", received, calculated);
        return Err(ElcomError::InvalidChecksum {
            expected: received,
            calculated,
        });
    }

    // 4. Fields
    let mut packet = Packet::empty(frame[COMMAND_POS]);
    if data_length <= MAX_DATA_SIZE {
        if let Some(data) = frame.get(DATA_POS..DATA_POS + data_length) {
            packet.data = PacketData::from_slice(data).unwrap_or_default();
        }
    }

    if let Some(code) = packet.slave_error_code() {
        return Err(ElcomError::SlaveError { code, packet });
    }

    Ok(packet)
}

/// Cheap check used while bytes are still arriving: true once the length byte
/// is non-zero and a non-zero byte sits where the end marker should be.
///
/// This does not validate anything; [`decode_packet`] does.
pub fn is_response_complete(buffer: &[u8]) -> bool {
    match buffer.get(LENGTH_POS) {
        Some(&len) if len != 0 => buffer
            .get(end_of_packet_pos(usize::from(len)))
            .is_some_and(|&b| b != 0),
        _ => false,
    }
}
