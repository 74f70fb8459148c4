// src/common/frame.rs

// ELCOM frame layout:
//
// | SOP | VER | CMD | LEN | DATA[LEN] | CRC (LE, 2) | EOP |
//
// The checksum covers SOP through the end of DATA. Checksum and EOP have no
// fixed position because of the variable data length.

// === Field positions ===

pub const START_OF_PACKET_POS: usize = 0;
pub const VERSION_POS: usize = 1;
pub const COMMAND_POS: usize = 2;
pub const LENGTH_POS: usize = 3;
pub const DATA_POS: usize = 4;

// === Field sizes ===

pub const START_OF_PACKET_SIZE: usize = 1;
pub const VERSION_SIZE: usize = 1;
pub const COMMAND_SIZE: usize = 1;
pub const LENGTH_SIZE: usize = 1;
pub const CHECKSUM_SIZE: usize = 2;
pub const END_OF_PACKET_SIZE: usize = 1;

pub const HEADER_SIZE: usize = START_OF_PACKET_SIZE + VERSION_SIZE + COMMAND_SIZE + LENGTH_SIZE;
pub const FOOTER_SIZE: usize = CHECKSUM_SIZE + END_OF_PACKET_SIZE;

/// Size of the sensor's UART buffer, which bounds the payload.
pub const DATA_BUFFER_SIZE: usize = 255;

/// Largest payload a packet can carry (251 bytes).
pub const MAX_DATA_SIZE: usize = DATA_BUFFER_SIZE - COMMAND_SIZE - CHECKSUM_SIZE - END_OF_PACKET_SIZE;

/// Largest complete frame, used to size the transmit and receive buffers.
pub const FRAME_MAX_SIZE: usize = HEADER_SIZE + MAX_DATA_SIZE + FOOTER_SIZE;

// === Fixed field values ===

pub const START_OF_PACKET_VALUE: u8 = 0x5B;
pub const VERSION_VALUE: u8 = 0x01;
pub const END_OF_PACKET_VALUE: u8 = 0x5D;

/// Offset of the checksum for a frame carrying `data_length` bytes.
#[inline]
pub const fn checksum_pos(data_length: usize) -> usize {
    HEADER_SIZE + data_length
}

/// Offset of the end-of-packet marker for a frame carrying `data_length` bytes.
#[inline]
pub const fn end_of_packet_pos(data_length: usize) -> usize {
    checksum_pos(data_length) + CHECKSUM_SIZE
}

/// Total encoded size of a frame carrying `data_length` bytes.
#[inline]
pub const fn frame_len(data_length: usize) -> usize {
    HEADER_SIZE + data_length + FOOTER_SIZE
}
