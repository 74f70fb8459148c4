// src/common/error.rs

use core::fmt;

use super::packet::Packet;

/// Protocol-level result codes, with the values the ELCOM firmware uses.
///
/// This is the flat, C-compatible view of an [`ElcomError`]. It is useful for
/// reporting a failure over another link or storing it in a status register.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum ErrorCode {
    NoError = 0x00,
    InvalidStartMarker = 0x01,
    InvalidVersion = 0x02,
    InvalidChecksum = 0x03,
    InvalidEndMarker = 0x04,
    UnknownCommand = 0x05,
    TransportTimeout = 0x06,
    SlaveReportedError = 0x07,
}

impl ErrorCode {
    /// Tries to convert a raw byte into an `ErrorCode`.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(ErrorCode::NoError),
            0x01 => Some(ErrorCode::InvalidStartMarker),
            0x02 => Some(ErrorCode::InvalidVersion),
            0x03 => Some(ErrorCode::InvalidChecksum),
            0x04 => Some(ErrorCode::InvalidEndMarker),
            0x05 => Some(ErrorCode::UnknownCommand),
            0x06 => Some(ErrorCode::TransportTimeout),
            0x07 => Some(ErrorCode::SlaveReportedError),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErrorCode::*;
        match self {
            NoError => write!(f, "No error"),
            InvalidStartMarker => write!(f, "Invalid start of packet"),
            InvalidVersion => write!(f, "Invalid protocol version"),
            InvalidChecksum => write!(f, "Invalid checksum"),
            InvalidEndMarker => write!(f, "Invalid end of packet"),
            UnknownCommand => write!(f, "Unknown command"),
            TransportTimeout => write!(f, "Sensor did not answer in time"),
            SlaveReportedError => write!(f, "Sensor reported an error"),
        }
    }
}

/// Error codes carried in the payload of a slave error (`0x40`) response.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum SlaveErrorCode {
    Unknown = 0x01,
    InvalidCommand = 0x02,
    InvalidDataSize = 0x03,
    InvalidValue = 0x04,
    NotPermitted = 0x05,
    OperationFailed = 0x06,
}

impl SlaveErrorCode {
    /// Tries to convert a raw byte into a `SlaveErrorCode`.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(SlaveErrorCode::Unknown),
            0x02 => Some(SlaveErrorCode::InvalidCommand),
            0x03 => Some(SlaveErrorCode::InvalidDataSize),
            0x04 => Some(SlaveErrorCode::InvalidValue),
            0x05 => Some(SlaveErrorCode::NotPermitted),
            0x06 => Some(SlaveErrorCode::OperationFailed),
            _ => None,
        }
    }

    /// Slave error code a sensor answers with after failing to handle a
    /// request for the given reason.
    pub fn for_error(code: ErrorCode) -> Self {
        match code {
            ErrorCode::UnknownCommand => SlaveErrorCode::InvalidCommand,
            // NoError should not get here, any validation error lands here too
            _ => SlaveErrorCode::OperationFailed,
        }
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SlaveErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SlaveErrorCode::*;
        match self {
            Unknown => write!(f, "unknown failure"),
            InvalidCommand => write!(f, "invalid command"),
            InvalidDataSize => write!(f, "invalid data size"),
            InvalidValue => write!(f, "invalid value"),
            NotPermitted => write!(f, "operation not permitted"),
            OperationFailed => write!(f, "operation failed"),
        }
    }
}

/// Errors surfaced by the ELCOM codec and the host driver.
///
/// `E` is the error type of the underlying transport. The codec functions are
/// generic over it so their errors flow into a transaction unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ElcomError<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the transport implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// The sensor did not complete a response frame before the deadline.
    #[error("Operation timed out")]
    Timeout,

    /// Start-of-packet or version byte is wrong.
    #[error("Invalid start of packet")]
    InvalidStartMarker,

    /// Version byte is wrong.
    #[error("Invalid protocol version")]
    InvalidVersion,

    /// End-of-packet byte missing or wrong at the position given by the length field.
    #[error("Invalid end of packet")]
    InvalidEndMarker,

    /// Received checksum does not match the computed one.
    #[error("Checksum mismatch: expected {expected:#06x}, calculated {calculated:#06x}")]
    InvalidChecksum { expected: u16, calculated: u16 },

    /// The sensor answered with a slave error frame.
    #[error("Sensor reported error: {code}")]
    SlaveError { code: SlaveErrorCode, packet: Packet },

    /// A well-formed response carried fewer (or other) data bytes than the query needs.
    #[error("Unexpected response length: needed {expected}, got {got}")]
    UnexpectedLength { expected: usize, got: usize },
}

impl<E: core::fmt::Debug> ElcomError<E> {
    /// Flat protocol code for this error, `None` for transport I/O errors.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ElcomError::Io(_) => None,
            ElcomError::Timeout => Some(ErrorCode::TransportTimeout),
            ElcomError::InvalidStartMarker => Some(ErrorCode::InvalidStartMarker),
            ElcomError::InvalidVersion => Some(ErrorCode::InvalidVersion),
            ElcomError::InvalidEndMarker => Some(ErrorCode::InvalidEndMarker),
            ElcomError::InvalidChecksum { .. } => Some(ErrorCode::InvalidChecksum),
            ElcomError::SlaveError { .. } => Some(ErrorCode::SlaveReportedError),
            ElcomError::UnexpectedLength { .. } => Some(ErrorCode::SlaveReportedError),
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_round_trip_values() {
        for raw in 0x00..=0x07u8 {
            let code = ErrorCode::from_u8(raw).unwrap();
            assert_eq!(code.as_u8(), raw);
        }
        assert_eq!(ErrorCode::from_u8(0x08), None);
    }

    #[test]
    fn test_slave_error_code_values() {
        assert_eq!(SlaveErrorCode::from_u8(0x02), Some(SlaveErrorCode::InvalidCommand));
        assert_eq!(SlaveErrorCode::from_u8(0x06), Some(SlaveErrorCode::OperationFailed));
        assert_eq!(SlaveErrorCode::from_u8(0x00), None);
        assert_eq!(SlaveErrorCode::from_u8(0x07), None);
    }

    #[test]
    fn test_slave_error_for_error() {
        assert_eq!(SlaveErrorCode::for_error(ErrorCode::UnknownCommand), SlaveErrorCode::InvalidCommand);
        assert_eq!(SlaveErrorCode::for_error(ErrorCode::InvalidChecksum), SlaveErrorCode::OperationFailed);
        assert_eq!(SlaveErrorCode::for_error(ErrorCode::InvalidStartMarker), SlaveErrorCode::OperationFailed);
    }

    #[test]
    fn test_error_to_code() {
        assert_eq!(ElcomError::<()>::Timeout.code(), Some(ErrorCode::TransportTimeout));
        assert_eq!(
            ElcomError::<()>::InvalidChecksum { expected: 1, calculated: 2 }.code(),
            Some(ErrorCode::InvalidChecksum)
        );
        assert_eq!(
            ElcomError::<()>::UnexpectedLength { expected: 6, got: 3 }.code(),
            Some(ErrorCode::SlaveReportedError)
        );
        assert_eq!(ElcomError::Io(42u8).code(), None);
    }

    #[test]
    fn test_display_messages() {
        let err: ElcomError<()> = ElcomError::InvalidChecksum { expected: 0x00ff, calculated: 0x0100 };
        assert_eq!(err.to_string(), "Checksum mismatch: expected 0x00ff, calculated 0x0100");
        assert_eq!(ErrorCode::TransportTimeout.to_string(), "Sensor did not answer in time");
    }
}
