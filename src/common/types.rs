// src/common/types.rs

use core::fmt;

use super::error::{ElcomError, ErrorCode};
use super::frame::MAX_DATA_SIZE;

/// Text returned by the identity queries (model, product, firmware, names).
pub type Text = heapless::String<MAX_DATA_SIZE>;

// --- Measurement scale ---

/// How the sensor encodes its measurement scale (`GET_SEN_DATA_FMT`).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct DataFormat {
    pub decimal_point: u8,
    pub unit_code: u8,
    pub resolution_int: u8,
    pub resolution_exp: u8,
}

impl DataFormat {
    /// Builds a data format from the four response bytes, in wire order.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        DataFormat {
            decimal_point: bytes[0],
            unit_code: bytes[1],
            resolution_int: bytes[2],
            resolution_exp: bytes[3],
        }
    }
}

// --- Measurement status ---

/// Status bitmask attached to every measurement.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct SensorStatus(u8);

impl SensorStatus {
    pub const DATA_NOT_RELIABLE: u8 = 1 << 0;
    pub const WARMUP: u8 = 1 << 1;
    pub const LAMP: u8 = 1 << 2;
    pub const CALIBRATION: u8 = 1 << 3;

    #[inline]
    pub const fn new(bits: u8) -> Self {
        SensorStatus(bits)
    }

    #[inline]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_data_not_reliable(&self) -> bool {
        self.0 & Self::DATA_NOT_RELIABLE != 0
    }

    #[inline]
    pub const fn is_warming_up(&self) -> bool {
        self.0 & Self::WARMUP != 0
    }

    #[inline]
    pub const fn is_lamp_flagged(&self) -> bool {
        self.0 & Self::LAMP != 0
    }

    #[inline]
    pub const fn is_calibrating(&self) -> bool {
        self.0 & Self::CALIBRATION != 0
    }
}

impl fmt::Debug for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorStatus")
            .field("bits", &format_args!("{:#04x}", self.0))
            .field("data_not_reliable", &self.is_data_not_reliable())
            .field("warmup", &self.is_warming_up())
            .field("lamp", &self.is_lamp_flagged())
            .field("calibration", &self.is_calibrating())
            .finish()
    }
}

/// One gas measurement.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SensorData {
    pub status: SensorStatus,
    /// Sensor-specific error byte.
    pub error: u8,
    /// Concentration in PPM.
    pub value: i32,
}

impl SensorData {
    /// Value reported when no measurement could be read.
    pub const INVALID: SensorData = SensorData {
        status: SensorStatus(0xFF),
        error: 0xFF,
        value: 0,
    };
}

/// Converts a raw concentration (hundredths of PPM) to whole PPM, rounding
/// halves away from zero.
pub fn ppm_from_raw(raw: i32) -> i32 {
    let raw = i64::from(raw);
    let rounded = if raw > 0 { (raw + 50) / 100 } else { (raw - 50) / 100 };
    // |raw / 100| + 1 always fits in i32
    rounded as i32
}

/// Converts a raw temperature (hundredths of a degree) to degrees Celsius.
pub fn celsius_from_raw(raw: i32) -> f32 {
    raw as f32 / 100.0
}

/// Extracts a serial number from its ASCII form. Digits are accumulated in
/// order and anything else (e.g. an `SN` prefix) is skipped.
pub fn serial_from_ascii(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .filter(|b| b.is_ascii_digit())
        .fold(0u32, |sn, b| sn.wrapping_mul(10).wrapping_add(u32::from(b - b'0')))
}

/// Builds [`Text`] from raw ASCII response bytes. Trailing NUL padding is
/// dropped and non-ASCII bytes are replaced with `?`.
pub fn text_from_ascii(bytes: &[u8]) -> Text {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let mut text = Text::new();
    for &b in &bytes[..end] {
        let c = if b.is_ascii() { char::from(b) } else { '?' };
        // One byte per char, and bytes.len() <= MAX_DATA_SIZE for any decoded packet
        if text.push(c).is_err() {
            break;
        }
    }
    text
}

// --- Fallbacks ---

/// Safe value a query reports when it fails, so callers that keep going
/// after an error never work with uninitialised data.
pub trait Fallback {
    fn fallback() -> Self;
}

impl Fallback for SensorData {
    fn fallback() -> Self {
        SensorData::INVALID
    }
}

impl Fallback for DataFormat {
    fn fallback() -> Self {
        DataFormat::default()
    }
}

impl Fallback for Text {
    fn fallback() -> Self {
        Text::new()
    }
}

impl Fallback for u32 {
    fn fallback() -> Self {
        0
    }
}

impl Fallback for f32 {
    fn fallback() -> Self {
        0.0
    }
}

/// Splits a query result into a value (falling back on error) and the
/// protocol code of the failure, like the status-code style C API does.
pub trait QueryResultExt<T> {
    /// Returns the value or its fallback, plus the error code on failure.
    /// Transport I/O errors report [`ErrorCode::SlaveReportedError`].
    fn or_fallback(self) -> (T, Option<ErrorCode>);
}

impl<T, E> QueryResultExt<T> for Result<T, ElcomError<E>>
where
    T: Fallback,
    E: fmt::Debug,
{
    fn or_fallback(self) -> (T, Option<ErrorCode>) {
        match self {
            Ok(value) => (value, None),
            Err(e) => (
                T::fallback(),
                Some(e.code().unwrap_or(ErrorCode::SlaveReportedError)),
            ),
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ppm_rounding() {
        assert_eq!(ppm_from_raw(12345), 123);
        assert_eq!(ppm_from_raw(12350), 124);
        assert_eq!(ppm_from_raw(-12350), -124);
        assert_eq!(ppm_from_raw(-12349), -123);
        assert_eq!(ppm_from_raw(49), 0);
        assert_eq!(ppm_from_raw(50), 1);
        assert_eq!(ppm_from_raw(-50), -1);
        assert_eq!(ppm_from_raw(0), 0);
    }

    #[test]
    fn test_ppm_rounding_extremes() {
        assert_eq!(ppm_from_raw(i32::MAX), 21_474_836);
        assert_eq!(ppm_from_raw(i32::MIN), -21_474_836);
    }

    #[test]
    fn test_temperature_conversion() {
        assert_eq!(celsius_from_raw(-2050), -20.5);
        assert_eq!(celsius_from_raw(2512), 25.12);
        assert_eq!(celsius_from_raw(0), 0.0);
    }

    #[test]
    fn test_serial_parsing() {
        assert_eq!(serial_from_ascii(b"SN0012345"), 12345);
        assert_eq!(serial_from_ascii(b"00123456"), 123456);
        assert_eq!(serial_from_ascii(b"A1-B2"), 12);
        assert_eq!(serial_from_ascii(b""), 0);
        assert_eq!(serial_from_ascii(b"SN"), 0);
    }

    #[test]
    fn test_text_from_ascii() {
        assert_eq!(text_from_ascii(b"eLichens").as_str(), "eLichens");
        assert_eq!(text_from_ascii(b"CO2\0\0\0").as_str(), "CO2");
        assert_eq!(text_from_ascii(&[b'A', 0xC3, b'B']).as_str(), "A?B");
        assert_eq!(text_from_ascii(&[]).as_str(), "");
    }

    #[test]
    fn test_status_flags() {
        let status = SensorStatus::new(SensorStatus::WARMUP | SensorStatus::CALIBRATION);
        assert!(status.is_warming_up());
        assert!(status.is_calibrating());
        assert!(!status.is_lamp_flagged());
        assert!(!status.is_data_not_reliable());
        assert_eq!(status.bits(), 0b1010);
    }

    #[test]
    fn test_data_format_from_bytes() {
        let fmt = DataFormat::from_bytes([2, 1, 5, 0xFE]);
        assert_eq!(fmt.decimal_point, 2);
        assert_eq!(fmt.unit_code, 1);
        assert_eq!(fmt.resolution_int, 5);
        assert_eq!(fmt.resolution_exp, 0xFE);
    }

    #[test]
    fn test_or_fallback() {
        let ok: Result<u32, ElcomError<()>> = Ok(7);
        assert_eq!(ok.or_fallback(), (7, None));

        let err: Result<SensorData, ElcomError<()>> = Err(ElcomError::Timeout);
        assert_eq!(err.or_fallback(), (SensorData::INVALID, Some(ErrorCode::TransportTimeout)));

        let io: Result<Text, ElcomError<u8>> = Err(ElcomError::Io(3));
        let (text, code) = io.or_fallback();
        assert!(text.is_empty());
        assert_eq!(code, Some(ErrorCode::SlaveReportedError));
    }
}
