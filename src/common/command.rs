// src/common/command.rs

//! ELCOM command set.
//!
//! Only the commands a host issues to a gas sensor are listed, plus the
//! reserved code a sensor answers with when it rejects a request.

use core::fmt;

/// ELCOM command codes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Command {
    // --- Basic system information ---
    /// Model name (ASCII).
    GetModelName = 0x10,
    /// Product name (ASCII).
    GetProductName = 0x11,
    /// Firmware version (6 ASCII characters).
    GetFirmwareVersion = 0x12,
    /// Serial number (ASCII digits, possibly prefixed, e.g. `SN0012345`).
    GetSerialNumber = 0x13,
    /// Run time in seconds (u32 LE).
    GetRunTime = 0x14,
    /// Production date (ASCII).
    GetProductionDate = 0x16,

    // --- Sensor information, addressed by sensor index ---
    /// Status, error and concentration of a sensor.
    GetSensorData = 0x21,
    /// Internal temperature in hundredths of a degree.
    GetSensorTemperature = 0x22,
    /// Measurement data format.
    GetSensorDataFormat = 0x23,
    /// Sensor name (e.g. `CO2`, `CH4`).
    GetSensorName = 0x26,

    // --- Errors ---
    /// Sent by the sensor instead of the expected response when a request fails.
    SlaveError = 0x40,
}

impl Command {
    /// Tries to convert a raw command byte into a `Command`.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x10 => Some(Command::GetModelName),
            0x11 => Some(Command::GetProductName),
            0x12 => Some(Command::GetFirmwareVersion),
            0x13 => Some(Command::GetSerialNumber),
            0x14 => Some(Command::GetRunTime),
            0x16 => Some(Command::GetProductionDate),
            0x21 => Some(Command::GetSensorData),
            0x22 => Some(Command::GetSensorTemperature),
            0x23 => Some(Command::GetSensorDataFormat),
            0x26 => Some(Command::GetSensorName),
            0x40 => Some(Command::SlaveError),
            _ => None,
        }
    }

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Whether the request carries a leading sensor index byte (and the
    /// response echoes it back).
    pub const fn is_indexed(self) -> bool {
        matches!(
            self,
            Command::GetSensorData
                | Command::GetSensorTemperature
                | Command::GetSensorDataFormat
                | Command::GetSensorName
        )
    }
}

impl From<Command> for u8 {
    fn from(value: Command) -> Self {
        value.code()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:#04x})", self, self.code())
    }
}
