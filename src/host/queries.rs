// src/host/queries.rs

use super::ElcomSensor;
use crate::common::{
    checksum::ChecksumEngine,
    command::Command,
    error::ElcomError,
    hal_traits::{ElcomSerial, ElcomTimer},
    packet::Packet,
    types::{
        celsius_from_raw, ppm_from_raw, serial_from_ascii, text_from_ascii, DataFormat,
        SensorData, SensorStatus, Text,
    },
};

/// Length of a firmware version string, e.g. `"010203"`.
const FIRMWARE_VERSION_LEN: usize = 6;

/// Returns the first `N` bytes of `data`, or `UnexpectedLength` if there are fewer.
fn take<const N: usize, E>(data: &[u8]) -> Result<[u8; N], ElcomError<E>>
where
    E: core::fmt::Debug,
{
    data.get(..N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(ElcomError::UnexpectedLength {
            expected: N,
            got: data.len(),
        })
}

impl<IF, C> ElcomSensor<IF, C>
where
    IF: ElcomSerial + ElcomTimer,
    C: ChecksumEngine,
{
    /// Runs `command`, addressed to the configured sensor index when the
    /// command takes one.
    fn query(&mut self, command: Command) -> Result<Packet, ElcomError<IF::Error>> {
        let request = if command.is_indexed() {
            Packet::indexed(command, self.config.sensor_index)
        } else {
            Packet::empty(command)
        };
        self.execute_transaction(&request)
    }

    fn query_indexed<const N: usize>(&mut self, command: Command) -> Result<[u8; N], ElcomError<IF::Error>> {
        let response = self.query(command)?;
        let data = response.data();
        // The first byte echoes the sensor index
        match data.split_first() {
            Some((_, rest)) => take(rest),
            None => Err(ElcomError::UnexpectedLength {
                expected: N + 1,
                got: 0,
            }),
        }
    }

    fn query_text(&mut self, command: Command) -> Result<Text, ElcomError<IF::Error>> {
        let response = self.query(command)?;
        let data = response.data();
        let text = if command.is_indexed() {
            data.get(1..).unwrap_or_default()
        } else {
            data
        };
        Ok(text_from_ascii(text))
    }

    // --- Identity ---

    pub fn model_name(&mut self) -> Result<Text, ElcomError<IF::Error>> {
        self.query_text(Command::GetModelName)
    }

    pub fn product_name(&mut self) -> Result<Text, ElcomError<IF::Error>> {
        self.query_text(Command::GetProductName)
    }

    /// Firmware version; the sensor must answer with exactly six characters.
    pub fn firmware_version(&mut self) -> Result<Text, ElcomError<IF::Error>> {
        let response = self.query(Command::GetFirmwareVersion)?;
        if response.data().len() != FIRMWARE_VERSION_LEN {
            return Err(ElcomError::UnexpectedLength {
                expected: FIRMWARE_VERSION_LEN,
                got: response.data().len(),
            });
        }
        Ok(text_from_ascii(response.data()))
    }

    /// Serial number, from the digits of its ASCII form.
    pub fn serial_number(&mut self) -> Result<u32, ElcomError<IF::Error>> {
        let response = self.query(Command::GetSerialNumber)?;
        Ok(serial_from_ascii(response.data()))
    }

    pub fn production_date(&mut self) -> Result<Text, ElcomError<IF::Error>> {
        self.query_text(Command::GetProductionDate)
    }

    pub fn sensor_name(&mut self) -> Result<Text, ElcomError<IF::Error>> {
        self.query_text(Command::GetSensorName)
    }

    // --- Measurements ---

    /// Time since the sensor was powered, in seconds.
    pub fn runtime(&mut self) -> Result<u32, ElcomError<IF::Error>> {
        let response = self.query(Command::GetRunTime)?;
        Ok(u32::from_le_bytes(take(response.data())?))
    }

    /// Current gas concentration with its status and error bytes.
    pub fn sensor_data(&mut self) -> Result<SensorData, ElcomError<IF::Error>> {
        let [status, error, b0, b1, b2, b3] = self.query_indexed::<6>(Command::GetSensorData)?;
        let raw = i32::from_le_bytes([b0, b1, b2, b3]);
        Ok(SensorData {
            status: SensorStatus::new(status),
            error,
            value: ppm_from_raw(raw),
        })
    }

    /// Internal temperature in °C.
    pub fn temperature(&mut self) -> Result<f32, ElcomError<IF::Error>> {
        let raw = self.query_indexed::<4>(Command::GetSensorTemperature)?;
        Ok(celsius_from_raw(i32::from_le_bytes(raw)))
    }

    /// Reads the measurement scale and caches it in the session.
    pub fn data_format(&mut self) -> Result<DataFormat, ElcomError<IF::Error>> {
        let bytes = self.query_indexed::<4>(Command::GetSensorDataFormat)?;
        let format = DataFormat::from_bytes(bytes);
        self.data_format = Some(format);
        Ok(format)
    }
}
