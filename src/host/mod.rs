// src/host/mod.rs

//! Host (master) side of an ELCOM link.

use crate::common::{
    checksum::{ChecksumEngine, CrcChecksum},
    config::Config,
    error::ElcomError,
    hal_traits::{ElcomSerial, ElcomTimer},
    packet::FrameBuffer,
    timing,
    types::{DataFormat, SensorData, Text},
};

mod io_helpers;
mod queries;
mod transaction;

#[cfg(test)]
pub(crate) mod mock;

/// Identity of the connected sensor, as read by [`ElcomSensor::identify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorInfo {
    pub model_name: Text,
    pub product_name: Text,
    pub firmware_version: Text,
    pub serial_number: u32,
    pub sensor_name: Text,
}

/// One reading of the periodic measurement loop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Reading {
    /// Sensor run time in seconds.
    pub runtime: u32,
    pub data: SensorData,
    /// Internal temperature in °C.
    pub temperature: f32,
}

/// A session with one ELCOM gas sensor.
///
/// The session owns the link and both frame buffers. Every operation takes
/// `&mut self`, so only one transaction can be in flight at a time.
#[derive(Debug)]
pub struct ElcomSensor<IF, C = CrcChecksum>
where
    IF: ElcomSerial + ElcomTimer,
    C: ChecksumEngine,
{
    interface: IF,
    checksum: C,
    config: Config,
    data_format: Option<DataFormat>,
    tx_buffer: FrameBuffer,
    rx_buffer: FrameBuffer,
}

impl<IF> ElcomSensor<IF, CrcChecksum>
where
    IF: ElcomSerial + ElcomTimer,
{
    /// Creates a session using the default frame checksum.
    pub fn new(interface: IF, config: Config) -> Self {
        Self::with_checksum(interface, CrcChecksum::default(), config)
    }
}

impl<IF, C> ElcomSensor<IF, C>
where
    IF: ElcomSerial + ElcomTimer,
    C: ChecksumEngine,
{
    /// Creates a session with a specific checksum engine.
    pub fn with_checksum(interface: IF, checksum: C, config: Config) -> Self {
        ElcomSensor {
            interface,
            checksum,
            config,
            data_format: None,
            tx_buffer: FrameBuffer::new(),
            rx_buffer: FrameBuffer::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Data format loaded by [`init`](Self::init) or the last
    /// [`data_format`](Self::data_format) query.
    pub fn cached_data_format(&self) -> Option<DataFormat> {
        self.data_format
    }

    /// Gives back the link.
    pub fn release(self) -> IF {
        self.interface
    }

    // --- Startup and polling sequences ---

    /// Waits for the sensor to come up, then loads and caches its data format.
    pub fn init(&mut self) -> Result<DataFormat, ElcomError<IF::Error>> {
        log::info!("Waiting {} ms for sensor startup", timing::STARTUP_DELAY.as_millis());
        self.interface.delay_ms(timing::STARTUP_DELAY.as_millis() as u32);
        let format = self.data_format()?;
        log::debug!("Sensor data format: {:?}", format);
        Ok(format)
    }

    /// Reads the identity of the sensor, pausing briefly between commands.
    pub fn identify(&mut self) -> Result<SensorInfo, ElcomError<IF::Error>> {
        let model_name = self.model_name()?;
        self.pause();
        let product_name = self.product_name()?;
        self.pause();
        let firmware_version = self.firmware_version()?;
        self.pause();
        let serial_number = self.serial_number()?;
        self.pause();
        let sensor_name = self.sensor_name()?;
        self.pause();

        log::info!(
            "Sensor '{}' ({}), firmware {}, S/N {}, gas {}",
            model_name,
            product_name,
            firmware_version,
            serial_number,
            sensor_name
        );

        Ok(SensorInfo {
            model_name,
            product_name,
            firmware_version,
            serial_number,
            sensor_name,
        })
    }

    /// Reads run time, measurement and temperature.
    pub fn read(&mut self) -> Result<Reading, ElcomError<IF::Error>> {
        let runtime = self.runtime()?;
        let data = self.sensor_data()?;
        let temperature = self.temperature()?;
        log::debug!(
            "time = {} ; ppm = {} ; milliDegC = {}",
            runtime,
            data.value,
            (temperature * 1000.0) as i32
        );
        Ok(Reading { runtime, data, temperature })
    }

    fn pause(&mut self) {
        self.interface
            .delay_ms(timing::INTER_COMMAND_DELAY.as_millis() as u32);
    }
}
