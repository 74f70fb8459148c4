// src/common/config.rs

use core::time::Duration;

use super::timing;

/// Host-side settings for an ELCOM session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Config {
    /// How long a transaction waits for a complete response frame.
    pub response_timeout: Duration,
    /// Index byte sent with sensor-addressed commands. Single-sensor modules use 0.
    pub sensor_index: u8,
}

impl Config {
    pub const fn new() -> Self {
        Config {
            response_timeout: timing::RESPONSE_TIMEOUT,
            sensor_index: 0,
        }
    }

    pub const fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub const fn with_sensor_index(mut self, index: u8) -> Self {
        self.sensor_index = index;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
