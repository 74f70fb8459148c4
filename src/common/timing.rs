// src/common/timing.rs

use core::time::Duration;

// === Transaction timing ===

/// Time the host waits for a complete response frame, for every command.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_millis(250);
/// Pause between two polls of the receive path while waiting for a response.
pub const POLL_INTERVAL: Duration = Duration::from_micros(100);

// === Sensor timing ===

/// Time after power-up before the sensor accepts commands.
pub const STARTUP_DELAY: Duration = Duration::from_millis(5000);
/// Gap left between consecutive commands in a startup sequence.
pub const INTER_COMMAND_DELAY: Duration = Duration::from_millis(10);

// === Link ===

/// Baud rate of the sensor UART (8N1). Configuring the port is up to the transport.
pub const BAUD_RATE: u32 = 57_600;
/// Bits on the wire per byte: start bit, 8 data bits, stop bit.
pub const BITS_PER_BYTE: u32 = 10;
/// Time one byte occupies on the wire at [`BAUD_RATE`].
pub const BYTE_DURATION: Duration =
    Duration::from_nanos(BITS_PER_BYTE as u64 * 1_000_000_000 / BAUD_RATE as u64);

/// Most bytes the sensor link can deliver within `window`, rounded up.
pub fn max_bytes_within(window: Duration) -> u32 {
    let bytes = window.as_nanos().div_ceil(BYTE_DURATION.as_nanos());
    u32::try_from(bytes).unwrap_or(u32::MAX)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_duration_at_57600() {
        assert_eq!(BYTE_DURATION, Duration::from_nanos(173_611));
    }

    #[test]
    fn test_max_bytes_within_response_timeout() {
        assert_eq!(max_bytes_within(RESPONSE_TIMEOUT), 1_441);
        assert_eq!(max_bytes_within(Duration::ZERO), 0);
        assert_eq!(max_bytes_within(BYTE_DURATION), 1);
    }
}
