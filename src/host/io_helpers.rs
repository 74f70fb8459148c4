// src/host/io_helpers.rs

use super::ElcomSensor;
use crate::common::{
    checksum::ChecksumEngine,
    error::ElcomError,
    hal_traits::{ElcomSerial, ElcomTimer},
    packet::is_response_complete,
    timing,
};

impl<IF, C> ElcomSensor<IF, C>
where
    IF: ElcomSerial + ElcomTimer,
    C: ChecksumEngine,
{
    /// Pulls received bytes into the receive buffer until it holds a complete
    /// frame or the response timeout runs out.
    ///
    /// The wait also ends once more bytes were read than the link can carry
    /// in the timeout, so a clock that only advances on delays cannot keep
    /// it going while noise streams in.
    ///
    /// Leaves the receive path armed; the caller releases it.
    pub(super) fn wait_for_response(&mut self) -> Result<(), ElcomError<IF::Error>> {
        let deadline = self.interface.now() + self.config.response_timeout;
        let max_reads = timing::max_bytes_within(self.config.response_timeout);
        let mut reads: u32 = 0;

        loop {
            match self.interface.read_byte() {
                Ok(byte) => {
                    reads += 1;
                    if self.rx_buffer.try_push(byte).is_err() {
                        log::trace!("Receive buffer full, dropping {:#04x}", byte);
                    }
                    if is_response_complete(&self.rx_buffer) {
                        return Ok(());
                    }
                }
                Err(nb::Error::WouldBlock) => {
                    self.interface
                        .delay_us(timing::POLL_INTERVAL.as_micros() as u32);
                }
                Err(nb::Error::Other(e)) => return Err(ElcomError::Io(e)),
            }

            if reads > max_reads || self.interface.now() >= deadline {
                log::trace!("{} bytes received before timeout", reads);
                return Err(ElcomError::Timeout);
            }
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{config::Config, hal_traits::Link};
    use core::time::Duration;

    /// A line stuck low: every read returns a zero byte.
    #[derive(Debug, Default)]
    struct StuckLine {
        reads: u32,
    }

    impl ElcomSerial for StuckLine {
        type Error = ();
        fn transmit(&mut self, _bytes: &[u8]) -> Result<(), ()> { Ok(()) }
        fn start_receive(&mut self) -> Result<(), ()> { Ok(()) }
        fn read_byte(&mut self) -> nb::Result<u8, ()> {
            self.reads += 1;
            // Bail out instead of hanging if the wait is unbounded
            if self.reads > 1_000_000 {
                return Err(nb::Error::Other(()));
            }
            Ok(0x00)
        }
        fn abort_receive(&mut self) {}
    }

    /// Clock that never moves: it only counts delays, and none happen
    /// while bytes keep arriving.
    #[derive(Debug, Default)]
    struct FrozenTimer;

    impl ElcomTimer for FrozenTimer {
        type Instant = Duration;
        fn now(&self) -> Duration { Duration::ZERO }
        fn delay_us(&mut self, _us: u32) {}
    }

    #[test]
    fn test_wait_is_bounded_when_clock_stalls_under_noise() {
        let link = Link::new(StuckLine::default(), FrozenTimer);
        let mut sensor = ElcomSensor::new(link, Config::default());

        assert_eq!(sensor.wait_for_response(), Err(ElcomError::Timeout));
        let (serial, _) = sensor.release().release();
        assert_eq!(serial.reads, timing::max_bytes_within(timing::RESPONSE_TIMEOUT) + 1);
    }

    #[cfg(feature = "impl-generic-hal")]
    #[test]
    fn test_wait_is_bounded_with_delay_clock() {
        use crate::common::hal_traits::DelayClock;

        struct NoDelay;
        impl embedded_hal::delay::DelayNs for NoDelay {
            fn delay_ns(&mut self, _ns: u32) {}
        }

        let link = Link::new(StuckLine::default(), DelayClock::new(NoDelay));
        let mut sensor = ElcomSensor::new(link, Config::default());

        assert_eq!(sensor.wait_for_response(), Err(ElcomError::Timeout));
        let (serial, _) = sensor.release().release();
        assert_eq!(serial.reads, timing::max_bytes_within(timing::RESPONSE_TIMEOUT) + 1);
    }
}
