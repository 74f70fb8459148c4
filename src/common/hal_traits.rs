// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// Point in time from an [`ElcomTimer`]'s monotonic clock.
///
/// Implemented for every type with the needed arithmetic, including
/// `std::time::Instant`.
pub trait ElcomInstant:
    Copy + Ord + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

impl<T> ElcomInstant for T where
    T: Copy + Ord + Add<Duration, Output = T> + Sub<T, Output = Duration>
{
}

/// Abstraction for the clock and delays the host driver needs.
pub trait ElcomTimer {
    type Instant: ElcomInstant;

    /// Current time of a monotonic clock.
    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1_000);
        }
    }
}

/// Abstraction for the serial link to the sensor.
///
/// The receive path is explicitly armed and released so that an
/// interrupt- or DMA-driven UART can start capturing before the request
/// goes out.
pub trait ElcomSerial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Sends a complete frame.
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Starts listening for a response. Called before every transmit.
    fn start_receive(&mut self) -> Result<(), Self::Error>;

    /// Attempts to take the next received byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if nothing has arrived yet.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Stops listening. Called exactly once per transaction after
    /// `start_receive` succeeded.
    fn abort_receive(&mut self);
}

/// A serial port and a timer bundled into one driver interface.
#[derive(Debug)]
pub struct Link<S, T> {
    pub serial: S,
    pub timer: T,
}

impl<S, T> Link<S, T> {
    pub fn new(serial: S, timer: T) -> Self {
        Link { serial, timer }
    }

    pub fn release(self) -> (S, T) {
        (self.serial, self.timer)
    }
}

impl<S: ElcomSerial, T> ElcomSerial for Link<S, T> {
    type Error = S::Error;

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.serial.transmit(bytes)
    }

    fn start_receive(&mut self) -> Result<(), Self::Error> {
        self.serial.start_receive()
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.serial.read_byte()
    }

    fn abort_receive(&mut self) {
        self.serial.abort_receive()
    }
}

impl<S, T: ElcomTimer> ElcomTimer for Link<S, T> {
    type Instant = T::Instant;

    fn now(&self) -> Self::Instant {
        self.timer.now()
    }

    fn delay_us(&mut self, us: u32) {
        self.timer.delay_us(us)
    }

    fn delay_ms(&mut self, ms: u32) {
        self.timer.delay_ms(ms)
    }
}

// --- embedded-hal adapter ---

/// Instant of a [`DelayClock`]: microseconds of delay performed so far.
#[cfg(feature = "impl-generic-hal")]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct DelayInstant(u64);

#[cfg(feature = "impl-generic-hal")]
impl Add<Duration> for DelayInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        DelayInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

#[cfg(feature = "impl-generic-hal")]
impl Sub<DelayInstant> for DelayInstant {
    type Output = Duration;
    fn sub(self, rhs: DelayInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

/// [`ElcomTimer`] for targets that only have an `embedded_hal::delay::DelayNs`.
///
/// The clock advances only by the delays it performs, so it runs slow by the
/// time spent between them, and stands still while bytes are being read.
/// The response wait also caps the number of reads, so it still ends.
#[cfg(feature = "impl-generic-hal")]
#[derive(Debug)]
pub struct DelayClock<D> {
    delay: D,
    elapsed_us: u64,
}

#[cfg(feature = "impl-generic-hal")]
impl<D: embedded_hal::delay::DelayNs> DelayClock<D> {
    pub fn new(delay: D) -> Self {
        DelayClock { delay, elapsed_us: 0 }
    }

    pub fn release(self) -> D {
        self.delay
    }
}

#[cfg(feature = "impl-generic-hal")]
impl<D: embedded_hal::delay::DelayNs> ElcomTimer for DelayClock<D> {
    type Instant = DelayInstant;

    fn now(&self) -> Self::Instant {
        DelayInstant(self.elapsed_us)
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
        self.elapsed_us = self.elapsed_us.saturating_add(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
        self.elapsed_us = self.elapsed_us.saturating_add(u64::from(ms) * 1_000);
    }
}
