// src/host/mock.rs

//! Scripted sensor link shared by the host unit tests.

use crate::common::{
    checksum::{ChecksumEngine, CrcChecksum},
    hal_traits::{ElcomSerial, ElcomTimer},
    packet::{encode_packet, FrameBuffer, Packet},
    timing,
};
use core::time::Duration;
use std::boxed::Box;
use std::collections::VecDeque;
use std::vec::Vec;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MockInstant(pub u64);

impl core::ops::Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockCommError;

/// Plays the sensor: every transmitted request is answered with the next
/// staged response, if any.
pub struct MockInterface {
    pub now_us: u64,
    checksum: Box<dyn ChecksumEngine>,
    responses: VecDeque<Vec<u8>>,
    read_queue: VecDeque<u8>,
    pub transmitted: Vec<Vec<u8>>,
    pub events: Vec<&'static str>,
    pub start_calls: u32,
    pub abort_calls: u32,
    pub fail_start: bool,
    pub fail_transmit: bool,
    pub fail_read: bool,
    /// Byte the line delivers forever once the read queue is empty.
    noise: Option<u8>,
    pub bytes_read: u32,
}

impl core::fmt::Debug for MockInterface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MockInterface")
            .field("now_us", &self.now_us)
            .field("pending_responses", &self.responses.len())
            .field("events", &self.events)
            .finish()
    }
}

impl MockInterface {
    pub fn new() -> Self {
        Self::with_checksum(CrcChecksum::default())
    }

    pub fn with_checksum(checksum: impl ChecksumEngine + 'static) -> Self {
        MockInterface {
            now_us: 0,
            checksum: Box::new(checksum),
            responses: VecDeque::new(),
            read_queue: VecDeque::new(),
            transmitted: Vec::new(),
            events: Vec::new(),
            start_calls: 0,
            abort_calls: 0,
            fail_start: false,
            fail_transmit: false,
            fail_read: false,
            noise: None,
            bytes_read: 0,
        }
    }

    /// Queues `packet`, framed with the mock's checksum, as the answer to the
    /// next request.
    pub fn respond_with(&mut self, packet: &Packet) {
        let mut frame = FrameBuffer::new();
        encode_packet(packet, &*self.checksum, &mut frame);
        self.responses.push_back(frame.to_vec());
    }

    /// Makes the line deliver `byte` without end after any queued data.
    pub fn stage_noise(&mut self, byte: u8) {
        self.noise = Some(byte);
    }

    /// Queues raw bytes as the answer to the next request.
    pub fn stage_raw(&mut self, bytes: &[u8]) {
        self.responses.push_back(bytes.to_vec());
    }
}

impl ElcomSerial for MockInterface {
    type Error = MockCommError;

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_transmit {
            return Err(MockCommError);
        }
        self.events.push("transmit");
        self.transmitted.push(bytes.to_vec());
        if let Some(response) = self.responses.pop_front() {
            self.read_queue.extend(response);
        }
        Ok(())
    }

    fn start_receive(&mut self) -> Result<(), Self::Error> {
        if self.fail_start {
            return Err(MockCommError);
        }
        self.events.push("start");
        self.start_calls += 1;
        self.read_queue.clear();
        Ok(())
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        if self.fail_read {
            return Err(nb::Error::Other(MockCommError));
        }
        let byte = self
            .read_queue
            .pop_front()
            .or(self.noise)
            .ok_or(nb::Error::WouldBlock)?;
        // Each byte takes its time on the wire
        self.now_us = self
            .now_us
            .saturating_add(timing::BYTE_DURATION.as_micros() as u64);
        self.bytes_read += 1;
        Ok(byte)
    }

    fn abort_receive(&mut self) {
        self.events.push("abort");
        self.abort_calls += 1;
    }
}

impl ElcomTimer for MockInterface {
    type Instant = MockInstant;

    fn now(&self) -> MockInstant {
        MockInstant(self.now_us)
    }

    fn delay_us(&mut self, us: u32) {
        self.now_us = self.now_us.saturating_add(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_us = self.now_us.saturating_add(u64::from(ms) * 1_000);
    }
}
