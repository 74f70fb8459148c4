// src/host/transaction.rs

use super::ElcomSensor;
use crate::common::{
    checksum::ChecksumEngine,
    error::ElcomError,
    hal_traits::{ElcomSerial, ElcomTimer},
    packet::{decode_packet, encode_packet, Packet},
};

impl<IF, C> ElcomSensor<IF, C>
where
    IF: ElcomSerial + ElcomTimer,
    C: ChecksumEngine,
{
    /// Sends `request` and waits for the sensor's answer.
    ///
    /// The receive path is armed before the request goes out and released
    /// exactly once afterwards, whatever the outcome. Nothing is retried.
    pub fn execute_transaction(&mut self, request: &Packet) -> Result<Packet, ElcomError<IF::Error>> {
        // 1. Arm the receiver
        self.rx_buffer.clear();
        if let Err(e) = self.interface.start_receive() {
            log::warn!("ELCOM: could not arm receiver: {:?}", e);
            return Err(ElcomError::Io(e));
        }

        // 2. Send the request
        let size = encode_packet(request, &self.checksum, &mut self.tx_buffer);
        log::debug!("ELCOM >> {:02x?}", &self.tx_buffer[..size]);
        if let Err(e) = self.interface.transmit(&self.tx_buffer[..size]) {
            self.interface.abort_receive();
            log::warn!("ELCOM: transmit failed: {:?}", e);
            return Err(ElcomError::Io(e));
        }

        // 3. Collect the response
        let waited = self.wait_for_response();
        self.interface.abort_receive();
        if let Err(e) = waited {
            log::warn!("ELCOM: no response to command {:#04x}: {:?}", request.command(), e);
            return Err(e);
        }
        log::debug!("ELCOM << {:02x?}", self.rx_buffer.as_slice());

        // 4. Decode
        decode_packet(&self.rx_buffer, &self.checksum)
    }
}
