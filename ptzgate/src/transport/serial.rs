//! Serial-port transport.

use super::Transport;
use crate::Result;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::{io::Write, time::Duration};

/// Pelco-D over a UART: 8 data bits, no parity, one stop bit, no flow
/// control. Heads commonly run at 2400 baud.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Opens a serial port, e.g. `/dev/ttyUSB0` at 2400 baud.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(100))
            .open()?;

        info!("opened serial port {path} at {baud_rate} baud");
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.port.write_all(frame)?;
        self.port.flush()?;
        Ok(())
    }
}
