use crate::constants::N_READ_TRIALS;
use crate::error::RplidarError;
use crate::motor::MotorControl;
use crate::time::sleep_ms;
use crate::transport::Transport;
use serialport::SerialPort;
use std::io::{Read, Write};

/// [`Transport`] over a serial port.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    pub fn new(port: Box<dyn SerialPort>) -> SerialTransport {
        SerialTransport { port }
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, data: &[u8]) -> Result<(), RplidarError> {
        send_data(&mut self.port, data)
    }

    fn receive_into(&mut self, buffer: &mut [u8]) -> Result<(), RplidarError> {
        read_into(&mut self.port, buffer)
    }

    fn clear_input(&mut self) -> Result<(), RplidarError> {
        flush(&mut self.port)
    }
}

impl MotorControl for SerialTransport {
    // The USB adapter wires DTR to the motor enable line, active low.
    fn start_motor(&mut self) -> Result<(), RplidarError> {
        self.port.write_data_terminal_ready(false)?;
        Ok(())
    }
}

fn send_data(port: &mut Box<dyn SerialPort>, data: &[u8]) -> Result<(), RplidarError> {
    port.write_all(data)?;
    port.flush()?;
    Ok(())
}

pub(crate) fn get_n_read(port: &mut Box<dyn SerialPort>) -> Result<usize, RplidarError> {
    let n_u32: u32 = port.bytes_to_read()?;
    Ok(n_u32.try_into().unwrap_or(0))
}

pub(crate) fn flush(port: &mut Box<dyn SerialPort>) -> Result<(), RplidarError> {
    let n_read: usize = get_n_read(port).unwrap_or(0);
    if n_read == 0 {
        return Ok(());
    }
    let mut discarded: Vec<u8> = vec![0; n_read];
    port.read_exact(discarded.as_mut_slice())?;
    Ok(())
}

/// Fills `buffer` once enough bytes are queued. Nothing is consumed on timeout.
pub(crate) fn read_into(
    port: &mut Box<dyn SerialPort>,
    buffer: &mut [u8],
) -> Result<(), RplidarError> {
    assert!(!buffer.is_empty());
    for _ in 0..N_READ_TRIALS {
        let n_read: usize = get_n_read(port)?;

        if n_read < buffer.len() {
            sleep_ms(1);
            continue;
        }

        port.read_exact(buffer)?;
        return Ok(());
    }
    Err(RplidarError::Timeout)
}
