//! Helpers shared by the unit tests.

use crate::constants::{CABIN_SIZE, EXPRESS_FRAME_SIZE, EXPRESS_HEADER_SIZE};
use crate::error::RplidarError;
use crate::transport::Transport;
use crossbeam_channel::{unbounded, Receiver, Sender};
use rplidar_data::{Cabin, N_CABINS};
use std::collections::VecDeque;
use std::time::Duration;

pub(crate) fn express_frame(
    start_angle_q6: u16,
    start_flag: bool,
    cabins: &[Cabin; N_CABINS],
) -> [u8; EXPRESS_FRAME_SIZE] {
    let mut frame = [0u8; EXPRESS_FRAME_SIZE];
    let angle = (start_angle_q6 & 0x7FFF) | if start_flag { 0x8000 } else { 0 };
    frame[2] = (angle & 0xFF) as u8;
    frame[3] = (angle >> 8) as u8;
    for (idx, c) in cabins.iter().enumerate() {
        let i = EXPRESS_HEADER_SIZE + idx * CABIN_SIZE;
        frame[i..i + 2].copy_from_slice(&c.distance_angle_1.to_le_bytes());
        frame[i + 2..i + 4].copy_from_slice(&c.distance_angle_2.to_le_bytes());
        frame[i + 4] = c.offset_angles_q3;
    }
    let sum = frame[2..].iter().fold(0u8, |s, b| s ^ b);
    frame[0] = 0xA0 | (sum & 0x0F);
    frame[1] = 0x50 | (sum >> 4);
    frame
}

pub(crate) fn sample_cabins() -> [Cabin; N_CABINS] {
    let mut cabins = [Cabin::default(); N_CABINS];
    for (i, c) in cabins.iter_mut().enumerate() {
        let d = 1000 + 10 * i as u16;
        c.distance_angle_1 = d << 2;
        c.distance_angle_2 = (d + 5) << 2;
        c.offset_angles_q3 = 0;
    }
    cabins
}

pub(crate) fn descriptor(type_code: u8) -> [u8; 7] {
    [0xA5, 0x5A, 0x54, 0x00, 0x00, 0x40, type_code]
}

/// In-memory transport. Bytes pushed through `SensorSide` become readable,
/// commands sent by the driver come out of `SensorSide::sent`.
pub(crate) struct ScriptedTransport {
    incoming: Receiver<Vec<u8>>,
    pending: VecDeque<u8>,
    sent_tx: Sender<Vec<u8>>,
    timeout: Duration,
}

pub(crate) struct SensorSide {
    pub(crate) incoming_tx: Sender<Vec<u8>>,
    pub(crate) sent: Receiver<Vec<u8>>,
}

impl SensorSide {
    pub(crate) fn push(&self, bytes: &[u8]) {
        self.incoming_tx.send(bytes.to_vec()).unwrap();
    }
}

pub(crate) fn scripted_transport() -> (ScriptedTransport, SensorSide) {
    let (incoming_tx, incoming) = unbounded();
    let (sent_tx, sent) = unbounded();
    let transport = ScriptedTransport {
        incoming,
        pending: VecDeque::new(),
        sent_tx,
        timeout: Duration::from_millis(5),
    };
    (transport, SensorSide { incoming_tx, sent })
}

impl Transport for ScriptedTransport {
    fn send(&mut self, data: &[u8]) -> Result<(), RplidarError> {
        self.sent_tx
            .send(data.to_vec())
            .map_err(|_| RplidarError::Disconnected)
    }

    fn receive_into(&mut self, buffer: &mut [u8]) -> Result<(), RplidarError> {
        while self.pending.len() < buffer.len() {
            match self.incoming.recv_timeout(self.timeout) {
                Ok(bytes) => self.pending.extend(bytes),
                Err(_) => return Err(RplidarError::Timeout),
            }
        }
        for b in buffer.iter_mut() {
            // Length was checked above
            *b = self.pending.pop_front().unwrap_or(0);
        }
        Ok(())
    }

    fn clear_input(&mut self) -> Result<(), RplidarError> {
        self.pending.clear();
        while self.incoming.try_recv().is_ok() {}
        Ok(())
    }
}
