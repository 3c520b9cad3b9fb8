use crate::buffer::FrameConsumer;
use crate::constants::{RPLIDAR_CMD_STOP, RPLIDAR_CMD_SYNC_BYTE};
use crate::decoder::FrameDecoder;
use crate::error::RplidarError;
use crate::pipeline::{PipelineEvent, ReceptionPipeline};
use crate::scan::ScanAssembler;
use crate::shared::DriverShared;
use crate::time::sleep_ms;
use crate::transport::Transport;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use rplidar_data::{DriverStats, ExpressScanFrame, LinkState, Scan};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info};

/// Struct that contains driver threads.
pub struct DriverThreads {
    pub(crate) reader_terminator_tx: Sender<bool>,
    pub(crate) parser_terminator_tx: Sender<bool>,
    pub(crate) reader_thread: Option<JoinHandle<()>>,
    pub(crate) receiver_thread: Option<JoinHandle<()>>,
    pub(crate) shared: Arc<DriverShared>,
}

impl DriverThreads {
    /// Snapshot of the diagnostic counters.
    pub fn stats(&self) -> DriverStats {
        self.shared.stats()
    }

    pub fn link_state(&self) -> LinkState {
        self.shared.link_state()
    }

    /// Start angle of the most recent valid frame, in degrees.
    pub fn start_angle_degrees(&self) -> Option<f64> {
        self.shared.start_angle_degrees()
    }
}

/// Receivers for everything the driver produces.
pub struct DriverOutput {
    /// Every frame that passed validation.
    pub frames: Receiver<ExpressScanFrame>,
    /// One entry per completed revolution.
    pub scans: Receiver<Scan>,
}

/// Body of the reader thread. Plays the role of the receive-complete
/// interrupt: it fills whatever buffer the pipeline has armed and reports
/// each completion back to it.
pub(crate) fn read_device_signal<T: Transport>(
    transport: &mut T,
    mut pipeline: ReceptionPipeline,
    handshake_tx: Sender<Result<(), RplidarError>>,
    reader_terminator_rx: Receiver<bool>,
) {
    let mut handshake_tx = Some(handshake_tx);
    loop {
        if do_terminate(&reader_terminator_rx) {
            if let Err(e) = stop_scan_and_flush(transport) {
                error!("{e}");
            }
            return;
        }

        if let Err(e) = pipeline.link_mut().check_handshake_deadline(transport) {
            notify_handshake(&mut handshake_tx, Err(e));
            return;
        }

        match transport.receive_into(pipeline.armed_buffer()) {
            Ok(()) => {}
            Err(RplidarError::Timeout) => continue,
            Err(e) => {
                error!("{e}");
                sleep_ms(10);
                continue;
            }
        }

        if let PipelineEvent::Handshake(LinkState::Streaming) = pipeline.on_receive_complete() {
            notify_handshake(&mut handshake_tx, Ok(()));
        }
    }
}

fn notify_handshake(
    handshake_tx: &mut Option<Sender<Result<(), RplidarError>>>,
    result: Result<(), RplidarError>,
) {
    if let Some(tx) = handshake_tx.take() {
        // Nobody is waiting anymore if the driver is already being dropped
        let _ = tx.send(result);
    }
}

pub(crate) fn stop_scan_and_flush<T: Transport>(transport: &mut T) -> Result<(), RplidarError> {
    transport.send(&[RPLIDAR_CMD_SYNC_BYTE, RPLIDAR_CMD_STOP])?;
    transport.clear_input()?;
    info!("Scan stopped");
    Ok(())
}

/// Body of the decoder thread.
pub(crate) fn parse_frames(
    mut consumer: FrameConsumer,
    mut decoder: FrameDecoder,
    parser_terminator_rx: Receiver<bool>,
    frame_tx: Sender<ExpressScanFrame>,
    scan_tx: Sender<Scan>,
    frame_wait: Duration,
) {
    let mut assembler = ScanAssembler::new();
    while !do_terminate(&parser_terminator_rx) {
        let frame = {
            let raw = match consumer.wait(frame_wait) {
                Some(raw) => raw,
                None => continue,
            };
            decoder.decode(&raw)
            // The slot goes back to the producer here
        };
        let frame = match frame {
            Some(f) => f,
            None => continue,
        };

        if let Some(scan) = assembler.push_frame(&frame) {
            forward(&scan_tx, scan, "scan");
        }
        forward(&frame_tx, frame, "frame");
    }
}

fn forward<M>(tx: &Sender<M>, message: M, what: &str) {
    match tx.try_send(message) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => debug!("Output channel full, dropping {what}"),
        Err(TrySendError::Disconnected(_)) => {}
    }
}

pub(crate) fn do_terminate(terminator_rx: &Receiver<bool>) -> bool {
    terminator_rx.try_recv().unwrap_or(false)
}

/// Function to join driver threads.
/// This function is automatically called when `driver_threads` is dropped.
pub fn join(driver_threads: &mut DriverThreads) {
    // A thread that already exited has dropped its receiver
    let _ = driver_threads.reader_terminator_tx.send(true);
    let _ = driver_threads.parser_terminator_tx.send(true);

    if let Some(thread) = driver_threads.reader_thread.take() {
        if thread.join().is_err() {
            error!("Reader thread panicked");
        }
    }
    if let Some(thread) = driver_threads.receiver_thread.take() {
        if thread.join().is_err() {
            error!("Decoder thread panicked");
        }
    }
}

impl Drop for DriverThreads {
    fn drop(&mut self) {
        join(self);
    }
}
