mod buffer;
mod config;
mod constants;
mod decoder;
mod driver_threads;
mod error;
mod frame;
mod link;
mod motor;
mod numeric;
mod pipeline;
mod scan;
mod serial;
mod shared;
#[cfg(test)]
mod testing;
mod time;
mod transport;

use crate::buffer::frame_pool;
use crate::decoder::FrameDecoder;
use crate::driver_threads::{parse_frames, read_device_signal, stop_scan_and_flush};
use crate::link::LinkStateMachine;
use crate::pipeline::ReceptionPipeline;
use crate::shared::DriverShared;
use crate::time::sleep_ms;
use crossbeam_channel::bounded;
use std::sync::Arc;
use tracing::{error, info, warn};

pub use crate::config::DriverConfig;
pub use crate::driver_threads::{join, DriverOutput, DriverThreads};
pub use crate::error::RplidarError;
pub use crate::motor::MotorControl;
pub use crate::serial::SerialTransport;
pub use crate::transport::Transport;
pub use rplidar_data::{Cabin, DriverStats, ExpressScanFrame, LinkState, Measurement, Scan};

/// Function to launch RPLIDAR in express scan mode.
/// # Arguments
///
/// * `port_name` - Serial port name such as `/dev/ttyUSB0`.
/// * `config` - Driver configuration
pub fn run_driver(
    port_name: &str,
    config: &DriverConfig,
) -> Result<(DriverThreads, DriverOutput), RplidarError> {
    let port = serialport::new(port_name, config.baud_rate)
        .timeout(config.port_timeout())
        .open()
        .map_err(|e| {
            error!("Failed to open \"{}\". Error: {}", port_name, e);
            e
        })?;
    info!(port = port_name, baud_rate = config.baud_rate, "Serial port opened");

    let mut transport = SerialTransport::new(port);
    if !cfg!(test) {
        // In testing, disable flushing to receive dummy signals
        stop_scan_and_flush(&mut transport)?;
        sleep_ms(10);
        stop_scan_and_flush(&mut transport)?;
    }

    if let Err(e) = transport.start_motor() {
        warn!("Could not start the motor through DTR: {e}");
    }

    run_driver_with_transport(transport, config)
}

/// Same as [`run_driver`] over an already opened transport.
///
/// Sends the express scan command, spawns the reader and decoder threads and
/// blocks until the sensor confirms the mode switch or the handshake is
/// abandoned.
pub fn run_driver_with_transport<T: Transport + 'static>(
    mut transport: T,
    config: &DriverConfig,
) -> Result<(DriverThreads, DriverOutput), RplidarError> {
    let shared = Arc::new(DriverShared::new());
    let (producer, consumer) = frame_pool();

    let mut link = LinkStateMachine::new(Arc::clone(&shared), config);
    link.begin_handshake(&mut transport)?;
    let pipeline = ReceptionPipeline::new(link, producer, Arc::clone(&shared));

    let (reader_terminator_tx, reader_terminator_rx) = bounded(10);
    let (parser_terminator_tx, parser_terminator_rx) = bounded(10);
    let (handshake_tx, handshake_rx) = bounded(1);

    let reader_thread = Some(std::thread::spawn(move || {
        read_device_signal(&mut transport, pipeline, handshake_tx, reader_terminator_rx);
    }));

    let (frame_tx, frame_rx) = bounded(config.frame_channel_capacity);
    let (scan_tx, scan_rx) = bounded(config.scan_channel_capacity);
    let decoder = FrameDecoder::new(Arc::clone(&shared));
    let frame_wait = config.frame_wait();
    let receiver_thread = Some(std::thread::spawn(move || {
        parse_frames(
            consumer,
            decoder,
            parser_terminator_rx,
            frame_tx,
            scan_tx,
            frame_wait,
        );
    }));

    let driver_threads = DriverThreads {
        reader_thread,
        receiver_thread,
        reader_terminator_tx,
        parser_terminator_tx,
        shared,
    };

    match handshake_rx.recv() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(e),
        Err(_) => return Err(RplidarError::Disconnected),
    }

    let output = DriverOutput {
        frames: frame_rx,
        scans: scan_rx,
    };
    Ok((driver_threads, output))
}
