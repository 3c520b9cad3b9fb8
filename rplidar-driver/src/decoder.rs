use crate::error::RplidarError;
use crate::frame::decode_express_frame;
use crate::shared::{Counter, DriverShared};
use rplidar_data::ExpressScanFrame;
use std::sync::Arc;
use tracing::{debug, trace};

/// Task-side half of the driver: validates ready frames and publishes their
/// start angle. Rejected frames are counted and otherwise ignored.
pub(crate) struct FrameDecoder {
    shared: Arc<DriverShared>,
}

impl FrameDecoder {
    pub(crate) fn new(shared: Arc<DriverShared>) -> FrameDecoder {
        FrameDecoder { shared }
    }

    pub(crate) fn decode(&mut self, raw: &[u8]) -> Option<ExpressScanFrame> {
        match decode_express_frame(raw) {
            Ok(frame) => {
                self.shared.count(Counter::FramesDecoded);
                self.shared.publish_start_angle(frame.start_angle_q6);
                trace!(angle = frame.angle_degrees(), "Frame decoded");
                Some(frame)
            }
            Err(e) => {
                match e {
                    RplidarError::SyncMismatch(_) => self.shared.count(Counter::SyncErrors),
                    RplidarError::ChecksumMismatch { .. } => {
                        self.shared.count(Counter::ChecksumErrors)
                    }
                    _ => {}
                }
                debug!("Dropping frame: {e}");
                None
            }
        }
    }
}
