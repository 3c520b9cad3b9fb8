//! State shared between the reader thread, the decoder thread and the
//! [`DriverThreads`](crate::DriverThreads) handle.

use crossbeam_utils::atomic::AtomicCell;
use rplidar_data::{DriverStats, LinkState};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

const NO_ANGLE: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Counter {
    FramesReceived,
    FramesDecoded,
    Overruns,
    SyncErrors,
    ChecksumErrors,
    HandshakeMismatches,
    HandshakeAttempts,
}

pub(crate) struct DriverShared {
    link_state: AtomicCell<LinkState>,
    start_angle_q6: AtomicU32,
    frames_received: AtomicU64,
    frames_decoded: AtomicU64,
    overruns: AtomicU64,
    sync_errors: AtomicU64,
    checksum_errors: AtomicU64,
    handshake_mismatches: AtomicU64,
    handshake_attempts: AtomicU64,
}

impl DriverShared {
    pub(crate) fn new() -> DriverShared {
        DriverShared {
            link_state: AtomicCell::new(LinkState::Idle),
            start_angle_q6: AtomicU32::new(NO_ANGLE),
            frames_received: AtomicU64::new(0),
            frames_decoded: AtomicU64::new(0),
            overruns: AtomicU64::new(0),
            sync_errors: AtomicU64::new(0),
            checksum_errors: AtomicU64::new(0),
            handshake_mismatches: AtomicU64::new(0),
            handshake_attempts: AtomicU64::new(0),
        }
    }

    pub(crate) fn link_state(&self) -> LinkState {
        self.link_state.load()
    }

    pub(crate) fn set_link_state(&self, state: LinkState) {
        self.link_state.store(state);
    }

    fn counter(&self, counter: Counter) -> &AtomicU64 {
        match counter {
            Counter::FramesReceived => &self.frames_received,
            Counter::FramesDecoded => &self.frames_decoded,
            Counter::Overruns => &self.overruns,
            Counter::SyncErrors => &self.sync_errors,
            Counter::ChecksumErrors => &self.checksum_errors,
            Counter::HandshakeMismatches => &self.handshake_mismatches,
            Counter::HandshakeAttempts => &self.handshake_attempts,
        }
    }

    pub(crate) fn count(&self, counter: Counter) {
        self.counter(counter).fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn get(&self, counter: Counter) -> u64 {
        self.counter(counter).load(Ordering::Relaxed)
    }

    pub(crate) fn stats(&self) -> DriverStats {
        DriverStats {
            frames_received: self.get(Counter::FramesReceived),
            frames_decoded: self.get(Counter::FramesDecoded),
            overruns: self.get(Counter::Overruns),
            sync_errors: self.get(Counter::SyncErrors),
            checksum_errors: self.get(Counter::ChecksumErrors),
            handshake_mismatches: self.get(Counter::HandshakeMismatches),
            handshake_attempts: self.get(Counter::HandshakeAttempts),
        }
    }

    pub(crate) fn publish_start_angle(&self, start_angle_q6: u16) {
        self.start_angle_q6
            .store(start_angle_q6 as u32, Ordering::Release);
    }

    /// Start angle of the last accepted frame, in degrees.
    pub(crate) fn start_angle_degrees(&self) -> Option<f64> {
        match self.start_angle_q6.load(Ordering::Acquire) {
            NO_ANGLE => None,
            q6 => Some((q6 as f64) / 64.),
        }
    }
}
