#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of the driver's diagnostic counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriverStats {
    /// Frames handed over by the reception pipeline.
    pub frames_received: u64,
    /// Frames that passed sync and checksum validation.
    pub frames_decoded: u64,
    /// Frames dropped because the previous one was still unread.
    pub overruns: u64,
    pub sync_errors: u64,
    pub checksum_errors: u64,
    /// Descriptors whose type byte did not echo the express scan command.
    pub handshake_mismatches: u64,
    /// Number of times the express scan command was sent.
    pub handshake_attempts: u64,
}

impl DriverStats {
    /// Total number of frames lost for any reason.
    pub fn frames_dropped(&self) -> u64 {
        self.overruns + self.sync_errors + self.checksum_errors
    }
}
