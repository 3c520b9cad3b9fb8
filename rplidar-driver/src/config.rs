use crate::constants::DEFAULT_BAUD_RATE;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Driver configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DriverConfig {
    /// Serial baud rate.
    pub baud_rate: u32,
    /// Read timeout of the serial port (milliseconds).
    pub port_timeout_ms: u64,
    /// How long to wait for the express scan descriptor before resending the
    /// command (milliseconds). `None` waits forever.
    pub handshake_timeout_ms: Option<u64>,
    /// Number of times the express scan command is sent before giving up.
    pub handshake_attempts: u32,
    /// Upper bound on one decoder wait, which is also how quickly the decoder
    /// notices termination (milliseconds).
    pub frame_wait_ms: u64,
    /// Capacity of the decoded frame channel. Frames are dropped when full.
    pub frame_channel_capacity: usize,
    /// Capacity of the scan channel. Scans are dropped when full.
    pub scan_channel_capacity: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            baud_rate: DEFAULT_BAUD_RATE,
            port_timeout_ms: 10,
            handshake_timeout_ms: Some(1000),
            handshake_attempts: 3,
            frame_wait_ms: 10,
            frame_channel_capacity: 64,
            scan_channel_capacity: 10,
        }
    }
}

impl DriverConfig {
    /// Sends the express scan command once and waits for the descriptor forever.
    pub fn wait_forever() -> Self {
        DriverConfig {
            handshake_timeout_ms: None,
            handshake_attempts: 1,
            ..Default::default()
        }
    }

    pub(crate) fn port_timeout(&self) -> Duration {
        Duration::from_millis(self.port_timeout_ms)
    }

    pub(crate) fn handshake_timeout(&self) -> Option<Duration> {
        self.handshake_timeout_ms.map(Duration::from_millis)
    }

    pub(crate) fn frame_wait(&self) -> Duration {
        Duration::from_millis(self.frame_wait_ms)
    }
}
