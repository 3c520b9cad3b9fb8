#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Connection state of the sensor link.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LinkState {
    /// No command has been sent yet.
    #[default]
    Idle,
    /// The express scan command was sent and the descriptor has not matched yet.
    AwaitingHandshakeResponse,
    /// The sensor streams express scan frames.
    Streaming,
}
