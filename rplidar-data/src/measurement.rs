#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single distance sample extracted from a cabin.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement {
    /// Compensated angle in degrees, within `[0, 360)`.
    pub angle_degrees: f64,
    /// Distance to an object in mm. Zero means no return.
    pub distance_mm: u16,
    /// True for the first sample of a new revolution.
    pub new_scan: bool,
}
