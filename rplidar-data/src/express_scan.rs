#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of cabins carried by one express scan frame.
pub const N_CABINS: usize = 16;

/// One 5-byte cabin: two distance samples and their angle compensation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cabin {
    /// Distance of the first sample (Q2, mm) with bits 4-5 of its angle offset in the low two bits.
    pub distance_angle_1: u16,
    /// Distance of the second sample (Q2, mm) with bits 4-5 of its angle offset in the low two bits.
    pub distance_angle_2: u16,
    /// Low nibble: bits 0-3 of the first offset. High nibble: bits 0-3 of the second offset.
    pub offset_angles_q3: u8,
}

/// A validated express scan frame.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExpressScanFrame {
    /// Start angle of the frame in degrees x 64 (15 bits).
    pub start_angle_q6: u16,
    /// The `S` bit. Set on the first frame the sensor sends after entering express mode.
    pub start_flag: bool,
    /// Checksum carried in the header nibbles.
    pub checksum: u8,
    pub cabins: [Cabin; N_CABINS],
}

impl ExpressScanFrame {
    /// Start angle in degrees.
    pub fn angle_degrees(&self) -> f64 {
        (self.start_angle_q6 as f64) / 64.
    }
}
