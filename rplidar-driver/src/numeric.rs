pub(crate) fn to_u16(a: u8, b: u8) -> u16 {
    ((a as u16) << 8) + (b as u16)
}

pub(crate) fn high_nibble(b: u8) -> u8 {
    b >> 4
}

pub(crate) fn low_nibble(b: u8) -> u8 {
    b & 0x0F
}

pub(crate) fn degree_to_radian(degree: f64) -> f64 {
    degree * std::f64::consts::PI / 180.
}

pub(crate) fn q6_to_degree(angle_q6: i32) -> f64 {
    (angle_q6 as f64) / 64.
}

/// Distance in mm from a cabin's `distance_angle` field (Q2, two low bits reused).
pub(crate) fn calc_distance(distance_angle: u16) -> u16 {
    distance_angle >> 2
}

/// Six bit Q3 angle offset: `nibble` holds bits 0-3, `distance_angle` bits 0-1 hold bits 4-5.
pub(crate) fn angle_offset_q3(nibble: u8, distance_angle: u16) -> i32 {
    (low_nibble(nibble) as i32) | (((distance_angle & 0x3) as i32) << 4)
}

pub(crate) fn to_string(data: &[u8]) -> String {
    data.iter()
        .map(|e| format!("{:02X}", e))
        .collect::<Vec<_>>()
        .join(" ")
}
