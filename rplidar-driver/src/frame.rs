use crate::constants::{
    CABIN_SIZE, DESCRIPTOR_SIZE, DESCRIPTOR_TYPE_INDEX, EXPRESS_FRAME_SIZE, EXPRESS_HEADER_SIZE,
    EXPRESS_START_FLAG, EXPRESS_SYNC, RPLIDAR_ANS_TYPE_MEASUREMENT_CAPSULED,
};
use crate::error::RplidarError;
use crate::numeric::{high_nibble, low_nibble, to_u16};
use rplidar_data::{Cabin, ExpressScanFrame, N_CABINS};

// Header nibbles on the wire:
//   byte0 = sync1 (bits 4-7) | checksum low (bits 0-3)
//   byte1 = sync2 (bits 4-7) | checksum high (bits 0-3)

pub(crate) fn sync_byte(frame: &[u8]) -> u8 {
    (high_nibble(frame[0]) << 4) | high_nibble(frame[1])
}

pub(crate) fn header_checksum(frame: &[u8]) -> u8 {
    low_nibble(frame[0]) | (low_nibble(frame[1]) << 4)
}

/// XOR of every byte after the two sync/checksum bytes.
pub(crate) fn calc_checksum(frame: &[u8]) -> u8 {
    frame[2..EXPRESS_FRAME_SIZE].iter().fold(0, |sum, b| sum ^ b)
}

/// Low 15 bits of bytes 2-3; bit 15 is the start flag and is not part of the angle.
pub(crate) fn start_angle_q6(frame: &[u8]) -> u16 {
    to_u16(frame[3], frame[2]) & !EXPRESS_START_FLAG
}

pub(crate) fn start_flag(frame: &[u8]) -> bool {
    to_u16(frame[3], frame[2]) & EXPRESS_START_FLAG != 0
}

fn cabin_index(idx: usize) -> usize {
    EXPRESS_HEADER_SIZE + idx * CABIN_SIZE
}

pub(crate) fn cabin(frame: &[u8], idx: usize) -> Cabin {
    let i = cabin_index(idx);
    Cabin {
        distance_angle_1: to_u16(frame[i + 1], frame[i]),
        distance_angle_2: to_u16(frame[i + 3], frame[i + 2]),
        offset_angles_q3: frame[i + 4],
    }
}

pub(crate) fn err_if_sync_mismatched(frame: &[u8]) -> Result<(), RplidarError> {
    let sync = sync_byte(frame);
    match sync != EXPRESS_SYNC {
        true => Err(RplidarError::SyncMismatch(sync)),
        false => Ok(()),
    }
}

pub(crate) fn err_if_checksum_mismatched(frame: &[u8]) -> Result<(), RplidarError> {
    let calculated = calc_checksum(frame);
    let expected = header_checksum(frame);
    match calculated != expected {
        true => Err(RplidarError::ChecksumMismatch {
            expected,
            calculated,
        }),
        false => Ok(()),
    }
}

/// Validates one express scan frame and extracts its fields.
///
/// Checks run in wire order: length, sync, checksum. The first failure is
/// returned and nothing else is decoded.
pub(crate) fn decode_express_frame(frame: &[u8]) -> Result<ExpressScanFrame, RplidarError> {
    if frame.len() != EXPRESS_FRAME_SIZE {
        return Err(RplidarError::InvalidFrameLength(frame.len()));
    }
    err_if_sync_mismatched(frame)?;
    err_if_checksum_mismatched(frame)?;

    let mut cabins = [Cabin::default(); N_CABINS];
    for (idx, c) in cabins.iter_mut().enumerate() {
        *c = cabin(frame, idx);
    }
    Ok(ExpressScanFrame {
        start_angle_q6: start_angle_q6(frame),
        start_flag: start_flag(frame),
        checksum: header_checksum(frame),
        cabins,
    })
}

/// Only the type byte is inspected; the sensor echoes the express scan
/// command there when it accepts the mode switch.
pub(crate) fn validate_descriptor(descriptor: &[u8]) -> Result<(), RplidarError> {
    if descriptor.len() != DESCRIPTOR_SIZE {
        return Err(RplidarError::InvalidDescriptorLength(descriptor.len()));
    }
    let actual = descriptor[DESCRIPTOR_TYPE_INDEX];
    if actual != RPLIDAR_ANS_TYPE_MEASUREMENT_CAPSULED {
        return Err(RplidarError::InvalidTypeCode {
            expected: RPLIDAR_ANS_TYPE_MEASUREMENT_CAPSULED,
            actual,
        });
    }
    Ok(())
}
