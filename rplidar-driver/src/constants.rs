pub(crate) const RPLIDAR_CMD_SYNC_BYTE: u8 = 0xA5;
pub(crate) const RPLIDAR_CMD_STOP: u8 = 0x25;
pub(crate) const RPLIDAR_CMD_EXPRESS_SCAN: u8 = 0x82;
// Sync, command, payload size, five payload bytes (legacy mode), checksum.
pub(crate) const EXPRESS_SCAN_REQUEST: [u8; 9] = [
    RPLIDAR_CMD_SYNC_BYTE,
    RPLIDAR_CMD_EXPRESS_SCAN,
    0x05,
    0x00,
    0x00,
    0x00,
    0x00,
    0x00,
    0x22,
];
pub(crate) const DESCRIPTOR_SIZE: usize = 7;
pub(crate) const DESCRIPTOR_TYPE_INDEX: usize = 6;
pub(crate) const RPLIDAR_ANS_TYPE_MEASUREMENT_CAPSULED: u8 = 0x82;
pub(crate) const EXPRESS_FRAME_SIZE: usize = 84;
pub(crate) const EXPRESS_HEADER_SIZE: usize = 4;
pub(crate) const CABIN_SIZE: usize = 5;
pub(crate) const EXPRESS_SYNC: u8 = 0xA5;
pub(crate) const EXPRESS_START_FLAG: u16 = 0x8000;
pub(crate) const SAMPLES_PER_FRAME: i32 = 32;
pub(crate) const DEFAULT_BAUD_RATE: u32 = 115_200;
pub(crate) const N_READ_TRIALS: usize = 3;
