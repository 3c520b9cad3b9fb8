use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RplidarError {
    #[error("Response descriptor must be always seven bytes. Actually {0} bytes.")]
    InvalidDescriptorLength(usize),
    #[error("Expected type code {expected:#04X} but obtained {actual:#04X}.")]
    InvalidTypeCode { expected: u8, actual: u8 },
    #[error("Express scan frame must be 84 bytes. Actually {0} bytes.")]
    InvalidFrameLength(usize),
    #[error("Frame sync must be 0xA5. Observed = {0:#04X}.")]
    SyncMismatch(u8),
    #[error("Checksum mismatched. Calculated = {calculated:02X}, expected = {expected:02X}.")]
    ChecksumMismatch { expected: u8, calculated: u8 },
    #[error("No express scan descriptor after {0} attempt(s)")]
    HandshakeTimeout(u32),
    #[error("Operation timed out")]
    Timeout,
    #[error("Driver thread disconnected")]
    Disconnected,
    #[error(transparent)]
    SerialError(#[from] serialport::Error),
    #[error(transparent)]
    IoError(#[from] io::Error),
}
