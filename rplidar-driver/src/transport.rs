use crate::error::RplidarError;

/// Byte link to the sensor.
///
/// `receive_into` is the completion point of the reception pipeline: it
/// returns `Ok(())` only once exactly `buffer.len()` bytes have landed in
/// `buffer`. When they have not arrived within the adapter's own poll window
/// it returns [`RplidarError::Timeout`] without consuming anything, so
/// the caller can re-arm the same receive.
pub trait Transport: Send {
    fn send(&mut self, data: &[u8]) -> Result<(), RplidarError>;

    fn receive_into(&mut self, buffer: &mut [u8]) -> Result<(), RplidarError>;

    /// Discards bytes that have been received but not read yet.
    fn clear_input(&mut self) -> Result<(), RplidarError> {
        Ok(())
    }
}
