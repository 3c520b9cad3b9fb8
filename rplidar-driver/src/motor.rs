use crate::error::RplidarError;

/// Spin motor of the sensor. Started once before the handshake; the driver
/// never adjusts it afterwards.
pub trait MotorControl {
    fn start_motor(&mut self) -> Result<(), RplidarError>;
}
