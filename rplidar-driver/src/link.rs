use crate::config::DriverConfig;
use crate::constants::EXPRESS_SCAN_REQUEST;
use crate::error::RplidarError;
use crate::frame::validate_descriptor;
use crate::numeric::to_string;
use crate::shared::{Counter, DriverShared};
use crate::transport::Transport;
use rplidar_data::LinkState;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Drives the switch into express scan mode.
pub(crate) struct LinkStateMachine {
    shared: Arc<DriverShared>,
    handshake_timeout: Option<Duration>,
    max_attempts: u32,
    attempts: u32,
    deadline: Option<Instant>,
}

impl LinkStateMachine {
    pub(crate) fn new(shared: Arc<DriverShared>, config: &DriverConfig) -> LinkStateMachine {
        LinkStateMachine {
            shared,
            handshake_timeout: config.handshake_timeout(),
            max_attempts: config.handshake_attempts.max(1),
            attempts: 0,
            deadline: None,
        }
    }

    pub(crate) fn state(&self) -> LinkState {
        self.shared.link_state()
    }

    /// Sends the express scan command. The next receive must be the 7-byte descriptor.
    pub(crate) fn begin_handshake<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
    ) -> Result<(), RplidarError> {
        transport.send(&EXPRESS_SCAN_REQUEST)?;
        self.attempts += 1;
        self.shared.count(Counter::HandshakeAttempts);
        self.shared
            .set_link_state(LinkState::AwaitingHandshakeResponse);
        self.deadline = self.handshake_timeout.map(|t| Instant::now() + t);
        info!(attempt = self.attempts, "Express scan requested");
        Ok(())
    }

    /// Handles a received descriptor and returns the resulting state.
    pub(crate) fn on_descriptor(&mut self, descriptor: &[u8]) -> LinkState {
        if self.state() != LinkState::AwaitingHandshakeResponse {
            return self.state();
        }
        match validate_descriptor(descriptor) {
            Ok(()) => {
                self.shared.set_link_state(LinkState::Streaming);
                self.deadline = None;
                info!("Express scan streaming");
            }
            Err(e) => {
                self.shared.count(Counter::HandshakeMismatches);
                warn!(descriptor = %to_string(descriptor), "Discarding descriptor: {e}");
            }
        }
        self.state()
    }

    /// Called on every pass of the reader loop while the handshake is pending,
    /// whatever the last receive returned. Resends the command once the
    /// handshake deadline has passed, and gives up after the configured
    /// number of attempts.
    pub(crate) fn check_handshake_deadline<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
    ) -> Result<(), RplidarError> {
        if self.state() != LinkState::AwaitingHandshakeResponse {
            return Ok(());
        }
        let deadline = match self.deadline {
            Some(d) => d,
            None => return Ok(()),
        };
        if Instant::now() < deadline {
            return Ok(());
        }
        if self.attempts >= self.max_attempts {
            warn!(attempts = self.attempts, "Sensor did not answer express scan request");
            return Err(RplidarError::HandshakeTimeout(self.attempts));
        }
        warn!(attempt = self.attempts, "No descriptor, resending express scan request");
        transport.clear_input()?;
        self.begin_handshake(transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{descriptor, scripted_transport};
    use crate::time::sleep_ms;

    fn link(config: &DriverConfig) -> (LinkStateMachine, Arc<DriverShared>) {
        let shared = Arc::new(DriverShared::new());
        (LinkStateMachine::new(Arc::clone(&shared), config), shared)
    }

    #[test]
    fn test_begin_handshake() {
        let (mut link, shared) = link(&DriverConfig::default());
        let (mut transport, sensor) = scripted_transport();
        assert_eq!(link.state(), LinkState::Idle);

        link.begin_handshake(&mut transport).unwrap();
        assert_eq!(link.state(), LinkState::AwaitingHandshakeResponse);
        assert_eq!(
            sensor.sent.try_recv().unwrap(),
            vec![0xA5, 0x82, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x22]
        );
        assert_eq!(shared.stats().handshake_attempts, 1);
    }

    #[test]
    fn test_descriptor_match() {
        let (mut link, shared) = link(&DriverConfig::default());
        let (mut transport, _sensor) = scripted_transport();
        link.begin_handshake(&mut transport).unwrap();

        assert_eq!(link.on_descriptor(&descriptor(0x82)), LinkState::Streaming);
        assert_eq!(shared.link_state(), LinkState::Streaming);
        assert_eq!(shared.stats().handshake_mismatches, 0);
    }

    #[test]
    fn test_descriptor_mismatch() {
        let (mut link, shared) = link(&DriverConfig::default());
        let (mut transport, _sensor) = scripted_transport();
        link.begin_handshake(&mut transport).unwrap();

        assert_eq!(
            link.on_descriptor(&descriptor(0x00)),
            LinkState::AwaitingHandshakeResponse
        );
        assert_eq!(shared.stats().handshake_mismatches, 1);

        // The next descriptor is still considered
        assert_eq!(link.on_descriptor(&descriptor(0x82)), LinkState::Streaming);
    }

    #[test]
    fn test_streaming_is_final() {
        let (mut link, shared) = link(&DriverConfig::default());
        let (mut transport, _sensor) = scripted_transport();
        link.begin_handshake(&mut transport).unwrap();
        link.on_descriptor(&descriptor(0x82));

        assert_eq!(link.on_descriptor(&descriptor(0x00)), LinkState::Streaming);
        assert_eq!(shared.stats().handshake_mismatches, 0);
    }

    #[test]
    fn test_retry_then_give_up() {
        let config = DriverConfig {
            handshake_timeout_ms: Some(50),
            handshake_attempts: 2,
            ..Default::default()
        };
        let (mut link, shared) = link(&config);
        let (mut transport, sensor) = scripted_transport();
        link.begin_handshake(&mut transport).unwrap();

        // Before the deadline nothing happens
        link.check_handshake_deadline(&mut transport).unwrap();
        assert_eq!(shared.stats().handshake_attempts, 1);

        sleep_ms(60);
        link.check_handshake_deadline(&mut transport).unwrap();
        assert_eq!(shared.stats().handshake_attempts, 2);

        sleep_ms(60);
        assert!(matches!(
            link.check_handshake_deadline(&mut transport),
            Err(RplidarError::HandshakeTimeout(2))
        ));
        assert_eq!(sensor.sent.try_iter().count(), 2);
    }

    #[test]
    fn test_deadline_applies_while_descriptors_mismatch() {
        let config = DriverConfig {
            handshake_timeout_ms: Some(20),
            handshake_attempts: 1,
            ..Default::default()
        };
        let (mut link, shared) = link(&config);
        let (mut transport, _sensor) = scripted_transport();
        link.begin_handshake(&mut transport).unwrap();

        sleep_ms(30);
        let state = link.on_descriptor(&descriptor(0x00));
        assert_eq!(state, LinkState::AwaitingHandshakeResponse);
        assert!(matches!(
            link.check_handshake_deadline(&mut transport),
            Err(RplidarError::HandshakeTimeout(1))
        ));
        assert_eq!(shared.stats().handshake_mismatches, 1);
    }

    #[test]
    fn test_no_timeout_waits_forever() {
        let (mut link, shared) = link(&DriverConfig::wait_forever());
        let (mut transport, _sensor) = scripted_transport();
        link.begin_handshake(&mut transport).unwrap();

        sleep_ms(5);
        link.check_handshake_deadline(&mut transport).unwrap();
        assert_eq!(shared.stats().handshake_attempts, 1);
        assert_eq!(link.state(), LinkState::AwaitingHandshakeResponse);
    }
}
