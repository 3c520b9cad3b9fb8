use crate::buffer::{Completion, FrameProducer};
use crate::constants::DESCRIPTOR_SIZE;
use crate::link::LinkStateMachine;
use crate::shared::{Counter, DriverShared};
use rplidar_data::LinkState;
use std::sync::Arc;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PipelineEvent {
    /// A descriptor was received; carries the resulting link state.
    Handshake(LinkState),
    Frame(Completion),
}

/// Completion-side half of the driver. Decides which buffer the next
/// receive lands in and what to do once it is full. Nothing here blocks.
pub(crate) struct ReceptionPipeline {
    link: LinkStateMachine,
    producer: FrameProducer,
    descriptor: [u8; DESCRIPTOR_SIZE],
    shared: Arc<DriverShared>,
}

impl ReceptionPipeline {
    pub(crate) fn new(
        link: LinkStateMachine,
        producer: FrameProducer,
        shared: Arc<DriverShared>,
    ) -> ReceptionPipeline {
        ReceptionPipeline {
            link,
            producer,
            descriptor: [0; DESCRIPTOR_SIZE],
            shared,
        }
    }

    pub(crate) fn link_mut(&mut self) -> &mut LinkStateMachine {
        &mut self.link
    }

    /// Buffer the next receive has to fill.
    pub(crate) fn armed_buffer(&mut self) -> &mut [u8] {
        match self.link.state() {
            LinkState::Streaming => self.producer.active_slot(),
            _ => &mut self.descriptor[..],
        }
    }

    pub(crate) fn on_receive_complete(&mut self) -> PipelineEvent {
        if self.link.state() != LinkState::Streaming {
            let state = self.link.on_descriptor(&self.descriptor);
            return PipelineEvent::Handshake(state);
        }
        let completion = self.producer.complete();
        match completion {
            Completion::Ready => self.shared.count(Counter::FramesReceived),
            Completion::Overrun => {
                self.shared.count(Counter::Overruns);
                trace!(slot = self.producer.write_slot(), "Frame overrun");
            }
        }
        PipelineEvent::Frame(completion)
    }
}
