//! Double buffer shared by the reception pipeline and the frame decoder.
//!
//! The pool holds two frame slots. The producer fills one while the consumer
//! owns the other, and ownership is handed over through a single atomic
//! frame-ready flag: the producer is the only one to set it, the consumer
//! the only one to clear it. Each side keeps its own slot index and flips it
//! once per handed-over frame, so the two indices stay in lock-step.

use crate::constants::EXPRESS_FRAME_SIZE;
use crossbeam_utils::sync::{Parker, Unparker};
use std::cell::UnsafeCell;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

type Slot = UnsafeCell<[u8; EXPRESS_FRAME_SIZE]>;

pub(crate) struct FramePool {
    slots: [Slot; 2],
    frame_ready: AtomicBool,
}

// SAFETY: a slot is only written through the producer's `active_slot` and
// only read through a consumer's `ReadyFrame`. While `frame_ready` is set the
// consumer owns slot `write_slot ^ 1` and the producer keeps writing
// `write_slot`; while it is clear no `ReadyFrame` exists.
unsafe impl Sync for FramePool {}

/// Outcome of a completed receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Completion {
    /// The frame was handed to the consumer; the other slot is now active.
    Ready,
    /// The consumer still holds the previous frame. The new one is dropped
    /// and its slot stays active.
    Overrun,
}

pub(crate) fn frame_pool() -> (FrameProducer, FrameConsumer) {
    let pool = Arc::new(FramePool {
        slots: [
            UnsafeCell::new([0; EXPRESS_FRAME_SIZE]),
            UnsafeCell::new([0; EXPRESS_FRAME_SIZE]),
        ],
        frame_ready: AtomicBool::new(false),
    });
    let parker = Parker::new();
    let unparker = parker.unparker().clone();
    let producer = FrameProducer {
        pool: Arc::clone(&pool),
        write_slot: 0,
        unparker,
    };
    let consumer = FrameConsumer {
        pool,
        read_slot: 0,
        parker,
    };
    (producer, consumer)
}

pub(crate) struct FrameProducer {
    pool: Arc<FramePool>,
    write_slot: usize,
    unparker: Unparker,
}

impl FrameProducer {
    /// The slot the next receive has to land in.
    pub(crate) fn active_slot(&mut self) -> &mut [u8] {
        // SAFETY: see `FramePool`. The consumer never touches `write_slot`.
        unsafe { &mut *self.pool.slots[self.write_slot].get() }
    }

    pub(crate) fn write_slot(&self) -> usize {
        self.write_slot
    }

    /// Called once the active slot is full. Never blocks.
    pub(crate) fn complete(&mut self) -> Completion {
        if self.pool.frame_ready.load(Ordering::Acquire) {
            return Completion::Overrun;
        }
        self.pool.frame_ready.store(true, Ordering::Release);
        self.write_slot ^= 1;
        self.unparker.unpark();
        Completion::Ready
    }
}

pub(crate) struct FrameConsumer {
    pool: Arc<FramePool>,
    read_slot: usize,
    parker: Parker,
}

impl FrameConsumer {
    pub(crate) fn is_ready(&self) -> bool {
        self.pool.frame_ready.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub(crate) fn read_slot(&self) -> usize {
        self.read_slot
    }

    pub(crate) fn try_take(&mut self) -> Option<ReadyFrame<'_>> {
        match self.is_ready() {
            true => Some(ReadyFrame { consumer: self }),
            false => None,
        }
    }

    /// Blocks until a frame is ready or `timeout` elapses.
    pub(crate) fn wait(&mut self, timeout: Duration) -> Option<ReadyFrame<'_>> {
        if !self.is_ready() {
            self.parker.park_timeout(timeout);
        }
        self.try_take()
    }
}

/// Borrow of the ready slot. Dropping it hands the slot back to the producer.
pub(crate) struct ReadyFrame<'a> {
    consumer: &'a mut FrameConsumer,
}

impl Deref for ReadyFrame<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        let slot = &self.consumer.pool.slots[self.consumer.read_slot];
        // SAFETY: see `FramePool`. `frame_ready` is set for the whole lifetime of `self`.
        unsafe { &*slot.get() }
    }
}

impl Drop for ReadyFrame<'_> {
    fn drop(&mut self) {
        self.consumer.read_slot ^= 1;
        self.consumer
            .pool
            .frame_ready
            .store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fill(producer: &mut FrameProducer, value: u8) -> Completion {
        producer.active_slot().fill(value);
        producer.complete()
    }

    #[test]
    fn test_alternating_slots() {
        let (mut producer, mut consumer) = frame_pool();
        assert!(consumer.try_take().is_none());

        assert_eq!(producer.write_slot(), 0);
        assert_eq!(fill(&mut producer, 1), Completion::Ready);
        assert_eq!(producer.write_slot(), 1);
        {
            let frame = consumer.try_take().unwrap();
            assert!(frame.iter().all(|&b| b == 1));
        }
        assert_eq!(consumer.read_slot(), 1);
        assert!(!consumer.is_ready());

        assert_eq!(fill(&mut producer, 2), Completion::Ready);
        assert_eq!(producer.write_slot(), 0);
        let frame = consumer.try_take().unwrap();
        assert!(frame.iter().all(|&b| b == 2));
    }

    #[test]
    fn test_overrun_keeps_unread_frame() {
        let (mut producer, mut consumer) = frame_pool();
        assert_eq!(fill(&mut producer, 1), Completion::Ready);
        assert_eq!(fill(&mut producer, 2), Completion::Overrun);
        assert_eq!(fill(&mut producer, 3), Completion::Overrun);
        assert_eq!(producer.write_slot(), 1);
        assert!(consumer.is_ready());

        {
            let frame = consumer.try_take().unwrap();
            assert!(frame.iter().all(|&b| b == 1));
        }

        // The overrun slot is re-used for the next frame
        assert_eq!(fill(&mut producer, 4), Completion::Ready);
        let frame = consumer.try_take().unwrap();
        assert!(frame.iter().all(|&b| b == 4));
    }

    #[test]
    fn test_frame_being_read_is_not_overwritten() {
        let (mut producer, mut consumer) = frame_pool();
        assert_eq!(fill(&mut producer, 1), Completion::Ready);

        let frame = consumer.try_take().unwrap();
        // Completion while the consumer is still reading
        assert_eq!(fill(&mut producer, 2), Completion::Overrun);
        assert!(frame.iter().all(|&b| b == 1));
        drop(frame);

        assert_eq!(fill(&mut producer, 3), Completion::Ready);
        assert!(consumer.try_take().unwrap().iter().all(|&b| b == 3));
    }

    #[test]
    fn test_wait_times_out() {
        let (_producer, mut consumer) = frame_pool();
        assert!(consumer.wait(Duration::from_millis(5)).is_none());
    }

    #[test]
    fn test_no_torn_reads_across_threads() {
        let (mut producer, mut consumer) = frame_pool();
        const N_FRAMES: u8 = 200;

        let writer = std::thread::spawn(move || {
            let mut n_ready = 0;
            for value in 1..=N_FRAMES {
                if fill(&mut producer, value) == Completion::Ready {
                    n_ready += 1;
                }
            }
            n_ready
        });

        let mut last = 0u8;
        let mut n_read = 0;
        while last != N_FRAMES {
            if let Some(frame) = consumer.wait(Duration::from_millis(50)) {
                let first = frame[0];
                assert!(frame.iter().all(|&b| b == first));
                assert!(first > last);
                last = first;
                n_read += 1;
                continue;
            }
            if writer.is_finished() && !consumer.is_ready() {
                break;
            }
        }

        let n_ready = writer.join().unwrap();
        assert_eq!(n_read, n_ready);
    }

    #[derive(Clone, Debug)]
    enum Event {
        Complete,
        Take,
        Release,
    }

    fn event() -> impl Strategy<Value = Event> {
        prop_oneof![Just(Event::Complete), Just(Event::Take), Just(Event::Release)]
    }

    proptest! {
        // Replays an interleaving of producer completions and consumer
        // take/release steps and checks the consumer only ever sees whole,
        // in-order, accepted frames.
        #[test]
        fn prop_interleaving(events in prop::collection::vec(event(), 1..200)) {
            let (mut producer, mut consumer) = frame_pool();
            let mut next_value: u8 = 1;
            let mut accepted: Vec<u8> = Vec::new();
            let mut seen: Vec<u8> = Vec::new();
            let mut holding = false;

            for e in events {
                match e {
                    Event::Complete => {
                        let value = next_value;
                        next_value = next_value.wrapping_add(1).max(1);
                        let was_ready = consumer.is_ready();
                        let c = fill(&mut producer, value);
                        prop_assert_eq!(c == Completion::Overrun, was_ready);
                        if c == Completion::Ready {
                            accepted.push(value);
                        }
                    }
                    Event::Take => {
                        if !holding && consumer.is_ready() {
                            holding = true;
                        }
                    }
                    Event::Release => {
                        if holding {
                            let frame = consumer.try_take().unwrap();
                            let first = frame[0];
                            prop_assert!(frame.iter().all(|&b| b == first));
                            seen.push(first);
                            holding = false;
                        }
                    }
                }
                prop_assert_eq!(producer.write_slot() ^ consumer.read_slot(), consumer.is_ready() as usize);
            }
            prop_assert!(accepted.len() - seen.len() <= 1);
            prop_assert_eq!(&accepted[..seen.len()], &seen[..]);
        }
    }
}
