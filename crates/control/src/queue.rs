//! Event queue plumbing between the poller and the application.
//!
//! The poller never blocks on delivery: it calls [`EventSink::enqueue`] and,
//! if the queue is full, counts the event as dropped and moves on. On target
//! the sink is the [`Sender`] half of an [`EventChannel`]; the consumer wraps
//! the matching [`Receiver`] in a [`ControlInput`].
//!
//! ```
//! use control::{ControlInput, EventChannel, EventSink, EVENT_QUEUE_DEPTH};
//! use embassy_sync::blocking_mutex::raw::NoopRawMutex;
//! use platform::{Encoder, InputDevice, InputEvent};
//!
//! let channel: EventChannel<NoopRawMutex, EVENT_QUEUE_DEPTH> = EventChannel::new();
//! let mut tx = channel.sender();
//! let mut input = ControlInput::new(&channel);
//!
//! let step = InputEvent::EncoderStep { encoder: Encoder::Encoder1, delta: 1 };
//! assert!(tx.enqueue(step));
//! assert_eq!(input.poll_event(), Some(step));
//! assert_eq!(input.poll_event(), None);
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use platform::{InputDevice, InputEvent};

/// Default capacity of the event channel.
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// Bounded multi-producer channel carrying [`InputEvent`]s.
pub type EventChannel<M, const N: usize = EVENT_QUEUE_DEPTH> = Channel<M, InputEvent, N>;

/// Non-blocking destination for input events.
pub trait EventSink {
    /// Try to enqueue `event`.
    ///
    /// Returns `false` if the queue is full and the event was discarded.
    fn enqueue(&mut self, event: InputEvent) -> bool;
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn enqueue(&mut self, event: InputEvent) -> bool {
        (**self).enqueue(event)
    }
}

impl<M: RawMutex, const N: usize> EventSink for Sender<'_, M, InputEvent, N> {
    fn enqueue(&mut self, event: InputEvent) -> bool {
        self.try_send(event).is_ok()
    }
}

impl<const N: usize> EventSink for heapless::Deque<InputEvent, N> {
    fn enqueue(&mut self, event: InputEvent) -> bool {
        self.push_back(event).is_ok()
    }
}

/// Consumer side of an [`EventChannel`], implementing [`InputDevice`].
pub struct ControlInput<'ch, M: RawMutex, const N: usize = EVENT_QUEUE_DEPTH> {
    rx: Receiver<'ch, M, InputEvent, N>,
}

impl<'ch, M: RawMutex, const N: usize> ControlInput<'ch, M, N> {
    /// Attach to `channel`.
    pub fn new(channel: &'ch EventChannel<M, N>) -> Self {
        Self {
            rx: channel.receiver(),
        }
    }
}

impl<M: RawMutex, const N: usize> InputDevice for ControlInput<'_, M, N> {
    async fn wait_for_event(&mut self) -> InputEvent {
        self.rx.receive().await
    }

    fn poll_event(&mut self) -> Option<InputEvent> {
        // Empty is the only error; the channel never closes.
        self.rx.try_receive().ok()
    }
}
