//! Front-panel control layer: debouncing, quadrature decoding and the
//! periodic poller that turns raw GPIO levels into [`platform::InputEvent`]s.
//!
//! ```text
//!   GpioBank::read_all ──► PinAssignment::button_state ──► ButtonDebouncer ─┐
//!          │                                                                 ├─► EventSink
//!          └───────────► (CLK, DAT) per encoder ──────────► RotaryEncoder ──┘
//! ```
//!
//! Everything here is `no_std` and allocation free; [`ControlPoller::poll`]
//! does exactly one bank read and never blocks. The `std` feature adds
//! [`TraceBuilder`] for generating synthetic GPIO traces on the host.
//!
//! # Example
//!
//! ```
//! use control::{ControlConfig, ControlPoller, EncoderType, PinAssignment};
//! use platform::mocks::MockGpio;
//! use platform::InputEvent;
//!
//! let config = ControlConfig::new(PinAssignment::simple_encoder())
//!     .encoder_type(EncoderType::Full)
//!     .debounce_ticks(2);
//! let gpio = MockGpio::new(config.pins.idle_bank());
//! let queue: heapless::Deque<InputEvent, 8> = heapless::Deque::new();
//!
//! let mut poller = ControlPoller::new(gpio, queue, &config).unwrap();
//! poller.poll();
//! assert!(poller.sink().is_empty());
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unreachable)]
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod debounce;
pub mod encoder;
pub mod poller;
pub mod queue;
pub mod trace;

pub use config::{ConfigError, ControlConfig, EncoderPins, PinAssignment, RepeatConfig};
pub use debounce::{ButtonDebouncer, Transitions, DEFAULT_DEBOUNCE_TICKS};
pub use encoder::{EncoderType, RotaryEncoder};
pub use poller::{ControlPoller, PollStats};
pub use queue::{ControlInput, EventChannel, EventSink, EVENT_QUEUE_DEPTH};
#[cfg(any(test, feature = "std"))]
pub use trace::TraceBuilder;
