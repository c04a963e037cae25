//! Hardware Abstraction Layer (HAL) for the front-panel controls
//!
//! This crate provides trait-based abstractions for the panel's input
//! hardware, enabling development and testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! UI / application (drains InputEvents)
//!         ↑
//! control crate (debounce, quadrature decode, poller)
//!         ↑
//! Platform HAL (this crate - trait abstractions)
//!         ↑
//! Hardware Layer (chip HAL / embedded-hal pins)
//! ```
//!
//! # Abstractions
//!
//! - [`GpioBank`] - one-shot bulk read of every input pin
//! - [`PinBank`] - [`GpioBank`] over individual `embedded-hal` pins
//! - [`InputDevice`] - consumer side of the button/encoder event stream
//!
//! # Features
//!
//! - `std`: Enable the scripted mocks outside of tests (desktop simulator)
//! - `defmt`: Enable defmt logging derives
//!
//! # Example
//!
//! ```
//! use platform::{GpioBank, InputConfig, PinIndex};
//!
//! fn button1_down<G: GpioBank>(gpio: &mut G, cfg: InputConfig) -> bool {
//!     // A failed read is treated as "not pressed".
//!     gpio.read_all().map(|bank| cfg.is_active(bank)).unwrap_or(false)
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::must_use_candidate)] // hardware accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod gpio;
pub mod input;
pub mod mocks;

// Re-export input types
pub use input::{Button, Edge, Encoder, InputDevice, InputEvent, BUTTON_COUNT, ENCODER_COUNT};

// Re-export GPIO types
pub use gpio::{
    GpioBank, InputConfig, OutOfRangeError, PinBank, PinIndex, PinState, Pull, BANK_WIDTH,
};
