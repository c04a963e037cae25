//! End-to-end poller scenarios on the default pull-up wiring.
//!
//! Events travel through a real embassy channel and are read back through
//! `ControlInput`, the same path the firmware UI task uses.

// Test files legitimately use unwrap() for readable assertions.
#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use control::{
    ControlConfig, ControlInput, ControlPoller, EventChannel, PinAssignment, PollStats,
};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::{Duration, Timer};
use platform::mocks::MockGpio;
use platform::{Button, Edge, Encoder, InputDevice, InputEvent};

/// Bank level with `buttons` held down on the default wiring.
fn held(pins: &PinAssignment, buttons: &[Button]) -> u32 {
    buttons
        .iter()
        .fold(pins.idle_bank(), |bank, &b| bank & !pins.button(b).pin.mask())
}

/// Bank level with encoder 1 at `(clk, dat)` and everything else idle.
fn encoder1_at(pins: &PinAssignment, clk: bool, dat: bool) -> u32 {
    let lines = pins.encoder(Encoder::Encoder1);
    let mut bank = pins.idle_bank() & !(lines.clk.pin.mask() | lines.dat.pin.mask());
    if clk {
        bank |= lines.clk.pin.mask();
    }
    if dat {
        bank |= lines.dat.pin.mask();
    }
    bank
}

fn drain<I: InputDevice>(input: &mut I) -> Vec<InputEvent> {
    core::iter::from_fn(|| input.poll_event()).collect()
}

#[test]
fn button_press_and_release_through_channel() {
    let config = ControlConfig::default().debounce_ticks(2);
    let pins = config.pins;
    let channel: EventChannel<NoopRawMutex> = EventChannel::new();
    let mut input = ControlInput::new(&channel);

    let mut gpio = MockGpio::new(pins.idle_bank());
    let down = held(&pins, &[Button::Button1]);
    gpio.extend(&[pins.idle_bank(), down, down, down, pins.idle_bank(), pins.idle_bank()]);
    let mut poller = ControlPoller::new(gpio, channel.sender(), &config).unwrap();

    for _ in 0..3 {
        poller.poll();
    }
    assert_eq!(
        drain(&mut input),
        vec![InputEvent::ButtonTransition {
            button: Button::Button1,
            edge: Edge::Pressed
        }]
    );

    poller.poll();
    assert!(drain(&mut input).is_empty());
    assert_eq!(poller.debounced_buttons(), Button::Button1.mask());

    poller.poll();
    poller.poll();
    assert_eq!(
        drain(&mut input),
        vec![InputEvent::ButtonTransition {
            button: Button::Button1,
            edge: Edge::Released
        }]
    );
    assert_eq!(poller.debounced_buttons(), 0);
}

#[test]
fn pull_up_encoder_turn_yields_single_steps() {
    let config = ControlConfig::default();
    let pins = config.pins;
    let channel: EventChannel<NoopRawMutex> = EventChannel::new();
    let mut input = ControlInput::new(&channel);

    // Pull-up lines rest at (1, 1). Two clockwise detents, then one back.
    let cw = [(true, true), (true, false), (false, false), (false, true)];
    let mut banks = Vec::new();
    banks.push(encoder1_at(&pins, true, true));
    for _ in 0..2 {
        for &(clk, dat) in cw.iter().cycle().skip(1).take(4) {
            banks.push(encoder1_at(&pins, clk, dat));
        }
    }
    for &(clk, dat) in cw.iter().rev() {
        banks.push(encoder1_at(&pins, clk, dat));
    }

    let mut gpio = MockGpio::new(pins.idle_bank());
    assert_eq!(gpio.extend(&banks), banks.len());
    let mut poller = ControlPoller::new(gpio, channel.sender(), &config).unwrap();
    for _ in 0..banks.len() {
        poller.poll();
    }

    let step = |delta| InputEvent::EncoderStep {
        encoder: Encoder::Encoder1,
        delta,
    };
    assert_eq!(drain(&mut input), vec![step(1), step(1), step(-1)]);
}

#[test]
fn read_errors_are_counted_and_skipped() {
    let config = ControlConfig::default().debounce_ticks(1);
    let pins = config.pins;
    let channel: EventChannel<NoopRawMutex> = EventChannel::new();
    let mut input = ControlInput::new(&channel);

    let mut gpio = MockGpio::new(pins.idle_bank());
    gpio.push_error().unwrap();
    gpio.push_error().unwrap();
    gpio.push(held(&pins, &[Button::Button2])).unwrap();
    let mut poller = ControlPoller::new(gpio, channel.sender(), &config).unwrap();

    poller.poll();
    poller.poll();
    assert!(drain(&mut input).is_empty());
    assert_eq!(poller.debounced_buttons(), 0);

    poller.poll();
    assert_eq!(drain(&mut input).len(), 1);
    assert_eq!(
        poller.stats(),
        PollStats {
            ticks: 3,
            read_errors: 2,
            dropped_events: 0
        }
    );
}

#[test]
fn full_channel_drops_without_blocking() {
    let config = ControlConfig::default().debounce_ticks(1);
    let pins = config.pins;
    let channel: EventChannel<NoopRawMutex, 2> = EventChannel::new();
    let mut input = ControlInput::new(&channel);

    let mut gpio = MockGpio::new(pins.idle_bank());
    gpio.push(held(&pins, &[Button::Button1, Button::Button2, Button::EncoderButton2]))
        .unwrap();
    let mut poller = ControlPoller::new(gpio, channel.sender(), &config).unwrap();

    poller.poll();
    assert_eq!(poller.stats().dropped_events, 1);

    let events = drain(&mut input);
    let buttons: Vec<Button> = events
        .iter()
        .filter_map(|e| match e {
            InputEvent::ButtonTransition { button, .. } => Some(*button),
            _ => None,
        })
        .collect();
    assert_eq!(buttons, vec![Button::Button1, Button::Button2]);
}

#[test]
fn auto_repeat_stops_on_release() {
    let config = ControlConfig::default().debounce_ticks(1).repeat(4, 2);
    let pins = config.pins;
    let channel: EventChannel<NoopRawMutex, 32> = EventChannel::new();
    let mut input = ControlInput::new(&channel);

    let down = held(&pins, &[Button::Button2]);
    let mut gpio = MockGpio::new(pins.idle_bank());
    gpio.extend(&[down; 9]);
    gpio.push(pins.idle_bank()).unwrap();
    let mut poller = ControlPoller::new(gpio, channel.sender(), &config).unwrap();
    for _ in 0..20 {
        poller.poll();
    }

    let repeats = drain(&mut input)
        .into_iter()
        .filter(|e| matches!(e, InputEvent::ButtonRepeat { button: Button::Button2 }))
        .count();
    // Press on tick 0; repeats on ticks 4, 6 and 8; released on tick 9.
    assert_eq!(repeats, 3);
}

#[test]
fn run_polls_on_a_ticker() {
    let config = ControlConfig::default();
    let channel: EventChannel<NoopRawMutex> = EventChannel::new();
    let gpio = MockGpio::new(config.pins.idle_bank());
    let mut poller = ControlPoller::new(gpio, channel.sender(), &config).unwrap();

    let outcome = embassy_futures::block_on(select(
        poller.run(Duration::from_millis(1)),
        Timer::after_millis(30),
    ));
    assert!(matches!(outcome, Either::Second(())));

    let stats = poller.stats();
    assert!(stats.ticks > 0);
    assert_eq!(stats.read_errors, 0);
    assert_eq!(poller.gpio_mut().reads(), stats.ticks as usize);
}
