//! Periodic control poller.
//!
//! One [`ControlPoller::poll`] is one tick: a single bank read, fanned out
//! to the button debouncer and both encoder decoders, with every resulting
//! event pushed into the sink.
//!
//! Within a tick events are emitted in a fixed order: buttons in declared
//! order (transition first, then auto-repeat), then encoders in declared
//! order.

use embassy_time::{Duration, Ticker};
use platform::{Button, Encoder, GpioBank, InputEvent, BUTTON_COUNT, ENCODER_COUNT};

use crate::config::{ConfigError, ControlConfig, PinAssignment, RepeatConfig};
use crate::debounce::ButtonDebouncer;
use crate::encoder::RotaryEncoder;
use crate::queue::EventSink;

/// Running counters. All of them wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollStats {
    /// Calls to [`ControlPoller::poll`].
    pub ticks: u32,
    /// Ticks skipped because the bank read failed.
    pub read_errors: u32,
    /// Events discarded because the sink was full.
    pub dropped_events: u32,
}

/// Samples the panel once per tick and turns it into [`InputEvent`]s.
pub struct ControlPoller<G, S> {
    gpio: G,
    sink: S,
    pins: PinAssignment,
    debouncer: ButtonDebouncer,
    encoders: [RotaryEncoder; ENCODER_COUNT],
    repeat: Option<RepeatConfig>,
    held: [HoldTimer; BUTTON_COUNT],
    stats: PollStats,
}

impl<G: GpioBank, S: EventSink> ControlPoller<G, S> {
    /// Validate `config` and build a poller with every button released.
    pub fn new(gpio: G, sink: S, config: &ControlConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            gpio,
            sink,
            pins: config.pins,
            debouncer: ButtonDebouncer::new(config.debounce_ticks),
            encoders: core::array::from_fn(|_| {
                RotaryEncoder::new(config.encoder_type, config.reversed)
            }),
            repeat: config.repeat,
            held: [HoldTimer::default(); BUTTON_COUNT],
            stats: PollStats::default(),
        })
    }

    /// Run one tick.
    pub fn poll(&mut self) {
        self.stats.ticks = self.stats.ticks.wrapping_add(1);

        let Ok(bank) = self.gpio.read_all() else {
            self.stats.read_errors = self.stats.read_errors.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("control: GPIO read failed, tick skipped");
            return;
        };

        let raw_buttons = self.pins.button_state(bank);
        let transitions = self.debouncer.update(raw_buttons, Button::all_mask());
        let pressed = self.debouncer.state();

        for (&button, held) in Button::ALL.iter().zip(self.held.iter_mut()) {
            if let Some(edge) = transitions.edge(button.mask()) {
                *held = HoldTimer::default();
                emit(
                    &mut self.sink,
                    &mut self.stats,
                    InputEvent::ButtonTransition { button, edge },
                );
            } else if pressed & button.mask() == 0 {
                *held = HoldTimer::default();
            } else if self.repeat.is_some_and(|r| repeat_due(held, r)) {
                emit(
                    &mut self.sink,
                    &mut self.stats,
                    InputEvent::ButtonRepeat { button },
                );
            }
        }

        let decoders = self.encoders.iter_mut().zip(self.pins.encoders.iter());
        for (&encoder, (decoder, lines)) in Encoder::ALL.iter().zip(decoders) {
            let (clk, dat) = lines.lines(bank);
            let delta = decoder.update(clk, dat);
            if delta != 0 {
                emit(
                    &mut self.sink,
                    &mut self.stats,
                    InputEvent::EncoderStep { encoder, delta },
                );
            }
        }
    }

    /// Poll forever, once per `period`.
    ///
    /// Missed ticks are caught up back to back, so the debounce and repeat
    /// timing stay tied to tick counts.
    pub async fn run(&mut self, period: Duration) -> ! {
        let mut ticker = Ticker::every(period);
        loop {
            ticker.next().await;
            self.poll();
        }
    }

    /// Counters since construction.
    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Debounced button bitmask, bit = [`Button::bit`], 1 = pressed.
    pub fn debounced_buttons(&self) -> u32 {
        self.debouncer.state()
    }

    /// Access the GPIO bank (e.g. to queue more mock reads).
    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    /// Access the event sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the event sink (e.g. to drain a local queue).
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Tear down, returning the bank and the sink.
    pub fn into_parts(self) -> (G, S) {
        (self.gpio, self.sink)
    }
}

/// Hold time of one pressed button.
///
/// `ticks` restarts at every repeat, so it never exceeds the current target.
#[derive(Debug, Clone, Copy, Default)]
struct HoldTimer {
    /// Ticks since the press, or since the last repeat once `repeating`.
    ticks: u16,
    repeating: bool,
}

/// Advance the hold timer of a pressed button; `true` when a repeat fires.
fn repeat_due(hold: &mut HoldTimer, repeat: RepeatConfig) -> bool {
    hold.ticks = hold.ticks.saturating_add(1);
    let target = if hold.repeating {
        repeat.interval_ticks
    } else {
        repeat.delay_ticks
    };
    if hold.ticks < target {
        return false;
    }
    *hold = HoldTimer {
        ticks: 0,
        repeating: true,
    };
    true
}

fn emit<S: EventSink>(sink: &mut S, stats: &mut PollStats, event: InputEvent) {
    if !sink.enqueue(event) {
        stats.dropped_events = stats.dropped_events.wrapping_add(1);
        #[cfg(feature = "defmt")]
        defmt::warn!("control: event queue full, dropped {}", event);
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::encoder::EncoderType;
    use platform::mocks::MockGpio;
    use platform::{Edge, Pull};

    type Queue = heapless::Deque<InputEvent, 32>;

    /// Pull-down wiring so bank bits equal logical bits:
    /// buttons on 0..=3, encoder 1 on 4/5, encoder 2 on 6/7.
    fn config() -> ControlConfig {
        let pins = PinAssignment::from_numbers([0, 1, 2, 3], [(4, 5), (6, 7)], Pull::Down).unwrap();
        ControlConfig::new(pins)
    }

    fn poller(config: &ControlConfig, banks: &[u32]) -> ControlPoller<MockGpio, Queue> {
        let mut gpio = MockGpio::new(0);
        assert_eq!(gpio.extend(banks), banks.len());
        ControlPoller::new(gpio, Queue::new(), config).unwrap()
    }

    fn tick(p: &mut ControlPoller<MockGpio, Queue>) -> Vec<InputEvent> {
        p.poll();
        core::iter::from_fn(|| p.sink_mut().pop_front()).collect()
    }

    fn press(button: Button) -> InputEvent {
        InputEvent::ButtonTransition {
            button,
            edge: Edge::Pressed,
        }
    }

    #[test]
    fn press_reported_once_on_second_stable_tick() {
        let cfg = config().debounce_ticks(2);
        let mut p = poller(&cfg, &[0b0000, 0b0001, 0b0001, 0b0001, 0b0001]);
        assert!(tick(&mut p).is_empty());
        assert!(tick(&mut p).is_empty());
        assert_eq!(tick(&mut p), vec![press(Button::Button1)]);
        assert!(tick(&mut p).is_empty());
        assert!(tick(&mut p).is_empty());
        assert_eq!(p.debounced_buttons(), 0b0001);
        assert_eq!(p.stats().ticks, 5);
    }

    #[test]
    fn read_error_skips_tick_without_touching_state() {
        let cfg = config().debounce_ticks(2);
        let mut gpio = MockGpio::new(0);
        gpio.push(0b0010).unwrap();
        gpio.push_error().unwrap();
        gpio.push(0b0010).unwrap();
        let mut p = ControlPoller::new(gpio, Queue::new(), &cfg).unwrap();

        assert!(tick(&mut p).is_empty());
        assert!(tick(&mut p).is_empty());
        assert_eq!(tick(&mut p), vec![press(Button::Button2)]);
        assert_eq!(
            p.stats(),
            PollStats {
                ticks: 3,
                read_errors: 1,
                dropped_events: 0
            }
        );
    }

    #[test]
    fn full_sink_counts_drops_and_keeps_polling() {
        let cfg = config().debounce_ticks(1);
        let mut gpio = MockGpio::new(0);
        gpio.push(0b0011).unwrap();
        let mut p = ControlPoller::new(gpio, heapless::Deque::<InputEvent, 1>::new(), &cfg).unwrap();

        p.poll();
        assert_eq!(p.stats().dropped_events, 1);
        assert_eq!(p.sink_mut().pop_front(), Some(press(Button::Button1)));
        assert_eq!(p.debounced_buttons(), 0b0011);
    }

    #[test]
    fn buttons_then_encoders_in_declared_order() {
        let cfg = config().debounce_ticks(1).encoder_type(EncoderType::Quarter);
        // EncoderButton2 and Button1 pressed, encoder 1 DAT rises (phase 0 -> 1).
        let mut p = poller(&cfg, &[0, 0b0010_1001]);
        assert!(tick(&mut p).is_empty());
        assert_eq!(
            tick(&mut p),
            vec![
                press(Button::Button1),
                press(Button::EncoderButton2),
                InputEvent::EncoderStep {
                    encoder: Encoder::Encoder1,
                    delta: 1
                },
            ]
        );
    }

    #[test]
    fn full_cycle_on_each_encoder() {
        let cfg = config();
        // Encoder 1: 00 01 11 10 00 forward. Encoder 2 (bits 6/7): reverse.
        let e1 = [0b00_00_0000, 0b00_10_0000, 0b00_11_0000, 0b00_01_0000, 0];
        let e2 = [0b00_00_0000, 0b01_00_0000, 0b11_00_0000, 0b10_00_0000, 0];
        let banks: Vec<u32> = e1.iter().zip(e2).map(|(a, b)| a | b).collect();
        let mut p = poller(&cfg, &banks);

        let events: Vec<InputEvent> = banks.iter().flat_map(|_| tick(&mut p)).collect();
        assert_eq!(
            events,
            vec![
                InputEvent::EncoderStep {
                    encoder: Encoder::Encoder1,
                    delta: 1
                },
                InputEvent::EncoderStep {
                    encoder: Encoder::Encoder2,
                    delta: -1
                },
            ]
        );
    }

    #[test]
    fn auto_repeat_fires_at_delay_then_every_interval() {
        let cfg = config().debounce_ticks(1).repeat(3, 2);
        let mut banks = vec![0b0100; 8];
        banks.push(0);
        let mut p = poller(&cfg, &banks);

        let per_tick: Vec<Vec<InputEvent>> = banks.iter().map(|_| tick(&mut p)).collect();
        let repeat = InputEvent::ButtonRepeat {
            button: Button::EncoderButton1,
        };
        assert_eq!(per_tick[0], vec![press(Button::EncoderButton1)]);
        let repeat_ticks: Vec<usize> = per_tick
            .iter()
            .enumerate()
            .filter(|(_, events)| events.contains(&repeat))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(repeat_ticks, vec![3, 5, 7]);
        assert_eq!(
            per_tick[8],
            vec![InputEvent::ButtonTransition {
                button: Button::EncoderButton1,
                edge: Edge::Released
            }]
        );
    }

    #[test]
    fn no_repeat_by_default() {
        let cfg = config().debounce_ticks(1);
        let mut p = poller(&cfg, &[0b1000; 20]);
        let events: Vec<InputEvent> = (0..20).flat_map(|_| tick(&mut p)).collect();
        assert_eq!(events, vec![press(Button::EncoderButton2)]);
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = config().debounce_ticks(0);
        let result = ControlPoller::new(MockGpio::default(), Queue::new(), &cfg);
        assert!(matches!(result, Err(ConfigError::ZeroDebounce)));
    }

    fn fired_at(repeat: RepeatConfig, ticks: u32) -> Vec<u32> {
        let mut hold = HoldTimer::default();
        (1..=ticks).filter(|_| repeat_due(&mut hold, repeat)).collect()
    }

    #[test]
    fn repeat_timer_fires_at_delay_then_interval() {
        let r = RepeatConfig {
            delay_ticks: 3,
            interval_ticks: 2,
        };
        assert_eq!(fired_at(r, 10), vec![3, 5, 7, 9]);
    }

    #[test]
    fn repeat_cadence_holds_at_longest_delay() {
        let r = RepeatConfig {
            delay_ticks: u16::MAX,
            interval_ticks: 10,
        };
        let fired = fired_at(r, 70_000);
        assert_eq!(fired.first(), Some(&65_535));
        assert_eq!(fired.len(), 1 + (70_000 - 65_535) / 10);
        assert!(fired.windows(2).all(|w| w[1] - w[0] == 10));
    }

    #[test]
    fn repeat_keeps_firing_just_below_longest_delay() {
        let r = RepeatConfig {
            delay_ticks: u16::MAX - 1,
            interval_ticks: 5,
        };
        let fired = fired_at(r, 70_000);
        assert_eq!(fired.first(), Some(&65_534));
        assert_eq!(fired.len(), 1 + (70_000 - 65_534) / 5);
    }

    #[test]
    fn longest_interval_never_stalls() {
        let r = RepeatConfig {
            delay_ticks: 1,
            interval_ticks: u16::MAX,
        };
        assert_eq!(fired_at(r, 140_000), vec![1, 65_536, 131_071]);
    }

    #[test]
    fn zero_repeat_delay_rejected_at_construction() {
        let cfg = config().repeat(0, 2);
        let result = ControlPoller::new(MockGpio::default(), Queue::new(), &cfg);
        assert!(matches!(result, Err(ConfigError::ZeroRepeatDelay)));
    }

    #[test]
    fn into_parts_hands_back_bank_and_sink() {
        let cfg = config().debounce_ticks(1);
        let mut p = poller(&cfg, &[0b0001]);
        p.poll();
        let (mut gpio, mut sink) = p.into_parts();
        assert_eq!(gpio.reads(), 1);
        assert_eq!(sink.pop_front(), Some(press(Button::Button1)));
        assert_eq!(gpio.read_all().unwrap(), 0b0001);
    }
}
