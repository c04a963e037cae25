//! Synthetic GPIO traces for host testing and the simulator.
//!
//! A [`TraceBuilder`] turns gestures (press, release, turn) into the bank
//! levels the poller would read, one `u32` per tick, honouring the pin
//! assignment and pull polarity of a [`ControlConfig`].

#![cfg(any(test, feature = "std"))]

use platform::{Button, Encoder, InputConfig, PinState};

use crate::config::{ControlConfig, PinAssignment};

/// Builds a per-tick bank trace from gestures.
#[derive(Debug, Clone)]
pub struct TraceBuilder {
    pins: PinAssignment,
    steps_per_detent: u8,
    settle_ticks: usize,
    phase_ticks: usize,
    level: u32,
    trace: Vec<u32>,
}

impl TraceBuilder {
    /// Start from the idle level of `config`'s pins: nothing pressed,
    /// encoders resting on a detent.
    ///
    /// Presses and releases are held for `config.debounce_ticks` samples,
    /// just long enough to be reported.
    #[must_use]
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            pins: config.pins,
            steps_per_detent: config.encoder_type.steps_per_detent().unsigned_abs(),
            settle_ticks: usize::from(config.debounce_ticks.max(1)),
            phase_ticks: 1,
            level: config.pins.idle_bank(),
            trace: Vec::new(),
        }
    }

    /// Samples each quadrature phase is held for during [`turn`](Self::turn).
    #[must_use]
    pub fn phase_ticks(mut self, ticks: usize) -> Self {
        self.phase_ticks = ticks.max(1);
        self
    }

    /// Hold the current level for `ticks` samples.
    #[must_use]
    pub fn idle(mut self, ticks: usize) -> Self {
        self.trace.extend(core::iter::repeat(self.level).take(ticks));
        self
    }

    /// Close `button`'s switch and hold until it debounces.
    #[must_use]
    pub fn press(mut self, button: Button) -> Self {
        let input = self.pins.button(button);
        self.drive(input, input.active_level());
        let settle = self.settle_ticks;
        self.idle(settle)
    }

    /// Open `button`'s switch and hold until it debounces.
    #[must_use]
    pub fn release(mut self, button: Button) -> Self {
        let input = self.pins.button(button);
        self.drive(input, inactive(input));
        let settle = self.settle_ticks;
        self.idle(settle)
    }

    /// Contact bounce on `button`: its level flips every sample for `ticks`
    /// samples, then returns to where it was.
    #[must_use]
    pub fn bounce(mut self, button: Button, ticks: usize) -> Self {
        let pin = self.pins.button(button).pin.mask();
        let rest = self.level;
        for _ in 0..ticks {
            self.level ^= pin;
            self.trace.push(self.level);
        }
        self.level = rest;
        self
    }

    /// Rotate `encoder` by `detents` clicks, positive clockwise.
    ///
    /// Each click walks the Gray cycle one phase at a time.
    #[must_use]
    pub fn turn(mut self, encoder: Encoder, detents: i32) -> Self {
        let lines = self.pins.encoder(encoder);
        let forward = detents > 0;
        let phases = detents
            .unsigned_abs()
            .saturating_mul(u32::from(self.steps_per_detent));

        for _ in 0..phases {
            let clk = bool::from(lines.clk.pin.level_in(self.level));
            let dat = bool::from(lines.dat.pin.level_in(self.level));
            let (clk, dat) = neighbour(clk, dat, forward);
            self.drive(lines.clk, PinState::from(clk));
            self.drive(lines.dat, PinState::from(dat));
            let hold = self.phase_ticks;
            self = self.idle(hold);
        }
        self
    }

    /// Force the whole bank to `bank` for one sample.
    ///
    /// Later gestures continue from this level.
    #[must_use]
    pub fn raw(mut self, bank: u32) -> Self {
        self.level = bank;
        self.trace.push(bank);
        self
    }

    /// Current bank level.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Samples generated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trace.len()
    }

    /// `true` if no sample has been generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    /// Finish, returning one bank level per tick.
    #[must_use]
    pub fn build(self) -> Vec<u32> {
        self.trace
    }

    fn drive(&mut self, input: InputConfig, level: PinState) {
        let mask = input.pin.mask();
        if bool::from(level) {
            self.level |= mask;
        } else {
            self.level &= !mask;
        }
    }
}

fn inactive(input: InputConfig) -> PinState {
    match input.active_level() {
        PinState::High => PinState::Low,
        PinState::Low => PinState::High,
    }
}

/// Next (CLK, DAT) pair along the Gray cycle 00 → 01 → 11 → 10.
fn neighbour(clk: bool, dat: bool, forward: bool) -> (bool, bool) {
    let (cw, ccw) = match (clk, dat) {
        (false, false) => ((false, true), (true, false)),
        (false, true) => ((true, true), (false, false)),
        (true, true) => ((true, false), (false, true)),
        (true, false) => ((false, false), (true, true)),
    };
    if forward {
        cw
    } else {
        ccw
    }
}
