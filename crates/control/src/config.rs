//! Construction-time configuration: pin assignment, encoder behaviour,
//! debounce and auto-repeat.
//!
//! Everything here is fixed once a [`crate::ControlPoller`] is built.
//!
//! # Default wiring ([`PinAssignment::simple_encoder`])
//!
//! | Input            | Pin | Pull    |
//! |------------------|-----|---------|
//! | Button 1         | 17  | up      |
//! | Button 2         | 27  | up      |
//! | Encoder 1 switch | 4   | up      |
//! | Encoder 1 CLK    | 22  | up      |
//! | Encoder 1 DAT    | 23  | up      |
//! | Encoder 2 switch | 26  | up      |
//! | Encoder 2 CLK    | 16  | up      |
//! | Encoder 2 DAT    | 12  | up      |

use platform::{
    Button, Encoder, InputConfig, OutOfRangeError, PinIndex, Pull, BUTTON_COUNT, ENCODER_COUNT,
};

use crate::debounce::DEFAULT_DEBOUNCE_TICKS;
use crate::encoder::EncoderType;

// ── Errors ───────────────────────────────────────────────────────────────────

/// Rejected configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Two logical inputs share one physical pin.
    #[error("pin {pin} is assigned to more than one input")]
    DuplicatePin {
        /// The contested pin.
        pin: u8,
    },
    /// A raw pin number does not fit in a bank read.
    #[error(transparent)]
    PinOutOfRange(#[from] OutOfRangeError),
    /// Debounce threshold of zero ticks.
    #[error("debounce threshold must be at least one tick")]
    ZeroDebounce,
    /// Auto-repeat delay of zero ticks.
    #[error("auto-repeat delay must be at least one tick")]
    ZeroRepeatDelay,
    /// Auto-repeat interval of zero ticks.
    #[error("auto-repeat interval must be at least one tick")]
    ZeroRepeatInterval,
}

// ── Pin assignment ───────────────────────────────────────────────────────────

/// Clock/data pins of one quadrature encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderPins {
    /// CLK (A) line.
    pub clk: InputConfig,
    /// DAT (B) line.
    pub dat: InputConfig,
}

impl EncoderPins {
    /// (CLK, DAT) electrical levels in `bank`.
    #[must_use]
    pub fn lines(&self, bank: u32) -> (bool, bool) {
        (
            self.clk.pin.level_in(bank).into(),
            self.dat.pin.level_in(bank).into(),
        )
    }
}

/// Logical input → physical pin mapping.
///
/// `buttons` is indexed by [`Button::index`], `encoders` by [`Encoder::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignment {
    /// Button pins in declared button order.
    pub buttons: [InputConfig; BUTTON_COUNT],
    /// Encoder line pins in declared encoder order.
    pub encoders: [EncoderPins; ENCODER_COUNT],
}

impl PinAssignment {
    /// Two buttons plus two push-switch encoders, all pulled up.
    #[must_use]
    pub const fn simple_encoder() -> Self {
        Self {
            buttons: [
                InputConfig::pull_up(PinIndex::new::<17>()),
                InputConfig::pull_up(PinIndex::new::<27>()),
                InputConfig::pull_up(PinIndex::new::<4>()),
                InputConfig::pull_up(PinIndex::new::<26>()),
            ],
            encoders: [
                EncoderPins {
                    clk: InputConfig::pull_up(PinIndex::new::<22>()),
                    dat: InputConfig::pull_up(PinIndex::new::<23>()),
                },
                EncoderPins {
                    clk: InputConfig::pull_up(PinIndex::new::<16>()),
                    dat: InputConfig::pull_up(PinIndex::new::<12>()),
                },
            ],
        }
    }

    /// Build an assignment from raw pin numbers, every pin using `pull`.
    ///
    /// `encoders` entries are `(clk, dat)`. The result is range-checked
    /// and checked for shared pins.
    pub fn from_numbers(
        buttons: [u8; BUTTON_COUNT],
        encoders: [(u8, u8); ENCODER_COUNT],
        pull: Pull,
    ) -> Result<Self, ConfigError> {
        let input = |n: u8| PinIndex::try_new(n).map(|pin| InputConfig::new(pin, pull));

        let mut assignment = Self::simple_encoder();
        for (slot, n) in assignment.buttons.iter_mut().zip(buttons) {
            *slot = input(n)?;
        }
        for (slot, (clk, dat)) in assignment.encoders.iter_mut().zip(encoders) {
            *slot = EncoderPins {
                clk: input(clk)?,
                dat: input(dat)?,
            };
        }
        assignment.validate()?;
        Ok(assignment)
    }

    /// Pin configuration of `button`.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // Safety: Button::index() < BUTTON_COUNT for every variant
    pub const fn button(&self, button: Button) -> InputConfig {
        self.buttons[button.index()]
    }

    /// Line pins of `encoder`.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // Safety: Encoder::index() < ENCODER_COUNT for every variant
    pub const fn encoder(&self, encoder: Encoder) -> EncoderPins {
        self.encoders[encoder.index()]
    }

    /// Every configured input, buttons first, then CLK/DAT per encoder.
    pub fn inputs(&self) -> impl Iterator<Item = InputConfig> + '_ {
        self.buttons
            .iter()
            .copied()
            .chain(self.encoders.iter().flat_map(|e| [e.clk, e.dat]))
    }

    /// Bank mask covering every configured pin.
    #[must_use]
    pub fn pin_mask(&self) -> u32 {
        self.inputs().fold(0, |acc, input| acc | input.pin.mask())
    }

    /// Check that no two logical inputs share a pin.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = 0u32;
        for input in self.inputs() {
            let mask = input.pin.mask();
            if seen & mask != 0 {
                return Err(ConfigError::DuplicatePin {
                    pin: input.pin.get(),
                });
            }
            seen |= mask;
        }
        Ok(())
    }

    /// Compose the logical button bitmask (bit = [`Button::bit`], 1 = pressed)
    /// from a raw bank read, honouring each pin's active level.
    #[must_use]
    pub fn button_state(&self, bank: u32) -> u32 {
        Button::ALL
            .iter()
            .zip(self.buttons.iter())
            .filter(|(_, input)| input.is_active(bank))
            .fold(0, |acc, (button, _)| acc | button.mask())
    }

    /// Bank level with every input released and every encoder at rest on
    /// its idle (pulled) level.
    #[must_use]
    pub fn idle_bank(&self) -> u32 {
        self.inputs()
            .filter(|input| input.pull == Pull::Up)
            .fold(0, |acc, input| acc | input.pin.mask())
    }
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self::simple_encoder()
    }
}

// ── Behaviour ────────────────────────────────────────────────────────────────

/// Auto-repeat timing for held buttons, in poll ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RepeatConfig {
    /// Ticks after the press before the first repeat, at least 1.
    pub delay_ticks: u16,
    /// Ticks between subsequent repeats, at least 1.
    pub interval_ticks: u16,
}

/// Full control-layer configuration.
///
/// ```
/// use control::{ControlConfig, EncoderType, PinAssignment};
///
/// let config = ControlConfig::new(PinAssignment::simple_encoder())
///     .encoder_type(EncoderType::Half)
///     .reversed(true)
///     .debounce_ticks(2)
///     .repeat(250, 50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlConfig {
    /// Pin assignment.
    pub pins: PinAssignment,
    /// Encoder variant, shared by both encoders.
    pub encoder_type: EncoderType,
    /// Flip encoder direction.
    pub reversed: bool,
    /// Consecutive stable ticks before a button transition is reported.
    pub debounce_ticks: u8,
    /// Auto-repeat for held buttons; `None` disables it.
    pub repeat: Option<RepeatConfig>,
}

impl ControlConfig {
    /// Defaults for `pins`: full-step encoders, not reversed,
    /// [`DEFAULT_DEBOUNCE_TICKS`], no auto-repeat.
    #[must_use]
    pub const fn new(pins: PinAssignment) -> Self {
        Self {
            pins,
            encoder_type: EncoderType::Full,
            reversed: false,
            debounce_ticks: DEFAULT_DEBOUNCE_TICKS,
            repeat: None,
        }
    }

    /// Set the encoder variant.
    #[must_use]
    pub const fn encoder_type(mut self, encoder_type: EncoderType) -> Self {
        self.encoder_type = encoder_type;
        self
    }

    /// Flip encoder direction.
    #[must_use]
    pub const fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    /// Set the debounce threshold in ticks.
    #[must_use]
    pub const fn debounce_ticks(mut self, ticks: u8) -> Self {
        self.debounce_ticks = ticks;
        self
    }

    /// Enable auto-repeat.
    #[must_use]
    pub const fn repeat(mut self, delay_ticks: u16, interval_ticks: u16) -> Self {
        self.repeat = Some(RepeatConfig {
            delay_ticks,
            interval_ticks,
        });
        self
    }

    /// Disable auto-repeat.
    #[must_use]
    pub const fn no_repeat(mut self) -> Self {
        self.repeat = None;
        self
    }

    /// Check the whole configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pins.validate()?;
        if self.debounce_ticks == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        if let Some(repeat) = self.repeat {
            if repeat.delay_ticks == 0 {
                return Err(ConfigError::ZeroRepeatDelay);
            }
            if repeat.interval_ticks == 0 {
                return Err(ConfigError::ZeroRepeatInterval);
            }
        }
        Ok(())
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self::new(PinAssignment::simple_encoder())
    }
}
