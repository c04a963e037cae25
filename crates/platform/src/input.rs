//! Input device abstraction

/// Number of logical push-buttons on the panel.
pub const BUTTON_COUNT: usize = 4;

/// Number of rotary encoders on the panel.
pub const ENCODER_COUNT: usize = 2;

/// Input device trait for buttons and encoders
pub trait InputDevice {
    /// Wait for next input event (async, power-efficient)
    fn wait_for_event(&mut self) -> impl core::future::Future<Output = InputEvent>;

    /// Poll for event (non-blocking)
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// Input events from buttons and encoders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Debounced press or release
    ButtonTransition {
        /// Which button
        button: Button,
        /// Direction of the transition
        edge: Edge,
    },
    /// Button still held after the auto-repeat delay
    ButtonRepeat {
        /// Which button
        button: Button,
    },
    /// Rotary encoder detents (positive = clockwise)
    EncoderStep {
        /// Which encoder
        encoder: Encoder,
        /// Signed detent count, never zero
        delta: i8,
    },
}

/// Stable button transition direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Released → pressed
    Pressed,
    /// Pressed → released
    Released,
}

impl Edge {
    /// `true` for [`Edge::Pressed`].
    #[must_use]
    pub const fn is_pressed(self) -> bool {
        matches!(self, Self::Pressed)
    }
}

/// Physical buttons, in declared (processing) order.
///
/// The discriminant is the button's bit in the button bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Button {
    /// Front-panel button 1
    Button1 = 0,
    /// Front-panel button 2
    Button2 = 1,
    /// Push switch of encoder 1
    EncoderButton1 = 2,
    /// Push switch of encoder 2
    EncoderButton2 = 3,
}

impl Button {
    /// All buttons in declared order.
    pub const ALL: [Self; BUTTON_COUNT] = [
        Self::Button1,
        Self::Button2,
        Self::EncoderButton1,
        Self::EncoderButton2,
    ];

    /// Bit position in the button bitmask.
    #[must_use]
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Position in [`Button::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-bit mask in the button bitmask.
    #[must_use]
    pub fn mask(self) -> u32 {
        1u32.wrapping_shl(u32::from(self.bit()))
    }

    /// Mask covering every button.
    #[must_use]
    pub fn all_mask() -> u32 {
        Self::ALL.iter().fold(0, |acc, b| acc | b.mask())
    }
}

/// Rotary encoders, in declared (processing) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Encoder {
    /// Encoder 1
    Encoder1 = 0,
    /// Encoder 2
    Encoder2 = 1,
}

impl Encoder {
    /// All encoders in declared order.
    pub const ALL: [Self; ENCODER_COUNT] = [Self::Encoder1, Self::Encoder2];

    /// Position in [`Encoder::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The push switch built into this encoder.
    #[must_use]
    pub const fn button(self) -> Button {
        match self {
            Self::Encoder1 => Button::EncoderButton1,
            Self::Encoder2 => Button::EncoderButton2,
        }
    }
}
