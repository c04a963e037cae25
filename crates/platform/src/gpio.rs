//! GPIO input abstraction layer
//!
//! Pins are addressed by their bit position in a single 32-bit bank read.
//! Pull configuration is fixed when an [`InputConfig`] is built and never
//! changes afterwards, so no locking is needed around it.

use embedded_hal::digital::InputPin;

/// Number of pins addressable by one [`GpioBank::read_all`] call.
pub const BANK_WIDTH: u8 = 32;

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a pin index does not fit in a bank read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("pin index {value} out of range (max {max})")]
pub struct OutOfRangeError {
    /// The rejected index.
    pub value: u8,
    /// The inclusive maximum allowed index.
    pub max: u8,
}

// ── PinIndex ─────────────────────────────────────────────────────────────────

/// Physical pin index, guaranteed to be `< BANK_WIDTH`.
///
/// Construct with [`PinIndex::try_new`]. Because the invariant holds for
/// every value of this type, [`PinIndex::mask`] can never shift out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct PinIndex(u8);

impl PinIndex {
    /// Create a `PinIndex`, returning an error if `index >= BANK_WIDTH`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if the index does not fit in a `u32` bank.
    pub const fn try_new(index: u8) -> Result<Self, OutOfRangeError> {
        if index >= BANK_WIDTH {
            Err(OutOfRangeError {
                value: index,
                max: BANK_WIDTH.saturating_sub(1),
            })
        } else {
            Ok(Self(index))
        }
    }

    /// Compile-time checked constructor for fixed board wiring.
    ///
    /// ```
    /// let pin = platform::PinIndex::new::<17>();
    /// assert_eq!(pin.get(), 17);
    /// ```
    #[must_use]
    pub const fn new<const N: u8>() -> Self {
        const { assert!(N < BANK_WIDTH, "pin index out of range") };
        Self(N)
    }

    /// Return the raw pin number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Single-bit mask selecting this pin in a bank read.
    #[must_use]
    pub fn mask(self) -> u32 {
        1u32.wrapping_shl(u32::from(self.0))
    }

    /// Electrical level of this pin within a bank read.
    #[must_use]
    pub fn level_in(self, bank: u32) -> PinState {
        PinState::from(bank & self.mask() != 0)
    }
}

impl TryFrom<u8> for PinIndex {
    type Error = OutOfRangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

// ── Pin configuration ────────────────────────────────────────────────────────

/// Internal bias resistor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Pull-up: idle high, switch closes to ground (active-low).
    Up,
    /// Pull-down: idle low, switch closes to supply (active-high).
    Down,
    /// No internal bias; an external network sets the idle level.
    None,
}

/// Pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

/// Input pin configuration: which pin, and how it is biased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputConfig {
    /// Physical pin index.
    pub pin: PinIndex,
    /// Bias configuration.
    pub pull: Pull,
}

impl InputConfig {
    /// Create an input configuration.
    #[must_use]
    pub const fn new(pin: PinIndex, pull: Pull) -> Self {
        Self { pin, pull }
    }

    /// Pull-up input (the usual wiring for push-buttons and encoders).
    #[must_use]
    pub const fn pull_up(pin: PinIndex) -> Self {
        Self::new(pin, Pull::Up)
    }

    /// Level read while the attached switch is closed.
    #[must_use]
    pub const fn active_level(self) -> PinState {
        match self.pull {
            Pull::Up => PinState::Low,
            Pull::Down | Pull::None => PinState::High,
        }
    }

    /// `true` if the switch on this pin is closed in `bank`.
    #[must_use]
    pub fn is_active(self, bank: u32) -> bool {
        self.pin.level_in(bank) == self.active_level()
    }
}

// ── Bank read ────────────────────────────────────────────────────────────────

/// Bulk GPIO read capability.
///
/// One call performs exactly one hardware read and returns the level of
/// every pin packed into a `u32`, bit position = pin index. Pins that are
/// not configured as inputs read as whatever the hardware reports.
pub trait GpioBank {
    /// Error type
    type Error;

    /// Read all pins at once
    fn read_all(&mut self) -> Result<u32, Self::Error>;

    /// Read a single pin.
    ///
    /// Defaults to a full bank read; adapters that can address one pin
    /// directly override it.
    fn read_pin(&mut self, pin: PinIndex) -> Result<PinState, Self::Error> {
        self.read_all().map(|bank| pin.level_in(bank))
    }
}

impl<T: GpioBank + ?Sized> GpioBank for &mut T {
    type Error = T::Error;

    fn read_all(&mut self) -> Result<u32, Self::Error> {
        (**self).read_all()
    }

    fn read_pin(&mut self, pin: PinIndex) -> Result<PinState, Self::Error> {
        (**self).read_pin(pin)
    }
}

/// One pin inside a [`PinBank`].
struct BankPin<P> {
    index: PinIndex,
    pin: P,
}

/// Adapts `N` individual `embedded-hal` input pins into a [`GpioBank`].
///
/// For HALs without a port-wide read. Each `read_all` reads the pins in
/// the order given to [`PinBank::new`]; the first failing pin aborts the
/// whole read so that callers never see a half-updated bank.
pub struct PinBank<P, const N: usize> {
    pins: [BankPin<P>; N],
}

impl<P: InputPin, const N: usize> PinBank<P, N> {
    /// Build a bank from `(index, pin)` pairs.
    pub fn new(pins: [(PinIndex, P); N]) -> Self {
        Self {
            pins: pins.map(|(index, pin)| BankPin { index, pin }),
        }
    }

    /// Give the pins back.
    pub fn release(self) -> [(PinIndex, P); N] {
        self.pins.map(|p| (p.index, p.pin))
    }
}

impl<P: InputPin, const N: usize> GpioBank for PinBank<P, N> {
    type Error = P::Error;

    fn read_all(&mut self) -> Result<u32, Self::Error> {
        let mut bank = 0u32;
        for entry in &mut self.pins {
            if entry.pin.is_high()? {
                bank |= entry.index.mask();
            }
        }
        Ok(bank)
    }

    /// Reads only `pin`. Pins not in the bank read low, as in [`read_all`](Self::read_all).
    fn read_pin(&mut self, pin: PinIndex) -> Result<PinState, Self::Error> {
        match self.pins.iter_mut().find(|entry| entry.index == pin) {
            Some(entry) => Ok(PinState::from(entry.pin.is_high()?)),
            None => Ok(PinState::Low),
        }
    }
}
