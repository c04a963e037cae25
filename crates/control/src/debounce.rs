//! Per-bit counter debouncer for the button bitmask.
//!
//! Each bit has a counter of consecutive samples that disagree with its
//! debounced state. A sample that agrees resets the counter, so a contact
//! that bounces faster than the threshold never gets through. When the
//! counter reaches the threshold the debounced bit flips and the change is
//! reported once.

use platform::Edge;

/// Default number of consecutive stable samples before a transition is reported.
pub const DEFAULT_DEBOUNCE_TICKS: u8 = 3;

/// Bits in a button bitmask.
const WIDTH: usize = 32;

/// Stable transitions reported by one [`ButtonDebouncer::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transitions {
    /// Bits that went 0 → 1.
    pub pressed: u32,
    /// Bits that went 1 → 0.
    pub released: u32,
}

impl Transitions {
    /// `true` if nothing changed.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.pressed == 0 && self.released == 0
    }

    /// The transition, if any, on the bit(s) selected by `mask`.
    #[must_use]
    pub const fn edge(self, mask: u32) -> Option<Edge> {
        if self.pressed & mask != 0 {
            Some(Edge::Pressed)
        } else if self.released & mask != 0 {
            Some(Edge::Released)
        } else {
            None
        }
    }
}

/// Debouncer state for up to 32 buttons.
#[derive(Debug, Clone)]
pub struct ButtonDebouncer {
    threshold: u8,
    stable: u32,
    counters: [u8; WIDTH],
}

impl ButtonDebouncer {
    /// Create a debouncer with every button released.
    ///
    /// A `threshold` of 0 is treated as 1 (no filtering).
    #[must_use]
    pub const fn new(threshold: u8) -> Self {
        Self {
            threshold: if threshold == 0 { 1 } else { threshold },
            stable: 0,
            counters: [0; WIDTH],
        }
    }

    /// Consecutive samples required for a transition.
    #[must_use]
    pub const fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Current debounced bitmask (1 = pressed).
    #[must_use]
    pub const fn state(&self) -> u32 {
        self.stable
    }

    /// Feed one raw sample. Only bits in `relevant_mask` are considered.
    pub fn update(&mut self, raw: u32, relevant_mask: u32) -> Transitions {
        let mut out = Transitions::default();

        for (bit, counter) in (0u32..).zip(self.counters.iter_mut()) {
            let mask = 1u32.wrapping_shl(bit);
            if relevant_mask & mask == 0 {
                continue;
            }

            let raw_high = raw & mask != 0;
            if raw_high == (self.stable & mask != 0) {
                *counter = 0;
                continue;
            }

            *counter = counter.saturating_add(1);
            if *counter >= self.threshold {
                *counter = 0;
                self.stable ^= mask;
                if raw_high {
                    out.pressed |= mask;
                } else {
                    out.released |= mask;
                }
            }
        }

        out
    }
}

impl Default for ButtonDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_TICKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: u32 = u32::MAX;

    #[test]
    fn press_reported_on_nth_stable_sample() {
        let mut db = ButtonDebouncer::new(2);
        assert!(db.update(0b0000, ALL).is_empty());
        assert!(db.update(0b0001, ALL).is_empty());
        let t = db.update(0b0001, ALL);
        assert_eq!(t.pressed, 0b0001);
        assert_eq!(t.edge(0b0001), Some(Edge::Pressed));
        assert_eq!(db.state(), 0b0001);
    }

    #[test]
    fn steady_press_reports_once() {
        let mut db = ButtonDebouncer::new(2);
        let reported: u32 = (0..10)
            .map(|_| db.update(0b0001, ALL).pressed.count_ones())
            .sum();
        assert_eq!(reported, 1);
    }

    #[test]
    fn release_reported_after_threshold() {
        let mut db = ButtonDebouncer::new(3);
        for _ in 0..3 {
            db.update(0b10, ALL);
        }
        assert_eq!(db.state(), 0b10);
        assert!(db.update(0b00, ALL).is_empty());
        assert!(db.update(0b00, ALL).is_empty());
        let t = db.update(0b00, ALL);
        assert_eq!(t.released, 0b10);
        assert_eq!(t.edge(0b10), Some(Edge::Released));
        assert_eq!(db.state(), 0);
    }

    #[test]
    fn toggling_every_tick_is_absorbed() {
        let mut db = ButtonDebouncer::new(2);
        for i in 0..50u32 {
            assert!(db.update(i & 1, ALL).is_empty());
        }
        assert_eq!(db.state(), 0);
    }

    #[test]
    fn glitch_restarts_the_count() {
        let mut db = ButtonDebouncer::new(3);
        db.update(1, ALL);
        db.update(1, ALL);
        db.update(0, ALL); // glitch back to stable
        assert!(db.update(1, ALL).is_empty());
        assert!(db.update(1, ALL).is_empty());
        assert_eq!(db.update(1, ALL).pressed, 1);
    }

    #[test]
    fn bits_outside_mask_never_report() {
        let mut db = ButtonDebouncer::new(1);
        let t = db.update(0xFFFF_FFF0, 0b1111);
        assert!(t.is_empty());
        assert_eq!(db.state(), 0);
    }

    #[test]
    fn independent_bits_debounce_independently() {
        let mut db = ButtonDebouncer::new(2);
        db.update(0b01, ALL);
        let t = db.update(0b11, ALL);
        assert_eq!(t.pressed, 0b01);
        let t = db.update(0b11, ALL);
        assert_eq!(t.pressed, 0b10);
    }

    #[test]
    fn zero_threshold_means_no_filtering() {
        let mut db = ButtonDebouncer::new(0);
        assert_eq!(db.threshold(), 1);
        assert_eq!(db.update(0b1, ALL).pressed, 0b1);
        assert_eq!(db.update(0b0, ALL).released, 0b1);
    }

    #[test]
    fn top_bit_is_usable() {
        let mut db = ButtonDebouncer::new(1);
        assert_eq!(db.update(0x8000_0000, ALL).pressed, 0x8000_0000);
    }

    #[test]
    fn default_threshold() {
        assert_eq!(ButtonDebouncer::default().threshold(), DEFAULT_DEBOUNCE_TICKS);
    }
}
