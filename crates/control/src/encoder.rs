//! Quadrature rotary encoder decoder.
//!
//! The (CLK, DAT) pair walks a 4-phase Gray cycle:
//!
//! ```text
//!  phase   0    1    2    3    0
//!  CLK     0    0    1    1    0
//!  DAT     0    1    1    0    0
//!          ──────────────────▶  clockwise (+1 quarter step per move)
//! ```
//!
//! Moves to a neighbouring phase add ±1 to a quarter-step accumulator. A
//! jump across two phases means a sample was missed; it carries no
//! direction and is ignored. Detents are only recognized when the encoder
//! *arrives* at a detent position: if the accumulator has covered a full
//! detent's worth of quarter steps in one direction a detent fires, and any
//! partial progress is discarded either way. Contact chatter (0→1→0) and a
//! reversal halfway through a cycle therefore never fire.
//!
//! The first sampled phase is taken as the detent reference. Mechanical
//! encoders rest on a detent at power-up, so this aligns the decoder with
//! the clicks without needing to know the pull polarity.

/// Mechanical encoder variant: how many quarter steps make up one detent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderType {
    /// One detent per full quadrature cycle (4 transitions).
    #[default]
    Full,
    /// One detent per half cycle (2 transitions).
    Half,
    /// One detent per transition.
    Quarter,
}

impl EncoderType {
    /// Quarter steps that make up one detent.
    #[must_use]
    pub const fn steps_per_detent(self) -> i8 {
        match self {
            Self::Full => 4,
            Self::Half => 2,
            Self::Quarter => 1,
        }
    }
}

/// Position in the Gray cycle, always `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Phase(u8);

impl Phase {
    fn from_lines(clk: bool, dat: bool) -> Self {
        match (clk, dat) {
            (false, false) => Self(0),
            (false, true) => Self(1),
            (true, true) => Self(2),
            (true, false) => Self(3),
        }
    }

    /// Phases travelled from `from` to `self`, modulo 4.
    fn offset_from(self, from: Self) -> u8 {
        self.0.wrapping_sub(from.0) & 0b11
    }

    /// Signed quarter step for a move from `from` to `self`.
    ///
    /// `None` for a two-phase jump.
    fn step_from(self, from: Self) -> Option<i8> {
        match self.offset_from(from) {
            0 => Some(0),
            1 => Some(1),
            3 => Some(-1),
            _ => None,
        }
    }
}

/// Decoder state for one encoder.
#[derive(Debug, Clone)]
pub struct RotaryEncoder {
    kind: EncoderType,
    reversed: bool,
    last: Option<Phase>,
    reference: Phase,
    quarter_steps: i8,
    pending: i8,
}

impl RotaryEncoder {
    /// Create a decoder. State is established by the first [`sample`](Self::sample).
    #[must_use]
    pub const fn new(kind: EncoderType, reversed: bool) -> Self {
        Self {
            kind,
            reversed,
            last: None,
            reference: Phase(0),
            quarter_steps: 0,
            pending: 0,
        }
    }

    /// Configured encoder variant.
    #[must_use]
    pub const fn kind(&self) -> EncoderType {
        self.kind
    }

    /// `true` if reported deltas are sign-flipped.
    #[must_use]
    pub const fn reversed(&self) -> bool {
        self.reversed
    }

    /// Feed one (CLK, DAT) sample.
    ///
    /// At most one detent can complete per sample.
    pub fn sample(&mut self, clk: bool, dat: bool) {
        let phase = Phase::from_lines(clk, dat);
        let Some(last) = self.last.replace(phase) else {
            self.reference = phase;
            return;
        };

        match phase.step_from(last) {
            Some(0) => return,
            Some(step) => self.quarter_steps = self.quarter_steps.saturating_add(step),
            None => {
                #[cfg(feature = "defmt")]
                defmt::trace!("encoder: missed sample, phase {=u8} -> {=u8}", last.0, phase.0);
            }
        }

        if self.is_detent(phase) {
            let per_detent = self.kind.steps_per_detent();
            if self.quarter_steps >= per_detent {
                self.pending = self.pending.saturating_add(1);
            } else if self.quarter_steps <= per_detent.saturating_neg() {
                self.pending = self.pending.saturating_sub(1);
            }
            self.quarter_steps = 0;
        }
    }

    /// Detents completed since the last read, sign-adjusted. Clears the count.
    ///
    /// When called after every [`sample`](Self::sample) the result is always
    /// in `-1..=1`; detents sampled between reads are summed.
    pub fn read(&mut self) -> i8 {
        let delta = core::mem::take(&mut self.pending);
        if self.reversed {
            delta.saturating_neg()
        } else {
            delta
        }
    }

    /// [`sample`](Self::sample) followed by [`read`](Self::read).
    pub fn update(&mut self, clk: bool, dat: bool) -> i8 {
        self.sample(clk, dat);
        self.read()
    }

    fn is_detent(&self, phase: Phase) -> bool {
        let offset = phase.offset_from(self.reference);
        match self.kind {
            EncoderType::Full => offset == 0,
            EncoderType::Half => offset & 1 == 0,
            EncoderType::Quarter => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P0: (bool, bool) = (false, false);
    const P1: (bool, bool) = (false, true);
    const P2: (bool, bool) = (true, true);
    const P3: (bool, bool) = (true, false);

    /// Feed a sequence, reading after each sample, and collect non-zero deltas.
    fn run(enc: &mut RotaryEncoder, seq: &[(bool, bool)]) -> Vec<i8> {
        seq.iter()
            .map(|&(clk, dat)| enc.update(clk, dat))
            .filter(|&d| d != 0)
            .collect()
    }

    #[test]
    fn forward_cycle_is_one_positive_detent() {
        let mut enc = RotaryEncoder::new(EncoderType::Full, false);
        assert_eq!(run(&mut enc, &[P0, P1, P2, P3, P0]), vec![1]);
    }

    #[test]
    fn reverse_cycle_is_one_negative_detent() {
        let mut enc = RotaryEncoder::new(EncoderType::Full, false);
        assert_eq!(run(&mut enc, &[P0, P3, P2, P1, P0]), vec![-1]);
    }

    #[test]
    fn reversed_flag_flips_both_directions() {
        let mut enc = RotaryEncoder::new(EncoderType::Full, true);
        assert_eq!(run(&mut enc, &[P0, P1, P2, P3, P0]), vec![-1]);
        assert_eq!(run(&mut enc, &[P3, P2, P1, P0]), vec![1]);
        assert!(enc.reversed());
    }

    #[test]
    fn chatter_on_first_edge_is_ignored() {
        let mut enc = RotaryEncoder::new(EncoderType::Full, false);
        assert!(run(&mut enc, &[P0, P1, P0, P1, P0, P1, P0]).is_empty());
    }

    #[test]
    fn reversal_mid_cycle_fires_nothing() {
        let mut enc = RotaryEncoder::new(EncoderType::Full, false);
        assert!(run(&mut enc, &[P0, P1, P2, P1, P0]).is_empty());
        assert!(run(&mut enc, &[P3, P2, P3, P0]).is_empty());
    }

    #[test]
    fn wobble_inside_a_complete_cycle_still_counts_once() {
        let mut enc = RotaryEncoder::new(EncoderType::Full, false);
        assert_eq!(run(&mut enc, &[P0, P1, P2, P3, P2, P3, P0]), vec![1]);
    }

    #[test]
    fn missed_sample_discards_partial_detent() {
        let mut enc = RotaryEncoder::new(EncoderType::Full, false);
        // 1 -> 3 skips phase 2: no direction, detent incomplete.
        assert!(run(&mut enc, &[P0, P1, P3, P0]).is_empty());
        // Decoder is still aligned for the next clean cycle.
        assert_eq!(run(&mut enc, &[P1, P2, P3, P0]), vec![1]);
    }

    #[test]
    fn first_sample_sets_detent_reference() {
        // Pull-up encoders rest at CLK=DAT=1.
        let mut enc = RotaryEncoder::new(EncoderType::Full, false);
        assert_eq!(run(&mut enc, &[P2, P3, P0, P1, P2]), vec![1]);
        assert!(run(&mut enc, &[P3, P0]).is_empty());
    }

    #[test]
    fn half_step_encoder_fires_twice_per_cycle() {
        let mut enc = RotaryEncoder::new(EncoderType::Half, false);
        assert_eq!(run(&mut enc, &[P0, P1, P2, P3, P0]), vec![1, 1]);
        assert_eq!(run(&mut enc, &[P3, P2]), vec![-1]);
    }

    #[test]
    fn quarter_step_encoder_fires_every_transition() {
        let mut enc = RotaryEncoder::new(EncoderType::Quarter, false);
        assert_eq!(run(&mut enc, &[P0, P1, P2, P1]), vec![1, 1, -1]);
    }

    #[test]
    fn unchanged_samples_fire_nothing() {
        let mut enc = RotaryEncoder::new(EncoderType::Quarter, false);
        assert!(run(&mut enc, &[P2, P2, P2, P2]).is_empty());
    }

    #[test]
    fn detents_sampled_between_reads_coalesce() {
        let mut enc = RotaryEncoder::new(EncoderType::Full, false);
        for &(clk, dat) in &[P0, P1, P2, P3, P0, P1, P2, P3, P0] {
            enc.sample(clk, dat);
        }
        assert_eq!(enc.read(), 2);
        assert_eq!(enc.read(), 0);
    }

    #[test]
    fn accessors_report_construction_settings() {
        let enc = RotaryEncoder::new(EncoderType::Half, true);
        assert_eq!(enc.kind(), EncoderType::Half);
        assert!(enc.reversed());
        assert!(!RotaryEncoder::new(EncoderType::Full, false).reversed());
    }

    #[test]
    fn steps_per_detent_by_type() {
        assert_eq!(EncoderType::Full.steps_per_detent(), 4);
        assert_eq!(EncoderType::Half.steps_per_detent(), 2);
        assert_eq!(EncoderType::Quarter.steps_per_detent(), 1);
        assert_eq!(EncoderType::default(), EncoderType::Full);
    }
}
