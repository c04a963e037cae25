//! Property-based tests for pin assignment validation.

#![allow(clippy::indexing_slicing)]

use control::{ConfigError, PinAssignment};
use platform::{Button, Pull, BANK_WIDTH};
use proptest::prelude::*;

fn pull() -> impl Strategy<Value = Pull> {
    prop_oneof![Just(Pull::Up), Just(Pull::Down), Just(Pull::None)]
}

proptest! {
    /// Accepted assignments never share a bit; rejected ones had a reason.
    #[test]
    fn validated_masks_never_overlap(
        buttons in prop::array::uniform4(0u8..40),
        enc in prop::array::uniform4(0u8..40),
        pull in pull(),
    ) {
        let numbers: Vec<u8> = buttons.iter().chain(enc.iter()).copied().collect();
        let result = PinAssignment::from_numbers(
            buttons,
            [(enc[0], enc[1]), (enc[2], enc[3])],
            pull,
        );

        match result {
            Ok(pins) => {
                let bits: u32 = pins.inputs().map(|i| i.pin.mask().count_ones()).sum();
                prop_assert_eq!(bits, 8);
                prop_assert_eq!(pins.pin_mask().count_ones(), 8);
            }
            Err(ConfigError::PinOutOfRange(e)) => {
                prop_assert!(numbers.iter().any(|&n| n >= BANK_WIDTH));
                prop_assert!(e.value >= BANK_WIDTH);
            }
            Err(ConfigError::DuplicatePin { pin }) => {
                prop_assert!(numbers.iter().filter(|&&n| n == pin).count() > 1);
            }
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    /// Pressing one button on a valid assignment sets only that button's bit.
    #[test]
    fn one_button_maps_to_one_bit(
        which in 0usize..4,
        pull in pull(),
    ) {
        let pins = PinAssignment::from_numbers([3, 9, 14, 30], [(0, 1), (20, 21)], pull)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let button = Button::ALL.get(which).copied().ok_or_else(|| TestCaseError::fail("index"))?;
        let input = pins.button(button);
        let bank = match pull {
            Pull::Up => pins.idle_bank() & !input.pin.mask(),
            Pull::Down | Pull::None => input.pin.mask(),
        };
        prop_assert_eq!(pins.button_state(bank), button.mask());
    }
}
