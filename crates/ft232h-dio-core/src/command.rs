//! MPSSE command encoding for static GPIO output.
//!
//! Each bus is driven by a triplet `[address, level, direction]`.

use crate::bus::{Bus, Pin};

/// Set data bits on the low byte (ADBUS).
pub const SET_BITS_LOW: u8 = 0x80;
/// Set data bits on the high byte (ACBUS).
pub const SET_BITS_HIGH: u8 = 0x82;
/// Direction mask with every pin an output (1 = output).
pub const DIRECTION_ALL_OUTPUT: u8 = 0xFF;

/// Command that drives `bus` to `level`.
pub fn set_bus(bus: Bus, level: u8) -> [u8; 3] {
    [bus.address(), level, DIRECTION_ALL_OUTPUT]
}

/// Command that configures both buses as outputs with the given levels.
pub fn init(level_a: u8, level_b: u8) -> [u8; 6] {
    let a = set_bus(Bus::A, level_a);
    let b = set_bus(Bus::B, level_b);
    [a[0], a[1], a[2], b[0], b[1], b[2]]
}

/// Bus state with `pin` driven to `level`, other bits untouched.
pub fn apply_pin(state: u8, pin: Pin, level: bool) -> u8 {
    if level {
        state | pin.mask()
    } else {
        state & !pin.mask()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_zero() {
        assert_eq!(init(0, 0), [0x80, 0x00, 0xFF, 0x82, 0x00, 0xFF]);
    }

    #[test]
    fn test_init_levels() {
        assert_eq!(init(0x5A, 0xC3), [0x80, 0x5A, 0xFF, 0x82, 0xC3, 0xFF]);
    }

    #[test]
    fn test_set_bus() {
        assert_eq!(set_bus(Bus::A, 0x01), [0x80, 0x01, 0xFF]);
        assert_eq!(set_bus(Bus::B, 0x80), [0x82, 0x80, 0xFF]);
    }

    #[test]
    fn test_apply_pin_clear_keeps_other_bits() {
        assert_eq!(apply_pin(0xFF, Pin::P3, false), 0xF7);
        assert_eq!(apply_pin(0x09, Pin::P0, false), 0x08);
    }

    #[test]
    fn test_apply_pin_set_keeps_other_bits() {
        assert_eq!(apply_pin(0x00, Pin::P7, true), 0x80);
        assert_eq!(apply_pin(0x10, Pin::P1, true), 0x12);
    }

    #[test]
    fn test_apply_pin_round_trip() {
        for state in [0x00u8, 0x5A, 0xA5, 0xFF] {
            for pin in Pin::all() {
                let high = apply_pin(state, pin, true);
                assert_eq!(high & pin.mask(), pin.mask());
                assert_eq!(high & !pin.mask(), state & !pin.mask());
                let low = apply_pin(high, pin, false);
                assert_eq!(low, state & !pin.mask());
            }
        }
    }
}
