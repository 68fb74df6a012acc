//! Bus and pin identifiers.

use core::fmt;
use core::str::FromStr;

use crate::command::{SET_BITS_HIGH, SET_BITS_LOW};

/// One of the two 8-bit GPIO buses.
///
/// `A` is the "D" bus (ADBUS0-7), `B` is the "C" bus (ACBUS0-7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bus {
    A,
    B,
}

impl Bus {
    /// Both buses, in the order they appear in the init command.
    pub const ALL: [Bus; 2] = [Bus::A, Bus::B];

    /// MPSSE command byte that selects this bus.
    pub fn address(self) -> u8 {
        match self {
            Bus::A => SET_BITS_LOW,
            Bus::B => SET_BITS_HIGH,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Bus::A => 0,
            Bus::B => 1,
        }
    }
}

impl fmt::Display for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bus::A => f.write_str("BUSA"),
            Bus::B => f.write_str("BUSB"),
        }
    }
}

/// Error returned when a bus name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bus '{0}', expected A/D or B/C")]
pub struct ParseBusError(String);

impl FromStr for Bus {
    type Err = ParseBusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a" | "d" | "busa" => Ok(Bus::A),
            "b" | "c" | "busb" => Ok(Bus::B),
            _ => Err(ParseBusError(s.to_string())),
        }
    }
}

/// Pin index outside 0-7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("pin number must be between 0 and 7, got {0}")]
pub struct PinIndexError(pub i32);

/// A bit position within a bus register. Always in 0-7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pin(u8);

impl Pin {
    pub const P0: Pin = Pin(0);
    pub const P1: Pin = Pin(1);
    pub const P2: Pin = Pin(2);
    pub const P3: Pin = Pin(3);
    pub const P4: Pin = Pin(4);
    pub const P5: Pin = Pin(5);
    pub const P6: Pin = Pin(6);
    pub const P7: Pin = Pin(7);

    pub fn new(index: i32) -> Result<Self, PinIndexError> {
        if (0..8).contains(&index) {
            Ok(Pin(index as u8))
        } else {
            Err(PinIndexError(index))
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Single-bit mask for this pin.
    pub fn mask(self) -> u8 {
        1 << self.0
    }

    /// All eight pins, lowest first.
    pub fn all() -> impl Iterator<Item = Pin> {
        (0..8).map(Pin)
    }
}

impl TryFrom<i32> for Pin {
    type Error = PinIndexError;

    fn try_from(index: i32) -> Result<Self, Self::Error> {
        Pin::new(index)
    }
}

impl TryFrom<u8> for Pin {
    type Error = PinIndexError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Pin::new(i32::from(index))
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PIN{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_addresses() {
        assert_eq!(Bus::A.address(), 0x80);
        assert_eq!(Bus::B.address(), 0x82);
    }

    #[test]
    fn test_bus_from_str_aliases() {
        assert_eq!("a".parse::<Bus>().unwrap(), Bus::A);
        assert_eq!("D".parse::<Bus>().unwrap(), Bus::A);
        assert_eq!("BusA".parse::<Bus>().unwrap(), Bus::A);
        assert_eq!("b".parse::<Bus>().unwrap(), Bus::B);
        assert_eq!("C".parse::<Bus>().unwrap(), Bus::B);
        assert_eq!("busb".parse::<Bus>().unwrap(), Bus::B);
        assert!("x".parse::<Bus>().is_err());
    }

    #[test]
    fn test_pin_range() {
        for i in 0..8 {
            assert_eq!(Pin::new(i).unwrap().index() as i32, i);
        }
        assert_eq!(Pin::new(8), Err(PinIndexError(8)));
        assert_eq!(Pin::new(-1), Err(PinIndexError(-1)));
        assert!(Pin::try_from(200u8).is_err());
    }

    #[test]
    fn test_pin_mask() {
        assert_eq!(Pin::P0.mask(), 0x01);
        assert_eq!(Pin::P3.mask(), 0x08);
        assert_eq!(Pin::P7.mask(), 0x80);
        assert_eq!(Pin::all().count(), 8);
    }

    #[test]
    fn test_display() {
        assert_eq!(Bus::B.to_string(), "BUSB");
        assert_eq!(Pin::P5.to_string(), "PIN5");
    }
}
