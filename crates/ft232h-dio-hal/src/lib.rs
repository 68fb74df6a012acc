#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

/// Enumerates and opens FTDI devices.
///
/// Implemented by the vendor driver binding on the PC and by mocks in tests.
/// The controller never talks to USB directly; everything goes through here.
pub trait DeviceProvider {
    /// Driver status reported on failure. Surfaced to callers verbatim.
    type Error: core::fmt::Debug;

    /// An open device handle.
    type Device: MpsseDevice<Error = Self::Error>;

    /// Number of FTDI devices currently attached.
    fn device_count(&mut self) -> Result<u32, Self::Error>;

    /// Descriptors for every attached device, in index order.
    fn device_list(&mut self) -> Result<Vec<DeviceInfo>, Self::Error>;

    /// Open the device at `index`.
    fn open(&mut self, index: u32) -> Result<Self::Device, Self::Error>;
}

/// Operations on an open device handle.
pub trait MpsseDevice {
    type Error: core::fmt::Debug;

    /// Reset the USB port of the device.
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Discard buffered data in the given direction(s).
    fn purge(&mut self, purge: Purge) -> Result<(), Self::Error>;

    /// Select the bit mode. `mask` sets pin directions for the bit-bang modes
    /// (1 = output).
    fn set_bit_mode(&mut self, mask: u8, mode: BitMode) -> Result<(), Self::Error>;

    /// Write raw bytes to the device. Returns the number of bytes accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Release the handle. The device must not be used afterwards.
    fn close(&mut self) -> Result<(), Self::Error>;
}

/// Chip model reported by enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Ft232h,
    Ft2232h,
    Ft4232h,
    Ft232r,
    Ft230x,
    /// Any model this crate does not distinguish.
    Unknown,
}

/// One entry of the device list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub device_type: DeviceType,
    pub serial_number: String,
    pub description: String,
    /// True if another process (or handle) already has the device open.
    pub port_open: bool,
}

impl DeviceInfo {
    /// Descriptor with empty strings, mostly useful for tests and simulation.
    pub fn new(device_type: DeviceType) -> Self {
        Self {
            device_type,
            serial_number: String::new(),
            description: String::new(),
            port_open: false,
        }
    }
}

/// Bit modes accepted by `FT_SetBitMode` that a backend must map.
///
/// The controller only selects `Mpsse`; the others exist so a caller holding
/// a raw handle can return the chip to its default or async bit-bang mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitMode {
    Reset,
    AsyncBitbang,
    Mpsse,
}

impl BitMode {
    /// Raw mode value as passed to `FT_SetBitMode`.
    pub fn bits(self) -> u8 {
        match self {
            BitMode::Reset => 0x00,
            BitMode::AsyncBitbang => 0x01,
            BitMode::Mpsse => 0x02,
        }
    }
}

/// Buffer selection for [`MpsseDevice::purge`], mirroring `FT_PURGE_RX`,
/// `FT_PURGE_TX` and their combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purge {
    Rx,
    Tx,
    All,
}
