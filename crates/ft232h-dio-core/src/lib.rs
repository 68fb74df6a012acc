//! Digital output control for the two GPIO buses of an FT232H.
//!
//! The controller keeps a shadow byte per bus and sends MPSSE "set data
//! bits" commands through any [`DeviceProvider`] implementation.

pub mod bus;
pub mod command;
pub mod controller;
pub mod error;

pub use bus::{Bus, Pin, PinIndexError};
pub use controller::DioController;
pub use error::DioError;

pub use ft232h_dio_hal::{BitMode, DeviceInfo, DeviceProvider, DeviceType, MpsseDevice, Purge};
