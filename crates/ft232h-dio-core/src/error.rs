use ft232h_dio_hal::DeviceType;

/// Errors from [`DioController`](crate::DioController), generic over the
/// driver's status type.
#[derive(Debug, thiserror::Error)]
pub enum DioError<E: core::fmt::Debug> {
    /// Requested device index is past the end of the device list.
    #[error("no FTDI device at index {index}; device count was {count}")]
    DeviceNotFound { index: u32, count: u32 },

    /// The device at the requested index is not an FT232H.
    #[error("unexpected device type {found:?} at index {index}; expected {expected:?}")]
    UnexpectedDeviceType {
        index: u32,
        found: DeviceType,
        expected: DeviceType,
    },

    /// Pin index outside 0-7.
    #[error("pin number must be between 0 and 7, got {0}")]
    InvalidPinIndex(i32),

    /// Non-success status from the USB driver.
    #[error("driver status: {0:?}")]
    Driver(E),

    /// The driver accepted only part of a command.
    #[error("short write: {written} of {expected} bytes accepted")]
    ShortWrite { expected: usize, written: usize },

    /// Operation requires an open device.
    #[error("device is not open")]
    NotOpen,

    /// `init` called while a device handle is still open.
    #[error("device is already open")]
    AlreadyOpen,
}

impl<E: core::fmt::Debug> From<E> for DioError<E> {
    fn from(e: E) -> Self {
        DioError::Driver(e)
    }
}
