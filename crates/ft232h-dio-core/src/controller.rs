//! GPIO bus controller, generic over the USB driver.
//!
//! Holds one shadow byte per bus and at most one open device. Pin changes
//! are read-modify-write on the shadow byte followed by a full-byte MPSSE
//! command; the hardware is never read back.

use ft232h_dio_hal::{BitMode, DeviceProvider, DeviceType, MpsseDevice, Purge};

use crate::bus::{Bus, Pin};
use crate::command;
use crate::error::DioError;

/// The only chip model the controller will drive.
pub const EXPECTED_DEVICE_TYPE: DeviceType = DeviceType::Ft232h;

/// Pin direction mask passed to `set_bit_mode` when enabling MPSSE.
const BIT_MODE_MASK: u8 = 0xFF;

type Result<T, P> = core::result::Result<T, DioError<<P as DeviceProvider>::Error>>;

/// Drives the two GPIO buses of one FT232H.
pub struct DioController<P: DeviceProvider> {
    provider: P,
    device: Option<P::Device>,
    /// Last commanded level per bus, indexed by `Bus::index`.
    shadow: [u8; 2],
}

impl<P: DeviceProvider> DioController<P> {
    /// Create a closed controller with both shadow bytes at zero.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            device: None,
            shadow: [0x00; 2],
        }
    }

    /// Open device 0. See [`init`](Self::init).
    pub fn init_default(&mut self) -> Result<(), P> {
        self.init(0)
    }

    /// Open the device at `device_index`, switch it to MPSSE and configure
    /// both buses as outputs at their current shadow levels.
    ///
    /// Nothing is written unless the index exists and is an FT232H. If any
    /// step after opening fails the handle is closed again.
    pub fn init(&mut self, device_index: u32) -> Result<(), P> {
        if self.device.is_some() {
            return Err(DioError::AlreadyOpen);
        }

        let count = self.provider.device_count()?;
        if count <= device_index {
            return Err(DioError::DeviceNotFound {
                index: device_index,
                count,
            });
        }

        let list = self.provider.device_list()?;
        let info = list
            .get(device_index as usize)
            .ok_or(DioError::DeviceNotFound {
                index: device_index,
                count: list.len() as u32,
            })?;
        if info.device_type != EXPECTED_DEVICE_TYPE {
            return Err(DioError::UnexpectedDeviceType {
                index: device_index,
                found: info.device_type,
                expected: EXPECTED_DEVICE_TYPE,
            });
        }

        let mut device = self.provider.open(device_index)?;
        if let Err(e) = self.configure(&mut device) {
            if let Err(close_err) = device.close() {
                log::warn!("Failed to close device {device_index} after init error: {close_err:?}");
            }
            return Err(e);
        }

        log::info!(
            "Opened FT232H at index {} (serial '{}')",
            device_index,
            info.serial_number
        );
        self.device = Some(device);
        Ok(())
    }

    fn configure(&self, device: &mut P::Device) -> Result<(), P> {
        device.reset()?;
        device.purge(Purge::All)?;
        device.set_bit_mode(BIT_MODE_MASK, BitMode::Mpsse)?;
        let cmd = command::init(self.shadow[Bus::A.index()], self.shadow[Bus::B.index()]);
        write_command(device, &cmd)
    }

    /// Drive one pin high (`true`) or low (`false`).
    ///
    /// `pin_index` must be in 0-7. No command is sent if the pin is already
    /// at the requested level.
    pub fn set_pin(&mut self, bus: Bus, pin_index: i32, level: bool) -> Result<(), P> {
        let pin = Pin::new(pin_index).map_err(|e| DioError::InvalidPinIndex(e.0))?;
        self.set(bus, pin, level)
    }

    /// Typed form of [`set_pin`](Self::set_pin).
    pub fn set(&mut self, bus: Bus, pin: Pin, level: bool) -> Result<(), P> {
        let current = self.shadow[bus.index()];
        self.write_bus(bus, command::apply_pin(current, pin, level))
    }

    /// Drive all eight pins of `bus` to `level`.
    ///
    /// The shadow byte is only updated once the driver has accepted the
    /// whole command.
    pub fn write_bus(&mut self, bus: Bus, level: u8) -> Result<(), P> {
        let device = self.device.as_mut().ok_or(DioError::NotOpen)?;

        let current = self.shadow[bus.index()];
        if current == level {
            log::trace!("{bus} already at {level:#04x}, skipping write");
            return Ok(());
        }

        write_command(device, &command::set_bus(bus, level))?;
        self.shadow[bus.index()] = level;
        Ok(())
    }

    /// Reset the USB port of the open device.
    pub fn reset_port(&mut self) -> Result<(), P> {
        let device = self.device.as_mut().ok_or(DioError::NotOpen)?;
        device.reset()?;
        Ok(())
    }

    /// Close the device. The handle is released even if the driver reports
    /// an error; shadow bytes are kept for a later `init`.
    pub fn close(&mut self) -> Result<(), P> {
        let mut device = self.device.take().ok_or(DioError::NotOpen)?;
        device.close()?;
        log::info!("Closed FT232H");
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    /// Last commanded level byte for `bus`.
    pub fn bus_state(&self, bus: Bus) -> u8 {
        self.shadow[bus.index()]
    }

    /// Last commanded level of one pin.
    pub fn pin_level(&self, bus: Bus, pin: Pin) -> bool {
        self.shadow[bus.index()] & pin.mask() != 0
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}

fn write_command<D: MpsseDevice>(
    device: &mut D,
    cmd: &[u8],
) -> core::result::Result<(), DioError<D::Error>> {
    log::debug!("MPSSE write {:02x?}", cmd);
    let written = device.write(cmd)?;
    if written != cmd.len() {
        return Err(DioError::ShortWrite {
            expected: cmd.len(),
            written,
        });
    }
    Ok(())
}
