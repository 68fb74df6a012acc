//! Simulated FTDI driver for dry runs without hardware.
//!
//! Every command is logged and kept in memory so the resulting pin levels can
//! be reported after the run.

use std::cell::RefCell;
use std::rc::Rc;

use ft232h_dio_hal::{BitMode, DeviceInfo, DeviceProvider, DeviceType, MpsseDevice, Purge};

/// Errors reported by the simulated driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("device {0} does not exist")]
    InvalidHandle(u32),
    #[error("device {0} is already open")]
    DeviceBusy(u32),
    #[error("device {0} is closed")]
    Closed(u32),
}

#[derive(Debug)]
struct SimDevice {
    info: DeviceInfo,
    open: bool,
    mode: Option<BitMode>,
    writes: Vec<Vec<u8>>,
}

/// Virtual device list. Clones share state.
#[derive(Debug, Clone)]
pub struct SimProvider {
    devices: Rc<RefCell<Vec<SimDevice>>>,
}

impl SimProvider {
    /// `count` virtual FT232H devices with serials `SIM0`, `SIM1`, ...
    pub fn new(count: u32) -> Self {
        let devices = (0..count)
            .map(|i| SimDevice {
                info: DeviceInfo {
                    device_type: DeviceType::Ft232h,
                    serial_number: format!("SIM{i}"),
                    description: "Simulated FT232H".to_string(),
                    port_open: false,
                },
                open: false,
                mode: None,
                writes: Vec::new(),
            })
            .collect();
        Self {
            devices: Rc::new(RefCell::new(devices)),
        }
    }

    /// Every command written to device `index`, oldest first.
    pub fn writes(&self, index: u32) -> Vec<Vec<u8>> {
        self.devices
            .borrow()
            .get(index as usize)
            .map(|d| d.writes.clone())
            .unwrap_or_default()
    }

    /// Whether a handle on device `index` is currently open.
    pub fn is_open(&self, index: u32) -> bool {
        self.devices
            .borrow()
            .get(index as usize)
            .is_some_and(|d| d.open)
    }

    /// Current bit mode of device `index`, if it has been set.
    pub fn mode(&self, index: u32) -> Option<BitMode> {
        self.devices
            .borrow()
            .get(index as usize)
            .and_then(|d| d.mode)
    }
}

impl DeviceProvider for SimProvider {
    type Error = SimError;
    type Device = SimHandle;

    fn device_count(&mut self) -> Result<u32, Self::Error> {
        Ok(self.devices.borrow().len() as u32)
    }

    fn device_list(&mut self) -> Result<Vec<DeviceInfo>, Self::Error> {
        Ok(self
            .devices
            .borrow()
            .iter()
            .map(|d| DeviceInfo {
                port_open: d.open,
                ..d.info.clone()
            })
            .collect())
    }

    fn open(&mut self, index: u32) -> Result<Self::Device, Self::Error> {
        let mut devices = self.devices.borrow_mut();
        let device = devices
            .get_mut(index as usize)
            .ok_or(SimError::InvalidHandle(index))?;
        if device.open {
            return Err(SimError::DeviceBusy(index));
        }
        device.open = true;
        log::debug!("sim: opened device {index}");
        Ok(SimHandle {
            index,
            devices: self.devices.clone(),
        })
    }
}

/// Open handle on a simulated device.
#[derive(Debug)]
pub struct SimHandle {
    index: u32,
    devices: Rc<RefCell<Vec<SimDevice>>>,
}

impl SimHandle {
    fn with_device<T>(&self, f: impl FnOnce(&mut SimDevice) -> T) -> Result<T, SimError> {
        let mut devices = self.devices.borrow_mut();
        match devices.get_mut(self.index as usize) {
            Some(d) if d.open => Ok(f(d)),
            Some(_) => Err(SimError::Closed(self.index)),
            None => Err(SimError::InvalidHandle(self.index)),
        }
    }
}

impl MpsseDevice for SimHandle {
    type Error = SimError;

    fn reset(&mut self) -> Result<(), Self::Error> {
        log::debug!("sim: reset device {}", self.index);
        self.with_device(|d| d.mode = None)
    }

    fn purge(&mut self, purge: Purge) -> Result<(), Self::Error> {
        log::debug!("sim: purge {:?} on device {}", purge, self.index);
        self.with_device(|_| ())
    }

    fn set_bit_mode(&mut self, mask: u8, mode: BitMode) -> Result<(), Self::Error> {
        log::debug!(
            "sim: bit mode {:#04x} (mask {:#04x}) on device {}",
            mode.bits(),
            mask,
            self.index
        );
        self.with_device(|d| d.mode = Some(mode))
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        log::info!("sim: device {} <- {:02x?}", self.index, data);
        self.with_device(|d| {
            d.writes.push(data.to_vec());
            data.len()
        })
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        log::debug!("sim: closed device {}", self.index);
        self.with_device(|d| {
            d.open = false;
            d.mode = None;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_reports_open_state() {
        let mut sim = SimProvider::new(2);
        let _handle = sim.open(1).unwrap();

        let list = sim.device_list().unwrap();
        assert_eq!(list.len(), 2);
        assert!(!list[0].port_open);
        assert!(list[1].port_open);
        assert_eq!(list[1].serial_number, "SIM1");
        assert_eq!(list[1].device_type, DeviceType::Ft232h);
    }

    #[test]
    fn test_open_missing_and_busy() {
        let mut sim = SimProvider::new(1);
        assert_eq!(sim.open(3).unwrap_err(), SimError::InvalidHandle(3));
        let _handle = sim.open(0).unwrap();
        assert_eq!(sim.open(0).unwrap_err(), SimError::DeviceBusy(0));
    }

    #[test]
    fn test_write_after_close_fails() {
        let mut sim = SimProvider::new(1);
        let mut handle = sim.open(0).unwrap();
        assert_eq!(handle.write(&[0x80, 0x01, 0xFF]).unwrap(), 3);
        handle.close().unwrap();
        assert_eq!(handle.write(&[0x80]).unwrap_err(), SimError::Closed(0));
        assert_eq!(sim.writes(0), vec![vec![0x80, 0x01, 0xFF]]);
    }

    #[test]
    fn test_bit_mode_and_purge_directions() {
        let mut sim = SimProvider::new(1);
        let mut handle = sim.open(0).unwrap();

        handle.set_bit_mode(0x0F, BitMode::AsyncBitbang).unwrap();
        assert_eq!(sim.mode(0), Some(BitMode::AsyncBitbang));
        handle.set_bit_mode(0x00, BitMode::Reset).unwrap();
        assert_eq!(sim.mode(0), Some(BitMode::Reset));

        for purge in [Purge::Rx, Purge::Tx, Purge::All] {
            handle.purge(purge).unwrap();
        }
        handle.close().unwrap();
        assert_eq!(handle.purge(Purge::Rx).unwrap_err(), SimError::Closed(0));
        assert!(!sim.is_open(0));
    }

    #[test]
    fn test_controller_on_sim() {
        use ft232h_dio_core::{Bus, DioController};

        let sim = SimProvider::new(1);
        let mut dio = DioController::new(sim.clone());
        dio.init(0).unwrap();
        dio.set_pin(Bus::B, 7, true).unwrap();

        assert_eq!(sim.mode(0), Some(BitMode::Mpsse));
        assert_eq!(
            sim.writes(0),
            vec![
                vec![0x80, 0x00, 0xFF, 0x82, 0x00, 0xFF],
                vec![0x82, 0x80, 0xFF],
            ]
        );

        dio.close().unwrap();
        assert_eq!(sim.mode(0), None);
    }
}
