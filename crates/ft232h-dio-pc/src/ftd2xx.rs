//! FTDI D2XX backend: implements the driver traits on top of `libftd2xx`.

use ft232h_dio_hal::{BitMode, DeviceInfo, DeviceProvider, DeviceType, MpsseDevice, Purge};
use libftd2xx::{Ftdi, FtdiCommon, FtStatus};

/// Enumerates devices through the vendor D2XX library.
#[derive(Debug, Default)]
pub struct Ftd2xxProvider;

impl DeviceProvider for Ftd2xxProvider {
    type Error = FtStatus;
    type Device = Ftd2xxDevice;

    fn device_count(&mut self) -> Result<u32, Self::Error> {
        libftd2xx::num_devices()
    }

    fn device_list(&mut self) -> Result<Vec<DeviceInfo>, Self::Error> {
        let list = libftd2xx::list_devices()?;
        Ok(list
            .into_iter()
            .map(|d| DeviceInfo {
                device_type: device_type(d.device_type),
                serial_number: d.serial_number,
                description: d.description,
                port_open: d.port_open,
            })
            .collect())
    }

    fn open(&mut self, index: u32) -> Result<Self::Device, Self::Error> {
        let index = i32::try_from(index).map_err(|_| FtStatus::DEVICE_NOT_FOUND)?;
        let ft = Ftdi::with_index(index)?;
        Ok(Ftd2xxDevice { ft })
    }
}

/// Open D2XX handle.
pub struct Ftd2xxDevice {
    ft: Ftdi,
}

impl MpsseDevice for Ftd2xxDevice {
    type Error = FtStatus;

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.ft.reset()
    }

    fn purge(&mut self, purge: Purge) -> Result<(), Self::Error> {
        match purge {
            Purge::Rx => self.ft.purge_rx(),
            Purge::Tx => self.ft.purge_tx(),
            Purge::All => self.ft.purge_all(),
        }
    }

    fn set_bit_mode(&mut self, mask: u8, mode: BitMode) -> Result<(), Self::Error> {
        let mode = match mode {
            BitMode::Reset => libftd2xx::BitMode::Reset,
            BitMode::AsyncBitbang => libftd2xx::BitMode::AsyncBitbang,
            BitMode::Mpsse => libftd2xx::BitMode::Mpsse,
        };
        self.ft.set_bit_mode(mask, mode)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.ft.write(data)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.ft.close()
    }
}

fn device_type(t: libftd2xx::DeviceType) -> DeviceType {
    use libftd2xx::DeviceType as Ft;
    match t {
        Ft::FT232H => DeviceType::Ft232h,
        Ft::FT2232H => DeviceType::Ft2232h,
        Ft::FT4232H => DeviceType::Ft4232h,
        Ft::FT232R => DeviceType::Ft232r,
        Ft::FT_X_SERIES => DeviceType::Ft230x,
        _ => DeviceType::Unknown,
    }
}
