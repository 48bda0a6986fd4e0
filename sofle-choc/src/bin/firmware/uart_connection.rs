use rp2040_hal::uart::{Enabled, ReadErrorType, UartDevice, UartPeripheral, ValidUartPinout};
use sofle_kbd::split::Connection;

pub struct UartConnection<D: UartDevice, P: ValidUartPinout<D>>(pub UartPeripheral<Enabled, D, P>);

impl<D: UartDevice, P: ValidUartPinout<D>> Connection for UartConnection<D, P> {
    type Error = ReadError;

    fn read_raw(&self, buffer: &mut [u8]) -> nb::Result<usize, ReadError> {
        self.0
            .read_raw(buffer)
            .map_err(|e| e.map(|e| ReadError(e.err_type)))
    }

    fn write(&self, data: &[u8]) {
        self.0.write_full_blocking(data);
    }
}

#[derive(Debug)]
pub struct ReadError(pub ReadErrorType);

impl defmt::Format for ReadError {
    fn format(&self, fmt: defmt::Formatter) {
        match self.0 {
            ReadErrorType::Overrun => defmt::write!(fmt, "ReadError: Overrun"),
            ReadErrorType::Break => defmt::write!(fmt, "ReadError: Break"),
            ReadErrorType::Parity => defmt::write!(fmt, "ReadError: Parity"),
            ReadErrorType::Framing => defmt::write!(fmt, "ReadError: Framing"),
        }
    }
}
