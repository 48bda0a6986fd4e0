//! Hardware constants of the board build.

use sofle_kbd::time::Duration;
use sofle_kbd::usb::DeviceInfo;

pub const DEVICE_INFO: DeviceInfo = DeviceInfo {
    manufacturer: "Brian Low",
    vendor_id: 0xfc32,
    product_id: 0x0287,
    product_name: "Sofle Choc",
    serial_number: "1",
};

/// WS2812 LEDs on each half.
pub const LED_COUNT: usize = 29;

/// Upper bound for any colour channel.
pub const MAX_BRIGHTNESS: u8 = 120;

pub const USB_SEND_INTERVAL_MICROS: u32 = 10_000;

/// How long the controller half waits for the other half's reply.
pub const SPLIT_TIMEOUT: Duration = Duration::millis(10);

pub const UART_BAUD_RATE: u32 = 115_200;

/// Settle time between driving a row and reading the columns.
pub const MATRIX_SETTLE_MICROS: u32 = 30;
