#![no_std]
#![no_main]

use core::{
    cell::RefCell,
    sync::atomic::{AtomicUsize, Ordering},
};

use cortex_m::interrupt::Mutex;
use defmt_rtt as _;
use fugit::{ExtU32, RateExtU32};
use key_matrix::KeyMatrix;
use panic_probe as _;
use rp2040_hal::{
    self as hal,
    clocks::init_clocks_and_plls,
    entry,
    gpio::{
        bank0::{Gpio0, Gpio1},
        FunctionUart, Pin, PullDown,
    },
    pac::{self, interrupt, UART0},
    timer::{Alarm, Alarm0, CountDown},
    uart::{DataBits, StopBits, UartConfig, UartPeripheral},
    usb::UsbBus,
    Clock, Timer, Watchdog,
};
use sofle_choc::{
    board::{DEVICE_INFO, SPLIT_TIMEOUT, UART_BAUD_RATE, USB_SEND_INTERVAL_MICROS},
    keymap::SofleLayout,
};
use sofle_kbd::{
    keyboard::Controller,
    split::SplitKeySwitches,
    usb::UsbCommunicator,
};
use uart_connection::UartConnection;
use usb_device::class_prelude::UsbBusAllocator;

mod key_matrix;
mod leds;
mod uart_connection;

#[link_section = ".boot2"]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

const XOSC_CRYSTAL_FREQ: u32 = 12_000_000;

const IS_LEFT: bool = cfg!(not(feature = "right-half"));

type UartPins = (
    Pin<Gpio0, FunctionUart, PullDown>,
    Pin<Gpio1, FunctionUart, PullDown>,
);

type KeyboardType = Controller<
    3,
    16,
    UsbCommunicator<'static, UsbBus>,
    SplitKeySwitches<2, 16, UartConnection<UART0, UartPins>, KeyMatrix<Timer, 5, 6>, CountDown>,
    SofleLayout,
>;
static KEYBOARD: Mutex<RefCell<Option<KeyboardType>>> = Mutex::new(RefCell::new(None));
static ALARM: Mutex<RefCell<Option<Alarm0>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    // These variables must be static due to lifetime constraints
    static mut USB_BUS: Option<UsbBusAllocator<UsbBus>> = None;

    defmt::info!("Launching sofle-choc ({})", if IS_LEFT { "left" } else { "right" });

    let mut pac = pac::Peripherals::take().unwrap();
    let mut sio = hal::Sio::new(pac.SIO);
    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );
    let mut watchdog = Watchdog::new(pac.WATCHDOG);
    let clocks = init_clocks_and_plls(
        XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
    let mut alarm = timer.alarm_0().unwrap();
    alarm.schedule(USB_SEND_INTERVAL_MICROS.micros()).unwrap();
    alarm.enable_interrupt();
    cortex_m::interrupt::free(|cs| {
        ALARM.borrow(cs).replace(Some(alarm));
    });

    *USB_BUS = Some(UsbBusAllocator::new(UsbBus::new(
        pac.USBCTRL_REGS,
        pac.USBCTRL_DPRAM,
        clocks.usb_clock,
        true,
        &mut pac.RESETS,
    )));
    let usb_bus = USB_BUS.as_ref().unwrap();

    // The split link needs both TRRS data lines: TX on GP0, RX on GP1.
    let uart_pins = (pins.gpio0.into_function(), pins.gpio1.into_function());
    let mut uart = UartPeripheral::new(pac.UART0, uart_pins, &mut pac.RESETS)
        .enable(
            UartConfig::new(UART_BAUD_RATE.Hz(), DataBits::Eight, None, StopBits::One),
            clocks.peripheral_clock.freq(),
        )
        .unwrap();
    uart.enable_rx_interrupt();

    let mut leds = leds::layer_leds(
        pac.PIO0,
        pins.gpio4.into_function(),
        &mut pac.RESETS,
        clocks.peripheral_clock.freq(),
    );

    let key_matrix = KeyMatrix::new(
        [
            pins.gpio5.into_push_pull_output().into_dyn_pin(),
            pins.gpio6.into_push_pull_output().into_dyn_pin(),
            pins.gpio7.into_push_pull_output().into_dyn_pin(),
            pins.gpio8.into_push_pull_output().into_dyn_pin(),
            pins.gpio9.into_push_pull_output().into_dyn_pin(),
        ],
        [
            pins.gpio27.into_pull_up_input().into_dyn_pin(),
            pins.gpio26.into_pull_up_input().into_dyn_pin(),
            pins.gpio22.into_pull_up_input().into_dyn_pin(),
            pins.gpio20.into_pull_up_input().into_dyn_pin(),
            pins.gpio23.into_pull_up_input().into_dyn_pin(),
            pins.gpio21.into_pull_up_input().into_dyn_pin(),
        ],
        (
            pins.gpio28.into_pull_up_input().into_dyn_pin(),
            pins.gpio29.into_pull_up_input().into_dyn_pin(),
        ),
        timer,
    );
    let key_switches = SplitKeySwitches::new(
        key_matrix,
        UartConnection(uart),
        timer.count_down(),
        SPLIT_TIMEOUT,
        IS_LEFT,
    );

    let usb_communicator = UsbCommunicator::new(DEVICE_INFO, usb_bus).unwrap();
    let keyboard = Controller::new(usb_communicator, key_switches, SofleLayout);
    cortex_m::interrupt::free(|cs| {
        KEYBOARD.borrow(cs).replace(Some(keyboard));
    });

    unsafe {
        pac::NVIC::unmask(pac::Interrupt::USBCTRL_IRQ);
        pac::NVIC::unmask(pac::Interrupt::UART0_IRQ);
        pac::NVIC::unmask(pac::Interrupt::TIMER_IRQ_0);
    }

    static COUNT: AtomicUsize = AtomicUsize::new(0);
    defmt::timestamp!("{=usize}", {
        // NOTE(no-CAS) `timestamps` runs with interrupts disabled
        let n = COUNT.load(Ordering::Relaxed);
        COUNT.store(n + 1, Ordering::Relaxed);
        n
    });

    watchdog.pause_on_debug(true);
    watchdog.start(1_000_000.micros());

    loop {
        let now = timer.get_counter();
        let (layers, reboot) = cortex_m::interrupt::free(|cs| {
            KEYBOARD
                .borrow(cs)
                .borrow_mut()
                .as_mut()
                .map(|keyboard| {
                    keyboard.main_loop(now);
                    (keyboard.layer_state(), keyboard.bootloader_requested())
                })
                .unwrap_or_default()
        });
        if reboot {
            defmt::info!("rebooting into the USB bootloader");
            hal::rom_data::reset_to_usb_boot(0, 0);
        }
        if leds.update(layers).is_err() {
            defmt::warn!("failed to write LEDs");
        }
        watchdog.feed();
    }
}

#[allow(non_snake_case)]
#[interrupt]
fn USBCTRL_IRQ() {
    cortex_m::interrupt::free(|cs| {
        if let Some(keyboard) = KEYBOARD.borrow(cs).borrow_mut().as_mut() {
            keyboard.communicator.poll();
        }
    });
}

#[allow(non_snake_case)]
#[interrupt]
fn UART0_IRQ() {
    cortex_m::interrupt::free(|cs| {
        if let Some(keyboard) = KEYBOARD.borrow(cs).borrow_mut().as_mut() {
            keyboard.key_switches.poll();
        }
    });
}

#[allow(non_snake_case)]
#[interrupt]
fn TIMER_IRQ_0() {
    cortex_m::interrupt::free(|cs| {
        if let Some(alarm) = ALARM.borrow(cs).borrow_mut().as_mut() {
            alarm.clear_interrupt();
            alarm.schedule(USB_SEND_INTERVAL_MICROS.micros()).ok();
            alarm.enable_interrupt();
        }
        if let Some(Err(e)) = KEYBOARD
            .borrow(cs)
            .borrow_mut()
            .as_mut()
            .map(Controller::send_keys)
        {
            defmt::warn!("UsbError: {}", defmt::Debug2Format(&e));
        }
    });
}
