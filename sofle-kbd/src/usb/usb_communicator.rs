use core::cell::Cell;

use usb_device::{
    class_prelude::{UsbBus, UsbBusAllocator},
    device::{StringDescriptors, UsbDevice, UsbDeviceBuilder, UsbDeviceState, UsbVidPid},
    prelude::BuilderError,
    LangID, UsbError,
};
use usbd_hid::{
    descriptor::{MediaKeyboardReport, MouseReport, SerializedDescriptor},
    hid_class::HIDClass,
};

use super::hid_report::{media_report, mouse_report, HidKeyboardReport};
use super::DeviceInfo;
use crate::keyboard::{ExternalCommunicator, Report};

/// Keyboard, consumer-control and mouse interfaces on one USB device.
pub struct UsbCommunicator<'a, B: UsbBus> {
    usb_device: UsbDevice<'a, B>,
    keyboard_usb_hid: HIDClass<'a, B>,
    media_usb_hid: HIDClass<'a, B>,
    mouse_usb_hid: HIDClass<'a, B>,
    mouse_active: Cell<bool>,
}

impl<'a, B: UsbBus> UsbCommunicator<'a, B> {
    const POLL_MS: u8 = 10;

    pub fn new(
        device_info: DeviceInfo,
        usb_bus_alloc: &'a UsbBusAllocator<B>,
    ) -> Result<UsbCommunicator<'a, B>, BuilderError> {
        let keyboard_usb_hid =
            HIDClass::new(usb_bus_alloc, HidKeyboardReport::desc(), Self::POLL_MS);
        let media_usb_hid =
            HIDClass::new(usb_bus_alloc, MediaKeyboardReport::desc(), Self::POLL_MS);
        let mouse_usb_hid = HIDClass::new(usb_bus_alloc, MouseReport::desc(), Self::POLL_MS);
        let descriptors = StringDescriptors::new(LangID::EN_US)
            .manufacturer(device_info.manufacturer)
            .serial_number(device_info.serial_number)
            .product(device_info.product_name);
        let usb_device = UsbDeviceBuilder::new(
            usb_bus_alloc,
            UsbVidPid(device_info.vendor_id, device_info.product_id),
        )
        .strings(&[descriptors])?
        .device_class(0)
        .build();

        Ok(UsbCommunicator {
            usb_device,
            keyboard_usb_hid,
            media_usb_hid,
            mouse_usb_hid,
            mouse_active: Cell::new(false),
        })
    }

    pub fn poll(&mut self) {
        self.usb_device.poll(&mut [
            &mut self.keyboard_usb_hid,
            &mut self.media_usb_hid,
            &mut self.mouse_usb_hid,
        ]);
    }

    pub fn state(&self) -> UsbDeviceState {
        self.usb_device.state()
    }
}

impl<'a, B: UsbBus> ExternalCommunicator for UsbCommunicator<'a, B> {
    type Error = UsbError;

    fn is_ready(&self) -> bool {
        self.usb_device.state() == UsbDeviceState::Configured
    }

    fn send_report(&self, report: &Report) -> Result<(), UsbError> {
        self.keyboard_usb_hid
            .push_input(&HidKeyboardReport::from(report))?;
        self.media_usb_hid.push_input(&media_report(report))?;

        // One all-zero mouse report after activity stops, then silence.
        let active = report.has_mouse_activity();
        if active || self.mouse_active.get() {
            self.mouse_usb_hid.push_input(&mouse_report(report))?;
        }
        self.mouse_active.set(active);
        Ok(())
    }
}
