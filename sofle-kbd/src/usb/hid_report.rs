use usbd_hid::descriptor::generator_prelude::*;
use usbd_hid::descriptor::{MediaKeyboardReport, MouseReport};
use usbd_hid_macros::gen_hid_descriptor;

use crate::keyboard::Report;

/// Boot-compatible keyboard report with six-key rollover.
#[gen_hid_descriptor(
    (collection = APPLICATION, usage_page = GENERIC_DESKTOP, usage = KEYBOARD) = {
        (usage_page = KEYBOARD, usage_min = 0xe0, usage_max = 0xe7) = {
            #[packed_bits 8] #[item_settings data,variable,absolute] modifier=input;
        };
        (usage_min = 0x00, usage_max = 0xff) = {
            #[item_settings constant,variable,absolute] reserved=input;
        };
        (usage_page = KEYBOARD, usage_min = 0x00, usage_max = 0xdd) = {
            #[item_settings data,array,absolute] key_codes=input;
        };
    }
)]
#[repr(C)]
pub struct HidKeyboardReport {
    pub modifier: u8,
    pub reserved: u8,
    pub key_codes: [u8; 6],
}

impl From<&Report> for HidKeyboardReport {
    fn from(report: &Report) -> Self {
        HidKeyboardReport {
            modifier: report.modifiers.bits(),
            reserved: 0,
            key_codes: report.key_codes(),
        }
    }
}

pub(crate) fn media_report(report: &Report) -> MediaKeyboardReport {
    MediaKeyboardReport {
        usage_id: report.media_usage_id(),
    }
}

pub(crate) fn mouse_report(report: &Report) -> MouseReport {
    let (x, y, wheel, pan) = report.mouse_motion();
    MouseReport {
        buttons: report.mouse_buttons(),
        x,
        y,
        wheel,
        pan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::{Key, Modifiers};

    #[test]
    fn keyboard_report_from_report() {
        let mut report = Report {
            modifiers: Modifiers::LCTL | Modifiers::RALT,
            ..Report::default()
        };
        for key in [Key::A, Key::MediaMute, Key::B] {
            report.keys.push(key).unwrap();
        }
        let hid = HidKeyboardReport::from(&report);
        assert_eq!(hid.modifier, 0b0100_0001);
        assert_eq!(hid.key_codes, [0x04, 0x05, 0, 0, 0, 0]);
        assert_eq!({ media_report(&report).usage_id }, 0xe2);
    }

    #[test]
    fn mouse_report_from_report() {
        let mut report = Report::default();
        report.keys.push(Key::MouseLeft).unwrap();
        report.keys.push(Key::MouseButton3).unwrap();
        let mouse = mouse_report(&report);
        assert_eq!(mouse.buttons, 0b100);
        assert!(mouse.x < 0);
        assert_eq!(mouse.y, 0);
    }
}
