use bitflags::bitflags;

bitflags! {
    /// Modifier bits, laid out like the modifier byte of a boot keyboard
    /// report.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct Modifiers: u8 {
        const LCTL = 0b0000_0001;
        const LSFT = 0b0000_0010;
        const LALT = 0b0000_0100;
        const LGUI = 0b0000_1000;
        const RCTL = 0b0001_0000;
        const RSFT = 0b0010_0000;
        const RALT = 0b0100_0000;
        const RGUI = 0b1000_0000;
    }
}

impl Modifiers {
    /// AltGr on ISO layouts.
    pub const ALGR: Modifiers = Modifiers::RALT;
}

#[cfg(feature = "defmt")]
impl defmt::Format for Modifiers {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Modifiers({=u8:#010b})", self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::Key;

    #[test]
    fn bits_match_modifier_keys() {
        assert_eq!(Modifiers::LCTL.bits(), Key::LeftControl.modifier_key_flag());
        assert_eq!(Modifiers::LSFT.bits(), Key::LeftShift.modifier_key_flag());
        assert_eq!(Modifiers::ALGR.bits(), Key::RightAlt.modifier_key_flag());
        assert_eq!(Modifiers::RGUI.bits(), Key::RightGui.modifier_key_flag());
    }
}
