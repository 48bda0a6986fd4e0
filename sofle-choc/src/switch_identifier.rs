use sofle_kbd::{keyboard, split::SplitKeySwitchIdentifier};

/// A switch on one half, in keymap coordinates: rows 0-4 are keys,
/// row 5 is the encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeySwitchIdentifier {
    pub row: u8,
    pub col: u8,
}

/// A switch on either half.
pub type SplitSwitch = SplitKeySwitchIdentifier<2, KeySwitchIdentifier>;

impl KeySwitchIdentifier {
    /// Virtual row for encoder turns.
    pub const ENCODER_ROW: u8 = 5;

    pub const fn new(row: u8, col: u8) -> Self {
        KeySwitchIdentifier { row, col }
    }

    /// Maps an electrical matrix position. The key next to the encoder is
    /// wired as row 4, column 0 but sits at the inner end of row 3.
    pub const fn from_matrix(row: u8, col: u8) -> Self {
        match (row, col) {
            (4, 0) => KeySwitchIdentifier::new(3, 6),
            (row, col) => KeySwitchIdentifier::new(row, col),
        }
    }

    pub const fn counter_clockwise() -> Self {
        KeySwitchIdentifier::new(Self::ENCODER_ROW, 0)
    }

    pub const fn clockwise() -> Self {
        KeySwitchIdentifier::new(Self::ENCODER_ROW, 1)
    }

    pub fn is_encoder(&self) -> bool {
        self.row == Self::ENCODER_ROW
    }
}

impl From<[u8; 2]> for KeySwitchIdentifier {
    fn from(value: [u8; 2]) -> Self {
        KeySwitchIdentifier {
            row: value[0],
            col: value[1],
        }
    }
}

impl From<KeySwitchIdentifier> for [u8; 2] {
    fn from(value: KeySwitchIdentifier) -> Self {
        [value.row, value.col]
    }
}

impl keyboard::KeySwitchIdentifier<2> for KeySwitchIdentifier {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_positions() {
        assert_eq!(
            KeySwitchIdentifier::from_matrix(4, 0),
            KeySwitchIdentifier::new(3, 6)
        );
        assert_eq!(
            KeySwitchIdentifier::from_matrix(4, 3),
            KeySwitchIdentifier::new(4, 3)
        );
        assert_eq!(
            KeySwitchIdentifier::from_matrix(2, 0),
            KeySwitchIdentifier::new(2, 0)
        );
    }

    #[test]
    fn encoder_switches() {
        assert!(KeySwitchIdentifier::clockwise().is_encoder());
        assert!(!KeySwitchIdentifier::new(4, 1).is_encoder());
        let bytes: [u8; 2] = KeySwitchIdentifier::counter_clockwise().into();
        assert_eq!(bytes, [5, 0]);
    }
}
