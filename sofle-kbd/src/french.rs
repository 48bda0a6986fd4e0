//! Actions named after what they type when the host uses the French AZERTY
//! layout. Each one is the US usage of the key that carries the character,
//! with Shift or AltGr added where the character needs it.

use crate::keyboard::action::{algr, lsft};
use crate::keyboard::{Action, Key};

const fn k(key: Key) -> Action {
    Action::Key(key)
}

// Letters that move on AZERTY.
pub const A: Action = k(Key::Q);
pub const Z: Action = k(Key::W);
pub const Q: Action = k(Key::A);
pub const W: Action = k(Key::Z);
pub const M: Action = k(Key::Semicolon_Colon);

// Letters in the same place as on QWERTY.
pub const B: Action = k(Key::B);
pub const C: Action = k(Key::C);
pub const D: Action = k(Key::D);
pub const E: Action = k(Key::E);
pub const F: Action = k(Key::F);
pub const G: Action = k(Key::G);
pub const H: Action = k(Key::H);
pub const I: Action = k(Key::I);
pub const J: Action = k(Key::J);
pub const K: Action = k(Key::K);
pub const L: Action = k(Key::L);
pub const N: Action = k(Key::N);
pub const O: Action = k(Key::O);
pub const P: Action = k(Key::P);
pub const R: Action = k(Key::R);
pub const S: Action = k(Key::S);
pub const T: Action = k(Key::T);
pub const U: Action = k(Key::U);
pub const V: Action = k(Key::V);
pub const X: Action = k(Key::X);
pub const Y: Action = k(Key::Y);

// Number row, unshifted.
pub const SUP2: Action = k(Key::Grave_Tilde);
pub const AMPR: Action = k(Key::Digit1_Exclamation);
pub const EACU: Action = k(Key::Digit2_At);
pub const DQUO: Action = k(Key::Digit3_Number);
pub const QUOT: Action = k(Key::Digit4_Dollar);
pub const LPRN: Action = k(Key::Digit5_Percent);
pub const MINS: Action = k(Key::Digit6_Circumflex);
pub const EGRV: Action = k(Key::Digit7_Ampersand);
pub const UNDS: Action = k(Key::Digit8_Asterisk);
pub const CCED: Action = k(Key::Digit9_LeftParenthesis);
pub const AGRV: Action = k(Key::Digit0_RightParenthesis);
pub const RPRN: Action = k(Key::HyphenMinus_LowLine);
pub const EQL: Action = k(Key::Equal_Plus);

// Other unshifted symbols.
pub const CIRC: Action = k(Key::LeftSquareBracket_LeftCurlyBracket);
pub const DLR: Action = k(Key::RightSquareBracket_RightCurlyBracket);
pub const UGRV: Action = k(Key::Apostrophe_Quotation);
pub const ASTR: Action = k(Key::NonUs_Number_Tilde);
pub const LABK: Action = k(Key::NonUs_BackSlash_VerticalBar);
pub const COMM: Action = k(Key::M);
pub const SCLN: Action = k(Key::Comma_LessThan);
pub const COLN: Action = k(Key::Period_GreaterThan);
pub const EXLM: Action = k(Key::Slash_Question);

// Digits need Shift.
pub const N1: Action = lsft(AMPR);
pub const N2: Action = lsft(EACU);
pub const N3: Action = lsft(DQUO);
pub const N4: Action = lsft(QUOT);
pub const N5: Action = lsft(LPRN);
pub const N6: Action = lsft(MINS);
pub const N7: Action = lsft(EGRV);
pub const N8: Action = lsft(UNDS);
pub const N9: Action = lsft(CCED);
pub const N0: Action = lsft(AGRV);

// Shifted symbols.
pub const DEG: Action = lsft(RPRN);
pub const PLUS: Action = lsft(EQL);
pub const DIAE: Action = lsft(CIRC);
pub const PND: Action = lsft(DLR);
pub const PERC: Action = lsft(UGRV);
pub const MICR: Action = lsft(ASTR);
pub const RABK: Action = lsft(LABK);
pub const QUES: Action = lsft(COMM);
pub const DOT: Action = lsft(SCLN);
pub const SLSH: Action = lsft(COLN);
pub const SECT: Action = lsft(EXLM);

// AltGr symbols.
pub const TILD: Action = algr(EACU);
pub const HASH: Action = algr(DQUO);
pub const LCBR: Action = algr(QUOT);
pub const LBRC: Action = algr(LPRN);
pub const PIPE: Action = algr(MINS);
pub const GRV: Action = algr(EGRV);
pub const BSLS: Action = algr(UNDS);
pub const AT: Action = algr(AGRV);
pub const RBRC: Action = algr(RPRN);
pub const RCBR: Action = algr(EQL);
pub const CURR: Action = algr(DLR);
pub const EURO: Action = algr(E);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::Modifiers;

    #[test]
    fn moved_letters() {
        assert_eq!(A, Action::Key(Key::Q));
        assert_eq!(M, Action::Key(Key::Semicolon_Colon));
    }

    #[test]
    fn digits_are_shifted() {
        assert_eq!(
            N1,
            Action::Modified(Modifiers::LSFT, Key::Digit1_Exclamation)
        );
        assert_eq!(
            N0,
            Action::Modified(Modifiers::LSFT, Key::Digit0_RightParenthesis)
        );
    }

    #[test]
    fn altgr_symbols() {
        assert_eq!(
            AT,
            Action::Modified(Modifiers::RALT, Key::Digit0_RightParenthesis)
        );
        assert_eq!(RCBR, Action::Modified(Modifiers::RALT, Key::Equal_Plus));
        assert_eq!(DOT, Action::Modified(Modifiers::LSFT, Key::Comma_LessThan));
    }
}
