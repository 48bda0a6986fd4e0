//! Four layers for a French AZERTY host: a Colemak-like base with home-row
//! mod-taps, symbols, mouse and numbers, and a base without mod-taps.
//!
//! Each layer table is 5 rows by 14 columns as seen from above. The left
//! half fills columns 0-6 and the right half columns 7-13, mirrored, so
//! right-hand column `c` lands in table column `13 - c`.

use smart_leds::hsv::Hsv;
use sofle_kbd::french as fr;
use sofle_kbd::keyboard::action::{key, lca, mod_tap};
use sofle_kbd::keyboard::{self, layout, Action, Combo, Key, Layout, Modifiers, TapDance};
use sofle_kbd::rgb;

use crate::{KeySwitchIdentifier, SplitSwitch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, keyboard::Layer)]
pub enum Layer {
    #[default]
    Base,
    Symbols,
    Mouse,
    Plain,
}

pub const ROWS: usize = 5;
pub const COLS: usize = 14;

pub const TD_LOCK: u8 = 0;
pub const TD_COLN: u8 = 1;
pub const TD_COMM: u8 = 2;
pub const TD_DOT: u8 = 3;
pub const TD_MEDIA: u8 = 4;

#[rustfmt::skip]
const KEYMAP: [[[Action; COLS]; ROWS]; 4] = [
    layout! {r"
        |Esc |{fr::N1}        |{fr::N2}  |{fr::N3}  |{fr::N4}  |{fr::N5}|    |    |{fr::N6}|{fr::N7}  |{fr::N8}  |{fr::N9}  |{fr::N0}        |Del     |
        |Tab |{fr::Q}         |{fr::W}   |{fr::F}   |{fr::P}   |{fr::B} |    |    |{fr::J} |{fr::L}   |{fr::O}   |{fr::Y}   |TD(1)           |{fr::EQL}|
        |LSft|MT(LCtl, {fr::A})|MT(LAlt, R)|MT(RAlt, S)|MT(LSft, T)|G   |    |    |{fr::M} |MT(RSft, N)|MT(RAlt, E)|MT(LAlt, I)|MT(RCtl, {fr::U})|'       |
        |LCtl|{fr::Z}         |{fr::X}   |{fr::C}   |{fr::V}   |{fr::D} |Btn1|Btn2|{fr::K} |{fr::H}   |TD(2)     |TD(3)     |{fr::EXLM}      |Caps    |
        |    |Left            |Right     |TD(0)     |Space     |BSpc    |    |    |TT(1)   |Enter     |TT(2)     |Up        |Down            |        |
    "},
    layout! {r"
        |Lock      |F1        |F2        |F3        |F4        |F5        |     |    |F6        |F7        |F8        |F9        |F10       |F11       |
        |{fr::SUP2}|{fr::AMPR}|{fr::EACU}|{fr::DQUO}|{fr::QUOT}|{fr::DLR} |     |    |{fr::MINS}|{fr::EGRV}|{fr::UNDS}|{fr::CCED}|{fr::AGRV}|F12       |
        |{fr::SLSH}|{fr::BSLS}|{fr::TILD}|{fr::CIRC}|{fr::HASH}|{fr::PLUS}|     |    |{fr::AT}  |{fr::ASTR}|{fr::GRV} |{fr::DIAE}|Up        |{fr::UGRV}|
        |{fr::LCBR}|{fr::RCBR}|{fr::LBRC}|{fr::RBRC}|{fr::LPRN}|{fr::RPRN}|TG(3)|    |{fr::PERC}|{fr::PLUS}|{fr::PIPE}|Left      |Down      |Right     |
        |          |Trn       |Trn       |Trn       |Trn       |Trn       |     |    |Trn       |Trn       |Trn       |Trn       |Trn       |          |
    "},
    layout! {r"
        |Boot |F13 |F14 |F15 |F16 |F17 |    |     |          |{fr::EQL} |{fr::N7}  |{fr::N8}|{fr::N9} |{fr::ASTR}|
        |     |WhLt|MsUp|WhRt|WhUp|F18 |    |     |{fr::LABK}|{fr::RABK}|{fr::N4}  |{fr::N5}|{fr::N6} |{fr::PLUS}|
        |     |MsLt|MsDn|MsRt|WhDn|F19 |    |     |Home      |End       |{fr::N1}  |{fr::N2}|{fr::N3} |{fr::MINS}|
        |PrScr|F24 |F23 |F22 |F21 |F20 |Mute|TD(4)|PgUp      |PgDn      |{fr::COMM}|{fr::N0}|{fr::DOT}|{fr::SLSH}|
        |     |Trn |Trn |Trn |Trn |Trn |    |     |Trn       |Trn       |Trn       |Trn     |Trn      |          |
    "},
    layout! {r"
        |Esc |{fr::N1}|{fr::N2}|{fr::N3}|{fr::N4}|{fr::N5}|     |    |{fr::N6}|{fr::N7}|{fr::N8}   |{fr::N9}  |{fr::N0}    |Del |
        |Tab |{fr::Q} |{fr::W} |{fr::F} |{fr::P} |{fr::B} |     |    |{fr::J} |{fr::L} |{fr::O}    |{fr::Y}   |{fr::COLN}  |BSpc|
        |LSft|{fr::A} |R       |S       |T       |G       |     |    |{fr::M} |N       |E          |I         |{fr::U}     |'   |
        |LCtl|{fr::Z} |{fr::X} |{fr::C} |{fr::V} |{fr::D} |TG(3)|Btn2|{fr::K} |{fr::H} |{fr::COMM} |{fr::DOT} |{fr::EXLM}  |RSft|
        |    |F2      |F3      |F4      |Space   |F5      |     |    |LAlt    |Enter   |RGui       |Up        |Down        |    |
    "},
];

/// Counter-clockwise and clockwise actions of the (left, right) encoder.
const ENCODER_MAP: [[(Action, Action); 2]; 4] = {
    const POINTER: [(Action, Action); 2] = [
        (key(Key::MouseUp), key(Key::MouseDown)),
        (key(Key::MouseLeft), key(Key::MouseRight)),
    ];
    [
        POINTER,
        POINTER,
        [
            (key(Key::VolumeUp), key(Key::VolumeDown)),
            (
                key(Key::MediaBrightnessIncrement),
                key(Key::MediaBrightnessDecrement),
            ),
        ],
        POINTER,
    ]
};

pub static TAP_DANCES: [TapDance; 5] = [
    // Command, or lock the screen.
    TapDance::double(key(Key::LeftGui), lca(fr::L)),
    TapDance::tap_hold(fr::COLN, fr::SCLN),
    TapDance::tap_hold(fr::COMM, fr::LABK),
    TapDance::tap_hold(fr::DOT, fr::RABK),
    TapDance::double(key(Key::MediaPlayPause), key(Key::MediaNextTrack)),
];

const SHIFT_T: Action = mod_tap(Modifiers::LSFT, key(Key::T));
const ALGR_S: Action = mod_tap(Modifiers::RALT, key(Key::S));
const ALT_R: Action = mod_tap(Modifiers::LALT, key(Key::R));
const CTRL_A: Action = mod_tap(Modifiers::LCTL, fr::A);

pub static COMBOS: [Combo; 4] = [
    Combo::new(&[fr::P, SHIFT_T], key(Key::Enter)),
    Combo::new(&[fr::F, SHIFT_T], key(Key::Delete)),
    Combo::new(&[fr::P, ALGR_S], key(Key::Backspace)),
    Combo::new(&[CTRL_A, ALT_R, ALGR_S, SHIFT_T], key(Key::Space)),
];

pub static LAYER_COLORS: [Hsv; 4] = [rgb::BLUE, rgb::ORANGE, rgb::GREEN, rgb::CYAN];

#[derive(Debug, Default, Clone, Copy)]
pub struct SofleLayout;

impl SofleLayout {
    fn table_position(switch: &SplitSwitch) -> Option<(usize, usize)> {
        let KeySwitchIdentifier { row, col } = switch.inner();
        let col = if switch.is_left() {
            col as usize
        } else {
            (COLS - 1).checked_sub(col as usize)?
        };
        (row < ROWS as u8 && col < COLS).then_some((row as usize, col))
    }
}

impl Layout<3> for SofleLayout {
    type Identifier = SplitSwitch;
    type Layer = Layer;

    fn action(&self, layer: Layer, switch: &SplitSwitch) -> Action {
        let layer = keyboard::Layer::index(&layer) as usize;
        let inner = switch.inner();
        if inner.is_encoder() {
            let encoder = if switch.is_left() { 0 } else { 1 };
            let (ccw, cw) = ENCODER_MAP[layer][encoder];
            return match inner.col {
                0 => ccw,
                1 => cw,
                _ => Action::No,
            };
        }
        match Self::table_position(switch) {
            Some((row, col)) => KEYMAP[layer][row][col],
            None => Action::No,
        }
    }

    fn tap_dance(&self, index: u8) -> Option<&TapDance> {
        TAP_DANCES.get(index as usize)
    }

    fn combos(&self) -> &[Combo] {
        &COMBOS
    }
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;

    use sofle_kbd::keyboard::{Controller, ExternalCommunicator, KeySwitches, Report};
    use sofle_kbd::split::SplitKeySwitchIdentifier::{Left, Right};
    use sofle_kbd::time::Instant;
    use sofle_kbd::Vec;

    use super::*;

    fn left(row: u8, col: u8) -> SplitSwitch {
        Left(KeySwitchIdentifier::new(row, col))
    }

    fn right(row: u8, col: u8) -> SplitSwitch {
        Right(KeySwitchIdentifier::new(row, col))
    }

    fn action(layer: Layer, switch: SplitSwitch) -> Action {
        SofleLayout.action(layer, &switch)
    }

    #[test]
    fn layer_numbering() {
        use sofle_kbd::keyboard::Layer as _;
        assert_eq!(Layer::Plain.index(), 3);
        assert_eq!(Layer::from_index(2), Some(Layer::Mouse));
        assert_eq!(Layer::from_index(4), None);
    }

    #[test]
    fn base_layer_halves() {
        assert_eq!(action(Layer::Base, left(0, 0)), key(Key::Escape));
        assert_eq!(action(Layer::Base, left(1, 1)), fr::Q);
        assert_eq!(action(Layer::Base, left(2, 1)), CTRL_A);
        assert_eq!(action(Layer::Base, left(3, 6)), key(Key::MouseButton1));
        assert_eq!(action(Layer::Base, left(4, 3)), Action::TapDance(TD_LOCK));
        assert_eq!(action(Layer::Base, right(0, 0)), key(Key::Delete));
        assert_eq!(action(Layer::Base, right(1, 1)), Action::TapDance(TD_COLN));
        assert_eq!(action(Layer::Base, right(3, 6)), key(Key::MouseButton2));
        assert_eq!(action(Layer::Base, right(3, 3)), Action::TapDance(TD_COMM));
        assert_eq!(action(Layer::Base, right(4, 5)), Action::LayerTapToggle(1));
        assert_eq!(action(Layer::Base, right(4, 3)), Action::LayerTapToggle(2));
        assert_eq!(
            action(Layer::Base, right(2, 2)),
            mod_tap(Modifiers::LALT, key(Key::I))
        );
    }

    #[test]
    fn upper_layers() {
        assert_eq!(action(Layer::Symbols, left(0, 0)), Action::KeyLock);
        assert_eq!(action(Layer::Symbols, left(3, 6)), Action::LayerToggle(3));
        assert_eq!(action(Layer::Symbols, right(3, 6)), Action::No);
        assert_eq!(action(Layer::Symbols, left(4, 4)), Action::Transparent);
        assert_eq!(action(Layer::Mouse, left(0, 0)), Action::Bootloader);
        assert_eq!(action(Layer::Mouse, left(3, 6)), key(Key::Mute));
        assert_eq!(
            action(Layer::Mouse, right(3, 6)),
            Action::TapDance(TD_MEDIA)
        );
        assert_eq!(action(Layer::Mouse, right(0, 2)), fr::N8);
        assert_eq!(action(Layer::Plain, left(2, 1)), fr::A);
        assert_eq!(action(Layer::Plain, right(1, 0)), key(Key::Backspace));
        assert_eq!(action(Layer::Plain, right(1, 1)), fr::COLN);
        assert_eq!(action(Layer::Plain, left(4, 1)), key(Key::F2));
        assert_eq!(action(Layer::Plain, right(4, 3)), key(Key::RightGui));
    }

    #[test]
    fn encoders() {
        let ccw = KeySwitchIdentifier::counter_clockwise();
        let cw = KeySwitchIdentifier::clockwise();
        assert_eq!(action(Layer::Base, Left(ccw)), key(Key::MouseUp));
        assert_eq!(action(Layer::Base, Right(cw)), key(Key::MouseRight));
        assert_eq!(action(Layer::Mouse, Left(ccw)), key(Key::VolumeUp));
        assert_eq!(
            action(Layer::Mouse, Right(cw)),
            key(Key::MediaBrightnessDecrement)
        );
    }

    #[test]
    fn outside_the_table() {
        assert_eq!(action(Layer::Base, right(0, 14)), Action::No);
        assert_eq!(action(Layer::Base, left(6, 0)), Action::No);
        assert_eq!(
            action(Layer::Base, Left(KeySwitchIdentifier::new(5, 2))),
            Action::No
        );
    }

    #[test]
    fn tap_dances_and_combos() {
        assert_eq!(
            SofleLayout.tap_dance(TD_LOCK),
            Some(&TapDance::Double(
                key(Key::LeftGui),
                Action::Modified(Modifiers::LCTL | Modifiers::LALT, Key::L)
            ))
        );
        assert_eq!(
            SofleLayout.tap_dance(TD_DOT),
            Some(&TapDance::TapHold {
                tap: fr::DOT,
                hold: fr::RABK
            })
        );
        assert_eq!(SofleLayout.tap_dance(5), None);

        // Combo members are the keys as they appear on the base layer.
        assert_eq!(action(Layer::Base, left(1, 4)), COMBOS[0].keys[0]);
        assert_eq!(action(Layer::Base, left(2, 4)), COMBOS[0].keys[1]);
        assert_eq!(action(Layer::Base, left(1, 3)), COMBOS[1].keys[0]);
        assert_eq!(action(Layer::Base, left(2, 3)), COMBOS[2].keys[1]);
        assert_eq!(
            (1..=4)
                .map(|c| action(Layer::Base, left(2, c)))
                .collect::<std::vec::Vec<_>>(),
            COMBOS[3].keys
        );
    }

    #[test]
    fn layer_colors() {
        assert_eq!(LAYER_COLORS[0], rgb::BLUE);
        assert_eq!(LAYER_COLORS[3], rgb::CYAN);
    }

    #[derive(Default)]
    struct Switches {
        down: Vec<SplitSwitch, 16>,
    }

    impl KeySwitches<3, 16> for Switches {
        type Identifier = SplitSwitch;

        fn scan(&mut self) -> Vec<SplitSwitch, 16> {
            self.down.clone()
        }
    }

    #[derive(Default)]
    struct Host {
        sent: RefCell<std::vec::Vec<Report>>,
    }

    impl ExternalCommunicator for Host {
        type Error = ();

        fn is_ready(&self) -> bool {
            true
        }

        fn send_report(&self, report: &Report) -> Result<(), ()> {
            self.sent.borrow_mut().push(report.clone());
            Ok(())
        }
    }

    type Keyboard = Controller<3, 16, Host, Switches, SofleLayout>;

    fn scan(keyboard: &mut Keyboard, down: &[SplitSwitch], ms: u64) {
        keyboard.key_switches.down = down.iter().copied().collect();
        keyboard.main_loop(Instant::from_ticks(ms * 1000));
        keyboard.send_keys().unwrap();
    }

    fn sent_keys(keyboard: &Keyboard) -> std::vec::Vec<std::vec::Vec<Key>> {
        keyboard
            .communicator
            .sent
            .borrow()
            .iter()
            .map(|r| r.keys.to_vec())
            .collect()
    }

    #[test]
    fn p_and_t_together_send_enter() {
        let mut keyboard: Keyboard =
            Controller::new(Host::default(), Switches::default(), SofleLayout);
        scan(&mut keyboard, &[left(1, 4)], 0);
        scan(&mut keyboard, &[left(1, 4), left(2, 4)], 10);
        scan(&mut keyboard, &[], 60);
        scan(&mut keyboard, &[], 70);
        assert_eq!(
            sent_keys(&keyboard),
            vec![vec![], vec![Key::Enter], vec![], vec![]]
        );
    }

    #[test]
    fn symbols_layer_through_tap_toggle() {
        let mut keyboard: Keyboard =
            Controller::new(Host::default(), Switches::default(), SofleLayout);
        scan(&mut keyboard, &[right(4, 5)], 0);
        scan(&mut keyboard, &[right(4, 5), left(1, 1)], 10);
        assert_eq!(keyboard.get_state().layer, Layer::Symbols);
        scan(&mut keyboard, &[right(4, 5)], 20);
        scan(&mut keyboard, &[], 30);
        assert_eq!(keyboard.get_state().layer, Layer::Base);
        let sent = keyboard.communicator.sent.borrow();
        assert!(sent
            .iter()
            .any(|r| r.keys.as_slice() == [Key::Digit1_Exclamation]));
    }
}
