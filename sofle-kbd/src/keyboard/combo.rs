#[cfg(feature = "defmt")]
use defmt::Format;
use heapless::Vec;

use super::Action;
use crate::config::COMBO_MAX_LENGTH;
use crate::time::{Duration, Instant};

/// Keys that, pressed together, send `action` instead of their own actions.
/// Members are matched by the action their switch resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub struct Combo {
    pub keys: &'static [Action],
    pub action: Action,
}

impl Combo {
    pub const fn new(keys: &'static [Action], action: Action) -> Self {
        assert!(
            keys.len() >= 2 && keys.len() <= COMBO_MAX_LENGTH,
            "a combo needs between 2 and COMBO_MAX_LENGTH keys"
        );
        Combo { keys, action }
    }

    fn contains(&self, action: &Action) -> bool {
        self.keys.contains(action)
    }
}

pub(crate) fn is_member(combos: &[Combo], action: &Action) -> bool {
    combos.iter().any(|c| c.contains(action))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Keep waiting for more members.
    Wait,
    /// Combo at this index is complete.
    Fire(usize),
    /// Nothing can match any more; replay the buffered presses.
    Flush,
}

/// Presses of possible combo members that have not been passed on yet.
#[derive(Debug)]
pub(crate) struct ComboBuffer<S> {
    pressed: Vec<(S, Action, Instant), COMBO_MAX_LENGTH>,
    started: Option<Instant>,
}

impl<S> Default for ComboBuffer<S> {
    fn default() -> Self {
        ComboBuffer {
            pressed: Vec::new(),
            started: None,
        }
    }
}

impl<S: Copy + Eq> ComboBuffer<S> {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }

    pub fn contains(&self, switch: &S) -> bool {
        self.pressed.iter().any(|(s, _, _)| s == switch)
    }

    /// Returns false if the buffer is full.
    pub fn push(&mut self, switch: S, action: Action, now: Instant) -> bool {
        if self.pressed.push((switch, action, now)).is_err() {
            return false;
        }
        self.started.get_or_insert(now);
        true
    }

    pub fn deadline(&self, term: Duration) -> Option<Instant> {
        self.started.map(|started| started + term)
    }

    pub fn check(&self, combos: &[Combo], expired: bool) -> Step {
        let n = self.pressed.len();
        let distinct = self
            .pressed
            .iter()
            .enumerate()
            .all(|(i, (_, a, _))| self.pressed[..i].iter().all(|(_, b, _)| a != b));
        if n == 0 || !distinct {
            return Step::Flush;
        }

        let mut complete = None;
        let mut larger = false;
        for (index, combo) in combos.iter().enumerate() {
            if combo.keys.len() < n || !self.pressed.iter().all(|(_, a, _)| combo.contains(a)) {
                continue;
            }
            if combo.keys.len() == n {
                complete.get_or_insert(index);
            } else {
                larger = true;
            }
        }

        match complete {
            Some(index) if !larger || expired => Step::Fire(index),
            _ if larger && !expired => Step::Wait,
            _ => Step::Flush,
        }
    }

    /// Empties the buffer, returning the presses in order with the time
    /// each one happened.
    pub fn take(&mut self) -> Vec<(S, Action, Instant), COMBO_MAX_LENGTH> {
        self.started = None;
        core::mem::take(&mut self.pressed)
    }
}

/// A combo that fired and is waiting for its member keys to come up.
#[derive(Debug)]
pub(crate) struct ActiveCombo<S> {
    pub index: u8,
    pub members: Vec<S, COMBO_MAX_LENGTH>,
    pub released: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::{action::mod_tap, Key, Modifiers};

    const P: Action = Action::Key(Key::P);
    const F: Action = Action::Key(Key::F);
    const T: Action = mod_tap(Modifiers::LSFT, Action::Key(Key::T));
    const A: Action = Action::Key(Key::A);
    const R: Action = Action::Key(Key::R);
    const S: Action = Action::Key(Key::S);

    static COMBOS: [Combo; 3] = [
        Combo::new(&[P, T], Action::Key(Key::Enter)),
        Combo::new(&[F, T], Action::Key(Key::Delete)),
        Combo::new(&[A, R, S, T], Action::Key(Key::Space)),
    ];

    fn at(ms: u64) -> Instant {
        Instant::from_ticks(ms * 1000)
    }

    #[test]
    fn membership() {
        assert!(is_member(&COMBOS, &T));
        assert!(!is_member(&COMBOS, &Action::Key(Key::Z)));
    }

    #[test]
    fn pair_fires_without_a_larger_candidate() {
        let mut buffer = ComboBuffer::default();
        buffer.push(1u8, P, at(0));
        assert_eq!(buffer.check(&COMBOS, false), Step::Wait);
        buffer.push(2, T, at(10));
        assert_eq!(buffer.check(&COMBOS, false), Step::Fire(0));
        assert_eq!(buffer.deadline(Duration::millis(50)), Some(at(50)));
    }

    #[test]
    fn larger_combo_keeps_waiting() {
        let mut buffer = ComboBuffer::default();
        buffer.push(1u8, A, at(0));
        buffer.push(2, R, at(1));
        buffer.push(3, S, at(2));
        assert_eq!(buffer.check(&COMBOS, false), Step::Wait);
        buffer.push(4, T, at(3));
        assert_eq!(buffer.check(&COMBOS, false), Step::Fire(2));
    }

    #[test]
    fn single_member_flushes_on_expiry() {
        let mut buffer = ComboBuffer::default();
        buffer.push(1u8, T, at(0));
        assert_eq!(buffer.check(&COMBOS, false), Step::Wait);
        assert_eq!(buffer.check(&COMBOS, true), Step::Flush);
        let taken = buffer.take();
        assert_eq!(taken.as_slice(), &[(1, T, at(0))]);
        assert!(buffer.is_empty());
        assert_eq!(buffer.deadline(Duration::millis(50)), None);
    }

    #[test]
    fn unrelated_pair_flushes() {
        let mut buffer = ComboBuffer::default();
        buffer.push(1u8, P, at(0));
        buffer.push(2, F, at(5));
        assert_eq!(buffer.check(&COMBOS, false), Step::Flush);
    }

    #[test]
    fn repeated_action_flushes() {
        let mut buffer = ComboBuffer::default();
        buffer.push(1u8, P, at(0));
        buffer.push(2, P, at(5));
        assert_eq!(buffer.check(&COMBOS, false), Step::Flush);
    }
}
