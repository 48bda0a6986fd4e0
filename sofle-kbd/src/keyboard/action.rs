#[cfg(feature = "defmt")]
use defmt::Format;

use super::{Key, Modifiers};

/// What a key slot does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum Action {
    /// Does nothing.
    No,
    /// Uses whatever the next lower active layer has in this slot.
    Transparent,
    Key(Key),
    /// Sends `Key` with extra modifiers held.
    Modified(Modifiers, Key),
    /// Tapped: `Key`. Held: the modifiers.
    ModTap(Modifiers, Key),
    /// Layer on while held, locked on after enough consecutive taps.
    LayerTapToggle(u8),
    /// Flips the layer on press.
    LayerToggle(u8),
    /// Index into the layout's tap-dance table.
    TapDance(u8),
    /// Keeps the next pressed key held until it is pressed again.
    KeyLock,
    Bootloader,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Action::No | Action::Transparent)
    }

    /// The keystroke this action registers when pressed, for actions that
    /// register exactly one.
    pub fn keystroke(&self) -> Option<Keystroke> {
        match *self {
            Action::Key(key) => Some(Keystroke::new(key)),
            Action::Modified(modifiers, key) => Some(Keystroke::modified(modifiers, key)),
            _ => None,
        }
    }
}

/// Something registered with the host: a key, optionally with modifiers
/// held along with it. `Key::None` with modifiers is a bare modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub struct Keystroke {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl Keystroke {
    pub const fn new(key: Key) -> Self {
        Keystroke {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    pub const fn modified(modifiers: Modifiers, key: Key) -> Self {
        Keystroke { key, modifiers }
    }

    pub const fn modifiers_only(modifiers: Modifiers) -> Self {
        Keystroke {
            key: Key::None,
            modifiers,
        }
    }

    /// A key with modifiers that only exist for its sake, like a shifted
    /// symbol.
    pub fn is_modified_key(&self) -> bool {
        !self.key.is_noop() && !self.modifiers.is_empty()
    }
}

pub const fn key(key: Key) -> Action {
    Action::Key(key)
}

/// Adds modifiers to a plain or already-modified key.
pub const fn modified(modifiers: Modifiers, action: Action) -> Action {
    match action {
        Action::Key(key) => Action::Modified(modifiers, key),
        Action::Modified(inner, key) => Action::Modified(modifiers.union(inner), key),
        _ => panic!("modified: only keys can carry modifiers"),
    }
}

pub const fn lsft(action: Action) -> Action {
    modified(Modifiers::LSFT, action)
}

pub const fn algr(action: Action) -> Action {
    modified(Modifiers::ALGR, action)
}

/// Left Control + left Alt.
pub const fn lca(action: Action) -> Action {
    modified(Modifiers::LCTL.union(Modifiers::LALT), action)
}

/// Mod-tap: the tap part must be a plain key.
pub const fn mod_tap(modifiers: Modifiers, action: Action) -> Action {
    match action {
        Action::Key(key) => Action::ModTap(modifiers, key),
        _ => panic!("mod_tap: the tap action must be a plain key"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modified_stacks_modifiers() {
        let action = lca(lsft(key(Key::L)));
        assert_eq!(
            action,
            Action::Modified(
                Modifiers::LCTL | Modifiers::LALT | Modifiers::LSFT,
                Key::L
            )
        );
    }

    #[test]
    fn keystroke_classification() {
        assert!(!Keystroke::new(Key::A).is_modified_key());
        assert!(
            Keystroke::modified(Modifiers::LSFT, Key::Digit1_Exclamation).is_modified_key()
        );
        assert!(
            !Keystroke::modifiers_only(Modifiers::LSFT).is_modified_key()
        );
        assert_eq!(Action::LayerToggle(3).keystroke(), None);
    }

    #[test]
    fn mod_tap_from_plain_key() {
        assert_eq!(
            mod_tap(Modifiers::LSFT, key(Key::T)),
            Action::ModTap(Modifiers::LSFT, Key::T)
        );
    }

    #[test]
    #[should_panic]
    fn mod_tap_rejects_modified_key() {
        mod_tap(Modifiers::LSFT, lsft(key(Key::Digit1_Exclamation)));
    }
}
