use super::{Key, Modifiers};
use crate::time::{Duration, Instant};

/// A mod-tap key that has been pressed but is neither a tap nor a hold yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingHoldTap<S> {
    pub source: S,
    pub modifiers: Modifiers,
    pub key: Key,
    pub deadline: Instant,
}

/// Counts consecutive quick taps of a `TT(n)` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TapToggle {
    layer: u8,
    taps: u8,
    pressed_at: Option<Instant>,
    released_at: Option<Instant>,
}

impl TapToggle {
    pub fn press(&mut self, layer: u8, now: Instant, term: Duration) {
        let continues = self.layer == layer
            && self
                .released_at
                .map_or(false, |released| now <= released + term);
        if !continues {
            self.taps = 0;
        }
        self.layer = layer;
        self.pressed_at = Some(now);
    }

    /// Returns true if this release locks the layer, in which case the
    /// layer must not be inverted back.
    pub fn release(&mut self, layer: u8, now: Instant, term: Duration, toggle: u8) -> bool {
        let quick = self.layer == layer
            && self
                .pressed_at
                .map_or(false, |pressed| now <= pressed + term);
        self.pressed_at = None;
        self.released_at = Some(now);
        if !quick {
            self.taps = 0;
            return false;
        }
        self.taps = self.taps.saturating_add(1);
        if self.taps >= toggle {
            self.taps = 0;
            true
        } else {
            false
        }
    }
}
