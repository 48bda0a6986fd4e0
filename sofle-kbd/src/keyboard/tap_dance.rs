//! Tap dances: keys whose action depends on how often they are tapped and
//! whether the last tap is held.
//!
//! Each dance runs through `Idle → Pending → Held → Idle`. It stays
//! `Pending` while taps keep arriving within the tapping term. When the term
//! runs out, or another key interrupts it, the dance is resolved. If the key
//! is still down at that point, the resolved keystroke is registered and
//! remembered until the key comes up, so the release always undoes exactly
//! what was registered.

#[cfg(feature = "defmt")]
use defmt::Format;

use super::{Action, Keystroke};
use crate::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum TapDance {
    /// One tap sends the first action, a second tap sends the second one
    /// straight away.
    Double(Action, Action),
    /// A tap sends `tap`. A single press held past the tapping term sends
    /// `hold`. Anything else (a tap followed by a hold, or an interrupted
    /// press) sends `tap`.
    TapHold { tap: Action, hold: Action },
}

impl TapDance {
    pub const fn double(first: Action, second: Action) -> Self {
        TapDance::Double(first, second)
    }

    pub const fn tap_hold(tap: Action, hold: Action) -> Self {
        TapDance::TapHold { tap, hold }
    }
}

/// What the controller has to do with the host as a dance progresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Effect {
    Register(Keystroke),
    Unregister(Keystroke),
    Tap(Keystroke),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Pending {
        count: u8,
        pressed: bool,
        deadline: Instant,
    },
    Held(Option<Keystroke>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct DanceState {
    phase: Phase,
}

impl DanceState {
    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending { .. })
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Pending { deadline, .. } => Some(deadline),
            _ => None,
        }
    }

    /// The keystroke currently registered for this dance, if any.
    #[cfg(test)]
    pub fn held(&self) -> Option<Keystroke> {
        match self.phase {
            Phase::Held(held) => held,
            _ => None,
        }
    }

    pub fn press(&mut self, dance: &TapDance, now: Instant, term: Duration) -> Option<Effect> {
        let count = match self.phase {
            Phase::Pending { count, .. } => count.saturating_add(1),
            _ => 1,
        };
        self.phase = Phase::Pending {
            count,
            pressed: true,
            deadline: now + term,
        };
        match dance {
            TapDance::Double(_, second) if count == 2 => {
                let stroke = second.keystroke();
                self.phase = Phase::Held(stroke);
                stroke.map(Effect::Register)
            }
            _ => None,
        }
    }

    pub fn release(&mut self, dance: &TapDance) -> Option<Effect> {
        match self.phase {
            Phase::Pending {
                count, deadline, ..
            } => {
                self.phase = Phase::Pending {
                    count,
                    pressed: false,
                    deadline,
                };
                match dance {
                    TapDance::TapHold { tap, .. } => tap.keystroke().map(Effect::Tap),
                    TapDance::Double(..) => None,
                }
            }
            Phase::Held(held) => {
                self.phase = Phase::Idle;
                held.map(Effect::Unregister)
            }
            Phase::Idle => None,
        }
    }

    /// Resolves a pending dance, either because its term ran out or because
    /// another key was pressed (`interrupted`).
    pub fn finish(
        &mut self,
        dance: &TapDance,
        interrupted: bool,
        permissive_hold: bool,
    ) -> Option<Effect> {
        let Phase::Pending { count, pressed, .. } = self.phase else {
            return None;
        };
        let action = match *dance {
            TapDance::TapHold { tap, hold } => {
                if !pressed {
                    self.phase = Phase::Idle;
                    return None;
                }
                if count == 1 && (permissive_hold || !interrupted) {
                    hold
                } else {
                    tap
                }
            }
            TapDance::Double(first, _) => first,
        };
        let stroke = action.keystroke();
        if pressed {
            self.phase = Phase::Held(stroke);
            stroke.map(Effect::Register)
        } else {
            self.phase = Phase::Idle;
            stroke.map(Effect::Tap)
        }
    }
}
