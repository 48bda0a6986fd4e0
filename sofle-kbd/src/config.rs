//! Timing parameters and container capacities.

use crate::time::Duration;

/// Time a hold-tap key or tap dance waits before it is treated as held.
pub const TAPPING_TERM_MS: u64 = 200;

/// Time all members of a combo must go down within.
pub const COMBO_TERM_MS: u64 = 50;

/// Consecutive taps of a `TT(n)` key that lock its layer.
pub const TAPPING_TOGGLE: u8 = 5;

/// Switches tracked as pressed at once.
pub const MAX_PRESSED: usize = 16;

/// Keystrokes registered at once.
pub const MAX_HELD: usize = 16;

/// Events held back while a hold-tap key is undecided.
pub const MAX_WAITING_EVENTS: usize = 16;

/// Reports waiting to be sent to the host.
pub const REPORT_QUEUE_SIZE: usize = 32;

/// Keys a single combo can be made of.
pub const COMBO_MAX_LENGTH: usize = 4;

/// Combos that can be held down at the same time.
pub const MAX_ACTIVE_COMBOS: usize = 4;

/// Tap dances with runtime state.
pub const MAX_TAP_DANCES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub tapping_term: Duration,
    pub combo_term: Duration,
    pub tapping_toggle: u8,
    /// Resolve a hold-tap (or an interrupted single-tap dance) as held when
    /// another key is tapped inside it.
    pub permissive_hold: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tapping_term: Duration::millis(TAPPING_TERM_MS),
            combo_term: Duration::millis(COMBO_TERM_MS),
            tapping_toggle: TAPPING_TOGGLE,
            permissive_hold: false,
        }
    }
}
