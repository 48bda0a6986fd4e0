use heapless::{Deque, Vec};

use super::{Key, Keystroke, Modifiers};
use crate::config::{MAX_HELD, REPORT_QUEUE_SIZE};
use crate::log;

/// Pointer travel per report while a mouse-move key is held.
pub const MOUSE_STEP: i8 = 8;
/// Wheel travel per report while a wheel key is held.
pub const WHEEL_STEP: i8 = 1;

/// Everything the host should see as held at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    pub modifiers: Modifiers,
    /// Keyboard, consumer and mouse keys in the order they were registered.
    pub keys: Vec<Key, MAX_HELD>,
}

impl Report {
    /// Boot-protocol key codes: the first six keyboard keys.
    pub fn key_codes(&self) -> [u8; 6] {
        let mut codes = [0; 6];
        self.keys
            .iter()
            .filter_map(|k| k.key_code())
            .take(6)
            .enumerate()
            .for_each(|(i, code)| codes[i] = code);
        codes
    }

    /// The most recently registered consumer usage, or 0.
    pub fn media_usage_id(&self) -> u16 {
        self.keys
            .iter()
            .rev()
            .find(|k| k.is_media_key())
            .map(|k| k.media_usage_id())
            .unwrap_or(0)
    }

    pub fn mouse_buttons(&self) -> u8 {
        self.keys
            .iter()
            .fold(0, |flags, k| flags | k.mouse_button_flag())
    }

    /// Pointer and wheel movement as `(x, y, wheel, pan)`.
    pub fn mouse_motion(&self) -> (i8, i8, i8, i8) {
        self.keys
            .iter()
            .fold((0i8, 0i8, 0i8, 0i8), |(x, y, wheel, pan), key| match key {
                Key::MouseUp => (x, y.saturating_sub(MOUSE_STEP), wheel, pan),
                Key::MouseDown => (x, y.saturating_add(MOUSE_STEP), wheel, pan),
                Key::MouseLeft => (x.saturating_sub(MOUSE_STEP), y, wheel, pan),
                Key::MouseRight => (x.saturating_add(MOUSE_STEP), y, wheel, pan),
                Key::WheelUp => (x, y, wheel.saturating_add(WHEEL_STEP), pan),
                Key::WheelDown => (x, y, wheel.saturating_sub(WHEEL_STEP), pan),
                Key::WheelLeft => (x, y, wheel, pan.saturating_sub(WHEEL_STEP)),
                Key::WheelRight => (x, y, wheel, pan.saturating_add(WHEEL_STEP)),
                _ => (x, y, wheel, pan),
            })
    }

    pub fn has_mouse_activity(&self) -> bool {
        self.keys.iter().any(|k| k.is_mouse_key())
    }
}

/// Keystrokes currently registered with the host, and the reports that
/// still have to be sent for past changes.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    held: Vec<Keystroke, MAX_HELD>,
    queue: Deque<Report, REPORT_QUEUE_SIZE>,
}

impl Registry {
    pub fn register(&mut self, stroke: Keystroke) {
        if self.held.push(stroke).is_err() {
            log::warn!("too many keys held, dropped {:?}", stroke);
            return;
        }
        self.enqueue();
    }

    /// Removes one registration of `stroke`. Returns false if it was not
    /// registered.
    pub fn unregister(&mut self, stroke: Keystroke) -> bool {
        match self.held.iter().rposition(|s| *s == stroke) {
            Some(index) => {
                self.held.remove(index);
                self.enqueue();
                true
            }
            None => false,
        }
    }

    pub fn tap(&mut self, stroke: Keystroke) {
        self.register(stroke);
        self.unregister(stroke);
    }

    #[cfg(test)]
    pub fn is_registered(&self, stroke: Keystroke) -> bool {
        self.held.contains(&stroke)
    }

    /// The report for what is held right now.
    pub fn report(&self) -> Report {
        // A modified key stops counting once a later key goes down.
        let latest_key = self
            .held
            .iter()
            .rposition(|s| !s.key.is_noop() && !s.key.is_modifier_key());
        let mut report = Report::default();
        for (index, stroke) in self.held.iter().enumerate() {
            if stroke.is_modified_key() && Some(index) != latest_key {
                continue;
            }
            report.modifiers |= stroke.modifiers;
            report.modifiers |= Modifiers::from_bits_truncate(stroke.key.modifier_key_flag());
            if !stroke.key.is_noop()
                && !stroke.key.is_modifier_key()
                && !report.keys.contains(&stroke.key)
            {
                // Capacity matches `held`.
                let _ = report.keys.push(stroke.key);
            }
        }
        report
    }

    pub fn front(&self) -> Option<&Report> {
        self.queue.front()
    }

    pub fn pop_front(&mut self) -> Option<Report> {
        self.queue.pop_front()
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    fn enqueue(&mut self) {
        let report = self.report();
        if self.queue.back() == Some(&report) {
            return;
        }
        if self.queue.is_full() {
            log::warn!("report queue full, dropping the oldest report");
            self.queue.pop_front();
        }
        let _ = self.queue.push_back(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(registry: &mut Registry) -> std::vec::Vec<Report> {
        std::iter::from_fn(|| registry.pop_front()).collect()
    }

    #[test]
    fn tap_queues_press_and_release() {
        let mut registry = Registry::default();
        registry.tap(Keystroke::new(Key::A));
        let reports = drain(&mut registry);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].keys.as_slice(), &[Key::A]);
        assert_eq!(reports[0].key_codes(), [0x04, 0, 0, 0, 0, 0]);
        assert_eq!(reports[1], Report::default());
    }

    #[test]
    fn modifier_keys_go_to_the_modifier_byte() {
        let mut registry = Registry::default();
        registry.register(Keystroke::new(Key::LeftShift));
        registry.register(Keystroke::modifiers_only(Modifiers::RALT));
        registry.register(Keystroke::new(Key::B));
        let report = registry.report();
        assert_eq!(report.modifiers, Modifiers::LSFT | Modifiers::RALT);
        assert_eq!(report.keys.as_slice(), &[Key::B]);
    }

    #[test]
    fn modified_key_only_counts_while_latest() {
        let mut registry = Registry::default();
        let exclamation = Keystroke::modified(Modifiers::LSFT, Key::Slash_Question);
        registry.register(exclamation);
        assert_eq!(registry.report().modifiers, Modifiers::LSFT);
        registry.register(Keystroke::new(Key::A));
        let report = registry.report();
        assert_eq!(report.modifiers, Modifiers::empty());
        assert_eq!(report.keys.as_slice(), &[Key::A]);
        registry.unregister(Keystroke::new(Key::A));
        assert_eq!(registry.report().keys.as_slice(), &[Key::Slash_Question]);
    }

    #[test]
    fn unregister_removes_only_what_was_registered() {
        let mut registry = Registry::default();
        assert!(!registry.unregister(Keystroke::new(Key::A)));
        registry.register(Keystroke::new(Key::A));
        registry.register(Keystroke::new(Key::A));
        assert!(registry.unregister(Keystroke::new(Key::A)));
        assert!(registry.is_registered(Keystroke::new(Key::A)));
        assert!(registry.unregister(Keystroke::new(Key::A)));
        assert!(!registry.is_registered(Keystroke::new(Key::A)));
    }

    #[test]
    fn media_and_mouse_fields() {
        let mut registry = Registry::default();
        registry.register(Keystroke::new(Key::MediaVolumeIncrement));
        registry.register(Keystroke::new(Key::MouseUp));
        registry.register(Keystroke::new(Key::MouseRight));
        registry.register(Keystroke::new(Key::WheelDown));
        registry.register(Keystroke::new(Key::MouseButton1));
        let report = registry.report();
        assert_eq!(report.media_usage_id(), 0xe9);
        assert_eq!(report.mouse_buttons(), 0b1);
        assert_eq!(
            report.mouse_motion(),
            (MOUSE_STEP, -MOUSE_STEP, -WHEEL_STEP, 0)
        );
        assert_eq!(report.key_codes(), [0; 6]);
        assert!(report.has_mouse_activity());
    }

    #[test]
    fn full_queue_drops_oldest() {
        let mut registry = Registry::default();
        for _ in 0..REPORT_QUEUE_SIZE {
            registry.tap(Keystroke::new(Key::A));
        }
        let reports = drain(&mut registry);
        assert_eq!(reports.len(), REPORT_QUEUE_SIZE);
        assert_eq!(reports.last(), Some(&Report::default()));
    }
}
