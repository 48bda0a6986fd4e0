use heapless::{Deque, FnvIndexMap, Vec};

use super::combo::{self, ActiveCombo, ComboBuffer, Step};
use super::hold_tap::{PendingHoldTap, TapToggle};
use super::report::Registry;
use super::tap_dance::{DanceState, Effect};
use super::{
    Action, ExternalCommunicator, KeySwitches, KeyboardState, Keystroke, Layer, LayerState,
    Layout,
};
use crate::config::{
    Config, COMBO_MAX_LENGTH, MAX_ACTIVE_COMBOS, MAX_PRESSED, MAX_TAP_DANCES, MAX_WAITING_EVENTS,
};
use crate::log;
use crate::time::Instant;

/// Where a press comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Source<I> {
    Switch(I),
    Combo(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event<I> {
    Press(Source<I>, Action),
    Release(Source<I>),
}

/// What a press left behind for its release to undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Held {
    Nothing,
    Stroke(Keystroke),
    TapToggle(u8),
    TapDance(u8),
}

#[derive(Debug)]
struct KeyLock<I> {
    armed: bool,
    locked: Option<I>,
}

pub struct Controller<
    const SZ: usize,
    const RO: usize,
    C: ExternalCommunicator,
    K: KeySwitches<SZ, RO>,
    L: Layout<SZ, Identifier = K::Identifier>,
> {
    pub communicator: C,
    pub key_switches: K,
    layout: L,
    config: Config,
    layers: LayerState,
    switches: Vec<K::Identifier, RO>,
    combos: ComboBuffer<K::Identifier>,
    active_combos: Vec<ActiveCombo<K::Identifier>, MAX_ACTIVE_COMBOS>,
    hold_tap: Option<PendingHoldTap<Source<K::Identifier>>>,
    waiting: Deque<Event<K::Identifier>, MAX_WAITING_EVENTS>,
    pressed: FnvIndexMap<Source<K::Identifier>, Held, MAX_PRESSED>,
    dances: [DanceState; MAX_TAP_DANCES],
    tap_toggle: TapToggle,
    key_lock: KeyLock<K::Identifier>,
    registry: Registry,
    bootloader_requested: bool,
}

impl<
        const SZ: usize,
        const RO: usize,
        C: ExternalCommunicator,
        K: KeySwitches<SZ, RO>,
        L: Layout<SZ, Identifier = K::Identifier>,
    > Controller<SZ, RO, C, K, L>
{
    pub fn new(communicator: C, key_switches: K, layout: L) -> Self {
        Self::with_config(communicator, key_switches, layout, Config::default())
    }

    pub fn with_config(communicator: C, key_switches: K, layout: L, config: Config) -> Self {
        Controller {
            communicator,
            key_switches,
            layout,
            config,
            layers: LayerState::default(),
            switches: Vec::new(),
            combos: ComboBuffer::default(),
            active_combos: Vec::new(),
            hold_tap: None,
            waiting: Deque::new(),
            pressed: FnvIndexMap::new(),
            dances: [DanceState::default(); MAX_TAP_DANCES],
            tap_toggle: TapToggle::default(),
            key_lock: KeyLock {
                armed: false,
                locked: None,
            },
            registry: Registry::default(),
            bootloader_requested: false,
        }
    }

    pub fn get_state(&self) -> KeyboardState<L::Layer> {
        KeyboardState {
            layer: self.top_layer(),
            layers: self.layers,
            report: self.registry.report(),
        }
    }

    pub fn layer_state(&self) -> LayerState {
        self.layers
    }

    /// Set once a `Bootloader` key has been pressed.
    pub fn bootloader_requested(&self) -> bool {
        self.bootloader_requested
    }

    /// Scans the switches and runs every change, then every expired timer,
    /// through the pipeline.
    pub fn main_loop(&mut self, now: Instant) {
        let switches = self.key_switches.scan();

        let released: Vec<K::Identifier, RO> = self
            .switches
            .iter()
            .filter(|s| !switches.contains(s))
            .copied()
            .collect();
        let pressed: Vec<K::Identifier, RO> = switches
            .iter()
            .filter(|s| !self.switches.contains(s))
            .copied()
            .collect();
        self.switches = switches;

        for switch in released {
            self.switch_released(switch, now);
        }
        for switch in pressed {
            self.switch_pressed(switch, now);
        }
        self.tick(now);
    }

    /// Sends the oldest queued report, or the current one if nothing is
    /// queued. A report stays queued until it has been sent.
    pub fn send_keys(&mut self) -> Result<(), C::Error> {
        if !self.communicator.is_ready() {
            self.registry.clear_queue();
            return Ok(());
        }

        match self.registry.front() {
            Some(report) => {
                self.communicator.send_report(report)?;
                self.registry.pop_front();
            }
            None => self.communicator.send_report(&self.registry.report())?,
        }
        Ok(())
    }

    fn top_layer(&self) -> L::Layer {
        self.layers
            .active()
            .find_map(L::Layer::from_index)
            .unwrap_or_default()
    }

    fn resolve(&self, switch: &K::Identifier) -> Action {
        self.layers
            .active()
            .filter_map(L::Layer::from_index)
            .map(|layer| self.layout.action(layer, switch))
            .find(|action| *action != Action::Transparent)
            .unwrap_or(Action::No)
    }

    fn switch_pressed(&mut self, switch: K::Identifier, now: Instant) {
        let action = self.resolve(&switch);
        if !combo::is_member(self.layout.combos(), &action) || self.combos.contains(&switch) {
            self.flush_combos();
            self.handle_event(Event::Press(Source::Switch(switch), action), now);
            return;
        }
        // A buffered combo member still counts as a press for pending dances.
        self.interrupt_dances(action);
        if !self.combos.push(switch, action, now) {
            self.flush_combos();
            self.combos.push(switch, action, now);
        }
        self.check_combos(now, false);
    }

    fn switch_released(&mut self, switch: K::Identifier, now: Instant) {
        if let Some(position) = self
            .active_combos
            .iter()
            .position(|c| c.members.contains(&switch))
        {
            let combo = &mut self.active_combos[position];
            combo.members.retain(|m| *m != switch);
            let release = (!combo.released).then_some(combo.index);
            combo.released = true;
            if combo.members.is_empty() {
                self.active_combos.swap_remove(position);
            }
            if let Some(index) = release {
                self.handle_event(Event::Release(Source::Combo(index)), now);
            }
            return;
        }

        if self.combos.contains(&switch) {
            self.flush_combos();
        }
        self.handle_event(Event::Release(Source::Switch(switch)), now);
    }

    fn check_combos(&mut self, now: Instant, expired: bool) {
        match self.combos.check(self.layout.combos(), expired) {
            Step::Wait => {}
            Step::Fire(index) => self.fire_combo(index, now),
            Step::Flush => self.flush_combos(),
        }
    }

    fn fire_combo(&mut self, index: usize, now: Instant) {
        let members: Vec<K::Identifier, COMBO_MAX_LENGTH> =
            self.combos.take().into_iter().map(|(s, _, _)| s).collect();
        let Some(action) = self.layout.combos().get(index).map(|c| c.action) else {
            return;
        };
        let index = index as u8;
        let active = ActiveCombo {
            index,
            members,
            released: false,
        };
        if self.active_combos.push(active).is_err() {
            log::warn!("too many combos held, dropped combo {}", index);
            return;
        }
        log::debug!("combo {} fired", index);
        self.handle_event(Event::Press(Source::Combo(index), action), now);
    }

    /// Passes buffered presses on as they happened, so their timers start
    /// from the original press.
    fn flush_combos(&mut self) {
        for (switch, action, at) in self.combos.take() {
            self.handle_event(Event::Press(Source::Switch(switch), action), at);
        }
    }

    /// Holds events back while a mod-tap is undecided.
    fn handle_event(&mut self, event: Event<K::Identifier>, now: Instant) {
        let Some(pending) = self.hold_tap else {
            match event {
                Event::Press(source, action) => self.process_press(source, action, now),
                Event::Release(source) => self.process_release(source, now),
            }
            return;
        };

        match event {
            Event::Release(source) if source == pending.source => {
                self.hold_tap = None;
                log::debug!("mod-tap tapped {:?}", pending.key);
                self.registry.tap(Keystroke::new(pending.key));
                self.replay(now);
            }
            event => {
                let completes_tap = match event {
                    Event::Release(source) => self
                        .waiting
                        .iter()
                        .any(|e| matches!(e, Event::Press(s, _) if *s == source)),
                    Event::Press(..) => false,
                };
                if let Err(event) = self.waiting.push_back(event) {
                    log::warn!("too many events behind an undecided mod-tap");
                    self.resolve_hold(now);
                    self.handle_event(event, now);
                } else if completes_tap && self.config.permissive_hold {
                    self.resolve_hold(now);
                }
            }
        }
    }

    fn resolve_hold(&mut self, now: Instant) {
        let Some(pending) = self.hold_tap.take() else {
            return;
        };
        log::debug!("mod-tap held {:?}", pending.modifiers);
        let stroke = Keystroke::modifiers_only(pending.modifiers);
        self.registry.register(stroke);
        self.insert_pressed(pending.source, Held::Stroke(stroke), now);
        self.replay(now);
    }

    fn replay(&mut self, now: Instant) {
        let mut events = core::mem::replace(&mut self.waiting, Deque::new());
        while let Some(event) = events.pop_front() {
            self.handle_event(event, now);
        }
    }

    fn process_press(&mut self, source: Source<K::Identifier>, action: Action, now: Instant) {
        self.interrupt_dances(action);

        if let Source::Switch(switch) = source {
            if self.key_lock.locked == Some(switch) {
                log::debug!("key lock released");
                self.key_lock.locked = None;
                return;
            }
            if self.key_lock.armed && action != Action::KeyLock {
                self.key_lock.armed = false;
                self.key_lock.locked = Some(switch);
            }
        }

        let held = match action {
            Action::No | Action::Transparent => Held::Nothing,
            Action::Key(key) => self.register(Keystroke::new(key)),
            Action::Modified(modifiers, key) => self.register(Keystroke::modified(modifiers, key)),
            Action::ModTap(modifiers, key) => {
                self.hold_tap = Some(PendingHoldTap {
                    source,
                    modifiers,
                    key,
                    deadline: now + self.config.tapping_term,
                });
                return;
            }
            Action::LayerTapToggle(layer) => {
                self.tap_toggle.press(layer, now, self.config.tapping_term);
                self.invert_layer(layer);
                Held::TapToggle(layer)
            }
            Action::LayerToggle(layer) => {
                self.invert_layer(layer);
                Held::Nothing
            }
            Action::TapDance(index) => {
                self.press_dance(index, now);
                Held::TapDance(index)
            }
            Action::KeyLock => {
                self.toggle_key_lock(now);
                Held::Nothing
            }
            Action::Bootloader => {
                log::info!("bootloader requested");
                self.bootloader_requested = true;
                Held::Nothing
            }
        };
        self.insert_pressed(source, held, now);
    }

    fn process_release(&mut self, source: Source<K::Identifier>, now: Instant) {
        if let Source::Switch(switch) = source {
            if self.key_lock.locked == Some(switch) {
                return;
            }
        }
        if let Some(held) = self.pressed.remove(&source) {
            self.release_held(held, now);
        }
    }

    fn insert_pressed(&mut self, source: Source<K::Identifier>, held: Held, now: Instant) {
        match self.pressed.insert(source, held) {
            Ok(None) => {}
            Ok(Some(previous)) => self.release_held(previous, now),
            Err((_, held)) => {
                log::warn!("too many keys pressed");
                self.release_held(held, now);
            }
        }
    }

    fn register(&mut self, stroke: Keystroke) -> Held {
        log::debug!("register {:?}", stroke);
        self.registry.register(stroke);
        Held::Stroke(stroke)
    }

    fn release_held(&mut self, held: Held, now: Instant) {
        match held {
            Held::Nothing => {}
            Held::Stroke(stroke) => {
                self.registry.unregister(stroke);
            }
            Held::TapToggle(layer) => {
                let locked = self.tap_toggle.release(
                    layer,
                    now,
                    self.config.tapping_term,
                    self.config.tapping_toggle,
                );
                if locked {
                    log::info!("layer {} locked by tapping", layer);
                } else {
                    self.invert_layer(layer);
                }
            }
            Held::TapDance(index) => {
                let Some(dance) = self.layout.tap_dance(index).copied() else {
                    return;
                };
                if let Some(state) = self.dances.get_mut(index as usize) {
                    let effect = state.release(&dance);
                    self.apply(effect);
                }
            }
        }
    }

    fn invert_layer(&mut self, layer: u8) {
        self.layers.invert(layer);
        log::info!("layers: {:b}", self.layers.bits());
    }

    fn toggle_key_lock(&mut self, now: Instant) {
        match self.key_lock.locked.take() {
            Some(switch) => {
                log::debug!("key lock cancelled");
                if !self.switches.contains(&switch) {
                    self.process_release(Source::Switch(switch), now);
                }
            }
            None => self.key_lock.armed = true,
        }
    }

    fn press_dance(&mut self, index: u8, now: Instant) {
        let Some(dance) = self.layout.tap_dance(index).copied() else {
            log::warn!("no tap dance at index {}", index);
            return;
        };
        let Some(state) = self.dances.get_mut(index as usize) else {
            log::warn!("tap dance {} is out of range", index);
            return;
        };
        let effect = state.press(&dance, now, self.config.tapping_term);
        self.apply(effect);
    }

    fn finish_dance(&mut self, index: usize, interrupted: bool) {
        let Some(dance) = self.layout.tap_dance(index as u8).copied() else {
            return;
        };
        let effect = self.dances[index].finish(&dance, interrupted, self.config.permissive_hold);
        self.apply(effect);
    }

    /// Any press other than the pending dance's own key ends that dance.
    fn interrupt_dances(&mut self, action: Action) {
        for index in 0..MAX_TAP_DANCES {
            if self.dances[index].is_pending() && action != Action::TapDance(index as u8) {
                self.finish_dance(index, true);
            }
        }
    }

    fn apply(&mut self, effect: Option<Effect>) {
        match effect {
            Some(Effect::Register(stroke)) => {
                self.register(stroke);
            }
            Some(Effect::Unregister(stroke)) => {
                self.registry.unregister(stroke);
            }
            Some(Effect::Tap(stroke)) => {
                log::debug!("tap {:?}", stroke);
                self.registry.tap(stroke);
            }
            None => {}
        }
    }

    fn tick(&mut self, now: Instant) {
        if self
            .combos
            .deadline(self.config.combo_term)
            .map_or(false, |deadline| now >= deadline)
        {
            self.check_combos(now, true);
        }
        if self.hold_tap.map_or(false, |pending| now >= pending.deadline) {
            self.resolve_hold(now);
        }
        for index in 0..MAX_TAP_DANCES {
            if self.dances[index]
                .deadline()
                .map_or(false, |deadline| now >= deadline)
            {
                self.finish_dance(index, false);
            }
        }
    }
}
