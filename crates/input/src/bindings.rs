use crate::action::Action;
use cubelab_common::MovementDirection;
use glam::Vec2;
use std::collections::{BTreeMap, BTreeSet};

/// Keys the sandbox reacts to. The window layer maps its own key codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    LeftControl,
    Escape,
    M,
}

/// Key to action table.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: BTreeMap<Key, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let map = BTreeMap::from([
            (Key::W, Action::Move(MovementDirection::Forward)),
            (Key::S, Action::Move(MovementDirection::Backward)),
            (Key::A, Action::Move(MovementDirection::Left)),
            (Key::D, Action::Move(MovementDirection::Right)),
            (Key::Space, Action::Move(MovementDirection::Up)),
            (Key::LeftControl, Action::Move(MovementDirection::Down)),
            (Key::Escape, Action::Quit),
            (Key::M, Action::ToggleCursorCapture),
        ]);
        Self { map }
    }
}

impl KeyBindings {
    /// A table with no bindings.
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    pub fn bind(&mut self, key: Key, action: Action) {
        self.map.insert(key, action);
    }

    pub fn action(&self, key: Key) -> Action {
        self.map.get(&key).copied().unwrap_or(Action::Noop)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Held-key tracking on top of a binding table.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    bindings: KeyBindings,
    held: BTreeSet<Key>,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: BTreeSet::new(),
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Record a key transition.
    ///
    /// Returns an edge-triggered action when a bound toggle key is freshly
    /// pressed. Repeats and releases never return one; movement keys only
    /// update the held set.
    pub fn key_event(&mut self, key: Key, pressed: bool, repeat: bool) -> Option<Action> {
        if !pressed {
            self.held.remove(&key);
            return None;
        }

        let fresh = self.held.insert(key) && !repeat;
        let action = self.bindings.action(key);
        if fresh && action.is_edge_triggered() {
            tracing::debug!(?key, ?action, "edge action");
            Some(action)
        } else {
            None
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Movement directions of every held key, in `MovementDirection` order, without duplicates.
    pub fn held_movements(&self) -> Vec<MovementDirection> {
        let dirs: BTreeSet<MovementDirection> = self
            .held
            .iter()
            .filter_map(|key| match self.bindings.action(*key) {
                Action::Move(dir) => Some(dir),
                _ => None,
            })
            .collect();
        dirs.into_iter().collect()
    }

    /// Forget every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

/// Whether the cursor is grabbed for mouse look. Starts captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorCapture {
    captured: bool,
}

impl Default for CursorCapture {
    fn default() -> Self {
        Self { captured: true }
    }
}

impl CursorCapture {
    pub fn is_captured(self) -> bool {
        self.captured
    }

    /// Flip the capture state and return the new one.
    pub fn toggle(&mut self) -> bool {
        self.captured = !self.captured;
        self.captured
    }
}

/// Integrates raw pointer deltas into an absolute virtual cursor position.
///
/// A locked cursor reports only motion deltas; mouse look consumes absolute
/// coordinates, so the deltas are summed here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTracker {
    position: Vec2,
}

impl PointerTracker {
    pub fn new(start: Vec2) -> Self {
        Self { position: start }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn accumulate(&mut self, dx: f32, dy: f32) -> Vec2 {
        self.position += Vec2::new(dx, dy);
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_cover_every_direction() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.len(), 8);
        for dir in MovementDirection::ALL {
            let bound = [Key::W, Key::A, Key::S, Key::D, Key::Space, Key::LeftControl]
                .into_iter()
                .any(|k| bindings.action(k) == Action::Move(dir));
            assert!(bound, "{dir:?} has no key");
        }
        assert_eq!(bindings.action(Key::Escape), Action::Quit);
        assert_eq!(bindings.action(Key::M), Action::ToggleCursorCapture);
    }

    #[test]
    fn unbound_key_is_noop() {
        let bindings = KeyBindings::empty();
        assert!(bindings.is_empty());
        assert_eq!(bindings.action(Key::W), Action::Noop);
    }

    #[test]
    fn toggle_fires_once_per_press() {
        let mut input = InputState::default();
        assert_eq!(
            input.key_event(Key::M, true, false),
            Some(Action::ToggleCursorCapture)
        );
        // Held down: OS key repeat must not toggle again.
        assert_eq!(input.key_event(Key::M, true, true), None);
        assert_eq!(input.key_event(Key::M, true, false), None);
        assert_eq!(input.key_event(Key::M, false, false), None);
        assert_eq!(
            input.key_event(Key::M, true, false),
            Some(Action::ToggleCursorCapture)
        );
    }

    #[test]
    fn movement_keys_are_held_not_emitted() {
        let mut input = InputState::default();
        assert_eq!(input.key_event(Key::W, true, false), None);
        assert_eq!(input.key_event(Key::Space, true, false), None);
        assert!(input.is_held(Key::W));
        assert_eq!(
            input.held_movements(),
            vec![MovementDirection::Forward, MovementDirection::Up]
        );

        input.key_event(Key::W, false, false);
        assert_eq!(input.held_movements(), vec![MovementDirection::Up]);
    }

    #[test]
    fn held_movements_deduplicate() {
        let mut bindings = KeyBindings::default();
        bindings.bind(Key::M, Action::Move(MovementDirection::Forward));
        let mut input = InputState::new(bindings);
        input.key_event(Key::W, true, false);
        input.key_event(Key::M, true, false);
        assert_eq!(input.held_movements(), vec![MovementDirection::Forward]);
    }

    #[test]
    fn release_all_clears_movement() {
        let mut input = InputState::default();
        input.key_event(Key::A, true, false);
        input.key_event(Key::D, true, false);
        input.release_all();
        assert!(input.held_movements().is_empty());
    }

    #[test]
    fn cursor_starts_captured() {
        let mut capture = CursorCapture::default();
        assert!(capture.is_captured());
        assert!(!capture.toggle());
        assert!(capture.toggle());
    }

    #[test]
    fn pointer_accumulates_deltas() {
        let mut pointer = PointerTracker::new(Vec2::new(400.0, 300.0));
        pointer.accumulate(10.0, -5.0);
        let pos = pointer.accumulate(-2.0, 1.0);
        assert_eq!(pos, Vec2::new(408.0, 296.0));
        assert_eq!(pointer.position(), pos);
    }
}
