//=========================================================================
// Actions & Triggers
//=========================================================================
//
// Game-defined action trait and stateless input triggers.
//
// Actions:  Opaque identifiers routed by the engine, interpreted by scenes.
// Triggers: Pure predicates over one frame's event batch.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::{self, Debug};
use std::hash::Hash;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== Action Trait ========================================================

/// Marker trait for game-defined action enums.
///
/// Actions represent high-level commands (Select, Back, Launch) bound to
/// triggers by the game and delivered to the active scene each frame.
///
/// ```
/// use launchpad_engine::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum MenuAction { Select, Back }
///
/// impl Action for MenuAction {}
/// ```
pub trait Action: 'static + Send + Copy + Eq + Hash + Debug {}

/// Placeholder action type for games that bind no actions of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoAction {}

impl Action for NoAction {}

//=== Trigger =============================================================

/// Stateless predicate over a frame's input batch.
///
/// A trigger sees only the current batch and keeps nothing between frames,
/// so the same batch always gives the same answer.
pub struct Trigger(Box<dyn Fn(&[InputEvent]) -> bool + Send>);

impl Trigger {
    /// Wraps an arbitrary predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&[InputEvent]) -> bool + Send + 'static,
    {
        Self(Box::new(predicate))
    }

    /// Fires when `key` went down this frame with no modifiers held.
    pub fn key_pressed(key: KeyCode) -> Self {
        Self::key_pressed_with_mods(key, Modifiers::NONE)
    }

    /// Fires when `key` went down this frame with exactly `modifiers` held.
    pub fn key_pressed_with_mods(key: KeyCode, modifiers: Modifiers) -> Self {
        Self::new(move |events| {
            events.iter().any(|e| {
                matches!(e, InputEvent::KeyDown { key: k, modifiers: m } if *k == key && *m == modifiers)
            })
        })
    }

    /// Fires when `button` went down this frame, regardless of modifiers.
    pub fn button_pressed(button: MouseButton) -> Self {
        Self::new(move |events| {
            events
                .iter()
                .any(|e| matches!(e, InputEvent::MouseButtonDown { button: b, .. } if *b == button))
        })
    }

    /// Evaluates the predicate against `events`.
    pub fn fires(&self, events: &[InputEvent]) -> bool {
        (self.0)(events)
    }
}

impl Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Trigger(..)")
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_pressed_matches_key_down_only() {
        let trigger = Trigger::key_pressed(KeyCode::F11);

        assert!(trigger.fires(&[InputEvent::key_down(KeyCode::F11)]));
        assert!(!trigger.fires(&[InputEvent::key_up(KeyCode::F11)]));
        assert!(!trigger.fires(&[InputEvent::key_down(KeyCode::F2)]));
        assert!(!trigger.fires(&[]));
    }

    #[test]
    fn key_pressed_requires_exact_modifiers() {
        let plain = Trigger::key_pressed(KeyCode::KeyS);
        let ctrl = Trigger::key_pressed_with_mods(KeyCode::KeyS, Modifiers::CTRL);
        let ctrl_s = [InputEvent::key_down(KeyCode::KeyS).with_modifiers(Modifiers::CTRL)];

        assert!(!plain.fires(&ctrl_s));
        assert!(ctrl.fires(&ctrl_s));
    }

    #[test]
    fn button_pressed_ignores_modifiers() {
        let trigger = Trigger::button_pressed(MouseButton::Left);
        let event = InputEvent::button_down(MouseButton::Left).with_modifiers(Modifiers::SHIFT);
        assert!(trigger.fires(&[event]));
    }

    #[test]
    fn trigger_is_stateless() {
        let trigger = Trigger::key_pressed(KeyCode::Space);
        let batch = [InputEvent::key_down(KeyCode::Space)];

        assert!(trigger.fires(&batch));
        assert!(trigger.fires(&batch));
        assert!(!trigger.fires(&[]));
        assert!(trigger.fires(&batch));
    }

    #[test]
    fn action_is_send_and_static() {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        enum TestAction {
            Jump,
        }
        impl Action for TestAction {}

        fn assert_action<T: Action>(_: T) {}
        assert_action(TestAction::Jump);
    }
}
