//=========================================================================
// Input Event Types
//
// Defines the engine's representation of one frame's raw input.
//
// This module abstracts away platform-specific input (e.g. Winit)
// into a unified, engine-friendly format consumed by the action
// dispatcher and by scenes.
//
// Responsibilities:
// - Represent keyboard, pointer and window events in a portable way
// - Support modifier key combinations (Shift, Ctrl, Alt)
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent batch (this module)
//         ↓
//    ActionDispatcher (global triggers)
//         ↓
//    Active scene handle_input()
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button (side buttons, thumb buttons, macro keys).
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Function Keys ----------------------------------------------------

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
}

//=== InputEvent ==========================================================

/// One raw event in a frame's input batch.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Key pressed down.
    KeyDown { key: KeyCode, modifiers: Modifiers },

    /// Key released.
    KeyUp { key: KeyCode, modifiers: Modifiers },

    /// Mouse button pressed.
    MouseButtonDown { button: MouseButton, modifiers: Modifiers },

    /// Mouse button released.
    MouseButtonUp { button: MouseButton, modifiers: Modifiers },

    /// Pointer moved to a new position (pixels, top-left origin).
    MouseMoved { x: f32, y: f32 },

    /// Window drawable area changed size.
    Resized { width: u32, height: u32 },

    /// User or OS asked the application to quit.
    Quit,
}

//--- Implementation ------------------------------------------------------

impl InputEvent {
    /// Key press without modifiers.
    pub fn key_down(key: KeyCode) -> Self {
        Self::KeyDown { key, modifiers: Modifiers::NONE }
    }

    /// Key release without modifiers.
    pub fn key_up(key: KeyCode) -> Self {
        Self::KeyUp { key, modifiers: Modifiers::NONE }
    }

    /// Mouse button press without modifiers.
    pub fn button_down(button: MouseButton) -> Self {
        Self::MouseButtonDown { button, modifiers: Modifiers::NONE }
    }

    /// Returns a new event with updated modifiers (consumes self).
    ///
    /// Has no effect on pointer motion and window events.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        match &mut self {
            Self::KeyDown { modifiers: m, .. }
            | Self::KeyUp { modifiers: m, .. }
            | Self::MouseButtonDown { modifiers: m, .. }
            | Self::MouseButtonUp { modifiers: m, .. } => {
                *m = modifiers;
            }
            _ => {}
        }
        self
    }
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Modifiers must match exactly for a trigger to fire:
/// a `Ctrl+S` trigger does NOT match `Ctrl+Shift+S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_events_compare_by_key_and_modifiers() {
        assert_eq!(InputEvent::key_down(KeyCode::KeyA), InputEvent::key_down(KeyCode::KeyA));
        assert_ne!(InputEvent::key_down(KeyCode::KeyA), InputEvent::key_up(KeyCode::KeyA));
        assert_ne!(
            InputEvent::key_down(KeyCode::KeyS),
            InputEvent::key_down(KeyCode::KeyS).with_modifiers(Modifiers::CTRL)
        );
    }

    #[test]
    fn pointer_and_window_events_compare_by_payload() {
        assert_eq!(
            InputEvent::MouseMoved { x: 1.0, y: 2.0 },
            InputEvent::MouseMoved { x: 1.0, y: 2.0 }
        );
        assert_ne!(
            InputEvent::MouseMoved { x: 1.0, y: 2.0 },
            InputEvent::MouseMoved { x: 300.0, y: 400.0 }
        );
        assert_ne!(
            InputEvent::Resized { width: 640, height: 480 },
            InputEvent::Resized { width: 800, height: 600 }
        );
    }

    #[test]
    fn with_modifiers_ignores_pointer_motion() {
        let moved = InputEvent::MouseMoved { x: 5.0, y: 5.0 }.with_modifiers(Modifiers::SHIFT);
        assert!(matches!(moved, InputEvent::MouseMoved { x, y } if x == 5.0 && y == 5.0));
    }
}
