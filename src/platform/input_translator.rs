//=========================================================================
// Input Translator
//=========================================================================
//
// Winit window events → engine `InputEvent`s.
//
// Modifier state arrives separately (ModifiersChanged) and is stamped on
// every key and button event that follows. OS key repeats and keys the
// engine has no `KeyCode` for produce nothing.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton as WinitButton},
    keyboard::{KeyCode as WinitKey, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== Key Table ===========================================================

// Engine and winit share variant names for every key the engine knows.
macro_rules! shared_keys {
    ($code:expr; $($key:ident)*) => {
        match $code {
            $(WinitKey::$key => Some(KeyCode::$key),)*
            _ => None,
        }
    };
}

fn key_code(code: WinitKey) -> Option<KeyCode> {
    shared_keys!(code;
        Digit0 Digit1 Digit2 Digit3 Digit4 Digit5 Digit6 Digit7 Digit8 Digit9
        KeyA KeyB KeyC KeyD KeyE KeyF KeyG KeyH KeyI KeyJ KeyK KeyL KeyM
        KeyN KeyO KeyP KeyQ KeyR KeyS KeyT KeyU KeyV KeyW KeyX KeyY KeyZ
        F1 F2 F3 F4 F5 F6 F7 F8 F9 F10 F11 F12
        ArrowDown ArrowLeft ArrowRight ArrowUp
        Space Enter Escape Tab Backspace Delete
    )
}

fn mouse_button(button: WinitButton) -> MouseButton {
    match button {
        WinitButton::Left => MouseButton::Left,
        WinitButton::Right => MouseButton::Right,
        WinitButton::Middle => MouseButton::Middle,
        _ => MouseButton::Other,
    }
}

fn modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
    }
}

//=== InputTranslator =====================================================

#[derive(Debug, Default)]
pub(crate) struct InputTranslator {
    modifiers: Modifiers,
}

impl InputTranslator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = modifiers(state);
    }

    pub(crate) fn key(&self, event: &KeyEvent) -> Option<InputEvent> {
        if event.repeat {
            return None;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        key_code(code).map(|key| self.key_event(key, event.state))
    }

    pub(crate) fn button(&self, button: WinitButton, state: ElementState) -> InputEvent {
        let button = mouse_button(button);
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button, modifiers },
            ElementState::Released => InputEvent::MouseButtonUp { button, modifiers },
        }
    }

    pub(crate) fn cursor(&self, position: PhysicalPosition<f64>) -> InputEvent {
        InputEvent::MouseMoved {
            x: position.x as f32,
            y: position.y as f32,
        }
    }

    pub(crate) fn resize(&self, size: PhysicalSize<u32>) -> InputEvent {
        InputEvent::Resized {
            width: size.width,
            height: size.height,
        }
    }

    fn key_event(&self, key: KeyCode, state: ElementState) -> InputEvent {
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => InputEvent::KeyDown { key, modifiers },
            ElementState::Released => InputEvent::KeyUp { key, modifiers },
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
