//=========================================================================
// Input Buffer
//
// Collects raw window input between two frame boundaries, split into
// discrete and continuous events. Acts as a transient aggregator between
// the winit callbacks and the engine thread.
//
// Responsibilities:
// - Keep discrete inputs (keys, buttons) in arrival order
// - Drop immediate duplicates of discrete inputs
// - Coalesce continuous inputs (MouseMoved, Resized) so the last one wins
// - Hand both sets over in one `drain()`
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::mem::discriminant;

//=== Internal Modules ====================================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

/// Transient store for one frame of window input.
pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    /// At most one event per variant, in first-arrival order.
    continuous: Vec<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        const DISCRETE_BASE: usize = 64;
        const CONTINUOUS_BASE: usize = 4;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            continuous: Vec::with_capacity(CONTINUOUS_BASE),
        }
    }

    //--- Buffering --------------------------------------------------------

    /// Inserts or replaces a continuous input of the same kind.
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        let kind = discriminant(&event);
        match self.continuous.iter_mut().find(|held| discriminant(*held) == kind) {
            Some(held) => *held = event,
            None => self.continuous.push(event),
        }
    }

    /// Appends a discrete input unless it repeats the previous one.
    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    //--- Drain ------------------------------------------------------------

    /// Takes everything buffered so far, or `None` if nothing arrived.
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }
        let discrete = std::mem::take(&mut self.discrete);
        let continuous = std::mem::take(&mut self.continuous);
        Some((discrete, continuous))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, Modifiers};

    fn mouse_move(x: f32, y: f32) -> InputEvent {
        InputEvent::MouseMoved { x, y }
    }

    #[test]
    fn discrete_duplicates_are_dropped() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(InputEvent::key_down(KeyCode::KeyA));
        buffer.push_discrete(InputEvent::key_down(KeyCode::KeyA));
        buffer.push_discrete(InputEvent::key_down(KeyCode::KeyB));
        buffer.push_discrete(InputEvent::key_down(KeyCode::KeyA));

        let (discrete, _) = buffer.drain().unwrap();
        assert_eq!(discrete.len(), 3);
    }

    #[test]
    fn continuous_keeps_latest_of_each_kind() {
        let mut buffer = InputBuffer::new();
        buffer.push_continuous(mouse_move(10.0, 10.0));
        buffer.push_continuous(InputEvent::Resized { width: 320, height: 240 });
        buffer.push_continuous(mouse_move(20.0, 30.0));
        buffer.push_continuous(InputEvent::Resized { width: 800, height: 600 });

        let (_, continuous) = buffer.drain().unwrap();

        assert_eq!(
            continuous,
            vec![mouse_move(20.0, 30.0), InputEvent::Resized { width: 800, height: 600 }]
        );
    }

    #[test]
    fn discrete_events_with_different_payloads_are_kept() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(InputEvent::key_down(KeyCode::KeyS));
        buffer.push_discrete(InputEvent::key_down(KeyCode::KeyS).with_modifiers(Modifiers::CTRL));

        let (discrete, _) = buffer.drain().unwrap();
        assert_eq!(discrete.len(), 2);
    }

    #[test]
    fn drain_clears_buffer() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(InputEvent::key_down(KeyCode::Space));
        buffer.push_continuous(mouse_move(5.0, 5.0));

        assert!(buffer.drain().is_some());
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_none());
    }
}
