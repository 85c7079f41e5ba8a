//=========================================================================
// Input Sources
//=========================================================================
//
// Where the engine pulls each frame's raw input batch from.
//
//   Windowed: platform thread → crossbeam channel → ChannelInput
//   Headless: ScriptedInput (pre-recorded batches)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

//=== Internal Dependencies ===============================================

use super::event::InputEvent;

//=== InputSource =========================================================

/// Yields the current frame's batch of raw input events.
pub trait InputSource: Send {
    /// Drains every event that arrived since the previous call.
    ///
    /// Must not block; an idle frame returns an empty batch.
    fn pump(&mut self) -> Vec<InputEvent>;
}

//=== ScriptedInput =======================================================

/// Replays pre-recorded batches, one per frame.
///
/// Once the script runs out every frame is empty, unless
/// [`ScriptedInput::quit_when_exhausted`] was requested.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    batches: VecDeque<Vec<InputEvent>>,
    quit_when_exhausted: bool,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the batch for the next unscripted frame.
    pub fn then(mut self, batch: Vec<InputEvent>) -> Self {
        self.batches.push_back(batch);
        self
    }

    /// Appends `frames` empty batches.
    pub fn idle(mut self, frames: usize) -> Self {
        self.batches.extend(std::iter::repeat_with(Vec::new).take(frames));
        self
    }

    /// Emits `Quit` on the first frame after the script ends.
    pub fn quit_when_exhausted(mut self) -> Self {
        self.quit_when_exhausted = true;
        self
    }

    /// Frames left in the script.
    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl InputSource for ScriptedInput {
    fn pump(&mut self) -> Vec<InputEvent> {
        match self.batches.pop_front() {
            Some(batch) => batch,
            None if self.quit_when_exhausted => vec![InputEvent::Quit],
            None => Vec::new(),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
