//=========================================================================
// Action Dispatcher
//=========================================================================
//
// Named trigger → command bindings evaluated once per frame.
//
// Architecture:
//   [InputEvent] → for each binding (registration order):
//                    trigger.fires(batch) → emit command
//
// Bindings never see each other's results: every trigger is evaluated
// against the same batch, and a firing binding never suppresses another.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::action::Trigger;
use super::event::InputEvent;

//=== InputAction =========================================================

/// A named (trigger, command) pair.
#[derive(Debug)]
struct InputAction<C> {
    name: String,
    trigger: Trigger,
    command: C,
}

//=== ActionDispatcher ====================================================

/// Registry of input actions, evaluated in registration order.
#[derive(Debug)]
pub struct ActionDispatcher<C> {
    actions: Vec<InputAction<C>>,
}

impl<C: Clone> ActionDispatcher<C> {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self { actions: Vec::new() }
    }

    //--- Binding API ------------------------------------------------------

    /// Registers `name`, or replaces its trigger and command in place.
    ///
    /// A replaced binding keeps its original evaluation slot.
    pub fn add_action(&mut self, name: impl Into<String>, trigger: Trigger, command: C) {
        let name = name.into();

        if let Some(existing) = self.actions.iter_mut().find(|a| a.name == name) {
            debug!(target: "input", "Replacing action '{}'", name);
            existing.trigger = trigger;
            existing.command = command;
            return;
        }

        debug!(target: "input", "Registering action '{}'", name);
        self.actions.push(InputAction { name, trigger, command });
    }

    /// Removes the binding for `name`. Returns whether one existed.
    pub fn remove_action(&mut self, name: &str) -> bool {
        let before = self.actions.len();
        self.actions.retain(|a| a.name != name);
        let removed = self.actions.len() != before;
        if removed {
            debug!(target: "input", "Removed action '{}'", name);
        }
        removed
    }

    /// Whether a binding named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.actions.iter().any(|a| a.name == name)
    }

    /// Binding names in evaluation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|a| a.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    //--- Evaluation -------------------------------------------------------

    /// Evaluates every trigger against `events`.
    ///
    /// Returns the commands of all firing bindings, each exactly once,
    /// in registration order.
    pub fn update(&self, events: &[InputEvent], dt: f32) -> Vec<C> {
        let fired: Vec<C> = self
            .actions
            .iter()
            .filter(|action| action.trigger.fires(events))
            .map(|action| {
                trace!(target: "input", "Action '{}' fired (dt: {:.4})", action.name, dt);
                action.command.clone()
            })
            .collect();
        fired
    }
}

impl<C: Clone> Default for ActionDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
