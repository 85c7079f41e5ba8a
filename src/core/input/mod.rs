//=========================================================================
// Input System
//=========================================================================
//
// Raw input events, stateless triggers and the global action dispatcher.
//
// Architecture:
//   InputSource::pump() → [InputEvent] → ActionDispatcher::update()
//                                      → Scene::handle_input()
//
//=========================================================================

//=== Module Declarations =================================================

mod action;
mod dispatcher;
pub mod event;
mod source;

//=== Public API ==========================================================

pub use action::{Action, NoAction, Trigger};
pub use dispatcher::ActionDispatcher;
pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use source::{InputSource, ScriptedInput};
