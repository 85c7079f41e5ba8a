//=========================================================================
// Core Systems
//
// Everything the engine loop drives on its own thread.
//
// Subsystems:
// - `time`       frame pacing and elapsed-time bookkeeping
// - `input`      raw events, triggers, global action dispatcher
// - `scene`      scene trait, context and the state machine
// - `audio`      named sound registry over a pluggable backend
// - `transition` alpha fade overlays
// - `render`     render surface abstraction and in-memory canvas
// - `settings`   persisted key → value store and engine config
// - `display`    window requests sent to the platform thread
//
// None of these modules touch the OS window directly; the platform layer
// talks to them only through channels.
//
//=========================================================================

pub mod audio;
pub mod display;
pub mod error;
pub mod input;
pub mod render;
pub mod scene;
pub mod settings;
pub mod time;
pub mod transition;

//=== Re-exports ==========================================================

pub use error::{EngineError, SceneError, SceneResult};
pub use input::Action;
pub use scene::SceneKey;
