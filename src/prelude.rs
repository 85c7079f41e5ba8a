//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use launchpad_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, EngineCommand};

// Errors
pub use crate::core::error::{EngineError, SceneError, SceneResult};

// Input system
pub use crate::core::input::{
    Action, InputEvent, InputSource, KeyCode, Modifiers, MouseButton, NoAction, ScriptedInput,
    Trigger,
};

// Scene system
pub use crate::core::scene::{MachineState, Scene, SceneContext, SceneKey};

// Services
pub use crate::core::audio::{AudioManager, SilentBackend, SoundBackend};
#[cfg(feature = "rodio")]
pub use crate::core::audio::RodioBackend;
pub use crate::core::render::{Canvas, Color, Rect, RenderSurface, Size};
pub use crate::core::settings::{EngineConfig, Settings};
pub use crate::core::transition::FadeTransition;
