//=========================================================================
// Scene System
//=========================================================================
//
// Scene lifecycle and ordered, single-active scene switching.
//
// Architecture:
//   StateMachine
//     ├─ scenes: Vec<(S, Box<dyn Scene>)>   (registration = navigation order)
//     ├─ index:  HashMap<S, usize>
//     └─ active: Option<usize>
//
// Flow (per frame, driven by the engine):
//   handle_input() → update() → [transition] → render()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Internal Dependencies ===============================================

use crate::core::error::SceneResult;
use crate::core::input::{Action, InputEvent};
use crate::core::render::{RenderSurface, Size};

//=== Module Declarations =================================================

mod context;
mod state_machine;

#[cfg(test)]
pub(crate) mod test_support;

//=== Public API ==========================================================

pub use context::{SceneContext, SceneExit};
pub use state_machine::{MachineState, StateMachine};

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Scene keys uniquely identify scenes in the state machine.
/// Typically implemented by a game-specific enum.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Scene Trait =========================================================

/// A self-contained screen or mini-game.
///
/// Scenes are registered once and keep their state between activations.
/// `startup` runs every time the scene becomes active and `cleanup` every
/// time it stops being active. To leave, a scene calls
/// [`SceneContext::finish`] (or `switch_to`) during a hook.
///
/// Only `update` and `render` are required:
///
/// ```rust
/// # use launchpad_engine::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum GameScene { Splash, Menu }
/// # impl SceneKey for GameScene {}
/// struct Splash;
///
/// impl Scene<GameScene, NoAction> for Splash {
///     fn update(
///         &mut self,
///         _surface: &mut dyn RenderSurface,
///         _dt: f32,
///         ctx: &mut SceneContext<GameScene>,
///     ) -> SceneResult {
///         if ctx.time_since_scene_entry() > 3.0 {
///             ctx.switch_to(GameScene::Menu);
///         }
///         Ok(())
///     }
///
///     fn render(
///         &mut self,
///         surface: &mut dyn RenderSurface,
///         _ctx: &SceneContext<GameScene>,
///     ) -> SceneResult {
///         surface.clear(Color::PLATINUM);
///         Ok(())
///     }
/// }
/// ```
pub trait Scene<S: SceneKey, A: Action>: Send {
    /// Called every time the scene becomes active.
    fn startup(&mut self, _ctx: &mut SceneContext<S>) -> SceneResult {
        Ok(())
    }

    /// Called every time the scene stops being active.
    fn cleanup(&mut self, _ctx: &mut SceneContext<S>) -> SceneResult {
        Ok(())
    }

    /// Receives each raw event of the frame that the engine did not consume.
    fn handle_input(&mut self, _event: &InputEvent, _ctx: &mut SceneContext<S>) -> SceneResult {
        Ok(())
    }

    /// Receives game actions fired by the global dispatcher this frame.
    fn on_action(&mut self, _action: A, _ctx: &mut SceneContext<S>) -> SceneResult {
        Ok(())
    }

    /// Called once per viewport change while the scene is active.
    fn on_resize(&mut self, _size: Size, _ctx: &mut SceneContext<S>) {}

    /// Advances the scene by `dt` seconds.
    fn update(
        &mut self,
        surface: &mut dyn RenderSurface,
        dt: f32,
        ctx: &mut SceneContext<S>,
    ) -> SceneResult;

    /// Draws the scene. Global overlays are drawn on top afterwards.
    fn render(&mut self, surface: &mut dyn RenderSurface, ctx: &SceneContext<S>) -> SceneResult;
}
