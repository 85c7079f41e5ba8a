//=========================================================================
// Launchpad Engine — Library Root
//
// Scene orchestration and real-time loop for arcade-style mini-games.
//
// Responsibilities:
// - Expose the engine facade (`Engine`, `EngineBuilder`)
// - Expose the core systems scenes are written against (`core`)
// - Keep the Winit integration (`platform`) internal
//
// Typical usage:
// ```no_run
// use launchpad_engine::prelude::*;
//
// let mut engine = EngineBuilder::<GameScene, NoAction>::new().build()?;
// engine.register(GameScene::Splash, Splash::new());
// engine.set_state(GameScene::Splash)?;
// engine.run_windowed()?;
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds every system that runs on the engine thread: time, input,
// scenes, audio, transitions, rendering surfaces and settings.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the OS window and the Winit event loop and is not part
// of the public API surface.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineCommand, DEFAULT_SCREENSHOT_DIR, MAX_SCREENSHOTS};
