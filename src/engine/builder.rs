//=========================================================================
// Engine Builder
//=========================================================================
//
// Fluent configuration for [`Engine`].
//
// Resolution order for every value:
//   explicit `with_*` call  >  settings store  >  built-in default
//
// `build()` validates the result and never panics; bad values surface
// as `EngineError::Configuration`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;
use std::time::Duration;

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::audio::{AudioManager, SilentBackend, SoundBackend};
use crate::core::error::EngineError;
use crate::core::input::{Action, ActionDispatcher};
use crate::core::render::Size;
use crate::core::scene::{SceneContext, SceneKey, StateMachine};
use crate::core::settings::{EngineConfig, Settings};
use crate::core::time::{Clock, DEFAULT_MAX_FRAME_DELTA};
use crate::core::transition::FadeTransition;

use super::command;
use super::screenshot::DEFAULT_SCREENSHOT_DIR;
use super::Engine;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **FPS**: 60.0 (or `fps` from settings)
/// - **Screen**: 640x480 (or `screen_w` / `screen_h`)
/// - **Max frame delta**: 250 ms
/// - **Channel capacity**: 128 platform batches
/// - **Audio**: [`SilentBackend`]
/// - **Scene fade**: off
///
/// # Examples
///
/// ```no_run
/// use launchpad_engine::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum GameScene { Splash }
/// impl SceneKey for GameScene {}
///
/// let engine = EngineBuilder::<GameScene, NoAction>::new()
///     .with_settings(Settings::load("data/settings.json"))
///     .with_fps(30.0)
///     .with_scene_fade(400.0)
///     .build()?;
/// # Ok::<(), EngineError>(())
/// ```
pub struct EngineBuilder<S: SceneKey, A: Action> {
    settings: Option<Settings>,
    fps: Option<f64>,
    screen: Option<Size>,
    admin: Option<bool>,
    max_frame_delta: Duration,
    scene_fade: Option<f32>,
    backend: Option<Box<dyn SoundBackend>>,
    screenshot_dir: PathBuf,
    channel_capacity: usize,
    _phantom: std::marker::PhantomData<(S, A)>,
}

impl<S: SceneKey, A: Action> EngineBuilder<S, A> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            settings: None,
            fps: None,
            screen: None,
            admin: None,
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            scene_fade: None,
            backend: None,
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            channel_capacity: 128,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Settings store the engine reads its config from and flushes at exit.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Target frames per second. Must be finite and positive.
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Upper bound on the `dt` handed to scenes after a stall.
    pub fn with_max_frame_delta(mut self, max: Duration) -> Self {
        self.max_frame_delta = max;
        self
    }

    /// Initial viewport size in pixels.
    pub fn with_screen_size(mut self, width: u32, height: u32) -> Self {
        self.screen = Some(Size::new(width, height));
        self
    }

    /// Enables the scene navigation bindings (F3 / Left / Right).
    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Replays a black fade-in at `speed` alpha units per second on every
    /// scene entry.
    pub fn with_scene_fade(mut self, speed: f32) -> Self {
        self.scene_fade = Some(speed);
        self
    }

    /// Audio device the sound registry plays through.
    pub fn with_audio_backend<B>(mut self, backend: B) -> Self
    where
        B: SoundBackend + 'static,
    {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Directory screenshots are written into.
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Bound of the platform → engine channel in windowed mode.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Resolves and validates the configuration, then builds the engine.
    ///
    /// # Errors
    ///
    /// [`EngineError::Configuration`] for an fps that cannot pace frames,
    /// an empty or oversized screen, a zero frame-delta cap, a zero channel capacity or a
    /// non-positive fade speed.
    pub fn build(self) -> Result<Engine<S, A>, EngineError> {
        let settings = self.settings.unwrap_or_else(Settings::in_memory);

        let mut config = EngineConfig::from_settings(&settings);
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(size) = self.screen {
            config.screen_w = size.width;
            config.screen_h = size.height;
        }
        if let Some(admin) = self.admin {
            config.admin = admin;
        }
        config.validate()?;

        if self.max_frame_delta.is_zero() {
            return Err(EngineError::Configuration("max frame delta must be positive".into()));
        }
        if self.channel_capacity == 0 {
            return Err(EngineError::Configuration("channel capacity must be positive".into()));
        }

        let viewport = Size::new(config.screen_w, config.screen_h);
        let fade = match self.scene_fade {
            Some(speed) if !speed.is_finite() || speed <= 0.0 => {
                return Err(EngineError::Configuration(format!(
                    "fade speed must be positive, got {}",
                    speed
                )));
            }
            Some(speed) => Some(FadeTransition::new(viewport).alphas(255, 0).speed(speed)),
            None => None,
        };

        let backend = self
            .backend
            .unwrap_or_else(|| Box::new(SilentBackend::new()));
        let mut audio = AudioManager::new(backend);
        audio.set_sound_volume(config.sound_volume);
        audio.set_music_volume(config.music_volume);

        let mut dispatcher = ActionDispatcher::new();
        command::install_defaults(&mut dispatcher, &config);

        info!(
            target: "engine",
            "Building engine ({}x{} @ {} fps, admin: {})",
            config.screen_w, config.screen_h, config.fps, config.admin
        );

        Ok(Engine {
            machine: StateMachine::new(),
            ctx: SceneContext::new(audio, settings, viewport),
            dispatcher,
            clock: Clock::with_max_delta(self.max_frame_delta),
            config,
            fade,
            screenshot_dir: self.screenshot_dir,
            channel_capacity: self.channel_capacity,
        })
    }
}

impl<S: SceneKey, A: Action> Default for EngineBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
