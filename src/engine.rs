//=========================================================================
// Launchpad Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──────────> [Frame loop]
//         │                          │
//         ├─ with_fps()              ├─ register() / set_state()
//         ├─ with_settings()         ├─ bind_action()
//         └─ with_scene_fade()       └─ run_windowed() → spawns engine thread
//                                                        runs platform
//                                                        blocks until exit
// ```
//
// Frame (while running and a scene is active):
//   1. dt = clock.tick(fps)
//   2. advance global + scene-entry time
//   3. events = input.pump()
//   4. global actions → engine commands, in registration order
//   5. Quit / Resized consumed here; everything else → scene.handle_input
//   6. scene.update
//   7. pending exit → transition
//   8. scene.render, then fade overlay
//   9. surface.present
//
// Anything escaping a frame (error or panic) ends the session once, at
// the loop boundary, followed by the normal teardown.
//
//=========================================================================

//=== Submodules ==========================================================

mod builder;
mod command;
mod screenshot;

//=== External Dependencies ===============================================

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::thread;

use crossbeam_channel::{bounded, unbounded};
use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::display::DisplayHandle;
use crate::core::error::EngineError;
use crate::core::input::{Action, ActionDispatcher, InputEvent, InputSource, Trigger};
use crate::core::render::{RenderSurface, Size};
use crate::core::scene::{MachineState, Scene, SceneContext, SceneKey, StateMachine};
use crate::core::settings::EngineConfig;
use crate::core::time::Clock;
use crate::core::transition::FadeTransition;
use crate::platform::{ChannelInput, Platform, PlatformChannels, PlatformConfig, WindowSurface};

//=== Public API ==========================================================

pub use builder::EngineBuilder;
pub use command::EngineCommand;
pub use screenshot::{DEFAULT_SCREENSHOT_DIR, MAX_SCREENSHOTS};

/// Finished frames waiting for the window before new ones are dropped.
const FRAMES_IN_FLIGHT: usize = 2;

//=== SceneRequest ========================================================

#[derive(Debug, Clone, Copy)]
enum SceneRequest<S: SceneKey> {
    To(S),
    Next,
    Previous,
    Restart,
}

//=== Engine ==============================================================

/// Launchpad Engine runtime.
///
/// Owns the scene state machine, the shared [`SceneContext`] and the
/// global action dispatcher. Create via [`EngineBuilder`].
///
/// # Examples
///
/// Headless run over scripted input:
/// ```
/// use launchpad_engine::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum GameScene { Title }
/// impl SceneKey for GameScene {}
///
/// struct Title;
/// impl Scene<GameScene, NoAction> for Title {
///     fn update(&mut self, _: &mut dyn RenderSurface, _: f32, _: &mut SceneContext<GameScene>) -> SceneResult {
///         Ok(())
///     }
///     fn render(&mut self, surface: &mut dyn RenderSurface, _: &SceneContext<GameScene>) -> SceneResult {
///         surface.clear(Color::DARK_GREEN);
///         Ok(())
///     }
/// }
///
/// let mut engine = EngineBuilder::<GameScene, NoAction>::new().with_fps(240.0).build()?;
/// engine.register(GameScene::Title, Title);
/// engine.set_state(GameScene::Title)?;
///
/// let mut input = ScriptedInput::new().idle(3).quit_when_exhausted();
/// let mut canvas = Canvas::new(engine.context().viewport());
/// engine.run(&mut input, &mut canvas)?;
///
/// assert_eq!(canvas.frames_presented(), 4);
/// # Ok::<(), EngineError>(())
/// ```
pub struct Engine<S: SceneKey, A: Action> {
    machine: StateMachine<S, A>,
    ctx: SceneContext<S>,
    dispatcher: ActionDispatcher<EngineCommand<A>>,
    clock: Clock,
    config: EngineConfig,
    fade: Option<FadeTransition>,
    screenshot_dir: PathBuf,
    channel_capacity: usize,
}

impl<S: SceneKey, A: Action> Engine<S, A> {
    //--- Scenes -----------------------------------------------------------

    /// Registers a scene. Registration order is navigation order.
    pub fn register<T>(&mut self, key: S, scene: T)
    where
        T: Scene<S, A> + 'static,
    {
        self.machine.add(key, scene);
    }

    /// Activates `key` immediately (running the full transition protocol).
    ///
    /// Call before [`Engine::run`] to choose the first scene.
    pub fn set_state(&mut self, key: S) -> Result<(), EngineError> {
        self.switch(SceneRequest::To(key))
    }

    /// Callback invoked after every completed scene transition.
    pub fn on_scene_change<F>(&mut self, observer: F)
    where
        F: FnMut(Option<S>, S) + Send + 'static,
    {
        self.machine.set_observer(observer);
    }

    pub fn state(&self) -> MachineState<S> {
        self.machine.state()
    }

    //--- Actions ----------------------------------------------------------

    /// Binds a global trigger to a game action delivered to the active
    /// scene's `on_action`. Rebinding a name replaces it in place.
    pub fn bind_action(&mut self, name: &str, trigger: Trigger, action: A) {
        self.dispatcher.add_action(name, trigger, EngineCommand::Game(action));
    }

    /// Binds a global trigger to an arbitrary engine command.
    pub fn bind_command(&mut self, name: &str, trigger: Trigger, command: EngineCommand<A>) {
        self.dispatcher.add_action(name, trigger, command);
    }

    pub fn unbind(&mut self, name: &str) -> bool {
        self.dispatcher.remove_action(name)
    }

    /// Switches the scene navigation bindings on or off.
    pub fn set_admin(&mut self, admin: bool) {
        if admin == self.config.admin {
            return;
        }
        self.config.admin = admin;
        if admin {
            command::install_admin(&mut self.dispatcher);
        } else {
            command::remove_admin(&mut self.dispatcher);
        }
        info!(target: "engine", "Admin mode {}", if admin { "enabled" } else { "disabled" });
    }

    //--- Accessors --------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context(&self) -> &SceneContext<S> {
        &self.ctx
    }

    /// Shared services, e.g. to preload sounds before running.
    pub fn context_mut(&mut self) -> &mut SceneContext<S> {
        &mut self.ctx
    }

    //--- Execution --------------------------------------------------------

    /// Runs frames until quit or failure, then tears down.
    ///
    /// With no active scene the loop exits immediately (still tearing down).
    ///
    /// # Errors
    ///
    /// [`EngineError::Frame`] or [`EngineError::Panic`] when a frame fails;
    /// otherwise the first teardown error.
    pub fn run(
        &mut self,
        input: &mut dyn InputSource,
        surface: &mut dyn RenderSurface,
    ) -> Result<(), EngineError> {
        info!(target: "engine", "Engine running at {} fps", self.config.fps);

        let viewport = self.ctx.viewport();
        if surface.size() != viewport {
            surface.resize(viewport);
        }
        if self.machine.active_key().is_none() {
            warn!(target: "engine", "No active scene, nothing to run");
        }

        let mut outcome = Ok(());
        while self.ctx.is_running() && self.machine.active_key().is_some() {
            let frame = self.ctx.frame() + 1;
            let step = panic::catch_unwind(AssertUnwindSafe(|| self.frame(input, surface)));

            match step {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    error!(target: "engine", "Frame {} failed: {}", frame, err);
                    outcome = Err(EngineError::frame(frame, err));
                    break;
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(target: "engine", "Frame {} panicked: {}", frame, message);
                    outcome = Err(EngineError::Panic { frame, message });
                    break;
                }
            }
        }

        let teardown = self.teardown(surface);
        info!(target: "engine", "Engine stopped after {} frame(s)", self.ctx.frame());
        outcome.and(teardown)
    }

    /// Opens a window and runs the engine on its own thread until either
    /// side exits. Must be called from the main thread.
    pub fn run_windowed(mut self) -> Result<(), EngineError> {
        let (event_tx, event_rx) = bounded(self.channel_capacity);
        let (display_tx, display_rx) = unbounded();
        let (frame_tx, frame_rx) = bounded(FRAMES_IN_FLIGHT);

        self.ctx.display = DisplayHandle::attached(display_tx, false);
        let size = self.ctx.viewport();
        let title = self
            .machine
            .active_key()
            .map(|key| format!("{:?}", key))
            .unwrap_or_else(|| "Launchpad".to_owned());

        let engine_thread = thread::Builder::new()
            .name("engine".into())
            .spawn(move || {
                let mut input = ChannelInput::new(event_rx);
                let mut surface = WindowSurface::new(size, frame_tx);
                self.run(&mut input, &mut surface)
            })?;
        info!(target: "engine", "Engine thread spawned");

        let channels = PlatformChannels {
            events: event_tx,
            display: display_rx,
            frames: frame_rx,
        };
        let platform = Platform::new(channels, PlatformConfig { title, size });
        let platform_result = platform.run();
        info!(target: "engine", "Platform event loop exited");

        let engine_result = match engine_thread.join() {
            Ok(result) => result,
            Err(payload) => Err(EngineError::Panic {
                frame: 0,
                message: panic_message(payload.as_ref()),
            }),
        };

        engine_result?;
        platform_result.map_err(|err| EngineError::Platform(err.to_string()))
    }

    //--- Frame ------------------------------------------------------------

    fn frame(
        &mut self,
        input: &mut dyn InputSource,
        surface: &mut dyn RenderSurface,
    ) -> Result<(), EngineError> {
        //--- 1-2. Time ----------------------------------------------------
        let dt = self.clock.tick(self.config.fps)?;
        self.ctx.begin_frame(dt);

        //--- 3. Input -----------------------------------------------------
        let events = input.pump();
        trace!(target: "input", "Frame {}: {} event(s), dt {:.4}", self.ctx.frame(), events.len(), dt);

        //--- 4. Global actions --------------------------------------------
        for command in self.dispatcher.update(&events, dt) {
            self.execute(command, surface)?;
        }

        //--- 5. Raw events ------------------------------------------------
        let mut resized = None;
        for event in &events {
            match event {
                InputEvent::Quit => {
                    info!(target: "engine", "Quit requested");
                    self.ctx.quit();
                }
                InputEvent::Resized { width, height } => {
                    resized = Some(Size::new(*width, *height));
                }
                _ => {
                    if let Some((key, scene)) = self.machine.active_mut() {
                        scene
                            .handle_input(event, &mut self.ctx)
                            .map_err(|err| EngineError::scene(key, err))?;
                    }
                }
            }
        }
        if let Some(size) = resized {
            self.apply_viewport(size, surface);
        }

        //--- 6. Update ----------------------------------------------------
        if let Some((key, scene)) = self.machine.active_mut() {
            scene
                .update(surface, dt, &mut self.ctx)
                .map_err(|err| EngineError::scene(key, err))?;
        }

        //--- 7. Pending exit ----------------------------------------------
        if let Some(exit) = self.ctx.take_exit() {
            let request = match exit.next {
                Some(next) => SceneRequest::To(next),
                None => SceneRequest::Next,
            };
            self.switch(request)?;
        }

        //--- 8. Render ----------------------------------------------------
        if let Some((key, scene)) = self.machine.active_mut() {
            scene
                .render(surface, &self.ctx)
                .map_err(|err| EngineError::scene(key, err))?;
        }
        if let Some(fade) = self.fade.as_mut() {
            fade.update(dt);
            fade.draw(surface);
        }

        //--- 9. Present ---------------------------------------------------
        surface.present();
        Ok(())
    }

    fn execute(
        &mut self,
        command: EngineCommand<A>,
        surface: &mut dyn RenderSurface,
    ) -> Result<(), EngineError> {
        debug!(target: "engine", "Executing {:?}", command);
        match command {
            EngineCommand::ToggleFullscreen => self.ctx.display.toggle_fullscreen(),
            EngineCommand::Screenshot => self.screenshot(surface),
            EngineCommand::Quit => self.ctx.quit(),
            EngineCommand::RestartScene => self.switch(SceneRequest::Restart)?,
            EngineCommand::NextScene => self.switch(SceneRequest::Next)?,
            EngineCommand::PreviousScene => self.switch(SceneRequest::Previous)?,
            EngineCommand::Game(action) => {
                if let Some((key, scene)) = self.machine.active_mut() {
                    scene
                        .on_action(action, &mut self.ctx)
                        .map_err(|err| EngineError::scene(key, err))?;
                }
            }
        }
        Ok(())
    }

    //--- Helpers ----------------------------------------------------------

    fn switch(&mut self, request: SceneRequest<S>) -> Result<(), EngineError> {
        let result = match request {
            SceneRequest::To(key) => self.machine.set_state(key, &mut self.ctx),
            SceneRequest::Next => self.machine.next_state(&mut self.ctx),
            SceneRequest::Previous => self.machine.previous_state(&mut self.ctx),
            SceneRequest::Restart => self.machine.restart(&mut self.ctx),
        };

        // Rejected requests leave the machine untouched
        let entered = !matches!(
            result,
            Err(EngineError::UnknownScene(_) | EngineError::NoScenes | EngineError::Terminated)
        );
        if entered {
            if let Some(fade) = self.fade.as_mut() {
                fade.startup();
            }
        }
        result
    }

    fn apply_viewport(&mut self, size: Size, surface: &mut dyn RenderSurface) {
        if size == self.ctx.viewport() || size.width == 0 || size.height == 0 {
            return;
        }
        debug!(target: "engine", "Viewport resized to {}x{}", size.width, size.height);

        self.ctx.set_viewport(size);
        surface.resize(size);
        if let Some(fade) = self.fade.as_mut() {
            fade.set_size(size);
        }
        if let Some((_, scene)) = self.machine.active_mut() {
            scene.on_resize(size, &mut self.ctx);
        }
    }

    fn screenshot(&self, surface: &dyn RenderSurface) {
        let scene = self
            .machine
            .active_key()
            .map(|key| format!("{:?}", key))
            .unwrap_or_else(|| "none".to_owned());

        if let Err(err) = screenshot::capture(surface, &self.screenshot_dir, &scene) {
            warn!(target: "engine", "Screenshot failed: {}", err);
        }
    }

    /// Scene cleanup → audio stop → settings flush → surface release.
    fn teardown(&mut self, surface: &mut dyn RenderSurface) -> Result<(), EngineError> {
        info!(target: "engine", "Shutting down");

        let scenes = self.machine.shutdown(&mut self.ctx);
        self.ctx.audio.stop_all(0);
        let settings = self.ctx.settings.save();
        self.ctx.display.close();
        surface.release();

        scenes.and(settings)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
