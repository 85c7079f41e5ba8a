//=========================================================================
// Scene Context
//=========================================================================
//
// The orchestrator capability handed to scenes on every call.
//
// Scenes never hold a reference to the engine. Instead each hook
// receives `&mut SceneContext`, which exposes the shared services
// (audio, settings, time, display) and the two requests a scene can
// make of the engine: "I'm done, go to X" and "quit".
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::audio::AudioManager;
use crate::core::display::DisplayHandle;
use crate::core::render::Size;
use crate::core::settings::Settings;
use crate::core::time::TimeManager;

use super::SceneKey;

//=== SceneExit ===========================================================

/// A scene's request to leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneExit<S: SceneKey> {
    /// Where to go next; `None` advances to the next registered scene.
    pub next: Option<S>,
}

//=== SceneContext ========================================================

/// Shared services and engine requests available to scenes.
pub struct SceneContext<S: SceneKey> {
    /// Named sound registry; stopped wholesale on every transition.
    pub audio: AudioManager,

    /// Persisted key → value settings.
    pub settings: Settings,

    /// Window controls.
    pub display: DisplayHandle,

    time: TimeManager,
    scene_time: TimeManager,
    viewport: Size,
    current: Option<S>,
    exit: Option<SceneExit<S>>,
    running: bool,
    frame: u64,
}

impl<S: SceneKey> SceneContext<S> {
    //--- Construction -----------------------------------------------------

    pub fn new(audio: AudioManager, settings: Settings, viewport: Size) -> Self {
        Self {
            audio,
            settings,
            display: DisplayHandle::detached(),
            time: TimeManager::new(),
            scene_time: TimeManager::new(),
            viewport,
            current: None,
            exit: None,
            running: true,
            frame: 0,
        }
    }

    //--- Scene Requests ---------------------------------------------------

    /// Marks the active scene done. The engine transitions after `update`.
    pub fn finish(&mut self, next: Option<S>) {
        self.exit = Some(SceneExit { next });
    }

    /// Shorthand for `finish(Some(next))`.
    pub fn switch_to(&mut self, next: S) {
        self.finish(Some(next));
    }

    /// Whether the active scene has asked to leave this frame.
    pub fn is_finishing(&self) -> bool {
        self.exit.is_some()
    }

    /// Stops the engine at the top of the next frame.
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    //--- Queries ----------------------------------------------------------

    /// Scene currently active, if any.
    pub fn current_scene(&self) -> Option<S> {
        self.current
    }

    /// Global time since the engine started running.
    pub fn time(&self) -> &TimeManager {
        &self.time
    }

    /// Seconds since the active scene was entered.
    pub fn time_since_scene_entry(&self) -> f64 {
        self.scene_time.elapsed()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// `min(width, height) / base_ratio` of the current viewport.
    pub fn size_dependent(&self, base_ratio: f32) -> f32 {
        self.viewport.dependent(base_ratio)
    }

    /// Index of the frame being processed (starts at 1).
    pub fn frame(&self) -> u64 {
        self.frame
    }

    //--- Engine Hooks -----------------------------------------------------

    pub(crate) fn begin_frame(&mut self, dt: f32) {
        self.frame += 1;
        self.time.update(dt);
        self.scene_time.update(dt);
    }

    pub(crate) fn enter_scene(&mut self, scene: S) {
        self.current = Some(scene);
        self.exit = None;
        self.scene_time.reset();
    }

    pub(crate) fn leave_scene(&mut self) {
        self.current = None;
        self.exit = None;
    }

    pub(crate) fn take_exit(&mut self) -> Option<SceneExit<S>> {
        self.exit.take()
    }

    pub(crate) fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScene {
        Splash,
        Menu,
    }

    impl SceneKey for TestScene {}

    fn context() -> SceneContext<TestScene> {
        SceneContext::new(AudioManager::silent(), Settings::in_memory(), Size::new(640, 480))
    }

    #[test]
    fn finish_records_exit_once() {
        let mut ctx = context();
        ctx.switch_to(TestScene::Menu);

        assert!(ctx.is_finishing());
        assert_eq!(ctx.take_exit(), Some(SceneExit { next: Some(TestScene::Menu) }));
        assert_eq!(ctx.take_exit(), None);
    }

    #[test]
    fn entering_scene_resets_scene_time_only() {
        let mut ctx = context();
        ctx.begin_frame(0.5);
        ctx.begin_frame(0.5);
        assert_eq!(ctx.time_since_scene_entry(), 1.0);

        ctx.enter_scene(TestScene::Splash);

        assert_eq!(ctx.time_since_scene_entry(), 0.0);
        assert_eq!(ctx.time().elapsed(), 1.0);
        assert_eq!(ctx.current_scene(), Some(TestScene::Splash));
        assert_eq!(ctx.frame(), 2);
    }

    #[test]
    fn entering_scene_clears_stale_exit() {
        let mut ctx = context();
        ctx.finish(None);
        ctx.enter_scene(TestScene::Menu);
        assert!(!ctx.is_finishing());
    }

    #[test]
    fn quit_stops_running() {
        let mut ctx = context();
        assert!(ctx.is_running());
        ctx.quit();
        assert!(!ctx.is_running());
    }

    #[test]
    fn size_dependent_tracks_viewport() {
        let mut ctx = context();
        assert_eq!(ctx.size_dependent(4.0), 120.0);
        ctx.set_viewport(Size::new(1920, 1080));
        assert_eq!(ctx.size_dependent(4.0), 270.0);
    }
}
