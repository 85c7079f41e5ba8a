//=========================================================================
// Scene Test Support
//=========================================================================
//
// Spy scene and spy sound backend sharing one call log, so tests can
// assert the exact interleaving of lifecycle hooks and audio calls.
//
//=========================================================================

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::core::audio::{AudioManager, ChannelId, SilentBackend, SoundBackend, SoundId};
use crate::core::error::SceneResult;
use crate::core::input::{Action, InputEvent};
use crate::core::render::{RenderSurface, Size};
use crate::core::settings::Settings;
use crate::core::EngineError;

use super::{Scene, SceneContext, SceneKey};

//=== Shared Call Log =====================================================

pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

pub(crate) fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn record(log: &CallLog, entry: String) {
    log.lock().unwrap().push(entry);
}

//=== Test Keys ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TestScene {
    A,
    B,
    C,
}

impl SceneKey for TestScene {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TestAction {
    Select,
}

impl Action for TestAction {}

//=== SpyScene ============================================================

/// Records every hook call as `"<name>.<hook>"`.
///
/// After `finish_after` updates it requests `next` (or "advance" if
/// `next` is `None`).
pub(crate) struct SpyScene<S: SceneKey> {
    name: &'static str,
    log: CallLog,
    finish_after: Option<u32>,
    next: Option<S>,
    updates: u32,
    fail_update: bool,
    panic_update: bool,
}

impl<S: SceneKey> SpyScene<S> {
    pub(crate) fn new(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            finish_after: None,
            next: None,
            updates: 0,
            fail_update: false,
            panic_update: false,
        }
    }

    pub(crate) fn finishing_after(mut self, updates: u32, next: Option<S>) -> Self {
        self.finish_after = Some(updates);
        self.next = next;
        self
    }

    pub(crate) fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub(crate) fn panicking_update(mut self) -> Self {
        self.panic_update = true;
        self
    }

    fn record(&self, hook: &str) {
        record(&self.log, format!("{}.{}", self.name, hook));
    }
}

impl<S: SceneKey, A: Action> Scene<S, A> for SpyScene<S> {
    fn startup(&mut self, _ctx: &mut SceneContext<S>) -> SceneResult {
        self.updates = 0;
        self.record("startup");
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &mut SceneContext<S>) -> SceneResult {
        self.record("cleanup");
        Ok(())
    }

    fn handle_input(&mut self, event: &InputEvent, _ctx: &mut SceneContext<S>) -> SceneResult {
        self.record(&format!("input({:?})", event));
        Ok(())
    }

    fn on_action(&mut self, action: A, _ctx: &mut SceneContext<S>) -> SceneResult {
        self.record(&format!("action({:?})", action));
        Ok(())
    }

    fn on_resize(&mut self, size: Size, _ctx: &mut SceneContext<S>) {
        self.record(&format!("resize({}x{})", size.width, size.height));
    }

    fn update(
        &mut self,
        _surface: &mut dyn RenderSurface,
        _dt: f32,
        ctx: &mut SceneContext<S>,
    ) -> SceneResult {
        self.record("update");
        if self.panic_update {
            panic!("{} exploded", self.name);
        }
        if self.fail_update {
            return Err(format!("{} failed to update", self.name).into());
        }

        self.updates += 1;
        if self.finish_after == Some(self.updates) {
            ctx.finish(self.next);
        }
        Ok(())
    }

    fn render(&mut self, _surface: &mut dyn RenderSurface, _ctx: &SceneContext<S>) -> SceneResult {
        self.record("render");
        Ok(())
    }
}

//=== SpyBackend ==========================================================

/// SilentBackend that logs `audio.stop_all` into the shared call log.
pub(crate) struct SpyBackend {
    inner: SilentBackend,
    log: CallLog,
}

impl SpyBackend {
    pub(crate) fn new(log: &CallLog) -> Self {
        Self {
            inner: SilentBackend::new(),
            log: Arc::clone(log),
        }
    }
}

impl SoundBackend for SpyBackend {
    fn load(&mut self, path: &Path) -> Result<SoundId, EngineError> {
        self.inner.load(path)
    }
    fn placeholder(&mut self) -> SoundId {
        self.inner.placeholder()
    }
    fn play(&mut self, sound: SoundId, loops: i32, fade_ms: u32) -> Option<ChannelId> {
        self.inner.play(sound, loops, fade_ms)
    }
    fn stop(&mut self, channel: ChannelId, fade_ms: u32) {
        self.inner.stop(channel, fade_ms)
    }
    fn stop_all(&mut self, fade_ms: u32) {
        record(&self.log, "audio.stop_all".to_owned());
        self.inner.stop_all(fade_ms)
    }
    fn is_busy(&self, channel: ChannelId) -> bool {
        self.inner.is_busy(channel)
    }
    fn set_sound_volume(&mut self, sound: SoundId, volume: f32) {
        self.inner.set_sound_volume(sound, volume)
    }
    fn set_channel_volume(&mut self, channel: ChannelId, volume: f32) {
        self.inner.set_channel_volume(channel, volume)
    }
    fn load_music(&mut self, path: &Path) -> Result<(), EngineError> {
        self.inner.load_music(path)
    }
    fn play_music(&mut self, loops: i32, fade_ms: u32) {
        self.inner.play_music(loops, fade_ms)
    }
    fn stop_music(&mut self, fade_ms: u32) {
        self.inner.stop_music(fade_ms)
    }
    fn pause_music(&mut self) {
        self.inner.pause_music()
    }
    fn resume_music(&mut self) {
        self.inner.resume_music()
    }
    fn set_music_volume(&mut self, volume: f32) {
        self.inner.set_music_volume(volume)
    }
}

/// Context whose audio backend writes into `log`.
pub(crate) fn spy_context<S: SceneKey>(log: &CallLog) -> SceneContext<S> {
    SceneContext::new(
        AudioManager::new(Box::new(SpyBackend::new(log))),
        Settings::in_memory(),
        Size::new(320, 240),
    )
}
