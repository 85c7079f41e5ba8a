//=========================================================================
// Audio Channel Manager
//=========================================================================
//
// Centralizes sound lifecycle so no scene transition leaves a looping
// sound orphaned.
//
// Architecture:
//   AudioManager
//     ├─ sounds:   HashMap<name, SoundId>
//     ├─ channels: HashMap<name, Option<ChannelId>>
//     └─ backend:  Box<dyn SoundBackend>
//
// Guarantees:
// - At most one tracked channel per sound name
// - stop_all() is idempotent and safe when nothing plays
// - No audio call ever returns an error to the frame loop
//
//=========================================================================

//=== Module Declarations =================================================

mod backend;
#[cfg(feature = "rodio")]
mod rodio_backend;

//=== Public API ==========================================================

pub use backend::{ChannelId, SilentBackend, SoundBackend, SoundId};
#[cfg(feature = "rodio")]
pub use rodio_backend::RodioBackend;

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};

//=== Constants ===========================================================

pub const DEFAULT_SOUND_VOLUME: f32 = 0.8;
pub const DEFAULT_MUSIC_VOLUME: f32 = 0.7;

//=== AudioManager ========================================================

/// Named sound registry with per-name channel tracking.
pub struct AudioManager {
    backend: Box<dyn SoundBackend>,
    sounds: HashMap<String, SoundId>,
    channels: HashMap<String, Option<ChannelId>>,
    music_loaded: bool,
    sound_volume: f32,
    music_volume: f32,
}

impl AudioManager {
    //--- Construction -----------------------------------------------------

    pub fn new(backend: Box<dyn SoundBackend>) -> Self {
        let mut manager = Self {
            backend,
            sounds: HashMap::new(),
            channels: HashMap::new(),
            music_loaded: false,
            sound_volume: DEFAULT_SOUND_VOLUME,
            music_volume: DEFAULT_MUSIC_VOLUME,
        };
        manager.backend.set_music_volume(manager.music_volume);
        manager
    }

    /// Manager backed by [`SilentBackend`].
    pub fn silent() -> Self {
        Self::new(Box::new(SilentBackend::new()))
    }

    //--- Sound Effects ----------------------------------------------------

    /// Loads a sound under `name`. Already-loaded names are left untouched.
    ///
    /// A missing file is replaced by a silent placeholder and a warning.
    pub fn load(&mut self, name: &str, path: impl AsRef<Path>) {
        if self.sounds.contains_key(name) {
            return;
        }

        let sound = match self.backend.load(path.as_ref()) {
            Ok(sound) => sound,
            Err(e) => {
                warn!(target: "audio", "Sound '{}' unavailable ({}), using silence", name, e);
                self.backend.placeholder()
            }
        };

        self.backend.set_sound_volume(sound, self.sound_volume);
        self.sounds.insert(name.to_owned(), sound);
    }

    /// Plays `name`, stopping any instance of it that is still tracked.
    ///
    /// Returns `None` if the name was never loaded or the backend has no
    /// free channel.
    pub fn play(
        &mut self,
        name: &str,
        loops: i32,
        fade_ms: u32,
        volume: Option<f32>,
    ) -> Option<ChannelId> {
        let Some(&sound) = self.sounds.get(name) else {
            debug!(target: "audio", "Ignoring play of unknown sound '{}'", name);
            return None;
        };

        if let Some(Some(previous)) = self.channels.remove(name) {
            self.backend.stop(previous, 0);
        }

        let channel = self.backend.play(sound, loops, fade_ms);
        if let (Some(channel), Some(volume)) = (channel, volume) {
            self.backend.set_channel_volume(channel, volume.clamp(0.0, 1.0));
        }

        self.channels.insert(name.to_owned(), channel);
        channel
    }

    /// Stops the tracked channel for `name`, if any.
    pub fn stop(&mut self, name: &str, fade_ms: u32) {
        if let Some(slot) = self.channels.get_mut(name) {
            if let Some(channel) = slot.take() {
                self.backend.stop(channel, fade_ms);
            }
        }
    }

    /// Stops every channel and the music track, clearing all tracking.
    pub fn stop_all(&mut self, fade_ms: u32) {
        self.backend.stop_all(fade_ms);
        self.backend.stop_music(fade_ms);
        self.channels.clear();
    }

    /// Whether `name` has a tracked channel that is still busy.
    pub fn is_playing(&self, name: &str) -> bool {
        match self.channels.get(name) {
            Some(Some(channel)) => self.backend.is_busy(*channel),
            _ => false,
        }
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    /// Number of names with a tracked channel.
    pub fn tracked_channels(&self) -> usize {
        self.channels.values().filter(|c| c.is_some()).count()
    }

    /// Tracked channel for `name`.
    pub fn channel(&self, name: &str) -> Option<ChannelId> {
        self.channels.get(name).copied().flatten()
    }

    //--- Music ------------------------------------------------------------

    /// Loads the background track. A missing file only logs a warning.
    pub fn load_music(&mut self, path: impl AsRef<Path>) {
        match self.backend.load_music(path.as_ref()) {
            Ok(()) => {
                self.backend.set_music_volume(self.music_volume);
                self.music_loaded = true;
            }
            Err(e) => warn!(target: "audio", "Music unavailable: {}", e),
        }
    }

    /// Plays the loaded track; `loops = -1` repeats forever.
    pub fn play_music(&mut self, loops: i32, fade_ms: u32) {
        if self.music_loaded {
            self.backend.play_music(loops, fade_ms);
        }
    }

    pub fn stop_music(&mut self, fade_ms: u32) {
        self.backend.stop_music(fade_ms);
    }

    pub fn pause_music(&mut self) {
        self.backend.pause_music();
    }

    pub fn resume_music(&mut self) {
        self.backend.resume_music();
    }

    //--- Volume -----------------------------------------------------------

    /// Applies to every loaded sound and to sounds loaded later.
    pub fn set_sound_volume(&mut self, volume: f32) {
        self.sound_volume = volume.clamp(0.0, 1.0);
        for &sound in self.sounds.values() {
            self.backend.set_sound_volume(sound, self.sound_volume);
        }
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
        self.backend.set_music_volume(self.music_volume);
    }

    pub fn sound_volume(&self) -> f32 {
        self.sound_volume
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
