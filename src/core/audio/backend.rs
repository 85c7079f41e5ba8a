//=========================================================================
// Sound Backend
//=========================================================================
//
// Boundary between the AudioManager and whatever actually makes noise.
//
// The manager owns all bookkeeping (names, tracked channels, volumes);
// a backend only has to load, play and stop opaque handles.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::EngineError;

//=== Handles =============================================================

/// Opaque handle to a loaded sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u64);

/// Opaque handle to a playing sound instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);

//=== SoundBackend ========================================================

/// Low-level audio playback service.
///
/// Implementations must never panic on stale handles: stopping a channel
/// that already finished is a no-op.
pub trait SoundBackend: Send {
    /// Loads a sound effect from disk.
    fn load(&mut self, path: &Path) -> Result<SoundId, EngineError>;

    /// Creates a silent stand-in for a sound that could not be loaded.
    fn placeholder(&mut self) -> SoundId;

    /// Starts playback. `loops` follows the usual convention: -1 loops forever.
    fn play(&mut self, sound: SoundId, loops: i32, fade_ms: u32) -> Option<ChannelId>;

    /// Stops one channel, fading out over `fade_ms` when non-zero.
    fn stop(&mut self, channel: ChannelId, fade_ms: u32);

    /// Stops every channel the backend knows about.
    fn stop_all(&mut self, fade_ms: u32);

    /// Whether the channel is still producing sound.
    fn is_busy(&self, channel: ChannelId) -> bool;

    fn set_sound_volume(&mut self, sound: SoundId, volume: f32);

    fn set_channel_volume(&mut self, channel: ChannelId, volume: f32);

    //--- Music ------------------------------------------------------------

    fn load_music(&mut self, path: &Path) -> Result<(), EngineError>;

    fn play_music(&mut self, loops: i32, fade_ms: u32);

    fn stop_music(&mut self, fade_ms: u32);

    fn pause_music(&mut self);

    fn resume_music(&mut self);

    fn set_music_volume(&mut self, volume: f32);
}

//=== SilentBackend =======================================================

/// Bookkeeping-only backend.
///
/// Tracks which sounds are loaded and which channels are "playing"
/// without touching an audio device. Used for headless runs and tests,
/// and as the fallback when no device backend is configured.
#[derive(Debug, Default)]
pub struct SilentBackend {
    next_id: u64,
    sounds: HashMap<SoundId, Option<PathBuf>>,
    channels: HashMap<ChannelId, SoundId>,
    music: Option<PathBuf>,
    music_playing: bool,
    music_paused: bool,
}

impl SilentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of channels currently playing.
    pub fn active_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing && !self.music_paused
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl SoundBackend for SilentBackend {
    fn load(&mut self, path: &Path) -> Result<SoundId, EngineError> {
        if !path.exists() {
            return Err(EngineError::MissingResource {
                path: path.to_path_buf(),
            });
        }
        let id = SoundId(self.allocate());
        self.sounds.insert(id, Some(path.to_path_buf()));
        Ok(id)
    }

    fn placeholder(&mut self) -> SoundId {
        let id = SoundId(self.allocate());
        self.sounds.insert(id, None);
        id
    }

    fn play(&mut self, sound: SoundId, loops: i32, fade_ms: u32) -> Option<ChannelId> {
        if !self.sounds.contains_key(&sound) {
            return None;
        }
        let channel = ChannelId(self.allocate());
        trace!(
            target: "audio",
            "Silent play {:?} on {:?} (loops: {}, fade: {}ms)",
            sound,
            channel,
            loops,
            fade_ms
        );
        self.channels.insert(channel, sound);
        Some(channel)
    }

    fn stop(&mut self, channel: ChannelId, _fade_ms: u32) {
        self.channels.remove(&channel);
    }

    fn stop_all(&mut self, _fade_ms: u32) {
        self.channels.clear();
    }

    fn is_busy(&self, channel: ChannelId) -> bool {
        self.channels.contains_key(&channel)
    }

    fn set_sound_volume(&mut self, _sound: SoundId, _volume: f32) {}

    fn set_channel_volume(&mut self, _channel: ChannelId, _volume: f32) {}

    fn load_music(&mut self, path: &Path) -> Result<(), EngineError> {
        if !path.exists() {
            return Err(EngineError::MissingResource {
                path: path.to_path_buf(),
            });
        }
        self.music = Some(path.to_path_buf());
        Ok(())
    }

    fn play_music(&mut self, _loops: i32, _fade_ms: u32) {
        if self.music.is_some() {
            self.music_playing = true;
            self.music_paused = false;
        }
    }

    fn stop_music(&mut self, _fade_ms: u32) {
        self.music_playing = false;
        self.music_paused = false;
    }

    fn pause_music(&mut self) {
        self.music_paused = true;
    }

    fn resume_music(&mut self) {
        self.music_paused = false;
    }

    fn set_music_volume(&mut self, _volume: f32) {}
}

//=========================================================================
// Unit Tests
//=========================================================================
