//=========================================================================
// Rodio Backend
//=========================================================================
//
// Device-backed `SoundBackend` built on rodio.
//
//   helper thread "audio-output": owns the OutputStream, parked until
//                                 the backend is dropped
//   engine thread:                RodioBackend (stream handle + sinks)
//
// Sounds are kept as encoded bytes and decoded on every play, so one sound
// can run on several channels at once. Each channel is its own `Sink`.
// Fade-outs run on short-lived threads that ramp the sink volume down and
// then stop it; the caller never waits for them.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Sender};
use log::{debug, info, trace, warn};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

//=== Internal Dependencies ===============================================

use crate::core::EngineError;

use super::backend::{ChannelId, SoundBackend, SoundId};

//=== Constants ===========================================================

const FADE_STEPS: u32 = 20;

type Encoded = Arc<[u8]>;
type BoxedSource = Box<dyn Source<Item = i16> + Send>;

//=== Sources =============================================================

/// Decodes `bytes` for one playback. `loops` of -1 repeats forever;
/// otherwise the sound plays `loops + 1` times.
fn sources(bytes: &Encoded, loops: i32, fade_ms: u32) -> Result<Vec<BoxedSource>, EngineError> {
    let decode = || {
        Decoder::new(Cursor::new(Arc::clone(bytes)))
            .map_err(|err| EngineError::Platform(format!("audio decode failed: {}", err)))
    };
    let fade = |source: BoxedSource| -> BoxedSource {
        if fade_ms == 0 {
            source
        } else {
            Box::new(source.fade_in(Duration::from_millis(u64::from(fade_ms))))
        }
    };

    if loops < 0 {
        return Ok(vec![fade(Box::new(decode()?.repeat_infinite()) as BoxedSource)]);
    }

    let mut queued = Vec::with_capacity(loops as usize + 1);
    queued.push(fade(Box::new(decode()?) as BoxedSource));
    for _ in 0..loops {
        queued.push(Box::new(decode()?) as BoxedSource);
    }
    Ok(queued)
}

/// Ramps `sink` to silence over `fade_ms`, then stops it.
fn fade_out(sink: Sink, fade_ms: u32) {
    if fade_ms == 0 {
        sink.stop();
        return;
    }

    let start = sink.volume();
    let step = Duration::from_millis(u64::from(fade_ms)) / FADE_STEPS;
    let spawned = thread::Builder::new()
        .name("audio-fade".into())
        .spawn(move || {
            for i in 1..=FADE_STEPS {
                thread::sleep(step);
                sink.set_volume(start * (1.0 - i as f32 / FADE_STEPS as f32));
            }
            sink.stop();
        });
    if let Err(err) = spawned {
        warn!(target: "audio", "Fade thread unavailable, stopping at once: {}", err);
    }
}

//=== RodioBackend ========================================================

struct Sound {
    bytes: Option<Encoded>,
    volume: f32,
}

/// Plays sounds and music on the default output device.
pub struct RodioBackend {
    handle: OutputStreamHandle,
    _stream_guard: Sender<()>,

    next_id: u64,
    sounds: HashMap<SoundId, Sound>,
    channels: HashMap<ChannelId, Sink>,

    music: Option<Encoded>,
    music_sink: Option<Sink>,
    music_volume: f32,
}

impl RodioBackend {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// [`EngineError::Platform`] when no device is available.
    pub fn open() -> Result<Self, EngineError> {
        let (ready_tx, ready_rx) = bounded(1);
        let (guard_tx, guard_rx) = bounded::<()>(0);

        thread::Builder::new()
            .name("audio-output".into())
            .spawn(move || match OutputStream::try_default() {
                Ok((_stream, handle)) => {
                    let _ = ready_tx.send(Ok(handle));
                    // Returns once the backend drops its guard.
                    let _ = guard_rx.recv();
                }
                Err(err) => {
                    let _ = ready_tx.send(Err(err.to_string()));
                }
            })?;

        let handle = ready_rx
            .recv()
            .map_err(|_| EngineError::Platform("audio output thread exited".into()))?
            .map_err(|err| EngineError::Platform(format!("no audio device: {}", err)))?;

        info!(target: "audio", "Audio output opened");
        Ok(Self {
            handle,
            _stream_guard: guard_tx,
            next_id: 0,
            sounds: HashMap::new(),
            channels: HashMap::new(),
            music: None,
            music_sink: None,
            music_volume: 1.0,
        })
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn start(&self, bytes: &Encoded, loops: i32, fade_ms: u32, volume: f32) -> Option<Sink> {
        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(err) => {
                warn!(target: "audio", "Cannot open a sink: {}", err);
                return None;
            }
        };
        let queued = match sources(bytes, loops, fade_ms) {
            Ok(queued) => queued,
            Err(err) => {
                warn!(target: "audio", "{}", err);
                return None;
            }
        };

        sink.set_volume(volume);
        for source in queued {
            sink.append(source);
        }
        Some(sink)
    }

    fn read(path: &Path) -> Result<Encoded, EngineError> {
        if !path.exists() {
            return Err(EngineError::MissingResource {
                path: path.to_path_buf(),
            });
        }
        let bytes: Encoded = fs::read(path)?.into();
        // Undecodable files fail here, not on first play.
        Decoder::new(Cursor::new(Arc::clone(&bytes)))
            .map_err(|err| EngineError::Platform(format!("{}: {}", path.display(), err)))?;
        Ok(bytes)
    }
}

impl SoundBackend for RodioBackend {
    fn load(&mut self, path: &Path) -> Result<SoundId, EngineError> {
        let bytes = Self::read(path)?;
        let id = SoundId(self.allocate());
        debug!(target: "audio", "Loaded {} as {:?}", path.display(), id);
        self.sounds.insert(id, Sound { bytes: Some(bytes), volume: 1.0 });
        Ok(id)
    }

    fn placeholder(&mut self) -> SoundId {
        let id = SoundId(self.allocate());
        self.sounds.insert(id, Sound { bytes: None, volume: 1.0 });
        id
    }

    fn play(&mut self, sound: SoundId, loops: i32, fade_ms: u32) -> Option<ChannelId> {
        self.channels.retain(|_, sink| !sink.empty());

        let (bytes, volume) = {
            let entry = self.sounds.get(&sound)?;
            (entry.bytes.clone(), entry.volume)
        };
        let channel = ChannelId(self.allocate());

        // Placeholders get a channel that is never busy.
        if let Some(bytes) = bytes {
            if let Some(sink) = self.start(&bytes, loops, fade_ms, volume) {
                trace!(target: "audio", "Playing {:?} on {:?}", sound, channel);
                self.channels.insert(channel, sink);
            }
        }
        Some(channel)
    }

    fn stop(&mut self, channel: ChannelId, fade_ms: u32) {
        if let Some(sink) = self.channels.remove(&channel) {
            fade_out(sink, fade_ms);
        }
    }

    fn stop_all(&mut self, fade_ms: u32) {
        for (_, sink) in self.channels.drain() {
            fade_out(sink, fade_ms);
        }
    }

    fn is_busy(&self, channel: ChannelId) -> bool {
        self.channels.get(&channel).is_some_and(|sink| !sink.empty())
    }

    fn set_sound_volume(&mut self, sound: SoundId, volume: f32) {
        if let Some(entry) = self.sounds.get_mut(&sound) {
            entry.volume = volume;
        }
    }

    fn set_channel_volume(&mut self, channel: ChannelId, volume: f32) {
        if let Some(sink) = self.channels.get(&channel) {
            sink.set_volume(volume);
        }
    }

    //--- Music ------------------------------------------------------------

    fn load_music(&mut self, path: &Path) -> Result<(), EngineError> {
        self.music = Some(Self::read(path)?);
        debug!(target: "audio", "Music loaded from {}", path.display());
        Ok(())
    }

    fn play_music(&mut self, loops: i32, fade_ms: u32) {
        if let Some(previous) = self.music_sink.take() {
            previous.stop();
        }
        let Some(bytes) = self.music.clone() else {
            return;
        };
        self.music_sink = self.start(&bytes, loops, fade_ms, self.music_volume);
    }

    fn stop_music(&mut self, fade_ms: u32) {
        if let Some(sink) = self.music_sink.take() {
            fade_out(sink, fade_ms);
        }
    }

    fn pause_music(&mut self) {
        if let Some(sink) = &self.music_sink {
            sink.pause();
        }
    }

    fn resume_music(&mut self) {
        if let Some(sink) = &self.music_sink {
            sink.play();
        }
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume;
        if let Some(sink) = &self.music_sink {
            sink.set_volume(volume);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal 16-bit mono PCM WAV with `samples` silent frames.
    fn wav(samples: u32) -> Encoded {
        let data_len = samples * 2;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&16000u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(bytes.len() + data_len as usize, 0);
        bytes.into()
    }

    #[test]
    fn finite_loops_queue_one_source_per_pass() {
        assert_eq!(sources(&wav(8), 0, 0).unwrap().len(), 1);
        assert_eq!(sources(&wav(8), 2, 0).unwrap().len(), 3);
        assert_eq!(sources(&wav(8), 2, 50).unwrap().len(), 3);
    }

    #[test]
    fn infinite_loop_is_a_single_repeating_source() {
        let queued = sources(&wav(8), -1, 0).unwrap();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued.into_iter().next().unwrap().take(100).count(), 100);
    }

    #[test]
    fn garbage_bytes_do_not_decode() {
        let bytes: Encoded = Arc::from(&b"definitely not audio"[..]);
        assert!(sources(&bytes, 0, 0).is_err());
    }

    #[test]
    fn missing_file_is_a_missing_resource() {
        let result = RodioBackend::read(Path::new("definitely/not/here.wav"));
        assert!(matches!(result, Err(EngineError::MissingResource { .. })));
    }

    #[test]
    fn readable_wav_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("click.wav");
        fs::write(&path, &*wav(16)).unwrap();

        assert_eq!(RodioBackend::read(&path).unwrap().len(), wav(16).len());
    }
}
