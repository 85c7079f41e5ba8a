//=========================================================================
// Engine Errors
//=========================================================================
//
// Error taxonomy shared by every engine subsystem.
//
// Propagation:
//   Configuration   → fatal at build time, never raised inside the loop
//   MissingResource → recovered locally (placeholder + warning)
//   UnknownScene    → returned to the caller of set_state, no mutation
//   Frame / Panic   → caught once at the loop boundary, orderly shutdown
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use thiserror::Error;

//=== Scene Error Types ===================================================

/// Error type returned by scene lifecycle hooks.
///
/// Scenes are free to surface any error; the engine only needs to log it
/// and decide whether the frame can continue.
pub type SceneError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by scene lifecycle hooks.
pub type SceneResult = Result<(), SceneError>;

//=== EngineError =========================================================

/// Errors produced by the engine and its subsystems.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid numeric or structural configuration (e.g. non-positive fps).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// An asset could not be found. Only ever logged; never escapes a subsystem.
    #[error("resource not found: {}", path.display())]
    MissingResource { path: PathBuf },

    /// Transition requested to a scene that was never registered.
    #[error("unknown scene: {0}")]
    UnknownScene(String),

    /// Navigation requested while no scene is registered.
    #[error("no scenes registered")]
    NoScenes,

    /// Transition requested after the state machine shut down.
    #[error("scene state machine has terminated")]
    Terminated,

    /// A scene lifecycle hook returned an error.
    #[error("scene {scene} failed: {source}")]
    Scene {
        scene: String,
        #[source]
        source: SceneError,
    },

    /// Error that escaped a frame and ended the session.
    #[error("frame {frame} failed: {source}")]
    Frame {
        frame: u64,
        #[source]
        source: Box<EngineError>,
    },

    /// Panic caught at the loop boundary.
    #[error("frame {frame} panicked: {message}")]
    Panic { frame: u64, message: String },

    /// The window event loop could not be created or failed while running.
    #[error("platform error: {0}")]
    Platform(String),

    /// Settings file could not be parsed or serialized.
    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    /// A frame could not be encoded as an image.
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem error while persisting settings or screenshots.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Wraps a scene hook failure, tagging it with the scene's identity.
    pub(crate) fn scene<S: std::fmt::Debug>(scene: S, source: SceneError) -> Self {
        Self::Scene {
            scene: format!("{:?}", scene),
            source,
        }
    }

    /// Wraps an error that escaped the given frame.
    pub(crate) fn frame(frame: u64, source: EngineError) -> Self {
        Self::Frame {
            frame,
            source: Box::new(source),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_display() {
        let err = EngineError::Configuration("fps must be positive, got 0".into());
        assert_eq!(err.to_string(), "invalid configuration: fps must be positive, got 0");
    }

    #[test]
    fn scene_error_carries_scene_name() {
        let err = EngineError::scene("Splash", "boom".into());
        assert!(err.to_string().contains("\"Splash\""));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn frame_error_wraps_source() {
        let err = EngineError::frame(42, EngineError::UnknownScene("Quiz".into()));
        let text = err.to_string();
        assert!(text.contains("frame 42"));
        assert!(text.contains("unknown scene: Quiz"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn engine_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }
}
