//=========================================================================
// Frame Hand-off
//=========================================================================
//
// Engine-side render surface for windowed runs.
//
//   Engine thread: scene.render() → Canvas → present() ── Frame ──► Platform
//
// Every `present()` packs the finished canvas into a `Frame` and offers it
// to the platform. When the platform has not drawn the previous frames yet
// the new one is dropped; the engine never blocks on the window.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use crossbeam_channel::{Sender, TrySendError};
use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::error::EngineError;
use crate::core::render::{Canvas, Color, Rect, RenderSurface, Size};

//=== Frame ===============================================================

/// One finished frame, row-major, packed as `0x00RRGGBB`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Frame {
    pub size: Size,
    pub pixels: Vec<u32>,
}

impl Frame {
    pub(crate) fn from_canvas(canvas: &Canvas) -> Self {
        Self {
            size: canvas.size(),
            pixels: canvas.pixels().iter().map(|px| pack(*px)).collect(),
        }
    }
}

fn pack(color: Color) -> u32 {
    (u32::from(color.r) << 16) | (u32::from(color.g) << 8) | u32::from(color.b)
}

//=== WindowSurface =======================================================

/// [`Canvas`] whose presented frames are shown in the platform window.
pub(crate) struct WindowSurface {
    canvas: Canvas,
    frames: Sender<Frame>,
}

impl WindowSurface {
    pub(crate) fn new(size: Size, frames: Sender<Frame>) -> Self {
        Self {
            canvas: Canvas::new(size),
            frames,
        }
    }
}

impl RenderSurface for WindowSurface {
    fn size(&self) -> Size {
        self.canvas.size()
    }

    fn clear(&mut self, color: Color) {
        self.canvas.clear(color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.canvas.fill_rect(rect, color);
    }

    fn resize(&mut self, size: Size) {
        self.canvas.resize(size);
    }

    fn present(&mut self) {
        self.canvas.present();
        match self.frames.try_send(Frame::from_canvas(&self.canvas)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                trace!(target: "render", "Window busy, frame {} dropped", self.canvas.frames_presented());
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }

    fn save_snapshot(&self, path: &Path) -> Result<(), EngineError> {
        self.canvas.save_snapshot(path)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn colors_pack_as_xrgb() {
        assert_eq!(pack(Color::rgb(0x12, 0x34, 0x56)), 0x0012_3456);
        assert_eq!(pack(Color::WHITE), 0x00FF_FFFF);
    }

    #[test]
    fn present_sends_the_rendered_frame() {
        let (tx, rx) = bounded(2);
        let mut surface = WindowSurface::new(Size::new(2, 1), tx);

        surface.clear(Color::BLACK);
        surface.fill_rect(Rect::new(1, 0, 1, 1), Color::DARK_GREEN);
        surface.present();

        let frame = rx.try_recv().unwrap();
        assert_eq!(frame.size, Size::new(2, 1));
        assert_eq!(frame.pixels, vec![0, pack(Color::DARK_GREEN)]);
    }

    #[test]
    fn full_channel_drops_frames_without_blocking() {
        let (tx, rx) = bounded(1);
        let mut surface = WindowSurface::new(Size::new(1, 1), tx);

        surface.clear(Color::WHITE);
        surface.present();
        surface.clear(Color::BLACK);
        surface.present();

        assert_eq!(rx.try_recv().unwrap().pixels, vec![pack(Color::WHITE)]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn present_after_window_closed_is_harmless() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut surface = WindowSurface::new(Size::new(1, 1), tx);
        surface.present();
        surface.present();
    }
}
