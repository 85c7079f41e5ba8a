//=========================================================================
// Presenter
//=========================================================================
//
// Copies engine frames into the window through a softbuffer surface.
// Lives on the main thread next to the window it draws into.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::num::NonZeroU32;
use std::sync::Arc;

use softbuffer::{Context, SoftBufferError, Surface};
use winit::window::Window;

//=== Internal Dependencies ===============================================

use crate::core::render::Size;

use super::frame::Frame;

//=== Presenter ===========================================================

pub(crate) struct Presenter {
    surface: Surface<Arc<Window>, Arc<Window>>,
    _context: Context<Arc<Window>>,
    size: Option<Size>,
}

impl Presenter {
    pub(crate) fn new(window: Arc<Window>) -> Result<Self, SoftBufferError> {
        let context = Context::new(Arc::clone(&window))?;
        let surface = Surface::new(&context, window)?;
        Ok(Self {
            surface,
            _context: context,
            size: None,
        })
    }

    /// Shows `frame`, resizing the backing buffer when its size changed.
    /// Empty frames are skipped.
    pub(crate) fn show(&mut self, frame: &Frame) -> Result<(), SoftBufferError> {
        let (Some(width), Some(height)) = (
            NonZeroU32::new(frame.size.width),
            NonZeroU32::new(frame.size.height),
        ) else {
            return Ok(());
        };

        if self.size != Some(frame.size) {
            self.surface.resize(width, height)?;
            self.size = Some(frame.size);
        }

        let mut buffer = self.surface.buffer_mut()?;
        for (dst, src) in buffer.iter_mut().zip(&frame.pixels) {
            *dst = *src;
        }
        buffer.present()
    }
}
