//=========================================================================
// Render Surface
//=========================================================================
//
// Opaque 2D drawing target consumed by scenes and overlays.
//
// The engine only needs three things from a surface: fill a rectangle
// (optionally translucent), present a finished frame, and react to a
// viewport change. Everything else belongs to the concrete backend.
//
// Draw order per frame:
//   scene.render() → global overlays → present()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use image::{ImageFormat, RgbImage};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::EngineError;

//=== Limits ==============================================================

/// Largest width or height a surface will allocate.
pub const MAX_SURFACE_DIMENSION: u32 = 8192;

//=== Color ===============================================================

/// 8-bit RGBA colour. Alpha 255 is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const PLATINUM: Self = Self::rgb(229, 228, 226);
    pub const DARK_GREEN: Self = Self::rgb(1, 50, 32);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Source-over blend of `self` onto an opaque destination.
    fn blend_over(self, dst: Color) -> Color {
        let a = u16::from(self.a);
        let inv = 255 - a;
        let mix = |s: u8, d: u8| ((u16::from(s) * a + u16::from(d) * inv + 127) / 255) as u8;
        Color::rgb(mix(self.r, dst.r), mix(self.g, dst.g), mix(self.b, dst.b))
    }
}

//=== Geometry ============================================================

/// Integer surface dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `min(width, height) / base_ratio`, used to scale content with the window.
    pub fn dependent(&self, base_ratio: f32) -> f32 {
        self.width.min(self.height) as f32 / base_ratio
    }
}

/// Axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub const fn from_size(x: i32, y: i32, size: Size) -> Self {
        Self::new(x, y, size.width, size.height)
    }
}

//=== RenderSurface =======================================================

/// Drawing target the engine renders into once per frame.
pub trait RenderSurface: Send {
    /// Current surface dimensions.
    fn size(&self) -> Size;

    /// Fills the whole surface with an opaque colour.
    fn clear(&mut self, color: Color);

    /// Composites a (possibly translucent) rectangle over the surface.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Adopts new dimensions after a viewport change.
    fn resize(&mut self, size: Size);

    /// Publishes the finished frame.
    fn present(&mut self);

    /// Writes the current frame to `path` as a PNG image.
    fn save_snapshot(&self, path: &Path) -> Result<(), EngineError>;

    /// Releases display resources at teardown.
    fn release(&mut self) {}
}

//=== Canvas ==============================================================

/// In-memory RGB surface.
///
/// Used for headless runs and tests, and as the CPU-side frame that the
/// window presents. Dimensions are clamped to `MAX_SURFACE_DIMENSION`.
pub struct Canvas {
    size: Size,
    pixels: Vec<Color>,
    frames_presented: u64,
}

impl Canvas {
    pub fn new(size: Size) -> Self {
        let size = bounded(size);
        Self {
            size,
            pixels: vec![Color::BLACK; pixel_count(size)],
            frames_presented: 0,
        }
    }

    /// Colour of the pixel at `(x, y)`, if inside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Row-major pixels of the current frame.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }

    /// Number of frames presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl RenderSurface for Canvas {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.pixels.fill(color.with_alpha(255));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if color.a == 0 {
            return;
        }

        // Clip to the surface
        let x1 = (i64::from(rect.x) + i64::from(rect.width)).clamp(0, i64::from(self.size.width)) as u32;
        let y1 = (i64::from(rect.y) + i64::from(rect.height)).clamp(0, i64::from(self.size.height)) as u32;
        let x0 = (rect.x.max(0) as u32).min(x1);
        let y0 = (rect.y.max(0) as u32).min(y1);

        for y in y0..y1 {
            let row = self.index(0, y);
            for px in &mut self.pixels[row + x0 as usize..row + x1 as usize] {
                *px = color.blend_over(*px);
            }
        }
    }

    fn resize(&mut self, size: Size) {
        let size = bounded(size);
        if size == self.size {
            return;
        }
        self.size = size;
        self.pixels = vec![Color::BLACK; pixel_count(size)];
    }

    fn present(&mut self) {
        self.frames_presented += 1;
        trace!(target: "render", "Presented frame {}", self.frames_presented);
    }

    fn save_snapshot(&self, path: &Path) -> Result<(), EngineError> {
        let rgb = self.pixels.iter().flat_map(|px| [px.r, px.g, px.b]).collect();
        let image = RgbImage::from_raw(self.size.width, self.size.height, rgb).ok_or_else(|| {
            EngineError::Configuration(format!("cannot snapshot a {:?} surface", self.size))
        })?;
        image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

//--- Sizing --------------------------------------------------------------

fn bounded(size: Size) -> Size {
    let clamped = Size::new(
        size.width.min(MAX_SURFACE_DIMENSION),
        size.height.min(MAX_SURFACE_DIMENSION),
    );
    if clamped != size {
        warn!(target: "render", "Surface {:?} clamped to {:?}", size, clamped);
    }
    clamped
}

fn pixel_count(size: Size) -> usize {
    size.width as usize * size.height as usize
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_fill_replaces_pixels() {
        let mut canvas = Canvas::new(Size::new(4, 4));
        canvas.fill_rect(Rect::new(1, 1, 2, 2), Color::WHITE);

        assert_eq!(canvas.pixel(1, 1), Some(Color::WHITE));
        assert_eq!(canvas.pixel(2, 2), Some(Color::WHITE));
        assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(canvas.pixel(3, 3), Some(Color::BLACK));
    }

    #[test]
    fn translucent_fill_blends() {
        let mut canvas = Canvas::new(Size::new(1, 1));
        canvas.clear(Color::WHITE);
        canvas.fill_rect(Rect::new(0, 0, 1, 1), Color::BLACK.with_alpha(128));

        let px = canvas.pixel(0, 0).unwrap();
        assert!(px.r > 120 && px.r < 135, "unexpected blend result {:?}", px);
    }

    #[test]
    fn zero_alpha_fill_is_invisible() {
        let mut canvas = Canvas::new(Size::new(2, 2));
        canvas.clear(Color::WHITE);
        canvas.fill_rect(Rect::new(0, 0, 2, 2), Color::BLACK.with_alpha(0));
        assert_eq!(canvas.pixel(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn fill_is_clipped_to_surface() {
        let mut canvas = Canvas::new(Size::new(2, 2));
        canvas.fill_rect(Rect::new(-5, -5, 100, 100), Color::WHITE);
        assert_eq!(canvas.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(canvas.pixel(1, 1), Some(Color::WHITE));
        assert_eq!(canvas.pixel(2, 2), None);

        canvas.fill_rect(Rect::new(10, 0, 4, 4), Color::BLACK);
        assert_eq!(canvas.pixel(1, 1), Some(Color::WHITE));
    }

    #[test]
    fn resize_changes_dimensions() {
        let mut canvas = Canvas::new(Size::new(2, 2));
        canvas.resize(Size::new(8, 3));
        assert_eq!(canvas.size(), Size::new(8, 3));
        assert!(canvas.pixel(7, 2).is_some());
    }

    #[test]
    fn present_counts_frames() {
        let mut canvas = Canvas::new(Size::new(1, 1));
        canvas.present();
        canvas.present();
        assert_eq!(canvas.frames_presented(), 2);
    }

    #[test]
    fn snapshot_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");

        let mut canvas = Canvas::new(Size::new(3, 2));
        canvas.clear(Color::WHITE);
        canvas.fill_rect(Rect::new(2, 1, 1, 1), Color::DARK_GREEN);
        canvas.save_snapshot(&path).unwrap();

        let saved = image::open(&path).unwrap().to_rgb8();
        assert_eq!(saved.dimensions(), (3, 2));
        assert_eq!(saved.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(saved.get_pixel(2, 1).0, [1, 50, 32]);
    }

    #[test]
    fn oversized_surface_is_clamped() {
        let mut canvas = Canvas::new(Size::new(65_536, 1));
        assert_eq!(canvas.size(), Size::new(MAX_SURFACE_DIMENSION, 1));

        canvas.resize(Size::new(u32::MAX, 4));
        assert_eq!(canvas.size(), Size::new(MAX_SURFACE_DIMENSION, 4));
        canvas.fill_rect(Rect::new(0, 0, u32::MAX, u32::MAX), Color::WHITE);
        assert_eq!(canvas.pixel(MAX_SURFACE_DIMENSION - 1, 3), Some(Color::WHITE));
    }

    #[test]
    fn size_dependent_uses_shorter_side() {
        assert_eq!(Size::new(640, 480).dependent(4.0), 120.0);
    }
}
