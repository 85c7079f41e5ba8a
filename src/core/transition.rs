//=========================================================================
// Fade Transition
//=========================================================================
//
// Time-driven alpha interpolation rendered as a uniform colour overlay.
//
// Lifecycle:
//   startup() → update(dt)* → is_done() → startup() → ...
//
// Every update moves alpha by at least one unit, so a fade always ends
// in a finite number of frames regardless of how small dt gets.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::render::{Color, Rect, RenderSurface, Size};

//=== FadeTransition ======================================================

/// Fade-in / fade-out overlay.
///
/// ```
/// use launchpad_engine::core::transition::FadeTransition;
/// use launchpad_engine::core::render::Size;
///
/// let mut fade = FadeTransition::new(Size::new(640, 480)).alphas(255, 0).speed(100.0);
/// while !fade.is_done() {
///     fade.update(0.1);
/// }
/// assert_eq!(fade.alpha(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct FadeTransition {
    size: Size,
    pos: (i32, i32),
    color: Color,
    starting_alpha: f32,
    ending_alpha: f32,
    alpha: f32,
    speed: f32,
    done: bool,
}

impl FadeTransition {
    /// Black fade from transparent to opaque at 100 units/second.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pos: (0, 0),
            color: Color::BLACK,
            starting_alpha: 0.0,
            ending_alpha: 255.0,
            alpha: 0.0,
            speed: 100.0,
            done: false,
        }
    }

    //--- Configuration ----------------------------------------------------

    /// Sets both endpoints (clamped into 0..=255) and restarts the fade.
    pub fn alphas(mut self, starting: i32, ending: i32) -> Self {
        self.starting_alpha = clamp_alpha(starting as f32);
        self.ending_alpha = clamp_alpha(ending as f32);
        self.startup();
        self
    }

    /// Alpha units per second.
    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed.abs();
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.pos = (x, y);
        self
    }

    //--- Lifecycle --------------------------------------------------------

    /// Rewinds alpha to its starting value.
    pub fn startup(&mut self) {
        self.alpha = self.starting_alpha;
        self.done = self.alpha == self.ending_alpha;
    }

    /// Advances the fade by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.done {
            return;
        }

        let step = (self.speed * dt.max(0.0)).max(1.0);

        if self.starting_alpha > self.ending_alpha {
            self.alpha = (self.alpha - step).max(self.ending_alpha);
        } else {
            self.alpha = (self.alpha + step).min(self.ending_alpha);
        }

        self.alpha = clamp_alpha(self.alpha);
        if self.alpha == self.ending_alpha {
            self.done = true;
        }
    }

    /// Composites the overlay at its current alpha.
    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        let rect = Rect::from_size(self.pos.0, self.pos.1, self.size);
        surface.fill_rect(rect, self.color.with_alpha(self.alpha()));
    }

    /// Retargets the overlay dimensions without touching alpha.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Current alpha rounded to the nearest unit.
    pub fn alpha(&self) -> u8 {
        self.alpha.round() as u8
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

fn clamp_alpha(alpha: f32) -> f32 {
    alpha.clamp(0.0, 255.0)
}

//=========================================================================
// Unit Tests
//=========================================================================
