//! Background layer painted when the surface is cleared.

use canvas::Surface;
use common::Color;

/// A layer that repaints the whole surface.
pub trait Background {
    fn redraw(&mut self, surface: &mut dyn Surface);
}

/// Background filled with a single color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolidBackground {
    pub color: Color,
}

impl SolidBackground {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Background for SolidBackground {
    fn redraw(&mut self, surface: &mut dyn Surface) {
        let width = surface.width() as f64;
        let height = surface.height() as f64;

        surface.save();
        surface.clear_rect(0.0, 0.0, width, height);
        surface.set_fill_color(self.color);
        surface.fill_rect(0.0, 0.0, width, height);
        surface.restore();
    }
}
