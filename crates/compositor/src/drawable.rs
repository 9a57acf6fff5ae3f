//! Drawable objects and their visual state.

use canvas::{CompositeOperation, LineCap, LineJoin, Surface, DEFAULT_MITER_LIMIT};
use common::{Color, Point};

/// Something that can paint itself onto a surface.
///
/// `draw` runs with the surface origin already moved to the object's
/// position and rotated/scaled by its whole ancestor chain, so shapes are
/// drawn relative to `(0, 0)`.
pub trait Drawable {
    /// Recompute derived state (motion, animation) before painting.
    fn update(&mut self, _props: &mut DrawableProps) {}

    /// Paint the object.
    fn draw(&mut self, ctx: &mut DrawContext<'_>);
}

/// Everything a [`Drawable`] sees while it draws.
pub struct DrawContext<'a> {
    /// Target surface, positioned at the object's origin.
    pub surface: &'a mut dyn Surface,
    /// Accumulated origin offset of the object in surface space.
    pub origin: Point,
    /// The object's own visual state.
    pub props: &'a DrawableProps,
}

/// Drop shadow descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    /// Blur radius. A shadow is only applied when this is positive.
    pub blur: f64,
    pub color: Color,
}

impl Shadow {
    pub fn new(offset_x: f64, offset_y: f64, blur: f64, color: Color) -> Self {
        Self {
            offset_x,
            offset_y,
            blur,
            color,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.blur > 0.0
    }
}

impl Default for Shadow {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, Color::TRANSPARENT)
    }
}

/// Stroke descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f64,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            miter_limit: DEFAULT_MITER_LIMIT,
        }
    }
}

/// Transform and paint state of one drawable.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawableProps {
    /// Position relative to the parent (or the surface for root objects).
    pub position: Point,
    /// Rotation in degrees.
    pub rotation: f64,
    pub scaling_x: f64,
    pub scaling_y: f64,
    /// Opacity in `[0, 1]`. NaN paints as fully opaque.
    pub opacity: f64,
    pub composition: CompositeOperation,
    pub shadow: Shadow,
    pub stroke: Stroke,
}

impl DrawableProps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Props positioned at `(x, y)`.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_scaling(mut self, x: f64, y: f64) -> Self {
        self.scaling_x = x;
        self.scaling_y = y;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_composition(mut self, composition: CompositeOperation) -> Self {
        self.composition = composition;
        self
    }

    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = shadow;
        self
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }

    /// Alpha the surface is painted with.
    #[inline]
    pub fn effective_opacity(&self) -> f64 {
        if self.opacity.is_nan() {
            1.0
        } else {
            self.opacity
        }
    }

    #[inline]
    pub fn is_scaled(&self) -> bool {
        self.scaling_x != 1.0 || self.scaling_y != 1.0
    }
}

impl Default for DrawableProps {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            rotation: 0.0,
            scaling_x: 1.0,
            scaling_y: 1.0,
            opacity: 1.0,
            composition: CompositeOperation::SourceOver,
            shadow: Shadow::default(),
            stroke: Stroke::default(),
        }
    }
}
