//! Demo shapes.

use std::f64::consts::TAU;

use common::{Color, Size};
use compositor::{DrawContext, Drawable, DrawableProps};

/// Filled rectangle anchored at its top-left corner.
pub struct Rectangle {
    pub size: Size,
    pub fill: Color,
}

impl Rectangle {
    pub fn new(width: f64, height: f64, fill: Color) -> Self {
        Self {
            size: Size::new(width, height),
            fill,
        }
    }
}

impl Drawable for Rectangle {
    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        let surface = &mut *ctx.surface;
        surface.set_fill_color(self.fill);
        surface.begin_path();
        surface.rect(0.0, 0.0, self.size.width, self.size.height);
        surface.close_path();
        surface.fill();
    }
}

/// Filled circle centered on its origin.
pub struct Circle {
    pub radius: f64,
    pub fill: Color,
}

impl Circle {
    pub fn new(radius: f64, fill: Color) -> Self {
        Self { radius, fill }
    }
}

impl Drawable for Circle {
    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        let surface = &mut *ctx.surface;
        surface.set_fill_color(self.fill);
        surface.begin_path();
        surface.arc(0.0, 0.0, self.radius, 0.0, TAU, false);
        surface.close_path();
        surface.fill();
    }
}

/// Turns the wrapped shape by a fixed step on every frame.
pub struct Spin<D> {
    inner: D,
    degrees_per_frame: f64,
}

impl<D: Drawable> Spin<D> {
    pub fn new(inner: D, degrees_per_frame: f64) -> Self {
        Self {
            inner,
            degrees_per_frame,
        }
    }
}

impl<D: Drawable> Drawable for Spin<D> {
    fn update(&mut self, props: &mut DrawableProps) {
        props.rotation = (props.rotation + self.degrees_per_frame) % 360.0;
        self.inner.update(props);
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        self.inner.draw(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas::{RecordingSurface, SurfaceCall};

    fn draw_once(drawable: &mut dyn Drawable) -> Vec<SurfaceCall> {
        let mut surface = RecordingSurface::new(10, 10);
        let props = DrawableProps::default();
        let mut ctx = DrawContext {
            surface: &mut surface,
            origin: common::Point::ZERO,
            props: &props,
        };
        drawable.draw(&mut ctx);
        surface.take_calls()
    }

    #[test]
    fn test_rectangle_path() {
        let calls = draw_once(&mut Rectangle::new(3.0, 2.0, Color::RED));
        assert!(calls.contains(&SurfaceCall::Rect(0.0, 0.0, 3.0, 2.0)));
        assert_eq!(calls.last(), Some(&SurfaceCall::Fill));
    }

    #[test]
    fn test_circle_path() {
        let calls = draw_once(&mut Circle::new(5.0, Color::BLUE));
        assert!(calls.contains(&SurfaceCall::Arc(0.0, 0.0, 5.0, 0.0, TAU, false)));
    }

    #[test]
    fn test_spin_wraps_rotation() {
        let mut spin = Spin::new(Circle::new(1.0, Color::RED), 100.0);
        let mut props = DrawableProps::default();
        for _ in 0..4 {
            spin.update(&mut props);
        }
        assert_eq!(props.rotation, 40.0);
    }
}
