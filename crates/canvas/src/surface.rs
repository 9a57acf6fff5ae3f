//! The drawing-surface contract.

use crate::paint::{CompositeOperation, LineCap, LineJoin};
use common::Color;

/// A raster target with a canvas-style state machine.
///
/// Transform calls compose onto the current matrix. `save`/`restore`
/// push and pop the full transform and paint state.
pub trait Surface {
    /// Surface width in pixels.
    fn width(&self) -> u32;
    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Push the current transform and paint state.
    fn save(&mut self);
    /// Pop the most recently saved state. No-op when nothing is saved.
    fn restore(&mut self);

    fn translate(&mut self, x: f64, y: f64);
    /// Rotate by `angle` radians, clockwise in a y-down space.
    fn rotate(&mut self, angle: f64);
    fn scale(&mut self, x: f64, y: f64);

    /// Reset the pixels covered by the rectangle to transparent black.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn set_global_alpha(&mut self, alpha: f64);
    fn set_global_composite_operation(&mut self, op: CompositeOperation);

    fn set_shadow_offset_x(&mut self, offset: f64);
    fn set_shadow_offset_y(&mut self, offset: f64);
    fn set_shadow_blur(&mut self, blur: f64);
    fn set_shadow_color(&mut self, color: Color);

    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_miter_limit(&mut self, limit: f64);

    fn set_fill_color(&mut self, color: Color);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn begin_path(&mut self);
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, anticlockwise: bool);
    fn close_path(&mut self);
    /// Fill every sub-path of the current path with the fill color.
    fn fill(&mut self);
}
