//! Software 2D rendering context.

use std::f64::consts::TAU;

use common::{Color, Point, Rect};

use crate::paint::{CompositeOperation, LineCap, LineJoin, DEFAULT_MITER_LIMIT};
use crate::surface::Surface;

/// 2D canvas rendering context backed by an RGBA8 pixel buffer.
#[derive(Debug)]
pub struct CanvasContext2D {
    /// Canvas width.
    width: u32,
    /// Canvas height.
    height: u32,
    /// Pixel data.
    data: Vec<u8>,
    /// Current fill color.
    fill_color: Color,
    /// Line cap.
    line_cap: LineCap,
    /// Line join.
    line_join: LineJoin,
    /// Miter limit.
    miter_limit: f64,
    /// Global alpha.
    global_alpha: f64,
    /// Global composite operation.
    global_composite_operation: CompositeOperation,
    /// Shadow color.
    shadow_color: Color,
    /// Shadow blur.
    shadow_blur: f64,
    /// Shadow offset X.
    shadow_offset_x: f64,
    /// Shadow offset Y.
    shadow_offset_y: f64,
    /// Current path.
    path: Vec<PathCommand>,
    /// Transform matrix.
    transform: Transform2D,
    /// Save stack.
    save_stack: Vec<ContextState>,
}

impl CanvasContext2D {
    /// Create a new 2D context with all pixels transparent.
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize) * 4;
        Self {
            width,
            height,
            data: vec![0; size],
            fill_color: Color::BLACK,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: DEFAULT_MITER_LIMIT,
            global_alpha: 1.0,
            global_composite_operation: CompositeOperation::SourceOver,
            shadow_color: Color::TRANSPARENT,
            shadow_blur: 0.0,
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            path: Vec::new(),
            transform: Transform2D::identity(),
            save_stack: Vec::new(),
        }
    }

    /// Current transform matrix.
    pub fn transform(&self) -> Transform2D {
        self.transform
    }

    pub fn global_alpha(&self) -> f64 {
        self.global_alpha
    }

    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    /// Number of states currently saved.
    pub fn save_depth(&self) -> usize {
        self.save_stack.len()
    }

    /// Read one pixel in device space.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        let px = &self.data[idx..idx + 4];
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Get image data.
    pub fn get_image_data(&self, x: u32, y: u32, width: u32, height: u32) -> ImageData {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);

        for py in 0..height {
            for px in 0..width {
                let cx = x + px;
                let cy = y + py;
                if cx < self.width && cy < self.height {
                    let idx = self.index(cx, cy);
                    data.extend_from_slice(&self.data[idx..idx + 4]);
                } else {
                    data.extend_from_slice(&[0, 0, 0, 0]);
                }
            }
        }

        ImageData { width, height, data }
    }

    /// Consume the context, returning its RGBA pixel buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }

    fn shadow_visible(&self) -> bool {
        self.shadow_blur > 0.0 && self.shadow_color.a > 0
    }

    /// Device-space bounds of the given commands, clipped to the canvas.
    fn device_bounds(&self, commands: &[PathCommand]) -> Option<Rect> {
        let canvas = Rect::new(0.0, 0.0, self.width as f64, self.height as f64);

        commands
            .iter()
            .filter_map(PathCommand::bounds)
            .map(|b| self.transform.transform_rect(b))
            .reduce(|a, b| a.union(&b))
            .and_then(|b| b.intersection(&canvas))
    }

    /// Indices of device pixels whose centers, shifted back by `offset`,
    /// map into one of the commands in user space.
    fn covered_pixels(&self, commands: &[PathCommand], bounds: Rect, offset: Point) -> Vec<usize> {
        let Some(inverse) = self.transform.inverse() else {
            return Vec::new();
        };

        let x0 = bounds.x.floor().max(0.0) as u32;
        let y0 = bounds.y.floor().max(0.0) as u32;
        let x1 = (bounds.right().ceil().max(0.0) as u32).min(self.width);
        let y1 = (bounds.bottom().ceil().max(0.0) as u32).min(self.height);

        let mut covered = Vec::new();
        for py in y0..y1 {
            for px in x0..x1 {
                let device = Point::new(px as f64 + 0.5 - offset.x, py as f64 + 0.5 - offset.y);
                let user = inverse.transform_point(device);
                if commands.iter().any(|c| c.covers(user)) {
                    covered.push(self.index(px, py));
                }
            }
        }
        covered
    }

    fn rasterize(&mut self, commands: &[PathCommand], color: Color) {
        let Some(bounds) = self.device_bounds(commands) else {
            return;
        };

        let op = match self.global_composite_operation {
            op @ (CompositeOperation::SourceOver
            | CompositeOperation::Copy
            | CompositeOperation::DestinationOver
            | CompositeOperation::DestinationOut) => op,
            other => {
                tracing::trace!(op = %other, "composite operation not rasterized, using source-over");
                CompositeOperation::SourceOver
            }
        };

        if self.shadow_visible() {
            let offset = Point::new(self.shadow_offset_x, self.shadow_offset_y);
            let canvas = Rect::new(0.0, 0.0, self.width as f64, self.height as f64);
            let shifted = Rect::new(bounds.x + offset.x, bounds.y + offset.y, bounds.width, bounds.height);
            if let Some(shadow_bounds) = shifted.intersection(&canvas) {
                let shadow = self.shadow_color;
                for idx in self.covered_pixels(commands, shadow_bounds, offset) {
                    self.composite_pixel(idx, shadow, op);
                }
            }
        }

        for idx in self.covered_pixels(commands, bounds, Point::ZERO) {
            self.composite_pixel(idx, color, op);
        }
    }

    fn composite_pixel(&mut self, idx: usize, color: Color, op: CompositeOperation) {
        let alpha = (color.a as f64 * self.global_alpha).round().clamp(0.0, 255.0) as u8;
        let src = color.with_alpha(alpha);
        let px = &mut self.data[idx..idx + 4];
        let dst = Color::rgba(px[0], px[1], px[2], px[3]);

        let out = match op {
            CompositeOperation::Copy => src,
            CompositeOperation::DestinationOver => dst.blend_over(src),
            CompositeOperation::DestinationOut => {
                let keep = 1.0 - src.a as f64 / 255.0;
                dst.with_alpha((dst.a as f64 * keep).round() as u8)
            }
            _ => src.blend_over(dst),
        };

        px.copy_from_slice(&[out.r, out.g, out.b, out.a]);
    }
}

impl Surface for CanvasContext2D {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn save(&mut self) {
        self.save_stack.push(ContextState {
            fill_color: self.fill_color,
            line_cap: self.line_cap,
            line_join: self.line_join,
            miter_limit: self.miter_limit,
            global_alpha: self.global_alpha,
            global_composite_operation: self.global_composite_operation,
            shadow_color: self.shadow_color,
            shadow_blur: self.shadow_blur,
            shadow_offset_x: self.shadow_offset_x,
            shadow_offset_y: self.shadow_offset_y,
            transform: self.transform,
        });
    }

    fn restore(&mut self) {
        if let Some(state) = self.save_stack.pop() {
            self.fill_color = state.fill_color;
            self.line_cap = state.line_cap;
            self.line_join = state.line_join;
            self.miter_limit = state.miter_limit;
            self.global_alpha = state.global_alpha;
            self.global_composite_operation = state.global_composite_operation;
            self.shadow_color = state.shadow_color;
            self.shadow_blur = state.shadow_blur;
            self.shadow_offset_x = state.shadow_offset_x;
            self.shadow_offset_y = state.shadow_offset_y;
            self.transform = state.transform;
        }
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.transform = self.transform.translate(x, y);
    }

    fn rotate(&mut self, angle: f64) {
        self.transform = self.transform.rotate(angle);
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.transform = self.transform.scale(x, y);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let commands = [PathCommand::Rect(x, y, width, height)];
        let Some(bounds) = self.device_bounds(&commands) else {
            return;
        };

        for idx in self.covered_pixels(&commands, bounds, Point::ZERO) {
            self.data[idx..idx + 4].fill(0);
        }
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        if alpha.is_finite() {
            self.global_alpha = alpha.clamp(0.0, 1.0);
        }
    }

    fn set_global_composite_operation(&mut self, op: CompositeOperation) {
        self.global_composite_operation = op;
    }

    fn set_shadow_offset_x(&mut self, offset: f64) {
        self.shadow_offset_x = offset;
    }

    fn set_shadow_offset_y(&mut self, offset: f64) {
        self.shadow_offset_y = offset;
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        if blur.is_finite() && blur >= 0.0 {
            self.shadow_blur = blur;
        }
    }

    fn set_shadow_color(&mut self, color: Color) {
        self.shadow_color = color;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    fn set_miter_limit(&mut self, limit: f64) {
        if limit.is_finite() && limit > 0.0 {
            self.miter_limit = limit;
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let color = self.fill_color;
        self.rasterize(&[PathCommand::Rect(x, y, width, height)], color);
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.path.push(PathCommand::Rect(x, y, width, height));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, anticlockwise: bool) {
        if radius < 0.0 {
            tracing::warn!(radius, "negative arc radius ignored");
            return;
        }
        self.path.push(PathCommand::Arc(x, y, radius, start_angle, end_angle, anticlockwise));
    }

    fn close_path(&mut self) {
        self.path.push(PathCommand::ClosePath);
    }

    fn fill(&mut self) {
        let path = std::mem::take(&mut self.path);
        let color = self.fill_color;
        self.rasterize(&path, color);
        self.path = path;
    }
}

/// Path command.
///
/// Arc sub-paths fill as pie slices around their center.
#[derive(Clone, Debug)]
pub enum PathCommand {
    Rect(f64, f64, f64, f64),
    Arc(f64, f64, f64, f64, f64, bool),
    ClosePath,
}

impl PathCommand {
    /// User-space bounds.
    fn bounds(&self) -> Option<Rect> {
        match *self {
            PathCommand::Rect(x, y, w, h) => Some(normalized_rect(x, y, w, h)),
            PathCommand::Arc(x, y, r, ..) => Some(Rect::new(x - r, y - r, r * 2.0, r * 2.0)),
            PathCommand::ClosePath => None,
        }
    }

    fn covers(&self, point: Point) -> bool {
        match *self {
            PathCommand::Rect(x, y, w, h) => normalized_rect(x, y, w, h).contains_point(point),
            PathCommand::Arc(cx, cy, r, start, end, anticlockwise) => {
                let dx = point.x - cx;
                let dy = point.y - cy;
                dx * dx + dy * dy <= r * r && sweep_contains(dy.atan2(dx), start, end, anticlockwise)
            }
            PathCommand::ClosePath => false,
        }
    }
}

fn normalized_rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x.min(x + w), y.min(y + h), w.abs(), h.abs())
}

fn sweep_contains(angle: f64, start: f64, end: f64, anticlockwise: bool) -> bool {
    let (from, to) = if anticlockwise { (end, start) } else { (start, end) };
    let span = to - from;
    if span >= TAU {
        return true;
    }
    (angle - from).rem_euclid(TAU) <= span.rem_euclid(TAU)
}

/// 2D transform matrix.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform2D {
    /// Create a new transform.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Create identity transform.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Scale transform.
    pub fn scale(&self, x: f64, y: f64) -> Self {
        Self::new(self.a * x, self.b * x, self.c * y, self.d * y, self.e, self.f)
    }

    /// Rotate transform.
    pub fn rotate(&self, angle: f64) -> Self {
        let cos = angle.cos();
        let sin = angle.sin();
        Self::new(
            self.a * cos + self.c * sin,
            self.b * cos + self.d * sin,
            self.c * cos - self.a * sin,
            self.d * cos - self.b * sin,
            self.e,
            self.f,
        )
    }

    /// Translate transform.
    pub fn translate(&self, x: f64, y: f64) -> Self {
        Self::new(
            self.a,
            self.b,
            self.c,
            self.d,
            self.e + self.a * x + self.c * y,
            self.f + self.b * x + self.d * y,
        )
    }

    pub fn transform_point(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.e,
            self.b * point.x + self.d * point.y + self.f,
        )
    }

    /// Axis-aligned bounds of a transformed rectangle.
    pub fn transform_rect(&self, rect: Rect) -> Rect {
        let corners = [
            self.transform_point(Point::new(rect.x, rect.y)),
            self.transform_point(Point::new(rect.right(), rect.y)),
            self.transform_point(Point::new(rect.x, rect.bottom())),
            self.transform_point(Point::new(rect.right(), rect.bottom())),
        ];

        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn inverse(&self) -> Option<Transform2D> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        Some(Transform2D::new(
            self.d * inv,
            -self.b * inv,
            -self.c * inv,
            self.a * inv,
            (self.c * self.f - self.d * self.e) * inv,
            (self.b * self.e - self.a * self.f) * inv,
        ))
    }
}

/// Saved context state.
#[derive(Clone, Debug)]
struct ContextState {
    fill_color: Color,
    line_cap: LineCap,
    line_join: LineJoin,
    miter_limit: f64,
    global_alpha: f64,
    global_composite_operation: CompositeOperation,
    shadow_color: Color,
    shadow_blur: f64,
    shadow_offset_x: f64,
    shadow_offset_y: f64,
    transform: Transform2D,
}

/// Image data.
#[derive(Clone, Debug)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_context_2d() {
        let mut ctx = CanvasContext2D::new(100, 100);

        ctx.set_fill_color(Color::RED);
        ctx.fill_rect(10.0, 10.0, 20.0, 20.0);

        assert_eq!(ctx.pixel(15, 15), Some(Color::RED));
        assert_eq!(ctx.pixel(5, 5), Some(Color::TRANSPARENT));
        assert_eq!(ctx.pixel(100, 0), None);
    }

    #[test]
    fn test_save_restore() {
        let mut ctx = CanvasContext2D::new(100, 100);

        ctx.set_fill_color(Color::RED);
        ctx.set_global_alpha(0.5);
        ctx.save();

        ctx.set_fill_color(Color::GREEN);
        ctx.set_global_alpha(0.25);
        ctx.set_line_cap(LineCap::Round);
        ctx.translate(10.0, 10.0);
        assert_eq!(ctx.fill_color(), Color::GREEN);

        ctx.restore();
        assert_eq!(ctx.fill_color(), Color::RED);
        assert_eq!(ctx.global_alpha(), 0.5);
        assert_eq!(ctx.line_cap(), LineCap::Butt);
        assert_eq!(ctx.transform(), Transform2D::identity());

        // Unbalanced restore is ignored.
        ctx.restore();
        assert_eq!(ctx.save_depth(), 0);
    }

    #[test]
    fn test_translated_fill() {
        let mut ctx = CanvasContext2D::new(50, 50);
        ctx.translate(20.0, 30.0);
        ctx.set_fill_color(Color::BLUE);
        ctx.fill_rect(0.0, 0.0, 5.0, 5.0);

        assert_eq!(ctx.pixel(22, 32), Some(Color::BLUE));
        assert_eq!(ctx.pixel(2, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_rotated_fill() {
        let mut ctx = CanvasContext2D::new(50, 50);
        ctx.translate(25.0, 25.0);
        ctx.rotate(FRAC_PI_2);
        ctx.set_fill_color(Color::WHITE);
        // Extends along +x in user space, +y on the device after a quarter turn.
        ctx.fill_rect(0.0, -1.0, 20.0, 2.0);

        assert_eq!(ctx.pixel(25, 40), Some(Color::WHITE));
        assert_eq!(ctx.pixel(40, 25), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_global_alpha_blends() {
        let mut ctx = CanvasContext2D::new(10, 10);
        ctx.set_fill_color(Color::WHITE);
        ctx.fill_rect(0.0, 0.0, 10.0, 10.0);

        ctx.set_global_alpha(0.0);
        ctx.set_fill_color(Color::BLACK);
        ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(ctx.pixel(5, 5), Some(Color::WHITE));

        ctx.set_global_alpha(f64::NAN);
        assert_eq!(ctx.global_alpha(), 0.0);
    }

    #[test]
    fn test_clear_rect() {
        let mut ctx = CanvasContext2D::new(20, 20);
        ctx.set_fill_color(Color::RED);
        ctx.fill_rect(0.0, 0.0, 20.0, 20.0);

        ctx.clear_rect(0.0, 0.0, 10.0, 20.0);
        assert_eq!(ctx.pixel(5, 5), Some(Color::TRANSPARENT));
        assert_eq!(ctx.pixel(15, 5), Some(Color::RED));
    }

    #[test]
    fn test_destination_out() {
        let mut ctx = CanvasContext2D::new(10, 10);
        ctx.set_fill_color(Color::RED);
        ctx.fill_rect(0.0, 0.0, 10.0, 10.0);

        ctx.set_global_composite_operation(CompositeOperation::DestinationOut);
        ctx.fill_rect(0.0, 0.0, 5.0, 10.0);
        assert_eq!(ctx.pixel(2, 2).map(|c| c.a), Some(0));
        assert_eq!(ctx.pixel(7, 2), Some(Color::RED));
    }

    #[test]
    fn test_shadow_drawn_only_with_blur() {
        let mut ctx = CanvasContext2D::new(40, 40);
        ctx.set_fill_color(Color::RED);
        ctx.set_shadow_color(Color::BLACK);
        ctx.set_shadow_offset_x(10.0);
        ctx.set_shadow_offset_y(10.0);

        ctx.fill_rect(0.0, 0.0, 5.0, 5.0);
        assert_eq!(ctx.pixel(12, 12), Some(Color::TRANSPARENT));

        ctx.set_shadow_blur(4.0);
        ctx.fill_rect(0.0, 0.0, 5.0, 5.0);
        assert_eq!(ctx.pixel(12, 12), Some(Color::BLACK));
        assert_eq!(ctx.pixel(2, 2), Some(Color::RED));
    }

    #[test]
    fn test_arc_fill() {
        let mut ctx = CanvasContext2D::new(40, 40);
        ctx.set_fill_color(Color::GREEN);
        ctx.begin_path();
        ctx.arc(20.0, 20.0, 10.0, 0.0, TAU, false);
        ctx.fill();

        assert_eq!(ctx.pixel(20, 20), Some(Color::GREEN));
        assert_eq!(ctx.pixel(27, 20), Some(Color::GREEN));
        // Corner of the bounding box lies outside the disc.
        assert_eq!(ctx.pixel(11, 11), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_half_arc_fill() {
        let mut ctx = CanvasContext2D::new(40, 40);
        ctx.set_fill_color(Color::GREEN);
        ctx.begin_path();
        // Lower half in y-down space.
        ctx.arc(20.0, 20.0, 10.0, 0.0, std::f64::consts::PI, false);
        ctx.fill();

        assert_eq!(ctx.pixel(20, 25), Some(Color::GREEN));
        assert_eq!(ctx.pixel(20, 14), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_transform_inverse() {
        let t = Transform2D::identity()
            .translate(100.0, 50.0)
            .rotate(0.3)
            .scale(2.0, 0.5);
        let inv = t.inverse().unwrap();
        let p = Point::new(7.0, -3.0);

        assert!(approx(inv.transform_point(t.transform_point(p)), p));
        assert!(Transform2D::identity().scale(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn test_image_data() {
        let mut ctx = CanvasContext2D::new(100, 100);
        ctx.set_fill_color(Color::RED);
        ctx.fill_rect(0.0, 0.0, 10.0, 10.0);

        let image_data = ctx.get_image_data(0, 0, 10, 10);
        assert_eq!(image_data.width, 10);
        assert_eq!(image_data.height, 10);
        assert_eq!(&image_data.data[0..4], &[255, 0, 0, 255]);
    }
}
