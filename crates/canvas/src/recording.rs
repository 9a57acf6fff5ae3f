//! A surface that records calls instead of rasterizing them.

use common::Color;

use crate::paint::{CompositeOperation, LineCap, LineJoin};
use crate::surface::Surface;

/// One recorded [`Surface`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
    Scale(f64, f64),
    ClearRect(f64, f64, f64, f64),
    GlobalAlpha(f64),
    CompositeOperation(CompositeOperation),
    ShadowOffsetX(f64),
    ShadowOffsetY(f64),
    ShadowBlur(f64),
    ShadowColor(Color),
    LineCap(LineCap),
    LineJoin(LineJoin),
    MiterLimit(f64),
    FillColor(Color),
    FillRect(f64, f64, f64, f64),
    BeginPath,
    Rect(f64, f64, f64, f64),
    Arc(f64, f64, f64, f64, f64, bool),
    ClosePath,
    Fill,
}

impl SurfaceCall {
    /// Whether the call sets one of the four shadow attributes.
    pub fn is_shadow(&self) -> bool {
        matches!(
            self,
            SurfaceCall::ShadowOffsetX(_)
                | SurfaceCall::ShadowOffsetY(_)
                | SurfaceCall::ShadowBlur(_)
                | SurfaceCall::ShadowColor(_)
        )
    }
}

/// Surface that appends every call to a log.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    calls: Vec<SurfaceCall>,
    depth: usize,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
            depth: 0,
        }
    }

    /// Calls recorded so far, oldest first.
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Drain the log.
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    /// Current save depth. Zero when every save has been restored.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Recorded translate offsets, in call order.
    pub fn translations(&self) -> Vec<(f64, f64)> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                SurfaceCall::Translate(x, y) => Some((x, y)),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, call: SurfaceCall) {
        self.calls.push(call);
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn save(&mut self) {
        self.depth += 1;
        self.record(SurfaceCall::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.record(SurfaceCall::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.record(SurfaceCall::Translate(x, y));
    }

    fn rotate(&mut self, angle: f64) {
        self.record(SurfaceCall::Rotate(angle));
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.record(SurfaceCall::Scale(x, y));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(SurfaceCall::ClearRect(x, y, width, height));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.record(SurfaceCall::GlobalAlpha(alpha));
    }

    fn set_global_composite_operation(&mut self, op: CompositeOperation) {
        self.record(SurfaceCall::CompositeOperation(op));
    }

    fn set_shadow_offset_x(&mut self, offset: f64) {
        self.record(SurfaceCall::ShadowOffsetX(offset));
    }

    fn set_shadow_offset_y(&mut self, offset: f64) {
        self.record(SurfaceCall::ShadowOffsetY(offset));
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        self.record(SurfaceCall::ShadowBlur(blur));
    }

    fn set_shadow_color(&mut self, color: Color) {
        self.record(SurfaceCall::ShadowColor(color));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.record(SurfaceCall::LineCap(cap));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.record(SurfaceCall::LineJoin(join));
    }

    fn set_miter_limit(&mut self, limit: f64) {
        self.record(SurfaceCall::MiterLimit(limit));
    }

    fn set_fill_color(&mut self, color: Color) {
        self.record(SurfaceCall::FillColor(color));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(SurfaceCall::FillRect(x, y, width, height));
    }

    fn begin_path(&mut self) {
        self.record(SurfaceCall::BeginPath);
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(SurfaceCall::Rect(x, y, width, height));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, anticlockwise: bool) {
        self.record(SurfaceCall::Arc(x, y, radius, start_angle, end_angle, anticlockwise));
    }

    fn close_path(&mut self) {
        self.record(SurfaceCall::ClosePath);
    }

    fn fill(&mut self) {
        self.record(SurfaceCall::Fill);
    }
}
