//! Main compositor implementation.

use canvas::{CompositeOperation, LineCap, LineJoin, Surface, DEFAULT_MITER_LIMIT};
use common::{Color, DrawResult, Point};

use crate::background::Background;
use crate::config::{CompositorSettings, PaintReset};
use crate::drawable::{DrawContext, DrawableProps};
use crate::render_list::RenderList;
use crate::scene::{DrawableId, Node, Scene};

/// Object to remove from the render list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveTarget {
    /// First occurrence of this drawable.
    Drawable(DrawableId),
    /// Whatever currently sits at this index.
    Index(usize),
}

impl From<DrawableId> for RemoveTarget {
    fn from(id: DrawableId) -> Self {
        RemoveTarget::Drawable(id)
    }
}

impl From<usize> for RemoveTarget {
    fn from(index: usize) -> Self {
        RemoveTarget::Index(index)
    }
}

/// Statistics of the most recent redraw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Objects whose draw routine ran.
    pub drawn: usize,
    /// List entries without a draw routine, or whose id no longer resolves.
    pub skipped: usize,
    /// Objects dropped because their ancestor chain was malformed.
    pub failed: usize,
    /// Whether the surface was cleared before drawing.
    pub cleared: bool,
}

/// The compositor owns the surface, the scene and the render list, and
/// paints the list onto the surface.
pub struct Compositor<S: Surface> {
    /// Target surface.
    surface: S,
    /// Every drawable known to the compositor.
    scene: Scene,
    /// Paint order.
    objects: RenderList,
    /// Compositor settings.
    settings: CompositorSettings,
    /// Layer painted by background-preserving clears.
    background: Option<Box<dyn Background>>,
    /// Origin of the object being drawn; zero between objects.
    translation: Point,
    /// Statistics of the last redraw.
    stats: FrameStats,
}

impl<S: Surface> Compositor<S> {
    /// Create a new compositor drawing onto `surface`.
    pub fn new(surface: S, settings: CompositorSettings) -> Self {
        Self {
            surface,
            scene: Scene::new(),
            objects: RenderList::new(),
            settings,
            background: None,
            translation: Point::ZERO,
            stats: FrameStats::default(),
        }
    }

    /// Set the background layer.
    pub fn with_background(mut self, background: impl Background + 'static) -> Self {
        self.set_background(background);
        self
    }

    pub fn set_background(&mut self, background: impl Background + 'static) {
        self.background = Some(Box::new(background));
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Consume the compositor and hand back its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The render list, in paint order.
    pub fn objects(&self) -> &RenderList {
        &self.objects
    }

    pub fn settings(&self) -> &CompositorSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: CompositorSettings) {
        self.settings = settings;
    }

    /// Origin offset of the object currently being drawn. Zero outside a draw.
    pub fn translation(&self) -> Point {
        self.translation
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn is_drawn(&self, id: DrawableId) -> bool {
        self.scene.is_drawn(id)
    }

    /// Append a drawable to the render list and return its index.
    pub fn add(&mut self, id: DrawableId) -> usize {
        let index = self.objects.push(id);
        tracing::debug!(?id, index, "object added");
        index
    }

    /// Remove an object from the render list and redraw so it disappears.
    ///
    /// Unknown drawables and empty indices are ignored.
    pub fn remove(&mut self, target: impl Into<RemoveTarget>) {
        let target = target.into();
        let index = match target {
            RemoveTarget::Drawable(id) => self.objects.position(id),
            RemoveTarget::Index(index) => Some(index),
        };

        let Some(id) = index.and_then(|i| self.objects.remove_at(i)) else {
            tracing::debug!(?target, "remove ignored, no such object");
            return;
        };

        self.scene.set_drawn(id, false);
        tracing::debug!(?id, "object removed");
        self.redraw(false);
    }

    /// Move the object at `from` to `to` in the paint order.
    ///
    /// `to` is clamped to the last index. Ignored when `from` is empty or
    /// equals the clamped `to`.
    pub fn change_z_order(&mut self, from: usize, to: usize) {
        if self.objects.move_item(from, to) {
            tracing::debug!(from, to, "z-order changed");
        }
    }

    /// Clear the surface and mark every listed object as not drawn.
    ///
    /// `keep_background` defaults to `true`: the background layer repaints
    /// the surface. With `false`, or without a background, the surface is
    /// blanked.
    pub fn clear(&mut self, keep_background: Option<bool>) -> &mut Self {
        let keep_background = keep_background.unwrap_or(true);

        match self.background.as_mut() {
            Some(background) if keep_background => background.redraw(&mut self.surface),
            _ => {
                let width = self.surface.width() as f64;
                let height = self.surface.height() as f64;
                self.surface.clear_rect(0.0, 0.0, width, height);
            }
        }

        for id in self.objects.iter() {
            self.scene.set_drawn(id, false);
        }

        tracing::debug!(keep_background, "surface cleared");
        self
    }

    /// Paint every object in the render list.
    pub fn redraw(&mut self, force_clear: bool) -> &mut Self {
        let mut stats = FrameStats::default();

        if self.settings.clear_each_frame || force_clear {
            self.clear(None);
            stats.cleared = true;
        }

        for index in 0..self.objects.len() {
            let Some(id) = self.objects.get(index) else {
                continue;
            };

            match self.draw_object(id) {
                Ok(true) => stats.drawn += 1,
                Ok(false) => stats.skipped += 1,
                Err(err) => {
                    tracing::warn!(?id, %err, "object not drawn");
                    stats.failed += 1;
                }
            }
        }

        self.stats = stats;
        self
    }

    /// Paint one object. Returns `false` when it has nothing to draw.
    fn draw_object(&mut self, id: DrawableId) -> DrawResult<bool> {
        let Some(node) = self.scene.get_mut(id) else {
            return Ok(false);
        };
        let Node { props, content, .. } = node;
        let Some(content) = content.as_mut() else {
            return Ok(false);
        };

        content.update(props);

        self.surface.save();

        let chain = match self.scene.ancestor_chain(id) {
            Ok(chain) => chain,
            Err(err) => {
                self.surface.restore();
                return Err(err);
            }
        };

        // Each step translates by the offset from the previous ancestor, so
        // a parent's position is applied exactly once.
        let mut last = Point::ZERO;
        let mut absolute = Point::ZERO;
        for ancestor in &chain {
            let Some(props) = self.scene.props(*ancestor) else {
                continue;
            };

            absolute = absolute + props.position;
            self.surface.translate(absolute.x - last.x, absolute.y - last.y);

            if props.rotation != 0.0 {
                self.surface.rotate(props.rotation.to_radians());
            }

            if props.is_scaled() {
                self.surface.scale(props.scaling_x, props.scaling_y);
            }

            last = absolute;
        }

        self.translation = last;

        if let Some(node) = self.scene.get_mut(id) {
            let Node {
                props,
                content,
                drawn,
                ..
            } = node;

            apply_paint(&mut self.surface, props);

            if let Some(content) = content.as_mut() {
                let mut ctx = DrawContext {
                    surface: &mut self.surface,
                    origin: last,
                    props,
                };
                content.draw(&mut ctx);
            }

            *drawn = true;
            tracing::trace!(?id, x = last.x, y = last.y, "object drawn");
        }

        reset_paint(&mut self.surface, self.settings.paint_reset);

        self.surface.restore();
        self.translation = Point::ZERO;
        Ok(true)
    }
}

/// Apply an object's paint attributes: alpha, composition, shadow (only
/// when blurred), then stroke.
fn apply_paint(surface: &mut dyn Surface, props: &DrawableProps) {
    surface.set_global_alpha(props.effective_opacity());
    surface.set_global_composite_operation(props.composition);

    let shadow = &props.shadow;
    if shadow.is_visible() {
        surface.set_shadow_offset_x(shadow.offset_x);
        surface.set_shadow_offset_y(shadow.offset_y);
        surface.set_shadow_blur(shadow.blur);
        surface.set_shadow_color(shadow.color);
    }

    surface.set_line_cap(props.stroke.cap);
    surface.set_line_join(props.stroke.join);
    surface.set_miter_limit(props.stroke.miter_limit);
}

fn reset_paint(surface: &mut dyn Surface, reset: PaintReset) {
    if reset == PaintReset::Full {
        surface.set_global_alpha(1.0);
        surface.set_global_composite_operation(CompositeOperation::SourceOver);
        surface.set_shadow_offset_x(0.0);
        surface.set_shadow_offset_y(0.0);
        surface.set_shadow_blur(0.0);
        surface.set_shadow_color(Color::TRANSPARENT);
    }

    surface.set_line_cap(LineCap::Butt);
    surface.set_line_join(LineJoin::Miter);
    surface.set_miter_limit(DEFAULT_MITER_LIMIT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::SolidBackground;
    use crate::drawable::{Drawable, Shadow, Stroke};
    use canvas::{CanvasContext2D, RecordingSurface, SurfaceCall};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Fills a 4x4 square at its origin and remembers the origin it saw.
    struct Square {
        color: Color,
        seen: Rc<RefCell<Vec<Point>>>,
    }

    impl Square {
        fn new(color: Color) -> Self {
            Self {
                color,
                seen: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    impl Drawable for Square {
        fn draw(&mut self, ctx: &mut DrawContext<'_>) {
            self.seen.borrow_mut().push(ctx.origin);
            ctx.surface.set_fill_color(self.color);
            ctx.surface.fill_rect(0.0, 0.0, 4.0, 4.0);
        }
    }

    /// Moves itself one unit right on every update.
    struct Mover;

    impl Drawable for Mover {
        fn update(&mut self, props: &mut DrawableProps) {
            props.position.x += 1.0;
        }

        fn draw(&mut self, ctx: &mut DrawContext<'_>) {
            ctx.surface.fill_rect(0.0, 0.0, 1.0, 1.0);
        }
    }

    fn recording() -> Compositor<RecordingSurface> {
        let settings = CompositorSettings::default().with_clear_each_frame(false);
        Compositor::new(RecordingSurface::new(200, 200), settings)
    }

    fn add_square(compositor: &mut Compositor<RecordingSurface>, x: f64, y: f64) -> DrawableId {
        let id = compositor
            .scene_mut()
            .insert(DrawableProps::at(x, y), Square::new(Color::RED));
        compositor.add(id);
        id
    }

    #[test]
    fn test_add_returns_sequential_indices() {
        let mut compositor = recording();
        for expected in 0..5 {
            let id = compositor
                .scene_mut()
                .insert(DrawableProps::default(), Square::new(Color::RED));
            assert_eq!(compositor.add(id), expected);
        }
    }

    #[test]
    fn test_remove_by_reference_and_index() {
        let mut compositor = recording();
        let a = add_square(&mut compositor, 0.0, 0.0);
        let b = add_square(&mut compositor, 0.0, 0.0);
        let c = add_square(&mut compositor, 0.0, 0.0);

        compositor.remove(b);
        assert_eq!(compositor.objects().as_slice(), &[a, c]);

        let d = compositor
            .scene_mut()
            .insert(DrawableProps::default(), Square::new(Color::RED));
        assert_eq!(compositor.add(d), 2);

        compositor.remove(0usize);
        assert_eq!(compositor.objects().as_slice(), &[c, d]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut compositor = recording();
        let a = add_square(&mut compositor, 0.0, 0.0);
        let stray = compositor
            .scene_mut()
            .insert(DrawableProps::default(), Square::new(Color::RED));
        compositor.surface_mut().take_calls();

        compositor.remove(stray);
        compositor.remove(9usize);

        assert_eq!(compositor.objects().as_slice(), &[a]);
        assert!(compositor.surface().calls().is_empty());
    }

    #[test]
    fn test_remove_clears_drawn_and_redraws() {
        let mut compositor = recording();
        let a = add_square(&mut compositor, 0.0, 0.0);
        let b = add_square(&mut compositor, 0.0, 0.0);
        compositor.redraw(false);
        assert!(compositor.is_drawn(b));

        compositor.surface_mut().take_calls();
        compositor.remove(b);

        assert!(!compositor.is_drawn(b));
        assert!(compositor.is_drawn(a));
        assert_eq!(compositor.stats().drawn, 1);
        assert!(!compositor.surface().calls().is_empty());
    }

    #[test]
    fn test_change_z_order() {
        let mut compositor = recording();
        let a = add_square(&mut compositor, 0.0, 0.0);
        let b = add_square(&mut compositor, 0.0, 0.0);
        let c = add_square(&mut compositor, 0.0, 0.0);
        let d = add_square(&mut compositor, 0.0, 0.0);

        compositor.change_z_order(0, 2);
        assert_eq!(compositor.objects().as_slice(), &[b, c, a, d]);

        compositor.change_z_order(3, 0);
        assert_eq!(compositor.objects().as_slice(), &[d, b, c, a]);

        compositor.change_z_order(7, 0);
        compositor.change_z_order(1, 1);
        assert_eq!(compositor.objects().as_slice(), &[d, b, c, a]);
    }

    #[test]
    fn test_change_z_order_clamps() {
        let mut compositor = recording();
        let a = add_square(&mut compositor, 0.0, 0.0);
        let b = add_square(&mut compositor, 0.0, 0.0);
        let c = add_square(&mut compositor, 0.0, 0.0);

        compositor.change_z_order(0, 99);
        assert_eq!(compositor.objects().as_slice(), &[b, c, a]);

        compositor.change_z_order(2, 99);
        assert_eq!(compositor.objects().as_slice(), &[b, c, a]);
    }

    #[test]
    fn test_child_translation_composes() {
        let mut compositor = recording();
        let parent = compositor.scene_mut().insert_group(DrawableProps::at(100.0, 100.0));
        let square = Square::new(Color::RED);
        let seen = square.seen.clone();
        let child = compositor
            .scene_mut()
            .insert(DrawableProps::at(10.0, 0.0), square);
        compositor.scene_mut().set_parent(child, parent).unwrap();
        compositor.add(child);

        compositor.redraw(false);

        assert_eq!(
            compositor.surface().translations(),
            vec![(100.0, 100.0), (10.0, 0.0)]
        );
        assert_eq!(seen.borrow().as_slice(), &[Point::new(110.0, 100.0)]);
        assert_eq!(compositor.translation(), Point::ZERO);
        assert_eq!(compositor.surface().depth(), 0);
    }

    #[test]
    fn test_parent_rotation_and_scale_applied_in_chain_order() {
        let mut compositor = recording();
        let parent = compositor.scene_mut().insert_group(
            DrawableProps::at(50.0, 0.0)
                .with_rotation(90.0)
                .with_scaling(2.0, 3.0),
        );
        let child = compositor
            .scene_mut()
            .insert(DrawableProps::at(5.0, 0.0), Square::new(Color::RED));
        compositor.scene_mut().set_parent(child, parent).unwrap();
        compositor.add(child);

        compositor.redraw(false);

        let transforms: Vec<SurfaceCall> = compositor
            .surface()
            .calls()
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    SurfaceCall::Translate(..) | SurfaceCall::Rotate(_) | SurfaceCall::Scale(..)
                )
            })
            .cloned()
            .collect();

        assert_eq!(
            transforms,
            vec![
                SurfaceCall::Translate(50.0, 0.0),
                SurfaceCall::Rotate(90f64.to_radians()),
                SurfaceCall::Scale(2.0, 3.0),
                SurfaceCall::Translate(5.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_root_object_draws_at_own_position() {
        let mut compositor = recording();
        add_square(&mut compositor, 30.0, 40.0);
        compositor.redraw(false);

        assert_eq!(compositor.surface().translations(), vec![(30.0, 40.0)]);
    }

    #[test]
    fn test_paint_order_and_isolation() {
        let mut compositor = recording();
        let id = compositor.scene_mut().insert(
            DrawableProps::at(1.0, 2.0)
                .with_opacity(0.5)
                .with_composition(CompositeOperation::Multiply)
                .with_stroke(Stroke {
                    cap: LineCap::Round,
                    join: LineJoin::Bevel,
                    miter_limit: 4.0,
                }),
            Square::new(Color::RED),
        );
        compositor.add(id);
        compositor.redraw(false);

        assert_eq!(
            compositor.surface().calls(),
            &[
                SurfaceCall::Save,
                SurfaceCall::Translate(1.0, 2.0),
                SurfaceCall::GlobalAlpha(0.5),
                SurfaceCall::CompositeOperation(CompositeOperation::Multiply),
                SurfaceCall::LineCap(LineCap::Round),
                SurfaceCall::LineJoin(LineJoin::Bevel),
                SurfaceCall::MiterLimit(4.0),
                SurfaceCall::FillColor(Color::RED),
                SurfaceCall::FillRect(0.0, 0.0, 4.0, 4.0),
                SurfaceCall::LineCap(LineCap::Butt),
                SurfaceCall::LineJoin(LineJoin::Miter),
                SurfaceCall::MiterLimit(10.0),
                SurfaceCall::Restore,
            ]
        );
    }

    #[test]
    fn test_nan_opacity_paints_opaque() {
        let mut compositor = recording();
        let id = compositor.scene_mut().insert(
            DrawableProps::default().with_opacity(f64::NAN),
            Square::new(Color::RED),
        );
        compositor.add(id);
        compositor.redraw(false);

        assert!(compositor
            .surface()
            .calls()
            .contains(&SurfaceCall::GlobalAlpha(1.0)));
    }

    #[test]
    fn test_zero_opacity_still_drawn() {
        let mut compositor = recording();
        let id = compositor.scene_mut().insert(
            DrawableProps::default().with_opacity(0.0),
            Square::new(Color::RED),
        );
        compositor.add(id);
        compositor.redraw(false);

        assert!(compositor.is_drawn(id));
        assert_eq!(compositor.stats().drawn, 1);
    }

    #[test]
    fn test_shadow_gated_by_blur() {
        let mut compositor = recording();
        let flat = compositor.scene_mut().insert(
            DrawableProps::default().with_shadow(Shadow::new(3.0, 3.0, 0.0, Color::BLACK)),
            Square::new(Color::RED),
        );
        compositor.add(flat);
        compositor.redraw(false);
        assert!(!compositor.surface().calls().iter().any(SurfaceCall::is_shadow));

        compositor.remove(flat);
        let shadowed = compositor.scene_mut().insert(
            DrawableProps::default().with_shadow(Shadow::new(3.0, 4.0, 5.0, Color::BLACK)),
            Square::new(Color::RED),
        );
        compositor.add(shadowed);
        compositor.surface_mut().take_calls();
        compositor.redraw(false);

        let calls = compositor.surface().calls();
        let draw_at = calls
            .iter()
            .position(|c| matches!(c, SurfaceCall::FillRect(..)))
            .unwrap();
        let before_draw = &calls[..draw_at];
        assert!(before_draw.contains(&SurfaceCall::ShadowOffsetX(3.0)));
        assert!(before_draw.contains(&SurfaceCall::ShadowOffsetY(4.0)));
        assert!(before_draw.contains(&SurfaceCall::ShadowBlur(5.0)));
        assert!(before_draw.contains(&SurfaceCall::ShadowColor(Color::BLACK)));
    }

    #[test]
    fn test_full_paint_reset() {
        let settings = CompositorSettings::default()
            .with_clear_each_frame(false)
            .with_paint_reset(PaintReset::Full);
        let mut compositor = Compositor::new(RecordingSurface::new(10, 10), settings);
        let id = compositor
            .scene_mut()
            .insert(DrawableProps::default().with_opacity(0.3), Square::new(Color::RED));
        compositor.add(id);
        compositor.redraw(false);

        let calls = compositor.surface().calls();
        let draw_at = calls
            .iter()
            .position(|c| matches!(c, SurfaceCall::FillRect(..)))
            .unwrap();
        let after_draw = &calls[draw_at..];
        assert!(after_draw.contains(&SurfaceCall::GlobalAlpha(1.0)));
        assert!(after_draw.contains(&SurfaceCall::ShadowBlur(0.0)));
        assert!(after_draw.contains(&SurfaceCall::CompositeOperation(
            CompositeOperation::SourceOver
        )));
    }

    #[test]
    fn test_drawn_flag_lifecycle() {
        let mut compositor = recording();
        let a = add_square(&mut compositor, 0.0, 0.0);
        let group = compositor.scene_mut().insert_group(DrawableProps::default());
        compositor.add(group);

        compositor.redraw(false);
        assert!(compositor.is_drawn(a));
        assert!(!compositor.is_drawn(group));
        assert_eq!(compositor.stats().drawn, 1);
        assert_eq!(compositor.stats().skipped, 1);

        compositor.clear(None);
        assert!(!compositor.is_drawn(a));

        compositor.redraw(false);
        assert!(compositor.is_drawn(a));
        compositor.clear(Some(false));
        assert!(!compositor.is_drawn(a));
    }

    #[test]
    fn test_update_runs_before_draw() {
        let mut compositor = recording();
        let id = compositor.scene_mut().insert(DrawableProps::at(10.0, 0.0), Mover);
        compositor.add(id);

        compositor.redraw(false);
        compositor.redraw(false);

        assert_eq!(
            compositor.surface().translations(),
            vec![(11.0, 0.0), (12.0, 0.0)]
        );
    }

    #[test]
    fn test_clear_without_background_blanks_surface() {
        let mut compositor = recording();
        compositor.clear(None);
        compositor.clear(Some(false));

        assert_eq!(
            compositor.surface().calls(),
            &[
                SurfaceCall::ClearRect(0.0, 0.0, 200.0, 200.0),
                SurfaceCall::ClearRect(0.0, 0.0, 200.0, 200.0),
            ]
        );
    }

    #[test]
    fn test_clear_keeps_background() {
        let mut compositor = recording().with_background(SolidBackground::new(Color::WHITE));

        compositor.clear(None);
        assert!(compositor
            .surface()
            .calls()
            .contains(&SurfaceCall::FillColor(Color::WHITE)));

        compositor.surface_mut().take_calls();
        compositor.clear(Some(false));
        assert_eq!(
            compositor.surface().calls(),
            &[SurfaceCall::ClearRect(0.0, 0.0, 200.0, 200.0)]
        );
    }

    #[test]
    fn test_clear_each_frame_policy() {
        let settings = CompositorSettings::default();
        let mut compositor = Compositor::new(RecordingSurface::new(10, 10), settings);
        compositor.redraw(false);
        assert!(compositor.stats().cleared);

        compositor.set_settings(CompositorSettings::default().with_clear_each_frame(false));
        compositor.redraw(false);
        assert!(!compositor.stats().cleared);

        compositor.redraw(true);
        assert!(compositor.stats().cleared);
    }

    #[test]
    fn test_empty_list_redraw_is_noop() {
        let mut compositor = recording();
        compositor.redraw(false);

        assert!(compositor.surface().calls().is_empty());
        assert_eq!(compositor.stats(), &FrameStats::default());
    }

    #[test]
    fn test_dangling_and_cyclic_entries_do_not_stop_the_frame() {
        let mut compositor = recording();
        let gone = add_square(&mut compositor, 0.0, 0.0);
        compositor.scene_mut().remove(gone);

        let a = add_square(&mut compositor, 0.0, 0.0);
        let b = add_square(&mut compositor, 0.0, 0.0);
        compositor.scene_mut().get_mut(a).unwrap().parent = Some(b);
        compositor.scene_mut().get_mut(b).unwrap().parent = Some(a);

        let ok = add_square(&mut compositor, 7.0, 7.0);
        compositor.redraw(false);

        let stats = compositor.stats();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.drawn, 1);
        assert!(compositor.is_drawn(ok));
        assert_eq!(compositor.surface().depth(), 0);
    }

    #[test]
    fn test_later_objects_paint_over_earlier() {
        let settings = CompositorSettings::default().with_clear_each_frame(false);
        let mut compositor = Compositor::new(CanvasContext2D::new(20, 20), settings);
        let red = compositor
            .scene_mut()
            .insert(DrawableProps::at(2.0, 2.0), Square::new(Color::RED));
        let blue = compositor
            .scene_mut()
            .insert(DrawableProps::at(4.0, 4.0), Square::new(Color::BLUE));
        compositor.add(red);
        compositor.add(blue);

        compositor.redraw(false);
        assert_eq!(compositor.surface().pixel(5, 5), Some(Color::BLUE));
        assert_eq!(compositor.surface().pixel(2, 2), Some(Color::RED));

        compositor.change_z_order(1, 0);
        compositor.redraw(true);
        assert_eq!(compositor.surface().pixel(5, 5), Some(Color::RED));
    }

    #[test]
    fn test_rotated_parent_on_raster() {
        let settings = CompositorSettings::default().with_clear_each_frame(false);
        let mut compositor = Compositor::new(CanvasContext2D::new(40, 40), settings);
        let parent = compositor
            .scene_mut()
            .insert_group(DrawableProps::at(20.0, 20.0).with_rotation(90.0));
        let child = compositor
            .scene_mut()
            .insert(DrawableProps::at(10.0, 0.0), Square::new(Color::GREEN));
        compositor.scene_mut().set_parent(child, parent).unwrap();
        compositor.add(child);

        compositor.redraw(false);

        // A quarter turn maps the child's +x offset onto +y.
        let surface = compositor.surface();
        assert_eq!(surface.pixel(18, 31), Some(Color::GREEN));
        assert_eq!(surface.pixel(31, 21), Some(Color::TRANSPARENT));
        assert_eq!(surface.save_depth(), 0);
    }
}
