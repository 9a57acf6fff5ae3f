//! The demo scene drawn by the viewer.

use canvas::Surface;
use common::{Color, DrawResult};
use compositor::{Compositor, DrawableProps, Shadow};

use crate::shapes::{Circle, Rectangle, Spin};

/// Populate `compositor` with the demo scene, sized to its surface.
///
/// Paint order, back to front: a shadowed card, a spinning hub with an arm
/// and a tip nested under it, and a translucent band across the bottom.
pub fn build<S: Surface>(compositor: &mut Compositor<S>) -> DrawResult<()> {
    let width = compositor.surface().width() as f64;
    let height = compositor.surface().height() as f64;
    let scene = compositor.scene_mut();

    let card = scene.insert(
        DrawableProps::at(width * 0.1, height * 0.1)
            .with_shadow(Shadow::new(6.0, 6.0, 4.0, Color::BLACK.with_alpha(128))),
        Rectangle::new(width * 0.25, height * 0.2, Color::rgb(70, 130, 180)),
    );

    let hub = scene.insert(
        DrawableProps::at(width / 2.0, height / 2.0),
        Spin::new(Circle::new(12.0, Color::rgb(255, 165, 0)), 6.0),
    );
    let arm = scene.insert(
        DrawableProps::at(16.0, -4.0),
        Rectangle::new(width * 0.2, 8.0, Color::rgb(112, 128, 144)),
    );
    let tip = scene.insert(
        DrawableProps::at(width * 0.2, 4.0).with_scaling(1.0, 0.6),
        Circle::new(9.0, Color::rgb(220, 20, 60)),
    );
    scene.set_parent(arm, hub)?;
    scene.set_parent(tip, arm)?;

    let band = scene.insert(
        DrawableProps::at(0.0, height * 0.75).with_opacity(0.5),
        Rectangle::new(width, height * 0.15, Color::BLUE),
    );

    for id in [card, hub, arm, tip, band] {
        compositor.add(id);
    }

    tracing::debug!(objects = compositor.objects().len(), "demo scene built");
    Ok(())
}
