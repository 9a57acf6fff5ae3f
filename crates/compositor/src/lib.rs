//! Render-list management and scene compositing.
//!
//! The compositor keeps an ordered list of drawables and, on each redraw,
//! paints them back to front onto a [`canvas::Surface`]:
//! - z-order is list order; later entries paint over earlier ones
//! - each object's ancestor chain is walked root-first to position,
//!   rotate and scale the surface before the object draws itself
//! - per-object paint state (opacity, composition, shadow, stroke) is
//!   applied inside a save/restore pair

pub mod background;
pub mod compositor;
pub mod config;
pub mod drawable;
pub mod render_list;
pub mod scene;

pub use self::compositor::{Compositor, FrameStats, RemoveTarget};
pub use background::{Background, SolidBackground};
pub use config::{CompositorSettings, PaintReset};
pub use drawable::{DrawContext, Drawable, DrawableProps, Shadow, Stroke};
pub use render_list::RenderList;
pub use scene::{DrawableId, Node, Scene};
