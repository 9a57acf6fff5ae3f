//! 2D drawing surfaces.
//!
//! This crate provides:
//! - the [`Surface`] contract consumed by the compositor
//! - paint attribute types (line cap/join, composite operation)
//! - a software RGBA raster ([`CanvasContext2D`])
//! - a [`RecordingSurface`] that captures the call sequence

pub mod context;
pub mod paint;
pub mod recording;
pub mod surface;

pub use context::{CanvasContext2D, ImageData, Transform2D};
pub use paint::{CompositeOperation, LineCap, LineJoin, DEFAULT_MITER_LIMIT};
pub use recording::{RecordingSurface, SurfaceCall};
pub use surface::Surface;
