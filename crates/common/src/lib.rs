//! Common utilities and types shared by the drawing crates.

pub mod color;
pub mod error;
pub mod geometry;

pub use color::Color;
pub use error::{DrawError, DrawResult};
pub use geometry::{Point, Rect, Size};
