//! Compositor configuration.

use serde::{Deserialize, Serialize};

/// Which paint attributes are reset to their defaults after each object draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintReset {
    /// Only line cap, line join and miter limit. Alpha, composition and
    /// shadow are left for the next object (or the surface restore) to
    /// overwrite.
    #[default]
    Stroke,
    /// Alpha, composition, shadow and stroke.
    Full,
}

/// Compositor settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorSettings {
    /// Clear the surface (keeping the background) before every redraw.
    pub clear_each_frame: bool,
    /// Paint-state reset after each object.
    pub paint_reset: PaintReset,
}

impl CompositorSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clear_each_frame(mut self, enabled: bool) -> Self {
        self.clear_each_frame = enabled;
        self
    }

    pub fn with_paint_reset(mut self, reset: PaintReset) -> Self {
        self.paint_reset = reset;
        self
    }
}

impl Default for CompositorSettings {
    fn default() -> Self {
        Self {
            clear_each_frame: true,
            paint_reset: PaintReset::Stroke,
        }
    }
}
