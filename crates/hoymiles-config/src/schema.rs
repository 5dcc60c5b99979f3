//! Configuration schema for the Hoymiles display widget.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! The whole record is immutable from the widget's point of view once
//! `start` has been called; the refresh loop never re-reads it.

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// One embedded content pane.
///
/// A well-formed frame has at least one of `src` and `html` set. When both
/// are set, `src` wins. A frame with neither is kept in the config (it is
/// a render-time error, reported per refresh cycle, not a load failure).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// External address to load directly into the frame.
    pub src: Option<String>,
    /// Inline content the worker serves under the frame's element id path.
    pub html: Option<String>,
}

impl FrameConfig {
    /// Create a frame that loads an external URL.
    pub fn with_src(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            html: None,
        }
    }

    /// Create a frame whose content the worker serves.
    pub fn with_html(html: impl Into<String>) -> Self {
        Self {
            src: None,
            html: Some(html.into()),
        }
    }

    /// Whether this frame has a usable content source.
    pub fn is_well_formed(&self) -> bool {
        self.src.is_some() || self.html.is_some()
    }
}

/// Full widget configuration, sent verbatim to the worker in the `INIT`
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Refresh interval in milliseconds. 0 disables rescheduling entirely.
    pub update_interval: u64,
    /// Identifier namespacing this instance's element ids. When empty the
    /// host assigns a generated one before starting the widget.
    pub ident: String,
    /// CSS width applied to every frame.
    pub width: String,
    /// CSS height applied to every frame.
    pub height: String,
    /// CSS background color applied to every frame.
    pub background_color: String,
    /// CSS foreground color applied to every frame.
    pub color: String,
    /// Frames to render, in order.
    pub frames: Vec<FrameConfig>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            update_interval: 60_000,
            ident: String::new(),
            width: "100%".into(),
            height: "300px".into(),
            background_color: "black".into(),
            color: "white".into(),
            frames: Vec::new(),
        }
    }
}
