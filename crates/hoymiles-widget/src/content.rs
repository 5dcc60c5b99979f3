//! Worker-side frame content serving.
//!
//! Frames configured with inline `html` are not loaded from an external
//! address; the worker serves their content under the frame's element id
//! path (`/HOYMILES-<ident>-<index>`), and the frame points its `src` there.

use std::collections::HashMap;

use hoymiles_common::FrameId;
use hoymiles_config::WidgetConfig;
use tracing::debug;

/// In-memory store mapping served paths to frame HTML.
#[derive(Debug, Default)]
pub struct FrameContentStore {
    entries: HashMap<String, String>, // path (no leading slash) -> html
}

impl FrameContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the content served for one frame.
    pub fn register(&mut self, frame_id: &FrameId, html: impl Into<String>) {
        let path = frame_id.to_string();
        debug!(%frame_id, "registering frame content");
        self.entries.insert(path, html.into());
    }

    /// Register every `html` frame of a config under its served path.
    /// Returns how many frames were registered.
    pub fn register_config(&mut self, config: &WidgetConfig) -> usize {
        let mut count = 0;
        for (i, frame) in config.frames.iter().enumerate() {
            // src wins when both are set, so such a frame is never fetched
            // from the store.
            if frame.src.is_none() {
                if let Some(html) = &frame.html {
                    self.register(&FrameId::new(&config.ident, i), html.clone());
                    count += 1;
                }
            }
        }
        count
    }

    /// Resolve a served path to its MIME type and HTML body.
    pub fn resolve(&self, path: &str) -> Option<(&'static str, &str)> {
        let clean = path.trim_start_matches('/');
        self.entries
            .get(clean)
            .map(|html| ("text/html", html.as_str()))
    }

    /// How many frames have registered content.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
