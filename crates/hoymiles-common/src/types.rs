use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every frame element id and served content path.
pub const FRAME_ID_PREFIX: &str = "HOYMILES";

/// Deterministic element id for one embedded frame: `HOYMILES-<ident>-<index>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId {
    ident: String,
    index: usize,
}

impl FrameId {
    pub fn new(ident: impl Into<String>, index: usize) -> Self {
        Self {
            ident: ident.into(),
            index,
        }
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Path under which the worker serves this frame's content.
    pub fn served_path(&self) -> String {
        format!("/{self}")
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", FRAME_ID_PREFIX, self.ident, self.index)
    }
}

/// Lifecycle state of a widget instance. The only transition is
/// `AwaitingInit` -> `Ready`, on the worker's init acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetState {
    AwaitingInit,
    Ready,
}
