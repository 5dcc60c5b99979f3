//! Notification channel between the widget and its worker process.
//!
//! The widget sends exactly one `Init` request at start; the worker answers
//! with `InitDone` once it is ready to serve content. Any other worker
//! event deserializes to `Unknown` and is ignored by the widget.

use hoymiles_config::WidgetConfig;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Requests sent from the widget to the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WorkerRequest {
    Init(WidgetConfig),
}

/// Events sent from the worker back to the widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WorkerEvent {
    InitDone,
    #[serde(other)]
    Unknown,
}

/// Widget-side endpoint: sends requests, receives worker events.
pub struct WidgetLink {
    pub requests: mpsc::UnboundedSender<WorkerRequest>,
    pub events: mpsc::UnboundedReceiver<WorkerEvent>,
}

/// Worker-side endpoint: receives requests, sends worker events.
pub struct WorkerLink {
    pub requests: mpsc::UnboundedReceiver<WorkerRequest>,
    pub events: mpsc::UnboundedSender<WorkerEvent>,
}

/// Create a connected widget/worker endpoint pair.
pub fn link() -> (WidgetLink, WorkerLink) {
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (evt_tx, evt_rx) = mpsc::unbounded_channel();
    (
        WidgetLink {
            requests: req_tx,
            events: evt_rx,
        },
        WorkerLink {
            requests: req_rx,
            events: evt_tx,
        },
    )
}
