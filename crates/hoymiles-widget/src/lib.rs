//! Display widget for embedded Hoymiles inverter dashboards.
//!
//! Implements the module side of the dashboard: a controller that sends
//! `INIT` to its worker, waits for `INIT_DONE`, then renders a container
//! of iframe nodes on a self-rescheduling refresh timer. Provides:
//! - The `Widget` controller and the host-facing `MirrorModule` contract
//! - An owned element tree (`Node`) with shared style handles
//! - The chained single-shot `UpdateScheduler`
//! - The widget/worker notification channel
//! - The worker-side `FrameContentStore` for `html` frames

pub mod content;
pub mod controller;
pub mod dom;
pub mod events;
pub mod scheduler;

pub use content::FrameContentStore;
pub use controller::{FrameHandle, MirrorModule, Widget};
pub use dom::{Node, StyleHandle};
pub use events::{link, WidgetLink, WorkerEvent, WorkerLink, WorkerRequest};
pub use scheduler::{RefreshRequest, UpdateScheduler};
