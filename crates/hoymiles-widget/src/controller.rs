//! The display widget controller.
//!
//! Owns the loaded/not-loaded state machine, the render of the frame
//! container, and the refresh loop. The host drives everything: it calls
//! `start` once, forwards worker events, reads the DOM whenever a refresh
//! request arrives, and toggles visibility around its own carousel moves.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use hoymiles_common::{FrameId, Result, WidgetError, WidgetState};
use hoymiles_config::WidgetConfig;

use crate::dom::{Node, StyleHandle};
use crate::events::{WorkerEvent, WorkerRequest};
use crate::scheduler::{RefreshRequest, UpdateScheduler};

/// Host-facing lifecycle contract, invoked only by the host.
pub trait MirrorModule {
    /// Store configuration and send the `INIT` request to the worker.
    /// Must be called exactly once, before any other operation.
    fn start(&mut self) -> Result<()>;

    /// Single inbound channel from the worker. `InitDone` flips the widget
    /// to ready and arms the refresh loop; anything else is ignored.
    fn notification_received(&mut self, event: WorkerEvent);

    /// Build a fresh container for the current state.
    fn get_dom(&mut self) -> Node;

    /// Hide every frame rendered by this instance. Leaves the refresh loop
    /// and the loaded state untouched.
    fn suspend(&mut self);

    /// Make every frame rendered by this instance visible again. Does not
    /// force a re-render.
    fn resume(&mut self);
}

/// Retained handle to one rendered frame, captured at render time so
/// suspend/resume never have to query a shared tree by class name.
#[derive(Debug, Clone)]
pub struct FrameHandle {
    id: FrameId,
    style: StyleHandle,
}

impl FrameHandle {
    pub fn id(&self) -> &FrameId {
        &self.id
    }

    pub fn hide(&self) {
        self.style.set("display", "none");
    }

    pub fn show(&self) {
        self.style.set("display", "block");
    }
}

/// One widget instance.
pub struct Widget {
    config: WidgetConfig,
    state: WidgetState,
    started: bool,
    requests: mpsc::UnboundedSender<WorkerRequest>,
    updates: mpsc::UnboundedSender<RefreshRequest>,
    scheduler: UpdateScheduler,
    /// Frames from the most recent render.
    frames: Vec<FrameHandle>,
}

impl Widget {
    /// Create a widget wired to a worker request channel and the host's
    /// refresh request queue.
    pub fn new(
        config: WidgetConfig,
        requests: mpsc::UnboundedSender<WorkerRequest>,
        updates: mpsc::UnboundedSender<RefreshRequest>,
    ) -> Self {
        let interval = Duration::from_millis(config.update_interval);
        let scheduler = UpdateScheduler::new(interval, updates.clone());
        Self {
            config,
            state: WidgetState::AwaitingInit,
            started: false,
            requests,
            updates,
            scheduler,
            frames: Vec::new(),
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    /// Whether the worker has acknowledged initialization.
    pub fn is_loaded(&self) -> bool {
        self.state == WidgetState::Ready
    }

    /// Whether a refresh timer is currently armed.
    pub fn is_refresh_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Handles to the frames from the most recent render.
    pub fn frame_handles(&self) -> &[FrameHandle] {
        &self.frames
    }

    fn request_update(&self) {
        if self.updates.send(RefreshRequest).is_err() {
            debug!("host update channel closed, dropping refresh request");
        }
    }

    /// Fresh container node carrying the uniqueness marker, so a host that
    /// diffs by identity still picks up the update.
    fn wrapper() -> Node {
        Node::element("div").with_attr("timestamp", Utc::now().timestamp_millis().to_string())
    }

    fn render_error(index: usize) -> Node {
        let mut wrapper = Self::wrapper();
        wrapper.push(
            Node::element("h1").with_text(format!("Frame {index} has neither src nor html.")),
        );
        wrapper
    }

    fn render_frame(&self, id: &FrameId, src: String) -> Node {
        Node::element("iframe")
            .with_id(id.to_string())
            .with_class("hoymiles")
            .with_class("module")
            .with_style("width", self.config.width.as_str())
            .with_style("height", self.config.height.as_str())
            .with_style("border", "none")
            .with_style("overflow", "hidden")
            .with_style("background-color", self.config.background_color.as_str())
            .with_style("color", self.config.color.as_str())
            .with_attr("scrolling", "no")
            .with_attr("src", src)
    }
}

impl MirrorModule for Widget {
    fn start(&mut self) -> Result<()> {
        if self.started {
            warn!("start called more than once, ignoring");
            return Ok(());
        }
        self.started = true;
        debug!(
            ident = %self.config.ident,
            frames = self.config.frames.len(),
            "sending INIT to worker"
        );
        self.requests
            .send(WorkerRequest::Init(self.config.clone()))
            .map_err(|_| WidgetError::ChannelClosed("worker request channel".into()))?;
        Ok(())
    }

    fn notification_received(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::InitDone => {
                if self.state == WidgetState::Ready {
                    // The worker contract does not promise single delivery;
                    // refresh again but never arm a second timer.
                    debug!("duplicate INIT_DONE, refreshing without re-arming");
                    self.request_update();
                    return;
                }
                info!("worker initialization complete");
                self.state = WidgetState::Ready;
                self.request_update();
                self.scheduler.schedule(None);
            }
            WorkerEvent::Unknown => {
                debug!("ignoring unrecognized worker event");
            }
        }
    }

    fn get_dom(&mut self) -> Node {
        let mut wrapper = Self::wrapper();

        if !self.is_loaded() {
            return wrapper
                .with_class("dimmed")
                .with_class("light")
                .with_class("small")
                .with_text("Loading connections ...");
        }

        let mut handles = Vec::with_capacity(self.config.frames.len());
        for (i, frame) in self.config.frames.iter().enumerate() {
            let id = FrameId::new(&self.config.ident, i);

            let src = match frame_src(frame, &id, i) {
                Ok(src) => src,
                Err(e) => {
                    // Fail fast: the error indicator replaces every frame
                    // of this cycle. The loop stays armed, so the next
                    // cycle gets a fresh chance.
                    warn!("render degraded: {e}");
                    self.frames.clear();
                    return Self::render_error(i);
                }
            };

            let iframe = self.render_frame(&id, src);
            handles.push(FrameHandle {
                id,
                style: iframe.style(),
            });
            wrapper.push(iframe);
        }
        self.frames = handles;
        wrapper
    }

    fn suspend(&mut self) {
        debug!(frames = self.frames.len(), "suspending frames");
        for frame in &self.frames {
            frame.hide();
        }
    }

    fn resume(&mut self) {
        debug!(frames = self.frames.len(), "resuming frames");
        for frame in &self.frames {
            frame.show();
        }
    }
}

/// Content source for one frame. `src` wins; `html` frames point at the
/// worker-served path.
fn frame_src(frame: &hoymiles_config::FrameConfig, id: &FrameId, index: usize) -> Result<String> {
    if let Some(src) = &frame.src {
        Ok(src.clone())
    } else if frame.html.is_some() {
        Ok(id.served_path())
    } else {
        Err(WidgetError::InvalidFrame { index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{link, WorkerLink};
    use hoymiles_config::FrameConfig;
    use tokio::time::{advance, timeout};

    fn two_frame_config() -> WidgetConfig {
        WidgetConfig {
            update_interval: 5000,
            ident: "A".into(),
            frames: vec![
                FrameConfig::with_src("http://x/1"),
                FrameConfig::with_html("<p>hi</p>"),
            ],
            ..WidgetConfig::default()
        }
    }

    fn widget(
        config: WidgetConfig,
    ) -> (
        Widget,
        WorkerLink,
        mpsc::UnboundedReceiver<RefreshRequest>,
    ) {
        let (widget_link, worker_link) = link();
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Widget::new(config, widget_link.requests, update_tx),
            worker_link,
            update_rx,
        )
    }

    #[tokio::test]
    async fn start_sends_init_with_full_config() {
        let (mut w, mut worker, _updates) = widget(two_frame_config());
        w.start().unwrap();

        let WorkerRequest::Init(config) = worker.requests.recv().await.unwrap();
        assert_eq!(config.ident, "A");
        assert_eq!(config.frames.len(), 2);
    }

    #[tokio::test]
    async fn second_start_is_ignored() {
        let (mut w, mut worker, _updates) = widget(two_frame_config());
        w.start().unwrap();
        w.start().unwrap();

        assert!(worker.requests.recv().await.is_some());
        assert!(worker.requests.try_recv().is_err(), "INIT must be sent once");
    }

    #[tokio::test]
    async fn loading_placeholder_before_init_done() {
        let (mut w, _worker, _updates) = widget(two_frame_config());

        let dom = w.get_dom();
        assert_eq!(dom.text(), Some("Loading connections ..."));
        assert_eq!(dom.classes(), ["dimmed", "light", "small"]);
        assert!(dom.children().is_empty());
        assert!(dom.attr("timestamp").is_some());
        assert!(!w.is_loaded());
    }

    #[tokio::test]
    async fn empty_frames_render_empty_container() {
        let (mut w, _worker, _updates) = widget(WidgetConfig {
            ident: "A".into(),
            ..WidgetConfig::default()
        });
        w.notification_received(WorkerEvent::InitDone);

        let dom = w.get_dom();
        assert!(dom.children().is_empty());
        assert!(dom.text().is_none(), "no error indicator expected");
    }

    #[tokio::test]
    async fn renders_one_frame_per_descriptor_in_order() {
        let (mut w, _worker, _updates) = widget(two_frame_config());
        w.notification_received(WorkerEvent::InitDone);

        let dom = w.get_dom();
        assert_eq!(dom.children().len(), 2);

        let first = &dom.children()[0];
        assert_eq!(first.tag(), "iframe");
        assert_eq!(first.id(), Some("HOYMILES-A-0"));
        assert_eq!(first.attr("src"), Some("http://x/1"));
        assert_eq!(first.attr("scrolling"), Some("no"));
        assert_eq!(first.classes(), ["hoymiles", "module"]);
        assert_eq!(first.style().get("width").as_deref(), Some("100%"));
        assert_eq!(first.style().get("height").as_deref(), Some("300px"));
        assert_eq!(first.style().get("border").as_deref(), Some("none"));
        assert_eq!(first.style().get("overflow").as_deref(), Some("hidden"));
        assert_eq!(
            first.style().get("background-color").as_deref(),
            Some("black")
        );
        assert_eq!(first.style().get("color").as_deref(), Some("white"));

        let second = &dom.children()[1];
        assert_eq!(second.id(), Some("HOYMILES-A-1"));
        assert_eq!(second.attr("src"), Some("/HOYMILES-A-1"));
    }

    #[tokio::test]
    async fn malformed_frame_fails_fast() {
        let mut config = two_frame_config();
        config.frames.insert(1, FrameConfig::default());
        let (mut w, _worker, _updates) = widget(config);
        w.notification_received(WorkerEvent::InitDone);

        let dom = w.get_dom();
        assert_eq!(dom.children().len(), 1);
        let error = &dom.children()[0];
        assert_eq!(error.tag(), "h1");
        assert_eq!(error.text(), Some("Frame 1 has neither src nor html."));
        assert!(w.frame_handles().is_empty());
    }

    #[tokio::test]
    async fn empty_descriptor_reports_index_zero() {
        let (mut w, _worker, _updates) = widget(WidgetConfig {
            ident: "A".into(),
            frames: vec![FrameConfig::default()],
            ..WidgetConfig::default()
        });
        w.notification_received(WorkerEvent::InitDone);

        let dom = w.get_dom();
        let error = &dom.children()[0];
        assert_eq!(error.text(), Some("Frame 0 has neither src nor html."));
    }

    #[tokio::test(start_paused = true)]
    async fn init_done_renders_immediately_and_schedules() {
        let (mut w, _worker, mut updates) = widget(two_frame_config());
        w.notification_received(WorkerEvent::InitDone);

        assert!(w.is_loaded());
        assert_eq!(updates.try_recv(), Ok(RefreshRequest));
        assert!(w.is_refresh_pending());

        advance(Duration::from_millis(5000)).await;
        assert_eq!(updates.recv().await, Some(RefreshRequest));
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_init_done_does_not_double_arm() {
        let (mut w, _worker, mut updates) = widget(two_frame_config());
        w.notification_received(WorkerEvent::InitDone);
        w.notification_received(WorkerEvent::InitDone);

        // One immediate refresh per delivery, but a single timer.
        assert_eq!(updates.try_recv(), Ok(RefreshRequest));
        assert_eq!(updates.try_recv(), Ok(RefreshRequest));

        advance(Duration::from_millis(5000)).await;
        assert_eq!(updates.recv().await, Some(RefreshRequest));
        assert!(updates.try_recv().is_err(), "second timer must not exist");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_renders_once_and_never_again() {
        let mut config = two_frame_config();
        config.update_interval = 0;
        let (mut w, _worker, mut updates) = widget(config);
        w.notification_received(WorkerEvent::InitDone);

        assert_eq!(updates.try_recv(), Ok(RefreshRequest));
        assert!(!w.is_refresh_pending());

        let result = timeout(Duration::from_secs(60), updates.recv()).await;
        assert!(result.is_err(), "no timer may ever fire");
    }

    #[tokio::test]
    async fn unknown_event_is_ignored() {
        let (mut w, _worker, mut updates) = widget(two_frame_config());
        w.notification_received(WorkerEvent::Unknown);

        assert!(!w.is_loaded());
        assert!(updates.try_recv().is_err());
    }

    #[tokio::test]
    async fn suspend_hides_and_resume_shows_rendered_frames() {
        let (mut w, _worker, mut updates) = widget(two_frame_config());
        w.notification_received(WorkerEvent::InitDone);
        let _ = updates.try_recv();

        let dom = w.get_dom();

        w.suspend();
        for frame in dom.children() {
            assert_eq!(frame.display().as_deref(), Some("none"));
        }
        assert!(w.is_loaded(), "suspend must not alter loaded");

        w.resume();
        for frame in dom.children() {
            assert_eq!(frame.display().as_deref(), Some("block"));
        }
        assert!(
            updates.try_recv().is_err(),
            "suspend/resume must not trigger a render"
        );
    }

    #[tokio::test]
    async fn suspend_before_any_render_is_a_noop() {
        let (mut w, _worker, _updates) = widget(two_frame_config());
        w.suspend();
        w.resume();
        assert!(w.frame_handles().is_empty());
    }

    #[tokio::test]
    async fn every_render_returns_a_fresh_container() {
        let (mut w, _worker, _updates) = widget(two_frame_config());
        w.notification_received(WorkerEvent::InitDone);

        let first = w.get_dom();
        let second = w.get_dom();
        assert!(first.attr("timestamp").is_some());
        assert!(second.attr("timestamp").is_some());

        // Fresh frames carry no display override from a previous suspend.
        w.suspend();
        let third = w.get_dom();
        assert!(third.children()[0].display().is_none());
    }
}
