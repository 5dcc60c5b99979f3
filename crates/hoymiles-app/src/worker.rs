//! In-process stand-in for the dashboard worker.
//!
//! Answers the widget's `INIT` request: registers every `html` frame in
//! the shared content store, then acknowledges with `INIT_DONE`. Talking
//! to actual inverter hardware is the real worker's job, not ours.

use std::sync::{Arc, Mutex};

use hoymiles_widget::{FrameContentStore, WorkerEvent, WorkerLink, WorkerRequest};
use tracing::{debug, info};

pub async fn run(mut link: WorkerLink, store: Arc<Mutex<FrameContentStore>>) {
    while let Some(request) = link.requests.recv().await {
        match request {
            WorkerRequest::Init(config) => {
                let count = store.lock().unwrap().register_config(&config);
                info!(ident = %config.ident, served_frames = count, "worker ready");
                if link.events.send(WorkerEvent::InitDone).is_err() {
                    debug!("widget dropped its event channel, stopping worker");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoymiles_config::{FrameConfig, WidgetConfig};
    use hoymiles_widget::link;

    #[tokio::test]
    async fn init_is_acknowledged_and_content_registered() {
        let (mut widget_link, worker_link) = link();
        let store = Arc::new(Mutex::new(FrameContentStore::new()));
        tokio::spawn(run(worker_link, Arc::clone(&store)));

        let config = WidgetConfig {
            ident: "A".into(),
            frames: vec![
                FrameConfig::with_src("http://x/1"),
                FrameConfig::with_html("<p>hi</p>"),
            ],
            ..WidgetConfig::default()
        };
        widget_link
            .requests
            .send(WorkerRequest::Init(config))
            .unwrap();

        let event = widget_link.events.recv().await.unwrap();
        assert!(matches!(event, WorkerEvent::InitDone));

        let store = store.lock().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.resolve("/HOYMILES-A-1").unwrap().1, "<p>hi</p>");
    }
}
