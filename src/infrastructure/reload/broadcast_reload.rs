use tokio::sync::broadcast;

use crate::application::ports::reload_signal::{ReloadReason, ReloadSignal};

#[derive(Clone)]
pub struct BroadcastReloadSignal {
    sender: broadcast::Sender<ReloadReason>,
}

impl BroadcastReloadSignal {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadReason> {
        self.sender.subscribe()
    }
}

impl ReloadSignal for BroadcastReloadSignal {
    fn request_reload(&self, reason: ReloadReason) {
        tracing::info!(?reason, "reload_requested");
        // Nobody listening is harmless.
        if let Err(broadcast::error::SendError(reason)) = self.sender.send(reason) {
            tracing::debug!(?reason, "reload_request_unobserved");
        }
    }
}
