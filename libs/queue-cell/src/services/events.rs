use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use directory_cell::HospitalId;

use crate::models::QueueEvent;

pub type QueueEventSender = broadcast::Sender<QueueEvent>;
pub type QueueEventReceiver = broadcast::Receiver<QueueEvent>;

/// Fan-out of queue changes to live displays.
///
/// Each hospital gets its own channel on first subscription; every event is
/// also sent on the global channel.
pub struct QueueEventBus {
    channels: Arc<RwLock<HashMap<HospitalId, QueueEventSender>>>,
    global_sender: QueueEventSender,
    capacity: usize,
}

impl QueueEventBus {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (global_sender, _) = broadcast::channel(capacity);

        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            global_sender,
            capacity,
        }
    }

    pub async fn subscribe_hospital(&self, hospital_id: HospitalId) -> QueueEventReceiver {
        let mut channels = self.channels.write().await;
        let sender = channels
            .entry(hospital_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0);

        debug!("New subscriber for hospital {} queue events", hospital_id);
        sender.subscribe()
    }

    pub fn subscribe_global(&self) -> QueueEventReceiver {
        self.global_sender.subscribe()
    }

    pub async fn active_hospitals(&self) -> Vec<HospitalId> {
        let channels = self.channels.read().await;
        let mut ids: Vec<HospitalId> = channels
            .iter()
            .filter(|(_, sender)| sender.receiver_count() > 0)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Publishing never fails; with no subscribers the event is dropped.
    pub async fn publish(&self, event: QueueEvent) {
        {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(&event.hospital_id) {
                if sender.send(event.clone()).is_err() {
                    debug!("No live subscribers for hospital {}", event.hospital_id);
                }
            }
        }

        if self.global_sender.send(event.clone()).is_err() {
            debug!("No global subscribers for queue events");
        }

        debug!(
            "Published {:?} for ticket {} ({})",
            event.kind, event.token, event.status
        );
    }
}

impl Default for QueueEventBus {
    fn default() -> Self {
        Self::new(shared_config::DEFAULT_EVENT_CHANNEL_CAPACITY)
    }
}

impl Clone for QueueEventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
            global_sender: self.global_sender.clone(),
            capacity: self.capacity,
        }
    }
}
