use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::models::{AlertChannel, Ticket, TicketId};
use crate::services::engine::SchedulingEngine;
use crate::QueueError;

/// What the delivery collaborator receives for one alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertDelivery {
    pub ticket_id: TicketId,
    pub token: String,
    pub patient_name: String,
    pub channel: AlertChannel,
    pub recipient: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAck {
    pub delivered: bool,
    pub detail: Option<String>,
}

impl DeliveryAck {
    pub fn delivered() -> Self {
        Self {
            delivered: true,
            detail: None,
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            delivered: false,
            detail: Some(detail.into()),
        }
    }
}

/// SMS / WhatsApp / email transport living outside the engine.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn deliver(&self, alert: &AlertDelivery) -> DeliveryAck;
}

/// Transport that only writes the alert to the log.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

#[async_trait]
impl NotificationTransport for LogTransport {
    async fn deliver(&self, alert: &AlertDelivery) -> DeliveryAck {
        info!(
            "[{}] to {} ({}): {}",
            alert.channel,
            alert.patient_name,
            alert.recipient.as_deref().unwrap_or("no address on file"),
            alert.message
        );
        DeliveryAck::delivered()
    }
}

/// Records alert intent on tickets and hands it to the transport.
#[derive(Clone)]
pub struct NotificationDispatcher {
    engine: Arc<SchedulingEngine>,
    transport: Arc<dyn NotificationTransport>,
}

impl NotificationDispatcher {
    pub fn new(engine: Arc<SchedulingEngine>, transport: Arc<dyn NotificationTransport>) -> Self {
        Self { engine, transport }
    }

    pub fn with_log_transport(engine: Arc<SchedulingEngine>) -> Self {
        Self::new(engine, Arc::new(LogTransport))
    }

    /// The ticket is updated before delivery is attempted; a failed delivery
    /// is logged but does not fail the call.
    #[instrument(skip(self, message))]
    pub async fn send_alert_to_patient(
        &self,
        ticket_id: TicketId,
        channel: AlertChannel,
        message: Option<String>,
    ) -> Result<Ticket, QueueError> {
        let message = match message.filter(|m| !m.trim().is_empty()) {
            Some(message) => message,
            None => self.engine.get_ticket(ticket_id).await?.default_alert_message(),
        };

        let ticket = self.engine.record_alert(ticket_id, channel, message.clone()).await?;

        let delivery = AlertDelivery {
            ticket_id,
            token: ticket.token.clone(),
            patient_name: ticket.patient_name.clone(),
            channel,
            recipient: ticket.contact.recipient_for(channel).map(str::to_string),
            message,
        };

        let ack = self.transport.deliver(&delivery).await;
        if ack.delivered {
            info!("{} alert delivered for token {}", channel, ticket.token);
        } else {
            warn!(
                "{} alert for token {} not delivered: {}",
                channel,
                ticket.token,
                ack.detail.as_deref().unwrap_or("no detail")
            );
        }

        Ok(ticket)
    }
}
