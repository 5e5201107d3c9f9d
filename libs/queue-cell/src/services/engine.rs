use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument, warn};

use directory_cell::{DoctorId, HospitalId, StatusController};
use shared_config::AppConfig;

use crate::models::{
    AlertChannel, PatientDetails, QueueEvent, QueueEventKind, QueuePosition, QueueSnapshot,
    ServeOutcome, ServingEntry, Ticket, TicketId, TicketStatus,
};
use crate::services::events::QueueEventBus;
use crate::services::store::QueueStore;
use crate::services::token::TokenAllocator;
use crate::services::validation::validate_patient_details;
use crate::QueueError;

/// Everything guarded by one hospital's lock.
struct HospitalQueue {
    hospital_id: HospitalId,
    allocator: TokenAllocator,
    store: QueueStore,
    current_serving: BTreeMap<DoctorId, String>,
}

impl HospitalQueue {
    fn new(hospital_id: HospitalId, config: &AppConfig) -> Self {
        Self {
            hospital_id,
            allocator: TokenAllocator::new(config.token_prefix.clone(), config.token_base),
            store: QueueStore::new(hospital_id),
            current_serving: BTreeMap::new(),
        }
    }

    /// Mints a token not yet present in the store, retrying once.
    fn allocate_token(&mut self) -> Result<String, QueueError> {
        let token = self.allocator.next_token();
        if !self.store.contains_token(&token) {
            return Ok(token);
        }

        warn!(
            "Token {} already issued in hospital {}, regenerating",
            token, self.hospital_id
        );
        let retry = self.allocator.next_token();
        if self.store.contains_token(&retry) {
            error!(
                "Token allocator produced duplicate {} twice in hospital {}",
                retry, self.hospital_id
            );
            return Err(QueueError::DuplicateToken {
                hospital_id: self.hospital_id,
                token: retry,
            });
        }
        Ok(retry)
    }

    fn ticket(&self, ticket_id: &TicketId) -> Result<&Ticket, QueueError> {
        self.store
            .get(ticket_id)
            .ok_or_else(|| QueueError::NotFound(format!("ticket {}", ticket_id)))
    }

    /// Applies one state-machine step and keeps `current_serving` in line.
    fn transition(&mut self, ticket_id: &TicketId, to: TicketStatus) -> Result<Ticket, QueueError> {
        let ticket = self
            .store
            .get_mut(ticket_id)
            .ok_or_else(|| QueueError::NotFound(format!("ticket {}", ticket_id)))?;

        if !ticket.status.can_transition_to(&to) {
            return Err(QueueError::InvalidTransition {
                from: ticket.status,
                to,
            });
        }

        let from = ticket.status;
        ticket.status = to;
        ticket.touch();
        let updated = ticket.clone();

        if from == TicketStatus::Serving {
            let was_current = self
                .current_serving
                .get(&updated.doctor_id)
                .map(|token| token == &updated.token)
                .unwrap_or(false);
            if was_current {
                self.current_serving.remove(&updated.doctor_id);
            }
        }
        if to == TicketStatus::Serving {
            self.current_serving.insert(updated.doctor_id, updated.token.clone());
        }

        debug!("Ticket {} moved from {} to {}", updated.token, from, to);
        Ok(updated)
    }
}

/// Owns every hospital queue and the ticket lifecycle.
///
/// Each hospital has its own lock: token allocation, insertion, serving and
/// promotion for one hospital are serialized, while different hospitals run
/// independently. `next_patient` auto-completes the doctor's previous
/// `serving` ticket when it calls a new one.
///
/// Events are published while the hospital lock is held, so subscribers see
/// one hospital's events in the order the changes were applied.
pub struct SchedulingEngine {
    status_controller: StatusController,
    queues: HashMap<HospitalId, Mutex<HospitalQueue>>,
    ticket_index: RwLock<HashMap<TicketId, HospitalId>>,
    events: QueueEventBus,
    minutes_per_patient: u32,
}

impl SchedulingEngine {
    pub fn new(status_controller: StatusController, config: &AppConfig) -> Self {
        let queues = status_controller
            .directory()
            .hospital_ids()
            .into_iter()
            .map(|id| (id, Mutex::new(HospitalQueue::new(id, config))))
            .collect::<HashMap<_, _>>();

        info!("Scheduling engine initialized for {} hospitals", queues.len());

        Self {
            status_controller,
            queues,
            ticket_index: RwLock::new(HashMap::new()),
            events: QueueEventBus::new(config.event_channel_capacity),
            minutes_per_patient: config.minutes_per_patient.max(1),
        }
    }

    /// Builds an engine around tickets handed over by a persistence layer.
    ///
    /// Tickets keep the given order within each doctor's queue. Restored tokens
    /// advance the allocator so new tokens never collide with them.
    pub async fn restore(
        status_controller: StatusController,
        config: &AppConfig,
        tickets: Vec<Ticket>,
    ) -> Result<Self, QueueError> {
        let engine = Self::new(status_controller, config);
        let count = tickets.len();

        for ticket in tickets {
            engine
                .status_controller
                .directory()
                .get_doctor(ticket.hospital_id, ticket.doctor_id)
                .await?;

            let (ticket_id, hospital_id) = (ticket.id, ticket.hospital_id);
            {
                let mut queue = engine.queue(hospital_id)?.lock().await;

                if ticket.status == TicketStatus::Serving {
                    if queue.current_serving.contains_key(&ticket.doctor_id) {
                        return Err(QueueError::InvalidState {
                            token: ticket.token.clone(),
                            status: ticket.status,
                            operation: "restore a second serving",
                        });
                    }
                    queue.current_serving.insert(ticket.doctor_id, ticket.token.clone());
                }

                queue.allocator.observe(&ticket.token);
                queue.store.insert(ticket)?;
            }
            engine.ticket_index.write().await.insert(ticket_id, hospital_id);
        }

        info!("Restored {} tickets into scheduling engine", count);
        Ok(engine)
    }

    pub fn events(&self) -> &QueueEventBus {
        &self.events
    }

    pub fn status_controller(&self) -> &StatusController {
        &self.status_controller
    }

    /// Admits a patient to a doctor's queue with a fresh `waiting` ticket.
    #[instrument(skip(self, details), fields(patient = %details.name))]
    pub async fn join_queue(
        &self,
        details: PatientDetails,
        hospital_id: HospitalId,
        doctor_id: DoctorId,
    ) -> Result<Ticket, QueueError> {
        validate_patient_details(&details)?;

        let ticket = {
            let mut queue = self.queue(hospital_id)?.lock().await;
            self.status_controller.check_admission(hospital_id, doctor_id).await?;

            let token = queue.allocate_token()?;
            let ticket = Ticket::new(token, details, hospital_id, doctor_id);
            queue.store.insert(ticket.clone())?;
            self.ticket_index.write().await.insert(ticket.id, hospital_id);
            self.events
                .publish(QueueEvent::from_ticket(QueueEventKind::TicketJoined, &ticket))
                .await;
            ticket
        };

        info!(
            "Patient joined queue: token {} for doctor {} in hospital {}",
            ticket.token, doctor_id, hospital_id
        );
        Ok(ticket)
    }

    /// Calls the first `waiting` or `confirmed` ticket of the doctor's queue.
    ///
    /// Returns `Ok(None)` when nobody is eligible; nothing changes in that case.
    #[instrument(skip(self))]
    pub async fn next_patient(
        &self,
        hospital_id: HospitalId,
        doctor_id: DoctorId,
    ) -> Result<Option<ServeOutcome>, QueueError> {
        self.ensure_doctor(hospital_id, doctor_id).await?;

        let outcome = {
            let mut queue = self.queue(hospital_id)?.lock().await;

            let next_id = match queue.store.first_callable(doctor_id) {
                Some(id) => id,
                None => {
                    debug!("No eligible patient for doctor {} in hospital {}", doctor_id, hospital_id);
                    return Ok(None);
                }
            };

            let completed = match queue.store.serving(doctor_id) {
                Some(previous) => Some(queue.transition(&previous, TicketStatus::Completed)?),
                None => None,
            };
            let now_serving = queue.transition(&next_id, TicketStatus::Serving)?;

            if let Some(done) = &completed {
                self.events
                    .publish(QueueEvent::from_ticket(QueueEventKind::VisitCompleted, done))
                    .await;
            }
            self.events
                .publish(QueueEvent::from_ticket(QueueEventKind::NowServing, &now_serving))
                .await;

            ServeOutcome {
                now_serving,
                completed,
            }
        };

        if let Some(done) = &outcome.completed {
            info!("Visit completed for token {}", done.token);
        }
        info!(
            "Doctor {} in hospital {} now serving token {}",
            doctor_id, hospital_id, outcome.now_serving.token
        );

        Ok(Some(outcome))
    }

    /// Promotes a `waiting` ticket to the head of its doctor's waiting segment.
    #[instrument(skip(self))]
    pub async fn prioritize_patient(
        &self,
        hospital_id: HospitalId,
        token: &str,
    ) -> Result<Ticket, QueueError> {
        let ticket = {
            let mut queue = self.queue(hospital_id)?.lock().await;

            let (ticket_id, status) = queue
                .store
                .find_by_token(token)
                .map(|t| (t.id, t.status))
                .ok_or_else(|| {
                    QueueError::NotFound(format!("token {} in hospital {}", token, hospital_id))
                })?;

            if status != TicketStatus::Waiting {
                return Err(QueueError::InvalidState {
                    token: token.to_string(),
                    status,
                    operation: "prioritize",
                });
            }

            let position = queue.store.reinsert_before_first_waiting(&ticket_id)?;
            let ticket = queue
                .store
                .get_mut(&ticket_id)
                .ok_or_else(|| QueueError::NotFound(format!("ticket {}", ticket_id)))?;
            ticket.is_emergency = true;
            ticket.touch();

            debug!("Token {} moved to position {}", token, position);
            let ticket = ticket.clone();
            self.events
                .publish(QueueEvent::from_ticket(QueueEventKind::TicketPrioritized, &ticket))
                .await;
            ticket
        };

        info!("Token {} prioritized as emergency in hospital {}", token, hospital_id);

        Ok(ticket)
    }

    /// Patient reply to an alert: `confirmed`, `delayed` or `cancelled`.
    #[instrument(skip(self))]
    pub async fn update_patient_status(
        &self,
        ticket_id: TicketId,
        new_status: TicketStatus,
    ) -> Result<Ticket, QueueError> {
        if !new_status.is_patient_response() {
            return Err(QueueError::ValidationError(format!(
                "{} is not a patient response",
                new_status
            )));
        }

        let hospital_id = self.hospital_of(&ticket_id).await?;
        let ticket = {
            let mut queue = self.queue(hospital_id)?.lock().await;
            let ticket = queue.transition(&ticket_id, new_status)?;
            self.events
                .publish(QueueEvent::from_ticket(QueueEventKind::PatientResponded, &ticket))
                .await;
            ticket
        };

        info!("Patient with token {} responded: {}", ticket.token, new_status);

        Ok(ticket)
    }

    /// Ends the visit of a `serving` ticket.
    #[instrument(skip(self))]
    pub async fn complete_patient(&self, ticket_id: TicketId) -> Result<Ticket, QueueError> {
        let hospital_id = self.hospital_of(&ticket_id).await?;
        let ticket = {
            let mut queue = self.queue(hospital_id)?.lock().await;
            let ticket = queue.transition(&ticket_id, TicketStatus::Completed)?;
            self.events
                .publish(QueueEvent::from_ticket(QueueEventKind::VisitCompleted, &ticket))
                .await;
            ticket
        };

        info!("Visit completed for token {}", ticket.token);

        Ok(ticket)
    }

    /// Stores alert intent on a live ticket. Delivery belongs to
    /// [`crate::NotificationDispatcher`].
    pub async fn record_alert(
        &self,
        ticket_id: TicketId,
        channel: AlertChannel,
        message: String,
    ) -> Result<Ticket, QueueError> {
        let hospital_id = self.hospital_of(&ticket_id).await?;
        let ticket = {
            let mut queue = self.queue(hospital_id)?.lock().await;
            let ticket = queue
                .store
                .get_mut(&ticket_id)
                .ok_or_else(|| QueueError::NotFound(format!("ticket {}", ticket_id)))?;

            if ticket.status.is_terminal() {
                return Err(QueueError::InvalidState {
                    token: ticket.token.clone(),
                    status: ticket.status,
                    operation: "alert",
                });
            }

            ticket.alert_sent = Some(channel);
            ticket.last_message = Some(message);
            ticket.touch();
            let ticket = ticket.clone();
            self.events
                .publish(QueueEvent::from_ticket(QueueEventKind::AlertRecorded, &ticket))
                .await;
            ticket
        };

        debug!("Alert recorded on token {} via {}", ticket.token, channel);

        Ok(ticket)
    }

    pub async fn get_ticket(&self, ticket_id: TicketId) -> Result<Ticket, QueueError> {
        let hospital_id = self.hospital_of(&ticket_id).await?;
        let queue = self.queue(hospital_id)?.lock().await;
        queue.ticket(&ticket_id).cloned()
    }

    pub async fn find_by_token(&self, hospital_id: HospitalId, token: &str) -> Result<Ticket, QueueError> {
        let queue = self.queue(hospital_id)?.lock().await;
        queue
            .store
            .find_by_token(token)
            .cloned()
            .ok_or_else(|| QueueError::NotFound(format!("token {} in hospital {}", token, hospital_id)))
    }

    /// Non-terminal tickets for a doctor, in the order they will be called.
    pub async fn doctor_queue(
        &self,
        hospital_id: HospitalId,
        doctor_id: DoctorId,
    ) -> Result<Vec<Ticket>, QueueError> {
        self.ensure_doctor(hospital_id, doctor_id).await?;

        let queue = self.queue(hospital_id)?.lock().await;
        Ok(queue
            .store
            .partition(doctor_id)
            .filter(|t| !t.status.is_terminal())
            .cloned()
            .collect())
    }

    pub async fn current_serving(
        &self,
        hospital_id: HospitalId,
    ) -> Result<BTreeMap<DoctorId, String>, QueueError> {
        let queue = self.queue(hospital_id)?.lock().await;
        Ok(queue.current_serving.clone())
    }

    pub async fn serving_for_doctor(
        &self,
        hospital_id: HospitalId,
        doctor_id: DoctorId,
    ) -> Result<Option<String>, QueueError> {
        self.ensure_doctor(hospital_id, doctor_id).await?;
        let queue = self.queue(hospital_id)?.lock().await;
        Ok(queue.current_serving.get(&doctor_id).cloned())
    }

    /// How many callable tickets are ahead of this one, and the rough wait.
    pub async fn ticket_position(&self, ticket_id: TicketId) -> Result<QueuePosition, QueueError> {
        let hospital_id = self.hospital_of(&ticket_id).await?;
        let queue = self.queue(hospital_id)?.lock().await;
        let ticket = queue.ticket(&ticket_id)?;

        if ticket.status.is_terminal() {
            return Err(QueueError::InvalidState {
                token: ticket.token.clone(),
                status: ticket.status,
                operation: "estimate wait for",
            });
        }

        let people_ahead = if ticket.status == TicketStatus::Serving {
            0
        } else {
            queue
                .store
                .partition(ticket.doctor_id)
                .take_while(|t| t.id != ticket_id)
                .filter(|t| t.status.is_callable())
                .count()
        };

        let estimated_wait_minutes = u32::try_from(people_ahead)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.minutes_per_patient);

        Ok(QueuePosition {
            ticket_id,
            token: ticket.token.clone(),
            status: ticket.status,
            people_ahead,
            estimated_wait_minutes,
        })
    }

    /// Consistent per-hospital copy of every ticket and serving slot.
    pub async fn snapshot(&self) -> QueueSnapshot {
        let mut tickets = Vec::new();
        let mut current_serving = Vec::new();

        for hospital_id in self.status_controller.directory().hospital_ids() {
            if let Some(lock) = self.queues.get(&hospital_id) {
                let queue = lock.lock().await;
                tickets.extend(queue.store.iter().cloned());
                current_serving.extend(queue.current_serving.iter().map(|(doctor_id, token)| {
                    ServingEntry {
                        hospital_id,
                        doctor_id: *doctor_id,
                        token: token.clone(),
                    }
                }));
            }
        }

        QueueSnapshot {
            tickets,
            current_serving,
            taken_at: Utc::now(),
        }
    }

    fn queue(&self, hospital_id: HospitalId) -> Result<&Mutex<HospitalQueue>, QueueError> {
        self.queues
            .get(&hospital_id)
            .ok_or_else(|| QueueError::NotFound(format!("hospital {}", hospital_id)))
    }

    async fn hospital_of(&self, ticket_id: &TicketId) -> Result<HospitalId, QueueError> {
        self.ticket_index
            .read()
            .await
            .get(ticket_id)
            .copied()
            .ok_or_else(|| QueueError::NotFound(format!("ticket {}", ticket_id)))
    }

    async fn ensure_doctor(&self, hospital_id: HospitalId, doctor_id: DoctorId) -> Result<(), QueueError> {
        self.status_controller
            .directory()
            .get_doctor(hospital_id, doctor_id)
            .await?;
        Ok(())
    }
}
