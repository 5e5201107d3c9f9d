use std::collections::{BTreeMap, HashMap};

use directory_cell::{DoctorId, HospitalId};

use crate::models::{Ticket, TicketId, TicketStatus};
use crate::QueueError;

/// Tickets of one hospital, partitioned by doctor.
///
/// Each partition keeps insertion order; the only reordering is
/// [`QueueStore::reinsert_before_first_waiting`].
#[derive(Debug)]
pub struct QueueStore {
    hospital_id: HospitalId,
    tickets: HashMap<TicketId, Ticket>,
    partitions: BTreeMap<DoctorId, Vec<TicketId>>,
    tokens: HashMap<String, TicketId>,
}

impl QueueStore {
    pub fn new(hospital_id: HospitalId) -> Self {
        Self {
            hospital_id,
            tickets: HashMap::new(),
            partitions: BTreeMap::new(),
            tokens: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.tokens.contains_key(token)
    }

    pub fn insert(&mut self, ticket: Ticket) -> Result<(), QueueError> {
        if self.contains_token(&ticket.token) {
            return Err(QueueError::DuplicateToken {
                hospital_id: self.hospital_id,
                token: ticket.token,
            });
        }
        if self.tickets.contains_key(&ticket.id) {
            return Err(QueueError::ValidationError(format!(
                "ticket {} already exists",
                ticket.id
            )));
        }

        self.tokens.insert(ticket.token.clone(), ticket.id);
        self.partitions.entry(ticket.doctor_id).or_default().push(ticket.id);
        self.tickets.insert(ticket.id, ticket);
        Ok(())
    }

    pub fn get(&self, ticket_id: &TicketId) -> Option<&Ticket> {
        self.tickets.get(ticket_id)
    }

    /// Token and placement are fixed once inserted; callers only touch status
    /// and alert fields.
    pub(crate) fn get_mut(&mut self, ticket_id: &TicketId) -> Option<&mut Ticket> {
        self.tickets.get_mut(ticket_id)
    }

    pub fn find_by_token(&self, token: &str) -> Option<&Ticket> {
        self.tokens.get(token).and_then(|id| self.tickets.get(id))
    }

    /// Tickets for a doctor in queue order.
    pub fn partition(&self, doctor_id: DoctorId) -> impl Iterator<Item = &Ticket> + '_ {
        self.partitions
            .get(&doctor_id)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.tickets.get(id))
    }

    /// Every ticket, partition by partition.
    pub fn iter(&self) -> impl Iterator<Item = &Ticket> + '_ {
        self.partitions
            .values()
            .flatten()
            .filter_map(move |id| self.tickets.get(id))
    }

    pub fn first_callable(&self, doctor_id: DoctorId) -> Option<TicketId> {
        self.partition(doctor_id)
            .find(|t| t.status.is_callable())
            .map(|t| t.id)
    }

    pub fn serving(&self, doctor_id: DoctorId) -> Option<TicketId> {
        self.partition(doctor_id)
            .find(|t| t.status == TicketStatus::Serving)
            .map(|t| t.id)
    }

    /// Moves a ticket in front of the first other `waiting` ticket of its
    /// partition. Returns the new index within the partition.
    pub(crate) fn reinsert_before_first_waiting(&mut self, ticket_id: &TicketId) -> Result<usize, QueueError> {
        let doctor_id = self
            .tickets
            .get(ticket_id)
            .map(|t| t.doctor_id)
            .ok_or_else(|| QueueError::NotFound(format!("ticket {}", ticket_id)))?;

        let order = self
            .partitions
            .get_mut(&doctor_id)
            .ok_or_else(|| QueueError::NotFound(format!("queue for doctor {}", doctor_id)))?;

        let current = order
            .iter()
            .position(|id| id == ticket_id)
            .ok_or_else(|| QueueError::NotFound(format!("ticket {} in queue order", ticket_id)))?;
        order.remove(current);

        let tickets = &self.tickets;
        let target = order
            .iter()
            .position(|id| {
                tickets
                    .get(id)
                    .map(|t| t.status == TicketStatus::Waiting)
                    .unwrap_or(false)
            })
            .map(|first_waiting| first_waiting.min(current))
            .unwrap_or(current);

        order.insert(target, *ticket_id);
        Ok(target)
    }
}
