use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::models::actor::Actor;
use crate::domain::models::booking::{Booking, BookingStatus};
use crate::domain::ports::{ArtistRepository, BookingRepository, NotificationService, StatusChangedEvent};
use crate::domain::services::{assignment, capability, query, schedule, transition};
use crate::error::AppError;

/// Detail edits applied under edit-scope gating. Identity fields
/// (`id`, `booking_no`) are not representable here and so can never change.
#[derive(Debug, Default, Clone)]
pub struct BookingDetails {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub service_name: Option<String>,
    pub sub_service: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<i64>,
}

/// Result of a committed mutation. `persisted` is false when the in-memory
/// commit succeeded but the persistence collaborator reported a failure;
/// the record is queued for background retry.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub booking: Booking,
    pub persisted: bool,
}

/// Authoritative in-memory working set of the booking collection.
///
/// Mutations on one booking are serialized: a second request while one is
/// in flight fails `Locked` instead of interleaving. Mutations on distinct
/// bookings proceed independently. Queries run on a snapshot and never
/// block mutators.
pub struct BookingStore {
    bookings: RwLock<HashMap<String, Booking>>,
    in_flight: Mutex<HashSet<String>>,
    dirty: Mutex<HashSet<String>>,
    job_counter: AtomicI64,
    booking_repo: Arc<dyn BookingRepository>,
    artist_repo: Arc<dyn ArtistRepository>,
    notifier: Arc<dyn NotificationService>,
}

/// Held for the duration of a single mutation on one booking id.
pub struct MutationGuard<'a> {
    store: &'a BookingStore,
    id: String,
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.store.in_flight.lock().unwrap();
        in_flight.remove(&self.id);
    }
}

impl BookingStore {
    pub async fn bootstrap(
        booking_repo: Arc<dyn BookingRepository>,
        artist_repo: Arc<dyn ArtistRepository>,
        notifier: Arc<dyn NotificationService>,
    ) -> Result<Self, AppError> {
        let store = Self {
            bookings: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashSet::new()),
            dirty: Mutex::new(HashSet::new()),
            job_counter: AtomicI64::new(1),
            booking_repo,
            artist_repo,
            notifier,
        };
        store.refresh().await?;
        Ok(store)
    }

    /// Replaces the working set with the repository's view and re-seeds the
    /// job counter. Pending dirty entries are dropped: the repository has
    /// just become the authority again.
    pub async fn refresh(&self) -> Result<usize, AppError> {
        let all = self.booking_repo.fetch_all().await?;
        let next_job = all.iter().filter_map(|b| b.job_no).max().unwrap_or(0) + 1;

        let mut map = HashMap::with_capacity(all.len());
        for booking in all {
            map.insert(booking.id.clone(), booking);
        }
        let count = map.len();

        *self.bookings.write().await = map;
        self.job_counter.store(next_job, Ordering::SeqCst);
        self.dirty.lock().unwrap().clear();

        info!("Booking store refreshed: {} records", count);
        Ok(count)
    }

    pub async fn snapshot(&self) -> Vec<Booking> {
        self.bookings.read().await.values().cloned().collect()
    }

    pub async fn get(&self, id: &str) -> Option<Booking> {
        self.bookings.read().await.get(id).cloned()
    }

    /// Role-scoped, filtered, sorted view over the current snapshot.
    pub async fn query(&self, actor: &Actor, params: &query::BookingQuery) -> Vec<Booking> {
        let snapshot = self.snapshot().await;
        query::run(&snapshot, actor, params)
    }

    /// Serializes mutations per booking id. Public so callers composing a
    /// multi-step operation can hold the lock across both steps.
    pub fn lock_booking(&self, id: &str) -> Result<MutationGuard<'_>, AppError> {
        let mut in_flight = self.in_flight.lock().unwrap();
        if !in_flight.insert(id.to_string()) {
            return Err(AppError::Locked(format!(
                "Booking {} is currently being updated",
                id
            )));
        }
        Ok(MutationGuard { store: self, id: id.to_string() })
    }

    pub async fn create(&self, booking: Booking) -> Result<MutationOutcome, AppError> {
        self.bookings
            .write()
            .await
            .insert(booking.id.clone(), booking.clone());
        let persisted = self.submit(&booking).await;
        Ok(MutationOutcome { booking, persisted })
    }

    pub async fn transition(
        &self,
        id: &str,
        target: BookingStatus,
        actor: &Actor,
    ) -> Result<MutationOutcome, AppError> {
        let _guard = self.lock_booking(id)?;
        let current = self
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        let old_status = current.status;
        let updated = transition::transition(&current, target, actor, Utc::now())?;
        self.commit(updated.clone()).await;

        let event = StatusChangedEvent {
            booking_id: updated.id.clone(),
            old_status,
            new_status: updated.status,
            actor_id: actor.id.clone(),
            occurred_at: updated.status_updated_at,
        };
        let notifier = self.notifier.clone();
        // Fire-and-forget: delivery failure never rolls back the change.
        tokio::spawn(async move {
            if let Err(e) = notifier.status_changed(&event).await {
                warn!("Status-changed notification failed for {}: {}", event.booking_id, e);
            }
        });

        let persisted = self.submit(&updated).await;
        Ok(MutationOutcome { booking: updated, persisted })
    }

    pub async fn assign(
        &self,
        id: &str,
        artist_id: Option<i64>,
        actor: &Actor,
    ) -> Result<MutationOutcome, AppError> {
        let _guard = self.lock_booking(id)?;
        let current = self
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        let updated = assignment::assign(&current, artist_id, actor, Utc::now())?;

        // Referential check against the artist directory before committing.
        if let Some(target) = artist_id {
            self.artist_repo
                .find_by_id(target)
                .await?
                .ok_or(AppError::UnknownArtist(target))?;
        }

        self.commit(updated.clone()).await;
        let persisted = self.submit(&updated).await;
        Ok(MutationOutcome { booking: updated, persisted })
    }

    pub async fn reschedule(
        &self,
        id: &str,
        date: NaiveDate,
        time: NaiveTime,
        actor: &Actor,
    ) -> Result<MutationOutcome, AppError> {
        let _guard = self.lock_booking(id)?;
        let current = self
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        let next_job_no = self.job_counter.fetch_add(1, Ordering::SeqCst);
        let updated = schedule::reschedule(&current, date, time, actor, next_job_no)?;
        self.commit(updated.clone()).await;
        let persisted = self.submit(&updated).await;
        Ok(MutationOutcome { booking: updated, persisted })
    }

    pub async fn update_details(
        &self,
        id: &str,
        details: BookingDetails,
        actor: &Actor,
    ) -> Result<MutationOutcome, AppError> {
        let caps = capability::resolve(actor.role);
        if !caps.can_edit_details() {
            return Err(AppError::Forbidden(format!(
                "Role {} may not edit booking details",
                actor.role
            )));
        }

        let _guard = self.lock_booking(id)?;
        let current = self
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        if let Some(q) = details.quantity {
            if q < 1 {
                return Err(AppError::Validation("Invalid or missing field(s): quantity".into()));
            }
        }
        if let Some(p) = details.unit_price {
            if p < 0 {
                return Err(AppError::Validation("Invalid or missing field(s): price".into()));
            }
        }

        let mut updated = current.clone();
        if let Some(v) = details.customer_name { updated.customer_name = v; }
        if let Some(v) = details.customer_email { updated.customer_email = v; }
        if let Some(v) = details.customer_phone { updated.customer_phone = v; }
        if let Some(v) = details.address { updated.address = Some(v); }
        if let Some(v) = details.postal_code { updated.postal_code = Some(v); }
        if let Some(v) = details.service_name { updated.service_name = v; }
        if let Some(v) = details.sub_service { updated.sub_service = Some(v); }
        if let Some(v) = details.product_name { updated.product_name = Some(v); }
        if let Some(v) = details.quantity { updated.quantity = v; }
        if let Some(v) = details.unit_price { updated.unit_price = v; }

        self.commit(updated.clone()).await;
        let persisted = self.submit(&updated).await;
        Ok(MutationOutcome { booking: updated, persisted })
    }

    /// Privileged, irreversible removal from the working set.
    pub async fn delete(&self, id: &str, actor: &Actor) -> Result<MutationOutcome, AppError> {
        let caps = capability::resolve(actor.role);
        if !caps.can_delete(actor) {
            return Err(AppError::Forbidden(format!(
                "Role {} may not delete bookings",
                actor.role
            )));
        }

        let _guard = self.lock_booking(id)?;
        let removed = self
            .bookings
            .write()
            .await
            .remove(id)
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        self.dirty.lock().unwrap().remove(id);
        let persisted = match self.booking_repo.delete(id).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to delete booking {} from repository: {}", id, e);
                false
            }
        };
        Ok(MutationOutcome { booking: removed, persisted })
    }

    async fn commit(&self, booking: Booking) {
        self.bookings
            .write()
            .await
            .insert(booking.id.clone(), booking);
    }

    /// Optimistic persistence: in-memory state already committed; a failure
    /// here is a warning, not a rollback. The id is queued for retry.
    async fn submit(&self, booking: &Booking) -> bool {
        match self.booking_repo.persist(booking).await {
            Ok(_) => {
                self.dirty.lock().unwrap().remove(&booking.id);
                true
            }
            Err(e) => {
                warn!("Failed to persist booking {}: {}", booking.id, e);
                self.dirty.lock().unwrap().insert(booking.id.clone());
                false
            }
        }
    }

    /// Retries persistence for records whose last submission failed.
    /// Returns how many are still dirty afterwards.
    pub async fn flush_dirty(&self) -> usize {
        let pending: Vec<String> = self.dirty.lock().unwrap().iter().cloned().collect();
        for id in pending {
            let Some(booking) = self.get(&id).await else {
                self.dirty.lock().unwrap().remove(&id);
                continue;
            };
            if self.booking_repo.persist(&booking).await.is_ok() {
                self.dirty.lock().unwrap().remove(&id);
                info!("Persisted previously failed booking {}", id);
            }
        }
        self.dirty.lock().unwrap().len()
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.lock().unwrap().len()
    }
}
