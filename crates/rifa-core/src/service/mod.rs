//! Raffle service
//!
//! The single entry point front ends talk to. It owns a [`Storage`] backend
//! and exposes one accessor per record plus the ledger operations.
//!
//! # Consistency
//! - Every mutation runs under one write lock, so read-modify-write cycles
//!   of two callers never interleave.
//! - Operations touching several records stage them into one [`Batch`]
//!   and commit it once.
//!
//! [`Batch`]: rifa_store::Batch

mod admin;
mod drawing;
mod history;
mod ledger;
mod payments;
mod settings;

use crate::codes;
use crate::config::RaffleConfig;
use crate::defaults;
use crate::error::RaffleError;
use crate::records::{CONFIG, PAYMENT_METHODS, TICKETS, TRANSACTIONS};
use crate::tickets::{availability, generate_tickets};
use crate::types::{Availability, Ticket, TicketNumber, Transaction, TransactionId, TransactionStatus};
use chrono::Utc;
use parking_lot::{Mutex, MutexGuard};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rifa_store::{Batch, Storage};

/// Raffle engine bound to a storage backend
#[derive(Debug)]
pub struct RaffleService<S> {
    storage: S,
    rng: Mutex<StdRng>,
    write_lock: Mutex<()>,
}

impl<S: Storage> RaffleService<S> {
    /// Open the service, seeding any record a new store lacks
    ///
    /// # Errors
    /// Storage failure while reading or seeding.
    pub fn new(storage: S) -> Result<Self, RaffleError> {
        Self::with_rng(storage, StdRng::from_os_rng())
    }

    /// Open the service with a caller-provided random source
    ///
    /// Seeded generators make codes and drawings reproducible.
    ///
    /// # Errors
    /// Storage failure while reading or seeding.
    pub fn with_rng(storage: S, rng: StdRng) -> Result<Self, RaffleError> {
        let service = Self {
            storage,
            rng: Mutex::new(rng),
            write_lock: Mutex::new(()),
        };
        service.seed_defaults()?;
        Ok(service)
    }

    /// Underlying storage backend
    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock()
    }

    fn roll<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        f(&mut self.rng.lock())
    }

    fn commit(&self, batch: Batch) -> Result<(), RaffleError> {
        self.storage.commit(batch).map_err(RaffleError::from)
    }

    fn fresh_config(&self) -> RaffleConfig {
        let now = Utc::now();
        let raffle_id = self.roll(|rng| codes::raffle_id(now, rng));
        defaults::initial_config(raffle_id, now)
    }

    fn seed_defaults(&self) -> Result<(), RaffleError> {
        let _guard = self.lock_writes();
        self.seed_defaults_locked()
    }

    /// Seed missing records; the caller holds the write lock
    fn seed_defaults_locked(&self) -> Result<(), RaffleError> {
        let mut batch = Batch::new();

        let config = match CONFIG.load(&self.storage)? {
            Some(config) => config,
            None => {
                let config = self.fresh_config();
                CONFIG.stage(&mut batch, &config)?;
                config
            }
        };
        if PAYMENT_METHODS.load(&self.storage)?.is_none() {
            PAYMENT_METHODS.stage(&mut batch, &defaults::initial_payment_methods())?;
        }
        if TICKETS.load(&self.storage)?.is_none() {
            TICKETS.stage(&mut batch, &generate_tickets(config.total_tickets))?;
        }

        if !batch.is_empty() {
            tracing::info!(records = batch.len(), raffle_id = %config.raffle_id, "seeded new store");
            self.commit(batch)?;
        }
        Ok(())
    }

    /// Active cycle configuration
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn config(&self) -> Result<RaffleConfig, RaffleError> {
        Ok(CONFIG.load_or_else(&self.storage, || self.fresh_config())?)
    }

    /// Ticket set of the active cycle
    ///
    /// An empty stored list reads as a fresh set sized by the configuration.
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn tickets(&self) -> Result<Vec<Ticket>, RaffleError> {
        let tickets = TICKETS.load(&self.storage)?.unwrap_or_default();
        if tickets.is_empty() {
            let total = self.config()?.total_tickets;
            tracing::debug!(total, "no stored tickets, reading a fresh set");
            return Ok(generate_tickets(total));
        }
        Ok(tickets)
    }

    /// Single ticket by number
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn ticket(&self, number: TicketNumber) -> Result<Option<Ticket>, RaffleError> {
        Ok(self.tickets()?.into_iter().find(|t| t.number == number))
    }

    /// Ticket counts by status
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn availability(&self) -> Result<Availability, RaffleError> {
        Ok(availability(&self.tickets()?))
    }

    /// Transactions of the active cycle, in submission order
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn transactions(&self) -> Result<Vec<Transaction>, RaffleError> {
        Ok(TRANSACTIONS.load(&self.storage)?.unwrap_or_default())
    }

    /// Single transaction by id
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn transaction(&self, id: &TransactionId) -> Result<Option<Transaction>, RaffleError> {
        Ok(self.transactions()?.into_iter().find(|t| &t.id == id))
    }

    /// Transactions in one review state
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn transactions_with_status(
        &self,
        status: TransactionStatus,
    ) -> Result<Vec<Transaction>, RaffleError> {
        Ok(self
            .transactions()?
            .into_iter()
            .filter(|t| t.status == status)
            .collect())
    }

    /// Price of `count` tickets at the current ticket price
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn purchase_quote(&self, count: usize) -> Result<f64, RaffleError> {
        Ok(self.config()?.quote(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::HISTORY;
    use rifa_store::MemoryStorage;

    fn service() -> RaffleService<MemoryStorage> {
        RaffleService::with_rng(MemoryStorage::new(), StdRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn new_store_is_seeded() {
        let svc = service();
        let config = svc.config().unwrap();
        assert_eq!(svc.tickets().unwrap().len(), config.total_tickets as usize);
        assert_eq!(svc.payment_methods().unwrap().len(), 2);
        assert!(config.raffle_id.starts_with("RFL-"));
        assert!(HISTORY.load(svc.storage()).unwrap().is_none());
    }

    #[test]
    fn seeding_keeps_existing_records() {
        let storage = MemoryStorage::new();
        let mut config = defaults::initial_config("RFL-KEEP".to_string(), Utc::now());
        config.total_tickets = 5;
        CONFIG.store(&storage, &config).unwrap();

        let svc = RaffleService::with_rng(storage, StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(svc.config().unwrap().raffle_id, "RFL-KEEP");
        assert_eq!(svc.tickets().unwrap().len(), 5);
    }

    #[test]
    fn empty_ticket_list_reads_as_fresh_set() {
        let svc = service();
        TICKETS.store(svc.storage(), &Vec::new()).unwrap();
        assert_eq!(svc.tickets().unwrap().len(), 100);
    }

    #[test]
    fn quote_uses_ticket_price() {
        let svc = service();
        assert!((svc.purchase_quote(3).unwrap() - 30.0).abs() < f64::EPSILON);
    }
}
