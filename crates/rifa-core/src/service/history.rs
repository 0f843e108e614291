//! Cycle archiving and participation-code lookup

use super::RaffleService;
use crate::codes;
use crate::config::RaffleStatus;
use crate::error::RaffleError;
use crate::history::RaffleCycle;
use crate::records::{CONFIG, HISTORY, TICKETS, TRANSACTIONS};
use crate::status::StatusLookup;
use crate::tickets::generate_tickets;
use crate::types::{Transaction, TransactionStatus};
use chrono::Utc;
use rifa_store::{Batch, Storage};
use tracing::{debug, info};
use ulid::Ulid;

impl<S: Storage> RaffleService<S> {
    /// Archived cycles, oldest first
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn history(&self) -> Result<Vec<RaffleCycle>, RaffleError> {
        Ok(HISTORY.load(&self.storage)?.unwrap_or_default())
    }

    /// Close the active cycle and open a fresh one
    ///
    /// The snapshot of approved participants and winners is appended to the
    /// history; transactions are cleared, every ticket becomes AVAILABLE
    /// again and the configuration gets a new raffle id with no winners.
    /// Everything lands in one commit.
    ///
    /// # Errors
    /// `WrongRaffleStatus` while a drawing is RUNNING.
    #[tracing::instrument(skip(self))]
    pub fn archive_current_cycle(&self) -> Result<RaffleCycle, RaffleError> {
        let _guard = self.lock_writes();
        let mut config = self.config()?;
        if config.raffle_status == RaffleStatus::Running {
            return Err(RaffleError::WrongRaffleStatus {
                status: config.raffle_status,
            });
        }

        let now = Utc::now();
        let transactions = self.transactions()?;
        let cycle = RaffleCycle::snapshot(
            Ulid::new().to_string().to_lowercase(),
            now,
            &config,
            &transactions,
            &self.payment_methods()?,
        );
        let mut history = self.history()?;
        history.push(cycle.clone());

        let previous_id = config.raffle_id.clone();
        config.raffle_id = self.roll(|rng| loop {
            let id = codes::raffle_id(now, rng);
            if id != previous_id {
                break id;
            }
        });
        config.winners.clear();
        config.raffle_status = RaffleStatus::Scheduled;
        config.is_suspended = false;

        let mut batch = Batch::new();
        HISTORY.stage(&mut batch, &history)?;
        TRANSACTIONS.stage(&mut batch, &Vec::<Transaction>::new())?;
        TICKETS.stage(&mut batch, &generate_tickets(config.total_tickets))?;
        CONFIG.stage(&mut batch, &config)?;
        self.commit(batch)?;

        info!(
            cycle = %cycle.id,
            participants = cycle.all_participants.len(),
            winners = cycle.winners.len(),
            next_raffle = %config.raffle_id,
            "cycle archived"
        );
        Ok(cycle)
    }

    /// Look up a participation code
    ///
    /// Approved transactions of the active cycle are checked first, then
    /// winners of archived cycles, newest first. Input is trimmed and
    /// upper-cased.
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn check_status(&self, code: &str) -> Result<StatusLookup, RaffleError> {
        let code = codes::normalize_code(code);
        if code.is_empty() {
            return Ok(StatusLookup::NotFound);
        }

        if let Some(transaction) = self
            .transactions()?
            .into_iter()
            .find(|t| t.status == TransactionStatus::Approved && t.has_code(&code))
        {
            debug!(transaction = %transaction.id, "code matches active participant");
            return Ok(StatusLookup::Active { transaction });
        }

        for cycle in self.history()?.into_iter().rev() {
            if let Some(winner) = cycle.winner_with_code(&code).cloned() {
                debug!(cycle = %cycle.id, "code matches historic winner");
                return Ok(StatusLookup::HistoricWinner {
                    cycle_id: cycle.id,
                    cycle_title: cycle.title,
                    date: cycle.date,
                    winner,
                });
            }
        }

        Ok(StatusLookup::NotFound)
    }
}
