//! Drawing lifecycle: SCHEDULED -> RUNNING -> COMPLETED

use super::RaffleService;
use crate::config::{RaffleConfig, RaffleStatus, Winner};
use crate::draw::draw_winners;
use crate::error::RaffleError;
use crate::records::CONFIG;
use rifa_store::Storage;
use std::time::Duration;
use tracing::{info, warn};

impl<S: Storage> RaffleService<S> {
    /// Mark the drawing as RUNNING
    ///
    /// Front ends show their selection animation while the drawing runs;
    /// [`Self::complete_drawing`] picks the winners afterwards. A completed
    /// cycle may be drawn again.
    ///
    /// # Errors
    /// - `WrongRaffleStatus` if a drawing is already running
    /// - `NoPrizes` / `NoSoldTickets`
    #[tracing::instrument(skip(self))]
    pub fn start_drawing(&self) -> Result<RaffleConfig, RaffleError> {
        let _guard = self.lock_writes();
        let mut config = self.config()?;

        if config.raffle_status == RaffleStatus::Running {
            return Err(RaffleError::WrongRaffleStatus {
                status: config.raffle_status,
            });
        }
        if config.prizes.is_empty() {
            return Err(RaffleError::NoPrizes);
        }
        if crate::tickets::sold(&self.tickets()?).next().is_none() {
            return Err(RaffleError::NoSoldTickets);
        }

        config.raffle_status = RaffleStatus::Running;
        CONFIG.store(&self.storage, &config)?;
        info!(raffle_id = %config.raffle_id, prizes = config.prizes.len(), "drawing started");
        Ok(config)
    }

    /// Pick the winners and mark the drawing COMPLETED
    ///
    /// # Errors
    /// - `WrongRaffleStatus` unless a drawing is RUNNING
    /// - `NoSoldTickets` if every sale was released meanwhile; the drawing
    ///   stays RUNNING until cancelled
    #[tracing::instrument(skip(self))]
    pub fn complete_drawing(&self) -> Result<Vec<Winner>, RaffleError> {
        let _guard = self.lock_writes();
        let mut config = self.config()?;

        if config.raffle_status != RaffleStatus::Running {
            return Err(RaffleError::WrongRaffleStatus {
                status: config.raffle_status,
            });
        }

        let tickets = self.tickets()?;
        let transactions = self.transactions()?;
        let winners = self.roll(|rng| {
            draw_winners(
                &config.prizes,
                &tickets,
                &transactions,
                config.allow_multiple_wins,
                rng,
            )
        });
        if winners.is_empty() {
            warn!("no sold tickets left at drawing time");
            return Err(RaffleError::NoSoldTickets);
        }

        config.winners.clone_from(&winners);
        config.raffle_status = RaffleStatus::Completed;
        CONFIG.store(&self.storage, &config)?;

        info!(raffle_id = %config.raffle_id, winners = winners.len(), "drawing completed");
        Ok(winners)
    }

    /// Abort a RUNNING drawing back to SCHEDULED
    ///
    /// # Errors
    /// `WrongRaffleStatus` unless a drawing is RUNNING.
    pub fn cancel_drawing(&self) -> Result<RaffleConfig, RaffleError> {
        let _guard = self.lock_writes();
        let mut config = self.config()?;
        if config.raffle_status != RaffleStatus::Running {
            return Err(RaffleError::WrongRaffleStatus {
                status: config.raffle_status,
            });
        }
        config.raffle_status = RaffleStatus::Scheduled;
        CONFIG.store(&self.storage, &config)?;
        warn!(raffle_id = %config.raffle_id, "drawing cancelled");
        Ok(config)
    }

    /// Start, wait the configured selection duration, then complete
    ///
    /// No lock is held while waiting, so reads and reviews proceed.
    ///
    /// # Errors
    /// Any error of [`Self::start_drawing`] or [`Self::complete_drawing`].
    pub async fn run_drawing(&self) -> Result<Vec<Winner>, RaffleError> {
        let config = self.start_drawing()?;
        tokio::time::sleep(Duration::from_secs(config.selection_duration)).await;
        self.complete_drawing()
    }
}
