//! Admin configuration updates

use super::RaffleService;
use crate::config::{Prize, RaffleConfig};
use crate::error::RaffleError;
use crate::records::{CONFIG, TICKETS};
use crate::tickets::resize_tickets;
use rifa_store::{Batch, Storage};
use tracing::info;
use ulid::Ulid;

impl<S: Storage> RaffleService<S> {
    /// Replace the configuration
    ///
    /// A changed ticket count resizes the ticket set in the same commit:
    /// growing appends AVAILABLE tickets, shrinking drops trailing tickets
    /// only while none of them is RESERVED or SOLD.
    ///
    /// # Errors
    /// `Config` for invalid values or a shrink that would drop committed
    /// tickets. Nothing is written in that case.
    #[tracing::instrument(skip_all, fields(total_tickets = config.total_tickets))]
    pub fn update_config(&self, config: RaffleConfig) -> Result<RaffleConfig, RaffleError> {
        let _guard = self.lock_writes();
        self.write_config(config)
    }

    /// Suspend or resume ticket sales
    ///
    /// # Errors
    /// Storage failure.
    #[tracing::instrument(skip(self))]
    pub fn set_suspended(&self, suspended: bool) -> Result<RaffleConfig, RaffleError> {
        let _guard = self.lock_writes();
        let mut config = self.config()?;
        config.is_suspended = suspended;
        self.write_config(config)
    }

    /// Replace the raffle description
    ///
    /// # Errors
    /// Storage failure.
    pub fn set_description(&self, description: &str) -> Result<RaffleConfig, RaffleError> {
        let _guard = self.lock_writes();
        let mut config = self.config()?;
        config.description = description.to_string();
        self.write_config(config)
    }

    /// Append a prize ranked last
    ///
    /// # Errors
    /// Storage failure.
    #[tracing::instrument(skip(self))]
    pub fn add_prize(&self, name: &str) -> Result<Prize, RaffleError> {
        let _guard = self.lock_writes();
        let mut config = self.config()?;
        let prize = config
            .add_prize(Ulid::new().to_string().to_lowercase(), name.trim())
            .clone();
        self.write_config(config)?;
        Ok(prize)
    }

    /// Remove a prize and renumber the remaining ranks
    ///
    /// # Errors
    /// `PrizeNotFound` if no prize has that id.
    #[tracing::instrument(skip(self))]
    pub fn remove_prize(&self, id: &str) -> Result<Prize, RaffleError> {
        let _guard = self.lock_writes();
        let mut config = self.config()?;
        let prize = config
            .remove_prize(id)
            .ok_or_else(|| RaffleError::PrizeNotFound(id.to_string()))?;
        self.write_config(config)?;
        Ok(prize)
    }

    /// Persist `config`; caller holds the write lock
    fn write_config(&self, config: RaffleConfig) -> Result<RaffleConfig, RaffleError> {
        config.validate()?;
        let current = self.config()?;

        let mut batch = Batch::new();
        if current.total_tickets != config.total_tickets {
            let tickets = resize_tickets(self.tickets()?, config.total_tickets)?;
            info!(
                from = current.total_tickets,
                to = config.total_tickets,
                "ticket set resized"
            );
            TICKETS.stage(&mut batch, &tickets)?;
        }
        CONFIG.stage(&mut batch, &config)?;
        self.commit(batch)?;

        info!(raffle_id = %config.raffle_id, "configuration updated");
        Ok(config)
    }
}
