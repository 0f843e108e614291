//! Admin credentials and data reset

use super::RaffleService;
use crate::auth::{hash_password, verify_password};
use crate::error::RaffleError;
use crate::records::ADMIN_PASSWORD;
use rifa_store::Storage;
use tracing::{info, warn};

impl<S: Storage> RaffleService<S> {
    /// Whether `candidate` is the current admin password
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn verify_admin_password(&self, candidate: &str) -> Result<bool, RaffleError> {
        let stored = ADMIN_PASSWORD.load(&self.storage)?;
        Ok(verify_password(candidate, stored.as_deref()))
    }

    /// Gate for admin operations
    ///
    /// # Errors
    /// `InvalidCredentials` on mismatch.
    pub fn authenticate(&self, candidate: &str) -> Result<(), RaffleError> {
        if self.verify_admin_password(candidate)? {
            Ok(())
        } else {
            warn!("admin authentication failed");
            Err(RaffleError::InvalidCredentials)
        }
    }

    /// Change the admin password
    ///
    /// # Errors
    /// - `InvalidCredentials` if `current` is wrong
    /// - `InvalidNewPassword` if `new` is blank or differs from `confirmation`
    pub fn change_admin_password(
        &self,
        current: &str,
        new: &str,
        confirmation: &str,
    ) -> Result<(), RaffleError> {
        let _guard = self.lock_writes();
        self.authenticate(current)?;
        if new.trim().is_empty() {
            return Err(RaffleError::InvalidNewPassword(
                "password must not be empty".to_string(),
            ));
        }
        if new != confirmation {
            return Err(RaffleError::InvalidNewPassword(
                "confirmation does not match".to_string(),
            ));
        }
        ADMIN_PASSWORD.store(&self.storage, &hash_password(new))?;
        info!("admin password changed");
        Ok(())
    }

    /// Wipe every record and reseed defaults
    ///
    /// The admin password reverts to the default as well.
    ///
    /// # Errors
    /// Storage failure.
    pub fn reset_data(&self) -> Result<(), RaffleError> {
        let _guard = self.lock_writes();
        self.storage.clear()?;
        warn!("all raffle data cleared");
        self.seed_defaults_locked()
    }
}
