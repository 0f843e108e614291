//! Payment method management

use super::RaffleService;
use crate::defaults;
use crate::error::RaffleError;
use crate::records::PAYMENT_METHODS;
use crate::types::{NewPaymentMethod, PaymentMethod, PaymentMethodId};
use rifa_store::Storage;
use tracing::info;

impl<S: Storage> RaffleService<S> {
    /// All payment methods, active or not
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn payment_methods(&self) -> Result<Vec<PaymentMethod>, RaffleError> {
        Ok(PAYMENT_METHODS.load_or_else(&self.storage, defaults::initial_payment_methods)?)
    }

    /// Single payment method by id
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn payment_method(&self, id: &PaymentMethodId) -> Result<Option<PaymentMethod>, RaffleError> {
        Ok(self.payment_methods()?.into_iter().find(|m| &m.id == id))
    }

    /// Methods buyers may currently pay through
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn active_payment_methods(&self) -> Result<Vec<PaymentMethod>, RaffleError> {
        Ok(self
            .payment_methods()?
            .into_iter()
            .filter(|m| m.is_active)
            .collect())
    }

    /// Active methods settling in `currency` (case-insensitive)
    ///
    /// # Errors
    /// Storage failure or corrupt record.
    pub fn active_payment_methods_for(&self, currency: &str) -> Result<Vec<PaymentMethod>, RaffleError> {
        let currency = currency.trim();
        Ok(self
            .active_payment_methods()?
            .into_iter()
            .filter(|m| m.currency.eq_ignore_ascii_case(currency))
            .collect())
    }

    /// Register a new payment method
    ///
    /// # Errors
    /// `InvalidPaymentMethod` for a blank name or currency.
    #[tracing::instrument(skip_all, fields(name = %method.name))]
    pub fn add_payment_method(&self, method: NewPaymentMethod) -> Result<PaymentMethod, RaffleError> {
        let _guard = self.lock_writes();
        let created = normalize(PaymentMethod {
            id: PaymentMethodId::new(),
            currency: method.currency,
            name: method.name,
            details: method.details,
            instructions: method.instructions,
            is_active: method.is_active,
        })?;

        let mut methods = self.payment_methods()?;
        methods.push(created.clone());
        PAYMENT_METHODS.store(&self.storage, &methods)?;

        info!(id = %created.id, currency = %created.currency, "payment method added");
        Ok(created)
    }

    /// Overwrite the method with the same id
    ///
    /// # Errors
    /// `PaymentMethodNotFound` or `InvalidPaymentMethod`.
    pub fn update_payment_method(&self, method: PaymentMethod) -> Result<PaymentMethod, RaffleError> {
        let _guard = self.lock_writes();
        let method = normalize(method)?;
        let mut methods = self.payment_methods()?;
        let slot = methods
            .iter_mut()
            .find(|m| m.id == method.id)
            .ok_or_else(|| RaffleError::PaymentMethodNotFound(method.id.clone()))?;
        *slot = method.clone();
        PAYMENT_METHODS.store(&self.storage, &methods)?;
        info!(id = %method.id, "payment method updated");
        Ok(method)
    }

    /// Remove a method
    ///
    /// Past transactions keep the id; archived cycles resolved their method
    /// names when they were archived.
    ///
    /// # Errors
    /// `PaymentMethodNotFound`.
    pub fn delete_payment_method(&self, id: &PaymentMethodId) -> Result<PaymentMethod, RaffleError> {
        let _guard = self.lock_writes();
        let mut methods = self.payment_methods()?;
        let index = methods
            .iter()
            .position(|m| &m.id == id)
            .ok_or_else(|| RaffleError::PaymentMethodNotFound(id.clone()))?;
        let removed = methods.remove(index);
        PAYMENT_METHODS.store(&self.storage, &methods)?;
        info!(id = %removed.id, "payment method deleted");
        Ok(removed)
    }

    /// Flip a method's active flag
    ///
    /// # Errors
    /// `PaymentMethodNotFound`.
    pub fn toggle_payment_method(&self, id: &PaymentMethodId) -> Result<PaymentMethod, RaffleError> {
        let _guard = self.lock_writes();
        let mut methods = self.payment_methods()?;
        let method = methods
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| RaffleError::PaymentMethodNotFound(id.clone()))?;
        method.is_active = !method.is_active;
        let toggled = method.clone();
        PAYMENT_METHODS.store(&self.storage, &methods)?;
        info!(id = %toggled.id, active = toggled.is_active, "payment method toggled");
        Ok(toggled)
    }

    /// Replace the whole method list
    ///
    /// # Errors
    /// `InvalidPaymentMethod` if any entry is invalid; nothing is written.
    pub fn replace_payment_methods(&self, methods: Vec<PaymentMethod>) -> Result<(), RaffleError> {
        let _guard = self.lock_writes();
        let methods = methods
            .into_iter()
            .map(normalize)
            .collect::<Result<Vec<_>, _>>()?;
        PAYMENT_METHODS.store(&self.storage, &methods)?;
        info!(count = methods.len(), "payment methods replaced");
        Ok(())
    }
}

fn normalize(mut method: PaymentMethod) -> Result<PaymentMethod, RaffleError> {
    method.name = method.name.trim().to_string();
    method.currency = method.currency.trim().to_uppercase();
    if method.name.is_empty() {
        return Err(RaffleError::InvalidPaymentMethod("name is required".to_string()));
    }
    if method.currency.is_empty() {
        return Err(RaffleError::InvalidPaymentMethod("currency is required".to_string()));
    }
    Ok(method)
}
