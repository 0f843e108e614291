//! Error types for the raffle engine
//!
//! Provides error handling for:
//! - Purchase validation and ticket reservation conflicts
//! - Illegal ticket/transaction state transitions
//! - Configuration updates
//! - Drawing preconditions
//! - Admin credentials

use crate::config::{RaffleStatus, MAX_TOTAL_TICKETS};
use crate::types::{PaymentMethodId, TicketNumber, TicketStatus, TransactionId, TransactionStatus};
use rifa_store::StoreError;

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum RaffleError {
    /// Storage backend failed
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Illegal state transition
    #[error("state machine error: {0}")]
    Transition(#[from] TransitionError),

    /// Transaction does not exist
    #[error("transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Payment method does not exist
    #[error("payment method not found: {0}")]
    PaymentMethodNotFound(PaymentMethodId),

    /// Payment method is switched off
    #[error("payment method is inactive: {0}")]
    PaymentMethodInactive(PaymentMethodId),

    /// Payment method fields missing
    #[error("invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    /// Prize does not exist
    #[error("prize not found: {0}")]
    PrizeNotFound(String),

    /// Purchase named no tickets
    #[error("purchase must include at least one ticket")]
    EmptyPurchase,

    /// Purchase form incomplete
    #[error("invalid purchase: {0}")]
    InvalidPurchase(String),

    /// Requested tickets are unknown, reserved or sold
    #[error("tickets not available: {numbers:?}")]
    TicketsUnavailable {
        /// Offending ticket numbers
        numbers: Vec<TicketNumber>,
    },

    /// Ticket referenced by a transaction is in the wrong state
    #[error("ticket {number} cannot move from {from} to {to}")]
    TicketState {
        /// Ticket involved
        number: TicketNumber,
        /// Its current status
        from: TicketStatus,
        /// Requested status
        to: TicketStatus,
    },

    /// Sales are suspended by the admin
    #[error("raffle is suspended")]
    RaffleSuspended,

    /// Operation not allowed while the drawing status is `status`
    #[error("operation not allowed while raffle is {status}")]
    WrongRaffleStatus { status: RaffleStatus },

    /// Drawing needs at least one sold ticket
    #[error("no sold tickets to draw from")]
    NoSoldTickets,

    /// Drawing needs at least one prize
    #[error("no prizes configured")]
    NoPrizes,

    /// Admin password did not match
    #[error("invalid admin credentials")]
    InvalidCredentials,

    /// New password rejected
    #[error("invalid new password: {0}")]
    InvalidNewPassword(String),
}

impl RaffleError {
    /// Check if the error means a referenced entity is missing
    ///
    /// Such operations leave every record untouched.
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TransactionNotFound(_) | Self::PaymentMethodNotFound(_) | Self::PrizeNotFound(_)
        )
    }

    /// Check if the error was caused by caller input rather than the system
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }

    /// Check if retrying after the state changes could succeed
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::TicketsUnavailable { .. }
                | Self::RaffleSuspended
                | Self::WrongRaffleStatus { .. }
                | Self::NoSoldTickets
        )
    }
}

/// Configuration update errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Ticket count out of range
    #[error("total tickets must be between 1 and {max}, got {0}", max = MAX_TOTAL_TICKETS)]
    InvalidTotalTickets(u32),

    /// Price must be a finite non-negative number
    #[error("ticket price must be a non-negative number, got {0}")]
    InvalidTicketPrice(f64),

    /// Title must not be blank
    #[error("title must not be empty")]
    EmptyTitle,

    /// Shrinking would drop reserved or sold tickets
    #[error("cannot shrink to {total} tickets: tickets {numbers:?} are reserved or sold")]
    WouldTruncateCommittedTickets {
        /// Requested ticket count
        total: u32,
        /// Reserved or sold tickets above it
        numbers: Vec<TicketNumber>,
    },
}

/// Illegal state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Ticket status change not in the allowed set
    #[error("illegal ticket transition {from} -> {to}")]
    Ticket {
        /// Current status
        from: TicketStatus,
        /// Requested status
        to: TicketStatus,
    },

    /// Transaction status change not in the allowed set
    #[error("illegal transaction transition {from} -> {to}")]
    Transaction {
        /// Current status
        from: TransactionStatus,
        /// Requested status
        to: TransactionStatus,
    },
}
