//! Persisted record layout
//!
//! Every record is an independent JSON value under a fixed key.

use crate::config::RaffleConfig;
use crate::history::RaffleCycle;
use crate::types::{PaymentMethod, Ticket, Transaction};
use rifa_store::Record;

/// Ticket list of the active cycle
pub const TICKETS: Record<Vec<Ticket>> = Record::new("trd_tickets_v2");

/// Transactions of the active cycle
pub const TRANSACTIONS: Record<Vec<Transaction>> = Record::new("trd_transactions_v2");

/// Active cycle configuration
pub const CONFIG: Record<RaffleConfig> = Record::new("trd_config_v2");

/// Payment methods
pub const PAYMENT_METHODS: Record<Vec<PaymentMethod>> = Record::new("trd_payment_methods_v2");

/// Archived cycles, oldest first
pub const HISTORY: Record<Vec<RaffleCycle>> = Record::new("trd_history_v2");

/// Digest of the admin password
pub const ADMIN_PASSWORD: Record<String> = Record::new("trd_admin_password_v2");

/// Every key the engine owns
pub const ALL_KEYS: [&str; 6] = [
    TICKETS.key(),
    TRANSACTIONS.key(),
    CONFIG.key(),
    PAYMENT_METHODS.key(),
    HISTORY.key(),
    ADMIN_PASSWORD.key(),
];
