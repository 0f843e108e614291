//! Rifa Core - raffle engine
//!
//! Ticket ledger, payment review, prize drawing and cycle history for a
//! single-operator digital raffle.
//!
//! # Lifecycle
//! 1. **Sale**: buyers reserve AVAILABLE tickets by submitting a payment
//!    reference; the admin approves (tickets become SOLD) or rejects
//!    (tickets return to AVAILABLE).
//! 2. **Drawing**: SCHEDULED -> RUNNING -> COMPLETED, one winner per prize.
//! 3. **Archive**: the cycle is snapshotted into history and a fresh one
//!    starts.
//!
//! # Quick Start
//!
//! ```rust
//! use rifa_core::prelude::*;
//! use rifa_store::MemoryStorage;
//!
//! let service = RaffleService::new(MemoryStorage::new())?;
//! let tx = service.create_transaction(PurchaseRequest {
//!     ticket_numbers: vec![3, 7],
//!     payment_method_id: PaymentMethodId::from("pm_1"),
//!     currency: "VES".to_string(),
//!     amount: 20.0,
//!     reference_number: "000123".to_string(),
//!     customer_name: "Ana".to_string(),
//!     customer_phone: "+58414000000".to_string(),
//! })?;
//! let tx = service.approve_transaction(&tx.id)?;
//!
//! let code = tx.unique_code.clone().unwrap_or_default();
//! assert!(service.check_status(&code)?.is_valid());
//! # Ok::<(), rifa_core::RaffleError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod auth;
pub mod codes;
pub mod config;
pub mod defaults;
pub mod draw;
pub mod error;
pub mod history;
pub mod records;
pub mod service;
pub mod state_machine;
pub mod status;
pub mod tickets;
pub mod types;

pub use config::{Prize, RaffleConfig, RaffleStatus, SocialLink, SocialPlatform, Winner};
pub use error::{ConfigError, RaffleError, TransitionError};
pub use history::{HistoricalParticipant, HistoricalWinner, RaffleCycle};
pub use service::RaffleService;
pub use status::StatusLookup;
pub use types::*;

/// Commonly used types
pub mod prelude {
    pub use crate::config::{Prize, RaffleConfig, RaffleStatus, Winner};
    pub use crate::error::RaffleError;
    pub use crate::history::RaffleCycle;
    pub use crate::service::RaffleService;
    pub use crate::status::StatusLookup;
    pub use crate::types::{
        Availability, NewPaymentMethod, PaymentMethod, PaymentMethodId, PurchaseRequest, Ticket,
        TicketNumber, TicketStatus, Transaction, TransactionId, TransactionStatus,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
