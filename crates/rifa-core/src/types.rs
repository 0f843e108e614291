//! Core ledger types
//!
//! Defines the records the engine persists for the active cycle:
//! - Tickets and their sale status
//! - Purchase transactions awaiting or past review
//! - Payment methods buyers can pay through
//!
//! Field names serialize in camelCase and enum tags in SCREAMING_CASE, which
//! is the on-disk JSON layout of every record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Ticket number, `1..=total_tickets`
pub type TicketNumber = u32;

/// Unique transaction identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl TransactionId {
    /// Generate new transaction ID (ULID for sortability)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new().to_string().to_lowercase())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Unique payment method identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethodId(pub String);

impl PaymentMethodId {
    /// Generate new payment method ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new().to_string().to_lowercase())
    }
}

impl Default for PaymentMethodId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaymentMethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaymentMethodId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Sale status of a single ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Free to purchase
    Available,
    /// Held by a pending purchase
    Reserved,
    /// Paid and approved
    Sold,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Available => "AVAILABLE",
            Self::Reserved => "RESERVED",
            Self::Sold => "SOLD",
        };
        f.write_str(label)
    }
}

/// A numbered unit of raffle participation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Immutable identity
    pub number: TicketNumber,
    /// Current sale status
    pub status: TicketStatus,
    /// Participation code of the approved owner (SOLD only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl Ticket {
    /// Create an available ticket
    #[inline]
    #[must_use]
    pub fn available(number: TicketNumber) -> Self {
        Self {
            number,
            status: TicketStatus::Available,
            owner_id: None,
        }
    }

    /// Whether the ticket can be reserved
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == TicketStatus::Available
    }
}

/// Review status of a purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Submitted, awaiting admin review
    Pending,
    /// Payment confirmed, tickets sold
    Approved,
    /// Payment refused or participant withdrawn
    Rejected,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(label)
    }
}

/// A customer's purchase submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique id
    pub id: TransactionId,
    /// Submission time (milliseconds on disk)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Tickets requested, in request order
    pub ticket_numbers: Vec<TicketNumber>,
    /// Method the buyer paid with
    pub payment_method_id: PaymentMethodId,
    /// Currency of `amount`
    pub currency: String,
    /// Amount the buyer reports paying
    pub amount: f64,
    /// Bank or wallet reference of the payment
    pub reference_number: String,
    /// Review state
    pub status: TransactionStatus,
    /// Buyer name
    pub customer_name: String,
    /// Buyer phone
    pub customer_phone: String,
    /// Participation code, `TRD-XXXXXX`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_code: Option<String>,
    /// Why the payment was refused or the participant withdrawn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl Transaction {
    /// Whether this transaction holds `number`
    #[inline]
    #[must_use]
    pub fn holds(&self, number: TicketNumber) -> bool {
        self.ticket_numbers.contains(&number)
    }

    /// Whether the participation code matches
    #[inline]
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.unique_code.as_deref() == Some(code)
    }
}

/// Purchase form submitted by a buyer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Tickets to reserve
    pub ticket_numbers: Vec<TicketNumber>,
    /// Chosen payment method
    pub payment_method_id: PaymentMethodId,
    /// Currency paid in
    pub currency: String,
    /// Amount paid
    pub amount: f64,
    /// Payment reference
    pub reference_number: String,
    /// Buyer name
    pub customer_name: String,
    /// Buyer phone
    pub customer_phone: String,
}

/// A way to pay for tickets (bank transfer, mobile payment, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    /// Stable id, `pm_...`
    pub id: PaymentMethodId,
    /// Upper-case currency code
    pub currency: String,
    /// Display name
    pub name: String,
    /// Account data shown to buyers
    pub details: String,
    /// Steps shown to buyers
    pub instructions: String,
    /// Offered to buyers
    pub is_active: bool,
}

/// Payment method before it has an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentMethod {
    /// Currency code
    pub currency: String,
    /// Display name
    pub name: String,
    /// Account data shown to buyers
    pub details: String,
    /// Steps shown to buyers
    pub instructions: String,
    /// Offered to buyers
    pub is_active: bool,
}

impl NewPaymentMethod {
    /// Active method with placeholder details, as created from the admin panel
    #[must_use]
    pub fn new(name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            name: name.into(),
            details: "Editar detalles...".to_string(),
            instructions: "Editar instrucciones...".to_string(),
            is_active: true,
        }
    }

    /// With payment details
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// With buyer instructions
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }
}

/// Ticket counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    /// All tickets
    pub total: usize,
    /// Free to reserve
    pub available: usize,
    /// Awaiting payment review
    pub reserved: usize,
    /// Approved
    pub sold: usize,
}

impl Availability {
    /// Share of tickets sold, in percent
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn sold_percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.sold as f64 * 100.0 / self.total as f64
        }
    }
}
