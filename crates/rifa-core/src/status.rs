//! Public participation-code lookup result
//!
//! Serialized as `{ "valid": bool, "type": "ACTIVE" | "HISTORIC_WINNER", ... }`;
//! an unknown code is just `{ "valid": false }`.

use crate::history::HistoricalWinner;
use crate::types::Transaction;
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Outcome of looking up a participation code
#[derive(Debug, Clone, PartialEq)]
pub enum StatusLookup {
    /// Approved participant of the active cycle
    Active {
        /// The approved purchase
        transaction: Transaction,
    },

    /// Winner of an archived cycle
    HistoricWinner {
        /// Archive id of the cycle
        cycle_id: String,
        /// Raffle title of the cycle
        cycle_title: String,
        /// When the cycle was archived
        date: DateTime<Utc>,
        /// The winning record
        winner: HistoricalWinner,
    },

    /// Code unknown
    NotFound,
}

impl StatusLookup {
    /// Whether the code was recognized
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::NotFound)
    }

    /// Active transaction, if the code belongs to one
    #[must_use]
    pub fn transaction(&self) -> Option<&Transaction> {
        match self {
            Self::Active { transaction } => Some(transaction),
            _ => None,
        }
    }
}

impl Serialize for StatusLookup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("valid", &self.is_valid())?;
        match self {
            Self::Active { transaction } => {
                map.serialize_entry("type", "ACTIVE")?;
                map.serialize_entry("transaction", transaction)?;
            }
            Self::HistoricWinner {
                cycle_id,
                cycle_title,
                date,
                winner,
            } => {
                map.serialize_entry("type", "HISTORIC_WINNER")?;
                map.serialize_entry("cycleId", cycle_id)?;
                map.serialize_entry("cycleTitle", cycle_title)?;
                map.serialize_entry("date", date)?;
                map.serialize_entry("winner", winner)?;
            }
            Self::NotFound => {}
        }
        map.end()
    }
}
