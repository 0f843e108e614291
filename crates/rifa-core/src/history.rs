//! Archived raffle cycles
//!
//! A [`RaffleCycle`] is written once, when the admin closes a cycle, and
//! never modified. It copies everything it needs (payment method names,
//! winner contact data) so later edits to live records cannot change it.

use crate::config::{RaffleConfig, Winner};
use crate::types::{PaymentMethod, TicketNumber, Transaction, TransactionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Winner record enriched with the winning purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalWinner {
    /// Winning ticket
    pub ticket_number: TicketNumber,
    /// Winner name
    pub customer_name: String,
    /// Prize won
    pub prize_name: String,
    /// Participation code of the winning purchase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_code: Option<String>,
    /// Amount paid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Currency paid in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Payment reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    /// Winner phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
}

impl HistoricalWinner {
    /// Enrich a winner with the approved transaction holding its ticket
    #[must_use]
    pub fn enrich(winner: &Winner, transaction: Option<&Transaction>) -> Self {
        Self {
            ticket_number: winner.ticket_number,
            customer_name: winner.customer_name.clone(),
            prize_name: winner.prize_name.clone(),
            unique_code: transaction.and_then(|t| t.unique_code.clone()),
            amount: transaction.map(|t| t.amount),
            currency: transaction.map(|t| t.currency.clone()),
            reference_number: transaction.map(|t| t.reference_number.clone()),
            customer_phone: transaction.map(|t| t.customer_phone.clone()),
        }
    }
}

/// Approved buyer as recorded at archive time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalParticipant {
    /// Transaction id the participant bought through
    pub id: String,
    /// Buyer name
    pub name: String,
    /// Buyer phone
    pub phone: String,
    /// Tickets held
    pub tickets: Vec<TicketNumber>,
    /// Participation code
    pub unique_code: String,
    /// Payment reference
    pub reference_number: String,
    /// Snapshot of the payment method's display name
    pub payment_method_name: String,
    /// Amount paid
    pub amount: f64,
    /// Currency paid in
    pub currency: String,
    /// Whether any of the tickets won
    pub is_winner: bool,
}

/// Immutable snapshot of a finished cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaffleCycle {
    /// Archive id
    pub id: String,
    /// When the cycle was archived
    pub date: DateTime<Utc>,
    /// Raffle title at archive time
    pub title: String,
    /// Drawn winners
    pub winners: Vec<HistoricalWinner>,
    /// Every approved buyer
    pub all_participants: Vec<HistoricalParticipant>,
}

impl RaffleCycle {
    /// Snapshot the active cycle
    ///
    /// Only APPROVED transactions become participants. Payment method names
    /// are resolved now; a method that no longer exists is recorded by id.
    #[must_use]
    pub fn snapshot(
        id: String,
        date: DateTime<Utc>,
        config: &RaffleConfig,
        transactions: &[Transaction],
        payment_methods: &[PaymentMethod],
    ) -> Self {
        let approved: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| t.status == TransactionStatus::Approved)
            .collect();

        let winners = config
            .winners
            .iter()
            .map(|w| {
                let holder = approved.iter().copied().find(|t| t.holds(w.ticket_number));
                HistoricalWinner::enrich(w, holder)
            })
            .collect();

        let all_participants = approved
            .iter()
            .map(|t| {
                let payment_method_name = payment_methods
                    .iter()
                    .find(|m| m.id == t.payment_method_id)
                    .map_or_else(|| t.payment_method_id.to_string(), |m| m.name.clone());
                HistoricalParticipant {
                    id: t.id.to_string(),
                    name: t.customer_name.clone(),
                    phone: t.customer_phone.clone(),
                    tickets: t.ticket_numbers.clone(),
                    unique_code: t.unique_code.clone().unwrap_or_default(),
                    reference_number: t.reference_number.clone(),
                    payment_method_name,
                    amount: t.amount,
                    currency: t.currency.clone(),
                    is_winner: config.winners.iter().any(|w| t.holds(w.ticket_number)),
                }
            })
            .collect();

        Self {
            id,
            date,
            title: config.title.clone(),
            winners,
            all_participants,
        }
    }

    /// Winner entry carrying `code`, if any
    #[must_use]
    pub fn winner_with_code(&self, code: &str) -> Option<&HistoricalWinner> {
        self.winners
            .iter()
            .find(|w| w.unique_code.as_deref() == Some(code))
    }

    /// Number of participants flagged as winners
    #[must_use]
    pub fn winning_participants(&self) -> usize {
        self.all_participants.iter().filter(|p| p.is_winner).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;
    use crate::types::{PaymentMethodId, TransactionId};

    fn tx(id: &str, numbers: Vec<u32>, status: TransactionStatus, code: Option<&str>) -> Transaction {
        Transaction {
            id: TransactionId::from(id),
            timestamp: Utc::now(),
            ticket_numbers: numbers,
            payment_method_id: PaymentMethodId::from("pm_2"),
            currency: "USD".to_string(),
            amount: 10.0,
            reference_number: format!("REF-{id}"),
            status,
            customer_name: format!("Buyer {id}"),
            customer_phone: "0414".to_string(),
            unique_code: code.map(str::to_string),
            rejection_reason: None,
        }
    }

    #[test]
    fn snapshot_keeps_only_approved_and_flags_winners() {
        let mut config = defaults::initial_config("RFL-1".to_string(), Utc::now());
        config.winners = vec![Winner {
            ticket_number: 7,
            customer_name: "Buyer a".to_string(),
            prize_name: "iPhone".to_string(),
        }];
        let transactions = vec![
            tx("a", vec![3, 7], TransactionStatus::Approved, Some("TRD-AAAAAA")),
            tx("b", vec![4], TransactionStatus::Approved, Some("TRD-BBBBBB")),
            tx("c", vec![5], TransactionStatus::Pending, Some("TRD-CCCCCC")),
            tx("d", vec![6], TransactionStatus::Rejected, Some("TRD-DDDDDD")),
        ];

        let cycle = RaffleCycle::snapshot(
            "cycle-1".to_string(),
            Utc::now(),
            &config,
            &transactions,
            &defaults::initial_payment_methods(),
        );

        assert_eq!(cycle.all_participants.len(), 2);
        assert_eq!(cycle.winning_participants(), 1);
        assert_eq!(cycle.all_participants[0].payment_method_name, "Zelle");

        let winner = cycle.winner_with_code("TRD-AAAAAA").unwrap();
        assert_eq!(winner.reference_number.as_deref(), Some("REF-a"));
        assert_eq!(winner.amount, Some(10.0));
        assert!(cycle.winner_with_code("TRD-BBBBBB").is_none());
    }

    #[test]
    fn deleted_payment_method_falls_back_to_id() {
        let config = defaults::initial_config("RFL-1".to_string(), Utc::now());
        let transactions = vec![tx("a", vec![1], TransactionStatus::Approved, Some("TRD-AAAAAA"))];

        let cycle = RaffleCycle::snapshot("c".to_string(), Utc::now(), &config, &transactions, &[]);
        assert_eq!(cycle.all_participants[0].payment_method_name, "pm_2");
    }
}
