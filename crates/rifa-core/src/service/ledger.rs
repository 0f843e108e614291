//! Purchase submission and payment review

use super::RaffleService;
use crate::codes;
use crate::config::{RaffleConfig, RaffleStatus};
use crate::defaults::WITHDRAWAL_REASON;
use crate::error::RaffleError;
use crate::records::{HISTORY, TICKETS, TRANSACTIONS};
use crate::state_machine::{validate_ticket_transition, validate_transaction_transition};
use crate::types::{
    PurchaseRequest, Ticket, TicketNumber, TicketStatus, Transaction, TransactionId,
    TransactionStatus,
};
use chrono::Utc;
use rifa_store::{Batch, Storage};
use tracing::{debug, info, warn};

impl<S: Storage> RaffleService<S> {
    /// Submit a purchase and reserve its tickets
    ///
    /// The purchase is all-or-nothing: if any requested number is unknown or
    /// not AVAILABLE, nothing is written. Repeated numbers count once.
    ///
    /// # Errors
    /// - `EmptyPurchase` when no ticket is named
    /// - `InvalidPurchase` for blank buyer fields or a bad amount
    /// - `RaffleSuspended` / `WrongRaffleStatus` when sales are closed
    /// - `PaymentMethodNotFound` / `PaymentMethodInactive`
    /// - `TicketsUnavailable` listing the offending numbers
    #[tracing::instrument(skip_all, fields(tickets = ?request.ticket_numbers))]
    pub fn create_transaction(&self, request: PurchaseRequest) -> Result<Transaction, RaffleError> {
        let _guard = self.lock_writes();

        ensure_open_for_sales(&self.config()?)?;
        let numbers = validate_purchase(&request)?;

        let method = self
            .payment_method(&request.payment_method_id)?
            .ok_or_else(|| RaffleError::PaymentMethodNotFound(request.payment_method_id.clone()))?;
        if !method.is_active {
            return Err(RaffleError::PaymentMethodInactive(method.id));
        }

        let mut tickets = self.tickets()?;
        let unavailable: Vec<TicketNumber> = numbers
            .iter()
            .copied()
            .filter(|n| !tickets.iter().any(|t| t.number == *n && t.is_available()))
            .collect();
        if !unavailable.is_empty() {
            warn!(numbers = ?unavailable, "purchase rejected: tickets not available");
            return Err(RaffleError::TicketsUnavailable {
                numbers: unavailable,
            });
        }

        let mut transactions = self.transactions()?;
        let code = self.new_participation_code(&transactions)?;

        for ticket in tickets.iter_mut().filter(|t| numbers.contains(&t.number)) {
            move_ticket(ticket, TicketStatus::Reserved)?;
        }

        let transaction = Transaction {
            id: TransactionId::new(),
            timestamp: Utc::now(),
            ticket_numbers: numbers,
            payment_method_id: method.id,
            currency: request.currency.trim().to_uppercase(),
            amount: request.amount,
            reference_number: request.reference_number.trim().to_string(),
            status: TransactionStatus::Pending,
            customer_name: request.customer_name.trim().to_string(),
            customer_phone: request.customer_phone.trim().to_string(),
            unique_code: Some(code),
            rejection_reason: None,
        };
        transactions.push(transaction.clone());

        let mut batch = Batch::new();
        TRANSACTIONS.stage(&mut batch, &transactions)?;
        TICKETS.stage(&mut batch, &tickets)?;
        self.commit(batch)?;

        info!(
            transaction = %transaction.id,
            tickets = transaction.ticket_numbers.len(),
            "purchase submitted"
        );
        Ok(transaction)
    }

    /// Approve a pending payment: its tickets become SOLD to its code
    ///
    /// # Errors
    /// - `TransactionNotFound` (nothing changes)
    /// - `Transition` unless the transaction is PENDING
    /// - `TicketState` if one of its tickets is no longer RESERVED
    #[tracing::instrument(skip(self))]
    pub fn approve_transaction(&self, id: &TransactionId) -> Result<Transaction, RaffleError> {
        let _guard = self.lock_writes();

        let mut transactions = self.transactions()?;
        let index = position_of(&transactions, id)?;
        validate_transaction_transition(transactions[index].status, TransactionStatus::Approved)?;

        let code = match transactions[index].unique_code.clone() {
            Some(code) => code,
            None => self.new_participation_code(&transactions)?,
        };

        let mut tickets = self.tickets()?;
        for number in &transactions[index].ticket_numbers {
            match tickets.iter_mut().find(|t| t.number == *number) {
                Some(ticket) => {
                    move_ticket(ticket, TicketStatus::Sold)?;
                    ticket.owner_id = Some(code.clone());
                }
                None => warn!(ticket = number, "approved ticket missing from ticket set"),
            }
        }

        let transaction = &mut transactions[index];
        transaction.status = TransactionStatus::Approved;
        transaction.unique_code = Some(code);
        let approved = transaction.clone();

        let mut batch = Batch::new();
        TRANSACTIONS.stage(&mut batch, &transactions)?;
        TICKETS.stage(&mut batch, &tickets)?;
        self.commit(batch)?;

        info!(transaction = %approved.id, "payment approved");
        Ok(approved)
    }

    /// Reject a payment and release its tickets
    ///
    /// Works on PENDING transactions and, as a withdrawal, on APPROVED ones.
    /// A SOLD ticket is only released while it is still owned by this
    /// transaction's code.
    ///
    /// # Errors
    /// - `TransactionNotFound` (nothing changes)
    /// - `Transition` if the transaction is already REJECTED
    #[tracing::instrument(skip(self))]
    pub fn reject_transaction(
        &self,
        id: &TransactionId,
        reason: &str,
    ) -> Result<Transaction, RaffleError> {
        let _guard = self.lock_writes();

        let mut transactions = self.transactions()?;
        let index = position_of(&transactions, id)?;
        let transaction = &mut transactions[index];
        validate_transaction_transition(transaction.status, TransactionStatus::Rejected)?;

        let mut tickets = self.tickets()?;
        let mut released = 0usize;
        for ticket in tickets.iter_mut().filter(|t| transaction.holds(t.number)) {
            let held = match ticket.status {
                TicketStatus::Reserved => true,
                TicketStatus::Sold => ticket.owner_id.as_deref() == transaction.unique_code.as_deref(),
                TicketStatus::Available => false,
            };
            if held {
                move_ticket(ticket, TicketStatus::Available)?;
                ticket.owner_id = None;
                released += 1;
            } else {
                debug!(ticket = ticket.number, status = %ticket.status, "ticket not held, left as is");
            }
        }

        transaction.status = TransactionStatus::Rejected;
        transaction.rejection_reason = Some(reason.to_string());
        let rejected = transaction.clone();

        let mut batch = Batch::new();
        TRANSACTIONS.stage(&mut batch, &transactions)?;
        TICKETS.stage(&mut batch, &tickets)?;
        self.commit(batch)?;

        info!(transaction = %rejected.id, released, "payment rejected");
        Ok(rejected)
    }

    /// Remove an approved participant from the cycle
    ///
    /// # Errors
    /// Same as [`Self::reject_transaction`].
    pub fn withdraw_participant(&self, id: &TransactionId) -> Result<Transaction, RaffleError> {
        self.reject_transaction(id, WITHDRAWAL_REASON)
    }

    fn new_participation_code(&self, transactions: &[Transaction]) -> Result<String, RaffleError> {
        let history = HISTORY.load(&self.storage)?.unwrap_or_default();
        Ok(self.roll(|rng| {
            codes::unique_participation_code(rng, |code| {
                transactions.iter().any(|t| t.has_code(code))
                    || history.iter().any(|cycle| {
                        cycle.all_participants.iter().any(|p| p.unique_code == code)
                            || cycle.winner_with_code(code).is_some()
                    })
            })
        }))
    }
}

fn ensure_open_for_sales(config: &RaffleConfig) -> Result<(), RaffleError> {
    if config.is_suspended {
        return Err(RaffleError::RaffleSuspended);
    }
    if config.raffle_status != RaffleStatus::Scheduled {
        return Err(RaffleError::WrongRaffleStatus {
            status: config.raffle_status,
        });
    }
    Ok(())
}

/// Distinct requested numbers, in request order
fn validate_purchase(request: &PurchaseRequest) -> Result<Vec<TicketNumber>, RaffleError> {
    let mut numbers: Vec<TicketNumber> = Vec::with_capacity(request.ticket_numbers.len());
    for &n in &request.ticket_numbers {
        if !numbers.contains(&n) {
            numbers.push(n);
        }
    }
    if numbers.is_empty() {
        return Err(RaffleError::EmptyPurchase);
    }

    let required = [
        ("customer name", &request.customer_name),
        ("customer phone", &request.customer_phone),
        ("reference number", &request.reference_number),
    ];
    if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
        return Err(RaffleError::InvalidPurchase(format!("{field} is required")));
    }
    if !request.amount.is_finite() || request.amount < 0.0 {
        return Err(RaffleError::InvalidPurchase(format!(
            "amount must be a non-negative number, got {}",
            request.amount
        )));
    }
    Ok(numbers)
}

fn position_of(transactions: &[Transaction], id: &TransactionId) -> Result<usize, RaffleError> {
    transactions
        .iter()
        .position(|t| &t.id == id)
        .ok_or_else(|| {
            warn!(transaction = %id, "transaction not found");
            RaffleError::TransactionNotFound(id.clone())
        })
}

fn move_ticket(ticket: &mut Ticket, to: TicketStatus) -> Result<(), RaffleError> {
    validate_ticket_transition(ticket.status, to).map_err(|_| RaffleError::TicketState {
        number: ticket.number,
        from: ticket.status,
        to,
    })?;
    ticket.status = to;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethodId;

    fn request(numbers: &[TicketNumber]) -> PurchaseRequest {
        PurchaseRequest {
            ticket_numbers: numbers.to_vec(),
            payment_method_id: PaymentMethodId::from("pm_2"),
            currency: "usd".to_string(),
            amount: 10.0,
            reference_number: "REF1".to_string(),
            customer_name: "Ana".to_string(),
            customer_phone: "555".to_string(),
        }
    }

    #[test]
    fn duplicates_collapse_in_order() {
        assert_eq!(validate_purchase(&request(&[7, 3, 7])).unwrap(), vec![7, 3]);
    }

    #[test]
    fn empty_purchase_rejected() {
        assert!(matches!(
            validate_purchase(&request(&[])),
            Err(RaffleError::EmptyPurchase)
        ));
    }

    #[test]
    fn blank_fields_rejected() {
        let mut req = request(&[1]);
        req.customer_phone = "  ".to_string();
        let err = validate_purchase(&req).unwrap_err();
        assert_eq!(err.to_string(), "invalid purchase: customer phone is required");

        let mut req = request(&[1]);
        req.amount = f64::NAN;
        assert!(matches!(
            validate_purchase(&req),
            Err(RaffleError::InvalidPurchase(_))
        ));
    }

    #[test]
    fn moving_sold_ticket_to_reserved_fails() {
        let mut ticket = Ticket {
            number: 4,
            status: TicketStatus::Sold,
            owner_id: None,
        };
        let err = move_ticket(&mut ticket, TicketStatus::Reserved).unwrap_err();
        assert!(matches!(err, RaffleError::TicketState { number: 4, .. }));
        assert_eq!(ticket.status, TicketStatus::Sold);
    }
}
