//! Ticket and transaction transition tables

use crate::error::TransitionError;
use crate::types::{TicketStatus, TransactionStatus};

/// Validates a ticket status change.
///
/// The ledger only moves tickets it has already checked, so an illegal move
/// here is a bug. Illegal transitions return an error; with the
/// `strict-debug` feature they panic at the point they happen.
pub fn validate_ticket_transition(
    from: TicketStatus,
    to: TicketStatus,
) -> Result<(), TransitionError> {
    if allowed_ticket_transitions(from).contains(&to) {
        Ok(())
    } else {
        #[cfg(feature = "strict-debug")]
        panic!("Illegal ticket transition attempted: {from:?} -> {to:?}");

        #[cfg(not(feature = "strict-debug"))]
        Err(TransitionError::Ticket { from, to })
    }
}

/// Statuses a ticket in `from` may move to
pub fn allowed_ticket_transitions(from: TicketStatus) -> Vec<TicketStatus> {
    use TicketStatus::*;
    match from {
        Available => vec![Reserved],
        Reserved => vec![Sold, Available],
        Sold => vec![Available],
    }
}

/// Validates a transaction status change.
///
/// Transaction moves come from admin requests (approving twice, rejecting a
/// rejected payment), so an illegal one is always an error, never a panic.
/// Approved transactions can still be rejected: that is how a participant
/// is withdrawn after approval.
pub fn validate_transaction_transition(
    from: TransactionStatus,
    to: TransactionStatus,
) -> Result<(), TransitionError> {
    if allowed_transaction_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError::Transaction { from, to })
    }
}

/// Statuses a transaction in `from` may move to
pub fn allowed_transaction_transitions(from: TransactionStatus) -> Vec<TransactionStatus> {
    use TransactionStatus::*;
    match from {
        Pending => vec![Approved, Rejected],
        Approved => vec![Rejected],
        Rejected => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_can_sell_or_release() {
        assert!(validate_ticket_transition(TicketStatus::Reserved, TicketStatus::Sold).is_ok());
        assert!(
            validate_ticket_transition(TicketStatus::Reserved, TicketStatus::Available).is_ok()
        );
    }

    #[cfg(not(feature = "strict-debug"))]
    #[test]
    fn available_cannot_sell_directly() {
        assert_eq!(
            validate_ticket_transition(TicketStatus::Available, TicketStatus::Sold),
            Err(TransitionError::Ticket {
                from: TicketStatus::Available,
                to: TicketStatus::Sold
            })
        );
    }

    #[test]
    fn rejected_is_terminal() {
        assert!(allowed_transaction_transitions(TransactionStatus::Rejected).is_empty());
    }

    #[test]
    fn repeated_approval_is_an_error_in_every_build() {
        assert_eq!(
            validate_transaction_transition(TransactionStatus::Approved, TransactionStatus::Approved),
            Err(TransitionError::Transaction {
                from: TransactionStatus::Approved,
                to: TransactionStatus::Approved
            })
        );
    }
}
