//! Ticket set maintenance
//!
//! The ticket list always holds each number `1..=total` exactly once, in
//! ascending order.

use crate::config::MAX_TOTAL_TICKETS;
use crate::error::ConfigError;
use crate::types::{Availability, Ticket, TicketNumber, TicketStatus};

/// Fresh set of `count` available tickets numbered from 1
///
/// Counts above [`MAX_TOTAL_TICKETS`] (a hand-edited record) are capped.
#[must_use]
pub fn generate_tickets(count: u32) -> Vec<Ticket> {
    if count > MAX_TOTAL_TICKETS {
        tracing::warn!(count, max = MAX_TOTAL_TICKETS, "ticket count capped");
    }
    (1..=count.min(MAX_TOTAL_TICKETS)).map(Ticket::available).collect()
}

/// Grow or shrink a ticket set to `total`
///
/// Growing appends available tickets after the highest number. Shrinking
/// drops the high-numbered tickets, and is refused if any of them is
/// reserved or sold.
///
/// # Errors
/// `ConfigError::WouldTruncateCommittedTickets` listing the committed
/// tickets that would be dropped.
pub fn resize_tickets(mut tickets: Vec<Ticket>, total: u32) -> Result<Vec<Ticket>, ConfigError> {
    let committed: Vec<TicketNumber> = tickets
        .iter()
        .filter(|t| t.number > total && t.status != TicketStatus::Available)
        .map(|t| t.number)
        .collect();
    if !committed.is_empty() {
        return Err(ConfigError::WouldTruncateCommittedTickets {
            total,
            numbers: committed,
        });
    }

    tickets.retain(|t| t.number <= total);
    let highest = tickets.iter().map(|t| t.number).max().unwrap_or(0);
    tickets.extend((highest + 1..=total).map(Ticket::available));
    Ok(tickets)
}

/// Count tickets by status
#[must_use]
pub fn availability(tickets: &[Ticket]) -> Availability {
    tickets.iter().fold(
        Availability {
            total: tickets.len(),
            ..Availability::default()
        },
        |mut acc, t| {
            match t.status {
                TicketStatus::Available => acc.available += 1,
                TicketStatus::Reserved => acc.reserved += 1,
                TicketStatus::Sold => acc.sold += 1,
            }
            acc
        },
    )
}

/// Check that `tickets` holds exactly the numbers `1..=total`, once each, in order
#[must_use]
pub fn is_complete_set(tickets: &[Ticket], total: u32) -> bool {
    tickets.len() == total as usize
        && tickets
            .iter()
            .zip(1..=total)
            .all(|(ticket, expected)| ticket.number == expected)
}

/// Tickets currently sold
pub fn sold(tickets: &[Ticket]) -> impl Iterator<Item = &Ticket> {
    tickets.iter().filter(|t| t.status == TicketStatus::Sold)
}
