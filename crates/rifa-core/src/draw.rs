//! Prize drawing
//!
//! Two modes, picked by the cycle's multi-win flag:
//!
//! - **Single win**: the sold tickets are shuffled once (Fisher–Yates) and
//!   prize *i* takes `shuffled[i % n]`. No ticket wins twice while there are
//!   at least as many sold tickets as prizes.
//! - **Multi win**: each prize draws uniformly and independently from every
//!   sold ticket, so one ticket may take several prizes.

use crate::config::{Prize, Winner};
use crate::types::{Ticket, Transaction};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

/// Name recorded when a drawn ticket has no resolvable owner
pub const ANONYMOUS_OWNER: &str = "Anónimo";

/// Draw one winner per prize, in prize order
///
/// Returns an empty list when no ticket is sold.
pub fn draw_winners<R: Rng + ?Sized>(
    prizes: &[Prize],
    tickets: &[Ticket],
    transactions: &[Transaction],
    allow_multiple_wins: bool,
    rng: &mut R,
) -> Vec<Winner> {
    let mut sold: Vec<&Ticket> = crate::tickets::sold(tickets).collect();
    if sold.is_empty() {
        return Vec::new();
    }

    if !allow_multiple_wins {
        sold.shuffle(rng);
    }

    prizes
        .iter()
        .enumerate()
        .filter_map(|(i, prize)| {
            let ticket = if allow_multiple_wins {
                sold.choose(rng).copied()
            } else {
                sold.get(i % sold.len()).copied()
            }?;
            Some(Winner {
                ticket_number: ticket.number,
                customer_name: owner_name(ticket, transactions),
                prize_name: prize.name.clone(),
            })
        })
        .collect()
}

/// Resolve the buyer's name through the ticket's owner code
#[must_use]
pub fn owner_name(ticket: &Ticket, transactions: &[Transaction]) -> String {
    ticket
        .owner_id
        .as_deref()
        .and_then(|code| transactions.iter().find(|t| t.has_code(code)))
        .map_or_else(|| ANONYMOUS_OWNER.to_string(), |t| t.customer_name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TicketStatus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn prizes(n: usize) -> Vec<Prize> {
        (1..=n)
            .map(|i| Prize {
                id: format!("p{i}"),
                name: format!("Prize {i}"),
                rank: u32::try_from(i).unwrap(),
            })
            .collect()
    }

    fn sold_tickets(numbers: &[u32]) -> Vec<Ticket> {
        numbers
            .iter()
            .map(|&n| Ticket {
                number: n,
                status: TicketStatus::Sold,
                owner_id: None,
            })
            .collect()
    }

    #[test]
    fn no_sold_tickets_no_winners() {
        let tickets = vec![Ticket::available(1)];
        let mut rng = StdRng::seed_from_u64(0);
        assert!(draw_winners(&prizes(2), &tickets, &[], false, &mut rng).is_empty());
    }

    #[test]
    fn single_win_wraps_when_prizes_exceed_tickets() {
        let tickets = sold_tickets(&[4, 9]);
        let mut rng = StdRng::seed_from_u64(11);
        let winners = draw_winners(&prizes(3), &tickets, &[], false, &mut rng);
        assert_eq!(winners.len(), 3);
        assert_ne!(winners[0].ticket_number, winners[1].ticket_number);
        assert_eq!(winners[0].ticket_number, winners[2].ticket_number);
    }

    #[test]
    fn unresolved_owner_is_anonymous() {
        let tickets = sold_tickets(&[1]);
        let mut rng = StdRng::seed_from_u64(5);
        let winners = draw_winners(&prizes(1), &tickets, &[], true, &mut rng);
        assert_eq!(winners[0].customer_name, ANONYMOUS_OWNER);
        assert_eq!(winners[0].prize_name, "Prize 1");
    }

    #[test]
    fn only_sold_tickets_win() {
        let mut tickets = sold_tickets(&[2, 5]);
        tickets.push(Ticket::available(3));
        tickets.push(Ticket {
            number: 4,
            status: TicketStatus::Reserved,
            owner_id: None,
        });
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for w in draw_winners(&prizes(2), &tickets, &[], true, &mut rng) {
                assert!(w.ticket_number == 2 || w.ticket_number == 5);
            }
        }
    }

    #[test]
    fn single_win_has_no_repeats() {
        let tickets = sold_tickets(&[1, 2, 3, 4, 5, 6, 7, 8]);
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let winners = draw_winners(&prizes(8), &tickets, &[], false, &mut rng);
            let distinct: HashSet<_> = winners.iter().map(|w| w.ticket_number).collect();
            assert_eq!(distinct.len(), 8);
        }
    }
}
