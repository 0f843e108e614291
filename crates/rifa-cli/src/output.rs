//! Plain-text and JSON rendering

use anyhow::Result;
use rifa_core::prelude::*;
use rifa_core::{HistoricalWinner, RaffleCycle};
use serde::Serialize;
use std::fmt::Write as _;

const BOARD_COLUMNS: usize = 10;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Output {
    json: bool,
}

impl Output {
    pub(crate) fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON, or the text `render` produces
    pub(crate) fn emit<T: Serialize>(&self, value: &T, render: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", render(value).trim_end());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Overview {
    pub(crate) config: RaffleConfig,
    pub(crate) availability: Availability,
}

pub(crate) fn overview(view: &Overview) -> String {
    let config = &view.config;
    let counts = &view.availability;
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", config.title, config.raffle_id);
    if config.is_suspended {
        let _ = writeln!(out, "*** SALES SUSPENDED ***");
    }
    let _ = writeln!(out, "{}", config.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "Ticket price:  {:.2}", config.ticket_price);
    let _ = writeln!(out, "Drawing date:  {}", config.raffle_date.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out, "Status:        {}", config.raffle_status);
    let _ = writeln!(
        out,
        "Tickets:       {} available, {} reserved, {} sold of {} ({:.1}% sold)",
        counts.available,
        counts.reserved,
        counts.sold,
        counts.total,
        counts.sold_percentage()
    );
    let _ = writeln!(out, "Contact:       {} ({})", config.owner_name, config.whatsapp_contact);
    let _ = writeln!(out);
    let _ = writeln!(out, "Prizes:");
    for prize in &config.prizes {
        let _ = writeln!(out, "  {}. {} [{}]", prize.rank, prize.name, prize.id);
    }
    if !config.winners.is_empty() {
        let _ = writeln!(out);
        out.push_str(&winners(&config.winners));
    }
    out
}

pub(crate) fn ticket_board(tickets: &[Ticket]) -> String {
    let mut out = String::new();
    for row in tickets.chunks(BOARD_COLUMNS) {
        let line: Vec<String> = row
            .iter()
            .map(|t| {
                let mark = match t.status {
                    TicketStatus::Available => '.',
                    TicketStatus::Reserved => 'R',
                    TicketStatus::Sold => 'S',
                };
                format!("{:>4}{mark}", t.number)
            })
            .collect();
        let _ = writeln!(out, "{}", line.join(" "));
    }
    let _ = writeln!(out, "\n. available  R reserved  S sold");
    out
}

pub(crate) fn numbers(numbers: &[TicketNumber]) -> String {
    if numbers.is_empty() {
        return "No tickets available".to_string();
    }
    numbers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn transaction(tx: &Transaction) -> String {
    let mut out = String::new();
    let tickets = numbers(&tx.ticket_numbers);
    let _ = writeln!(out, "Transaction {} [{}]", tx.id, tx.status);
    let _ = writeln!(out, "  Code:      {}", tx.unique_code.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "  Buyer:     {} ({})", tx.customer_name, tx.customer_phone);
    let _ = writeln!(out, "  Tickets:   {tickets}");
    let _ = writeln!(out, "  Paid:      {:.2} {} via {}", tx.amount, tx.currency, tx.payment_method_id);
    let _ = writeln!(out, "  Reference: {}", tx.reference_number);
    let _ = writeln!(out, "  Submitted: {}", tx.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(reason) = &tx.rejection_reason {
        let _ = writeln!(out, "  Reason:    {reason}");
    }
    out
}

pub(crate) fn transactions(txs: &[Transaction]) -> String {
    if txs.is_empty() {
        return "No transactions".to_string();
    }
    txs.iter().map(transaction).collect::<Vec<_>>().join("\n")
}

pub(crate) fn payment_methods(methods: &[PaymentMethod]) -> String {
    if methods.is_empty() {
        return "No payment methods".to_string();
    }
    let mut out = String::new();
    for m in methods {
        let state = if m.is_active { "" } else { " (inactive)" };
        let _ = writeln!(out, "{} [{}] {}{state}", m.name, m.id, m.currency);
        let _ = writeln!(out, "  {}", m.details);
        let _ = writeln!(out, "  {}", m.instructions);
    }
    out
}

pub(crate) fn winners(winners: &[Winner]) -> String {
    let mut out = String::from("Winners:\n");
    for w in winners {
        let _ = writeln!(out, "  {}: #{} {}", w.prize_name, w.ticket_number, w.customer_name);
    }
    out
}

fn historic_winner(w: &HistoricalWinner) -> String {
    format!(
        "{}: #{} {} ({})",
        w.prize_name,
        w.ticket_number,
        w.customer_name,
        w.unique_code.as_deref().unwrap_or("-")
    )
}

pub(crate) fn history(cycles: &[RaffleCycle]) -> String {
    if cycles.is_empty() {
        return "No archived cycles".to_string();
    }
    let mut out = String::new();
    for cycle in cycles.iter().rev() {
        let _ = writeln!(
            out,
            "{} - {} [{}], {} participants",
            cycle.date.format("%Y-%m-%d"),
            cycle.title,
            cycle.id,
            cycle.all_participants.len()
        );
        for w in &cycle.winners {
            let _ = writeln!(out, "  {}", historic_winner(w));
        }
    }
    out
}

pub(crate) fn status(lookup: &StatusLookup) -> String {
    match lookup {
        StatusLookup::Active { transaction } => format!(
            "VALID: {} holds tickets {} in the current raffle",
            transaction.customer_name,
            numbers(&transaction.ticket_numbers)
        ),
        StatusLookup::HistoricWinner {
            cycle_title,
            date,
            winner,
            ..
        } => format!(
            "WINNER of \"{}\" ({}): {}",
            cycle_title,
            date.format("%Y-%m-%d"),
            historic_winner(winner)
        ),
        StatusLookup::NotFound => "Code not found".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_marks_statuses() {
        let tickets = vec![
            Ticket::available(1),
            Ticket {
                number: 2,
                status: TicketStatus::Reserved,
                owner_id: None,
            },
            Ticket {
                number: 3,
                status: TicketStatus::Sold,
                owner_id: Some("TRD-AAAAAA".to_string()),
            },
        ];
        let board = ticket_board(&tickets);
        assert!(board.starts_with("   1.    2R    3S\n"));
    }

    #[test]
    fn board_wraps_rows() {
        let tickets: Vec<_> = (1..=12).map(Ticket::available).collect();
        let board = ticket_board(&tickets);
        assert_eq!(board.lines().take_while(|l| !l.is_empty()).count(), 2);
    }

    #[test]
    fn not_found_status() {
        assert_eq!(status(&StatusLookup::NotFound), "Code not found");
    }

    #[test]
    fn empty_lists() {
        assert_eq!(numbers(&[]), "No tickets available");
        assert_eq!(transactions(&[]), "No transactions");
    }
}
