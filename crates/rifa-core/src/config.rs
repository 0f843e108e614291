//! Raffle configuration
//!
//! The singleton record describing the active cycle: identity, pricing,
//! ticket count, prizes, drawing options and storefront metadata.

use crate::error::ConfigError;
use crate::types::TicketNumber;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest ticket set a raffle may have
pub const MAX_TOTAL_TICKETS: u32 = 100_000;

/// Lifecycle of the drawing within a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RaffleStatus {
    /// Tickets on sale, drawing not run
    #[default]
    Scheduled,
    /// Drawing in progress
    Running,
    /// Winners selected
    Completed,
}

impl fmt::Display for RaffleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Scheduled => "SCHEDULED",
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
        };
        f.write_str(label)
    }
}

/// A prize awarded by the drawing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prize {
    /// Stable id
    pub id: String,
    /// Display name
    pub name: String,
    /// Drawing order, starting at 1
    pub rank: u32,
}

/// A drawn ticket and the prize it won
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    /// Drawn ticket
    pub ticket_number: TicketNumber,
    /// Owner name, `Anónimo` if unknown
    pub customer_name: String,
    /// Prize won
    pub prize_name: String,
}

/// Social network a storefront link points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocialPlatform {
    /// TikTok
    Tiktok,
    /// Facebook
    Facebook,
    /// Instagram
    Instagram,
    /// WhatsApp
    WhatsApp,
    /// Telegram
    Telegram,
}

/// Storefront social link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    /// Stable id
    pub id: String,
    /// Network
    pub platform: SocialPlatform,
    /// Link target
    pub url: String,
    /// Shown on the storefront
    pub is_active: bool,
}

/// Configuration of the active raffle cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaffleConfig {
    /// Identity of the current cycle
    pub raffle_id: String,
    /// Storefront title
    pub title: String,
    /// Marketing copy
    pub description: String,
    /// Price of one ticket
    pub ticket_price: f64,
    /// Size of the ticket set, `1..=MAX_TOTAL_TICKETS`
    pub total_tickets: u32,
    /// Organizer contact number
    #[serde(default)]
    pub whatsapp_contact: String,
    /// Organizer name
    #[serde(default)]
    pub owner_name: String,
    /// Storefront name
    #[serde(default)]
    pub website_name: String,
    /// Storefront social links
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    /// Scheduled drawing date
    pub raffle_date: DateTime<Utc>,
    /// Drawing lifecycle state
    pub raffle_status: RaffleStatus,
    /// Prizes in drawing order
    #[serde(default)]
    pub prizes: Vec<Prize>,
    /// Result of the last drawing
    #[serde(default)]
    pub winners: Vec<Winner>,
    /// Drawing delay in seconds
    #[serde(default)]
    pub selection_duration: u64,
    /// Whether one ticket may win several prizes
    #[serde(default)]
    pub allow_multiple_wins: bool,
    /// Storefront image URLs
    #[serde(default)]
    pub carousel_images: Vec<String>,
    /// Sales paused by the admin
    #[serde(default)]
    pub is_suspended: bool,
}

impl RaffleConfig {
    /// Check values an admin may have entered
    ///
    /// # Errors
    /// - `ConfigError::InvalidTotalTickets` for a count outside `1..=MAX_TOTAL_TICKETS`
    /// - `ConfigError::InvalidTicketPrice` for a negative or non-finite price
    /// - `ConfigError::EmptyTitle` for a blank title
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TOTAL_TICKETS).contains(&self.total_tickets) {
            return Err(ConfigError::InvalidTotalTickets(self.total_tickets));
        }
        if !self.ticket_price.is_finite() || self.ticket_price < 0.0 {
            return Err(ConfigError::InvalidTicketPrice(self.ticket_price));
        }
        if self.title.trim().is_empty() {
            return Err(ConfigError::EmptyTitle);
        }
        Ok(())
    }

    /// Price of `count` tickets
    #[must_use]
    pub fn quote(&self, count: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let count = count as f64;
        self.ticket_price * count
    }

    /// Append a prize ranked after the existing ones
    pub fn add_prize(&mut self, id: impl Into<String>, name: impl Into<String>) -> &Prize {
        let rank = u32::try_from(self.prizes.len()).map_or(u32::MAX, |n| n.saturating_add(1));
        self.prizes.push(Prize {
            id: id.into(),
            name: name.into(),
            rank,
        });
        &self.prizes[self.prizes.len() - 1]
    }

    /// Remove a prize and renumber the remaining ranks
    ///
    /// Returns the removed prize, `None` if no prize has that id.
    pub fn remove_prize(&mut self, id: &str) -> Option<Prize> {
        let index = self.prizes.iter().position(|p| p.id == id)?;
        let removed = self.prizes.remove(index);
        for (rank, prize) in (1..).zip(self.prizes.iter_mut()) {
            prize.rank = rank;
        }
        Some(removed)
    }

    /// Active social links only
    pub fn active_social_links(&self) -> impl Iterator<Item = &SocialLink> {
        self.social_links.iter().filter(|l| l.is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    #[test]
    fn default_config_is_valid() {
        let config = defaults::initial_config("RFL-TEST".to_string(), Utc::now());
        assert!(config.validate().is_ok());
        assert_eq!(config.raffle_status, RaffleStatus::Scheduled);
    }

    #[test]
    fn rejects_out_of_range_tickets_and_negative_price() {
        let mut config = defaults::initial_config("RFL-TEST".to_string(), Utc::now());
        config.total_tickets = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTotalTickets(0))
        ));

        config.total_tickets = MAX_TOTAL_TICKETS + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTotalTickets(_))
        ));
        config.total_tickets = MAX_TOTAL_TICKETS;
        assert!(config.validate().is_ok());

        config.total_tickets = 10;
        config.ticket_price = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTicketPrice(_))
        ));
    }

    #[test]
    fn prize_ranks_follow_order() {
        let mut config = defaults::initial_config("RFL-TEST".to_string(), Utc::now());
        config.prizes.clear();
        config.add_prize("a", "Car");
        config.add_prize("b", "Phone");
        config.add_prize("c", "Watch");

        let removed = config.remove_prize("a").unwrap();
        assert_eq!(removed.name, "Car");
        let ranks: Vec<_> = config.prizes.iter().map(|p| (p.name.as_str(), p.rank)).collect();
        assert_eq!(ranks, vec![("Phone", 1), ("Watch", 2)]);
        assert!(config.remove_prize("missing").is_none());
    }

    #[test]
    fn quote_multiplies_price() {
        let mut config = defaults::initial_config("RFL-TEST".to_string(), Utc::now());
        config.ticket_price = 5.0;
        assert!((config.quote(2) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn status_serializes_screaming() {
        let json = serde_json::to_string(&RaffleStatus::Running).unwrap();
        assert_eq!(json, "\"RUNNING\"");
    }
}
