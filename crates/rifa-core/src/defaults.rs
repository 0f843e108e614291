//! Seed values for a brand-new store

use crate::config::{Prize, RaffleConfig, RaffleStatus, SocialLink, SocialPlatform};
use crate::types::{PaymentMethod, PaymentMethodId};
use chrono::{DateTime, Duration, Utc};

/// Days between store creation and the default drawing date
pub const DEFAULT_DRAW_IN_DAYS: i64 = 7;

/// Reason recorded when the admin withdraws a participant
pub const WITHDRAWAL_REASON: &str = "Retirado administrativamente.";

/// Configuration of the first cycle
#[must_use]
pub fn initial_config(raffle_id: String, now: DateTime<Utc>) -> RaffleConfig {
    let social = |id: &str, platform| SocialLink {
        id: id.to_string(),
        platform,
        url: "#".to_string(),
        is_active: true,
    };
    let prize = |id: &str, name: &str, rank| Prize {
        id: id.to_string(),
        name: name.to_string(),
        rank,
    };

    RaffleConfig {
        raffle_id,
        title: "Mega Sorteo Tecnológico".to_string(),
        description: "Participa por un ecosistema Apple completo. ¡Tu suerte está a un click!"
            .to_string(),
        ticket_price: 10.0,
        total_tickets: 100,
        whatsapp_contact: "+584120000000".to_string(),
        owner_name: "Digital Raffles VE".to_string(),
        website_name: "TuRifaDigitalVE".to_string(),
        social_links: vec![
            social("1", SocialPlatform::Instagram),
            social("2", SocialPlatform::Facebook),
            social("3", SocialPlatform::Tiktok),
            social("4", SocialPlatform::WhatsApp),
            social("5", SocialPlatform::Telegram),
        ],
        raffle_date: now + Duration::days(DEFAULT_DRAW_IN_DAYS),
        raffle_status: RaffleStatus::Scheduled,
        prizes: vec![
            prize("p1", "iPhone 15 Pro Max", 1),
            prize("p2", "Apple Watch Series 9", 2),
            prize("p3", "AirPods Pro", 3),
        ],
        winners: Vec::new(),
        selection_duration: 10,
        allow_multiple_wins: false,
        carousel_images: Vec::new(),
        is_suspended: false,
    }
}

/// Payment methods offered out of the box
#[must_use]
pub fn initial_payment_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod {
            id: PaymentMethodId::from("pm_1"),
            currency: "VES".to_string(),
            name: "Pago Móvil".to_string(),
            details: "0134 - 04140000000 - V12345678".to_string(),
            instructions: "Enviar capture al WhatsApp.".to_string(),
            is_active: true,
        },
        PaymentMethod {
            id: PaymentMethodId::from("pm_2"),
            currency: "USD".to_string(),
            name: "Zelle".to_string(),
            details: "pagos@rifadigital.ve".to_string(),
            instructions: "Colocar nombre en el memo.".to_string(),
            is_active: true,
        },
    ]
}
