use pretty_assertions::assert_eq;
use rifa_core::prelude::*;
use rifa_core::ConfigError;
use rifa_test_utils::*;

#[test]
fn test_growing_appends_available_tickets() {
    let service = setup_small_raffle(10, 5.0);
    approved_purchase(&service, "Ana", &[10]);

    let mut config = service.config().unwrap();
    config.total_tickets = 15;
    service.update_config(config).unwrap();

    let tickets = service.tickets().unwrap();
    assert_eq!(tickets.len(), 15);
    assert_eq!(tickets[9].status, TicketStatus::Sold);
    assert!(tickets[10..].iter().all(Ticket::is_available));
    let numbers: Vec<_> = tickets.iter().map(|t| t.number).collect();
    assert_eq!(numbers, (1..=15).collect::<Vec<_>>());
}

#[test]
fn test_shrinking_over_committed_tickets_is_refused() {
    let service = setup_small_raffle(10, 5.0);
    purchase(&service, "Ana", &[8]);

    let mut config = service.config().unwrap();
    config.total_tickets = 5;
    config.title = "Changed".to_string();
    let err = service.update_config(config).unwrap_err();
    match err {
        RaffleError::Config(ConfigError::WouldTruncateCommittedTickets { total, numbers }) => {
            assert_eq!(total, 5);
            assert_eq!(numbers, vec![8]);
        }
        other => panic!("unexpected error: {other}"),
    }

    // Nothing written
    let config = service.config().unwrap();
    assert_eq!(config.total_tickets, 10);
    assert_ne!(config.title, "Changed");
    assert_eq!(service.tickets().unwrap().len(), 10);
}

#[test]
fn test_shrinking_free_tail_succeeds() {
    let service = setup_small_raffle(10, 5.0);
    purchase(&service, "Ana", &[2]);

    let mut config = service.config().unwrap();
    config.total_tickets = 4;
    service.update_config(config).unwrap();

    assert_eq!(service.tickets().unwrap().len(), 4);
    assert_eq!(ticket_status(&service, 2), TicketStatus::Reserved);
}

#[test]
fn test_invalid_values_rejected() {
    let service = setup_test_service();

    let mut config = service.config().unwrap();
    config.total_tickets = 0;
    assert!(matches!(
        service.update_config(config).unwrap_err(),
        RaffleError::Config(ConfigError::InvalidTotalTickets(0))
    ));

    let mut config = service.config().unwrap();
    config.total_tickets = 4_000_000_000;
    assert!(matches!(
        service.update_config(config).unwrap_err(),
        RaffleError::Config(ConfigError::InvalidTotalTickets(4_000_000_000))
    ));
    assert_eq!(service.tickets().unwrap().len(), 100);

    let mut config = service.config().unwrap();
    config.ticket_price = -1.0;
    assert!(matches!(
        service.update_config(config).unwrap_err(),
        RaffleError::Config(ConfigError::InvalidTicketPrice(_))
    ));
}

#[test]
fn test_price_change_applies_to_quotes() {
    let service = setup_small_raffle(10, 5.0);
    let mut config = service.config().unwrap();
    config.ticket_price = 2.5;
    service.update_config(config).unwrap();
    assert!((service.purchase_quote(4).unwrap() - 10.0).abs() < f64::EPSILON);
}

#[test]
fn test_prize_management() {
    let service = setup_test_service();
    let added = service.add_prize("  PlayStation 5 ").unwrap();
    assert_eq!(added.name, "PlayStation 5");
    assert_eq!(added.rank, 4);

    let removed = service.remove_prize("p1").unwrap();
    assert_eq!(removed.name, "iPhone 15 Pro Max");

    let ranks: Vec<_> = service
        .config()
        .unwrap()
        .prizes
        .iter()
        .map(|p| (p.name.clone(), p.rank))
        .collect();
    assert_eq!(
        ranks,
        vec![
            ("Apple Watch Series 9".to_string(), 1),
            ("AirPods Pro".to_string(), 2),
            ("PlayStation 5".to_string(), 3),
        ]
    );

    assert!(service.remove_prize("p1").unwrap_err().is_not_found());
}

#[test]
fn test_set_description() {
    let service = setup_test_service();
    service.set_description("Nuevo texto").unwrap();
    assert_eq!(service.config().unwrap().description, "Nuevo texto");
}
