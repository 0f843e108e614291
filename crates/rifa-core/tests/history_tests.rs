use pretty_assertions::assert_eq;
use rifa_core::prelude::*;
use rifa_test_utils::*;

fn drawn_raffle() -> (TestService, Transaction, Transaction) {
    let service = setup_small_raffle(10, 5.0);
    let ana = approved_purchase(&service, "Ana", &[1, 2]);
    let luis = approved_purchase(&service, "Luis", &[5]);
    purchase(&service, "Pending", &[9]);
    let rejected = purchase(&service, "Rejected", &[10]);
    service.reject_transaction(&rejected.id, "no").unwrap();

    service.start_drawing().unwrap();
    service.complete_drawing().unwrap();
    (service, ana, luis)
}

#[test]
fn test_archive_snapshots_and_resets() {
    let (service, ana, luis) = drawn_raffle();
    let previous = service.config().unwrap();

    let cycle = service.archive_current_cycle().unwrap();
    assert_eq!(cycle.title, previous.title);
    assert_eq!(cycle.winners.len(), previous.winners.len());

    // Only approved transactions are participants
    let mut names: Vec<_> = cycle.all_participants.iter().map(|p| p.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["Ana".to_string(), "Luis".to_string()]);
    let ana_entry = cycle.all_participants.iter().find(|p| p.name == "Ana").unwrap();
    assert_eq!(ana_entry.payment_method_name, "Pago Móvil");
    assert_eq!(Some(&ana_entry.unique_code), ana.unique_code.as_ref());
    assert!(cycle.winning_participants() >= 1);

    // Winners carry the holder's contact data
    for winner in &cycle.winners {
        let holder = if luis.holds(winner.ticket_number) { &luis } else { &ana };
        assert_eq!(winner.unique_code, holder.unique_code);
        assert_eq!(winner.customer_phone.as_deref(), Some(holder.customer_phone.as_str()));
    }

    // Fresh cycle
    let config = service.config().unwrap();
    assert_ne!(config.raffle_id, previous.raffle_id);
    assert!(config.winners.is_empty());
    assert_eq!(config.raffle_status, RaffleStatus::Scheduled);
    assert!(service.transactions().unwrap().is_empty());
    let counts = service.availability().unwrap();
    assert_eq!(counts.available, 10);

    assert_eq!(service.history().unwrap(), vec![cycle]);
}

#[test]
fn test_historic_winner_lookup() {
    let (service, _, _) = drawn_raffle();
    let cycle = service.archive_current_cycle().unwrap();
    let winner = cycle.winners[0].clone();
    let code = winner.unique_code.clone().unwrap();

    match service.check_status(&format!("  {} ", code.to_lowercase())).unwrap() {
        StatusLookup::HistoricWinner { cycle_id, cycle_title, winner: found, .. } => {
            assert_eq!(cycle_id, cycle.id);
            assert_eq!(cycle_title, cycle.title);
            assert_eq!(found, winner);
        }
        other => panic!("unexpected lookup: {other:?}"),
    }
}

#[test]
fn test_archived_non_winner_is_not_found() {
    let service = setup_small_raffle(10, 5.0);
    let ana = approved_purchase(&service, "Ana", &[1]);
    service.archive_current_cycle().unwrap();
    let code = ana.unique_code.unwrap();
    assert_eq!(service.check_status(&code).unwrap(), StatusLookup::NotFound);
}

#[test]
fn test_archive_refused_while_running() {
    let service = setup_small_raffle(10, 5.0);
    approved_purchase(&service, "Ana", &[1]);
    service.start_drawing().unwrap();
    assert!(matches!(
        service.archive_current_cycle().unwrap_err(),
        RaffleError::WrongRaffleStatus { .. }
    ));
    assert!(service.history().unwrap().is_empty());
}

#[test]
fn test_deleted_method_name_falls_back_to_id() {
    let service = setup_small_raffle(10, 5.0);
    let method = service
        .add_payment_method(NewPaymentMethod::new("Binance", "usdt"))
        .unwrap();
    let mut request = purchase_request(&[3]);
    request.payment_method_id = method.id.clone();
    let tx = service.create_transaction(request).unwrap();
    service.approve_transaction(&tx.id).unwrap();
    service.delete_payment_method(&method.id).unwrap();

    let cycle = service.archive_current_cycle().unwrap();
    assert_eq!(cycle.all_participants[0].payment_method_name, method.id.to_string());
}

#[test]
fn test_empty_code_is_not_found() {
    let service = setup_test_service();
    assert_eq!(service.check_status("   ").unwrap(), StatusLookup::NotFound);
}
