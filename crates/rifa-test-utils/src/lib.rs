//! Testing utilities for the rifa workspace
//!
//! Shared fixtures for services, purchases and configurations.

#![allow(missing_docs)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use rifa_core::prelude::*;
use rifa_store::{MemoryStorage, Storage};

pub const TEST_SEED: u64 = 0x5EED;

pub type TestService = RaffleService<MemoryStorage>;

/// In-memory service with a fixed random seed
pub fn setup_test_service() -> TestService {
    setup_service_with(MemoryStorage::new(), TEST_SEED)
}

pub fn setup_service_with<S: Storage>(storage: S, seed: u64) -> RaffleService<S> {
    RaffleService::with_rng(storage, StdRng::seed_from_u64(seed)).unwrap()
}

/// Service whose cycle has `total` tickets at `price`
pub fn setup_small_raffle(total: u32, price: f64) -> TestService {
    let service = setup_test_service();
    let mut config = service.config().unwrap();
    config.total_tickets = total;
    config.ticket_price = price;
    service.update_config(config).unwrap();
    service
}

pub fn purchase_request(numbers: &[TicketNumber]) -> PurchaseRequest {
    purchase_request_from("Ana Pérez", numbers)
}

pub fn purchase_request_from(customer: &str, numbers: &[TicketNumber]) -> PurchaseRequest {
    PurchaseRequest {
        ticket_numbers: numbers.to_vec(),
        payment_method_id: PaymentMethodId::from("pm_1"),
        currency: "VES".to_string(),
        amount: 10.0 * numbers.len() as f64,
        reference_number: format!("REF-{customer}"),
        customer_name: customer.to_string(),
        customer_phone: "+584140000000".to_string(),
    }
}

/// Submit a purchase and return the pending transaction
pub fn purchase<S: Storage>(service: &RaffleService<S>, customer: &str, numbers: &[TicketNumber]) -> Transaction {
    service
        .create_transaction(purchase_request_from(customer, numbers))
        .unwrap()
}

/// Submit and approve a purchase
pub fn approved_purchase<S: Storage>(
    service: &RaffleService<S>,
    customer: &str,
    numbers: &[TicketNumber],
) -> Transaction {
    let pending = purchase(service, customer, numbers);
    service.approve_transaction(&pending.id).unwrap()
}

pub fn ticket_status<S: Storage>(service: &RaffleService<S>, number: TicketNumber) -> TicketStatus {
    service.ticket(number).unwrap().unwrap().status
}

pub fn assert_ticket_statuses<S: Storage>(
    service: &RaffleService<S>,
    numbers: &[TicketNumber],
    expected: TicketStatus,
) {
    for &n in numbers {
        assert_eq!(ticket_status(service, n), expected, "ticket {n}");
    }
}
