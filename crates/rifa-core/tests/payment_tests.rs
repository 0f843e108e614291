use pretty_assertions::assert_eq;
use rifa_core::prelude::*;
use rifa_test_utils::*;

#[test]
fn test_seeded_methods() {
    let service = setup_test_service();
    let methods = service.payment_methods().unwrap();
    let names: Vec<_> = methods.iter().map(|m| (m.id.to_string(), m.currency.clone())).collect();
    assert_eq!(
        names,
        vec![
            ("pm_1".to_string(), "VES".to_string()),
            ("pm_2".to_string(), "USD".to_string()),
        ]
    );
}

#[test]
fn test_add_update_toggle_delete() {
    let service = setup_test_service();

    let added = service
        .add_payment_method(NewPaymentMethod::new(" Binance Pay ", "usdt").with_details("id 123"))
        .unwrap();
    assert_eq!(added.name, "Binance Pay");
    assert_eq!(added.currency, "USDT");
    assert_eq!(added.details, "id 123");
    assert_eq!(added.instructions, "Editar instrucciones...");
    assert_eq!(service.payment_methods().unwrap().len(), 3);

    let mut edited = added.clone();
    edited.instructions = "Enviar comprobante".to_string();
    service.update_payment_method(edited).unwrap();
    assert_eq!(
        service.payment_method(&added.id).unwrap().unwrap().instructions,
        "Enviar comprobante"
    );

    let toggled = service.toggle_payment_method(&added.id).unwrap();
    assert!(!toggled.is_active);
    assert!(service.active_payment_methods_for("USDT").unwrap().is_empty());
    service.toggle_payment_method(&added.id).unwrap();
    assert_eq!(service.active_payment_methods_for("usdt").unwrap().len(), 1);

    service.delete_payment_method(&added.id).unwrap();
    assert!(service.payment_method(&added.id).unwrap().is_none());
    assert!(service.delete_payment_method(&added.id).unwrap_err().is_not_found());
}

#[test]
fn test_active_methods_filter() {
    let service = setup_test_service();
    service.toggle_payment_method(&PaymentMethodId::from("pm_2")).unwrap();
    let active: Vec<_> = service
        .active_payment_methods()
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(active, vec!["Pago Móvil".to_string()]);
}

#[test]
fn test_invalid_method_rejected() {
    let service = setup_test_service();
    let err = service
        .add_payment_method(NewPaymentMethod::new("  ", "USD"))
        .unwrap_err();
    assert!(matches!(err, RaffleError::InvalidPaymentMethod(_)));

    let mut methods = service.payment_methods().unwrap();
    methods[0].currency = String::new();
    assert!(service.replace_payment_methods(methods).is_err());
    assert_eq!(service.payment_methods().unwrap()[0].currency, "VES");
}

#[test]
fn test_replace_methods() {
    let service = setup_test_service();
    let mut methods = service.payment_methods().unwrap();
    methods.truncate(1);
    service.replace_payment_methods(methods).unwrap();
    assert_eq!(service.payment_methods().unwrap().len(), 1);
}
