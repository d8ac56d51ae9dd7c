extern crate std;

use soroban_sdk::{symbol_short, testutils::Events, vec, IntoVal, TryIntoVal};

use crate::events::{PurchaseCompleted, RatesUpdated, SaleStarted, SaleStopped};
use crate::test::{setup, NATIVE_RATE, STABLE_RATE};
use crate::{PaymentRail, PurchaseKind};

#[test]
fn rates_updated_event() {
    let s = setup();
    s.client.set_rates(&s.admin, &STABLE_RATE, &NATIVE_RATE);

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, s.client.address);
    let expected_topics = vec![&s.env, symbol_short!("rates").into_val(&s.env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: RatesUpdated = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        RatesUpdated {
            stable_rate: STABLE_RATE,
            native_rate: NATIVE_RATE,
        }
    );
}

#[test]
fn sale_started_event() {
    let s = setup();
    s.start_configured_sale();

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("started"), generation)
    assert_eq!(last_event.0, s.client.address);
    let expected_topics = vec![
        &s.env,
        symbol_short!("started").into_val(&s.env),
        0u32.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: SaleStarted = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        SaleStarted {
            generation: 0,
            tier_count: 3,
        }
    );
}

#[test]
fn sale_stopped_event() {
    let s = setup();
    s.start_configured_sale();
    s.client.stop_sale(&s.admin);

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, s.client.address);
    let expected_topics = vec![
        &s.env,
        symbol_short!("stopped").into_val(&s.env),
        0u32.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: SaleStopped = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(event_data, SaleStopped { generation: 0 });
}

#[test]
fn sale_restarted_event() {
    let s = setup();
    s.start_configured_sale();
    s.client.stop_sale(&s.admin);
    s.client.restart_sale(
        &s.admin,
        &vec![&s.env, 2u32],
        &vec![&s.env, 400i128],
        &vec![&s.env, s.tier0_root.clone()],
    );

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, s.client.address);
    let expected_topics = vec![
        &s.env,
        symbol_short!("restarted").into_val(&s.env),
        1u32.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: SaleStarted = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        SaleStarted {
            generation: 1,
            tier_count: 1,
        }
    );
}

#[test]
fn purchase_completed_event() {
    let s = setup();
    s.start_configured_sale();

    let buyer = s.tier0_members[0].clone();
    let required = s.client.required_payment(&400i128, &PaymentRail::Native);
    s.native_sac.mint(&buyer, &required);

    s.client.buy_tokens(
        &buyer,
        &400i128,
        &0u32,
        &s.tier0_proof(0),
        &PaymentRail::Native,
        &None,
    );

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("purchase"), buyer)
    assert_eq!(last_event.0, s.client.address);
    let expected_topics = vec![
        &s.env,
        symbol_short!("purchase").into_val(&s.env),
        buyer.clone().into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: PurchaseCompleted = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        PurchaseCompleted {
            buyer: buyer.clone(),
            kind: PurchaseKind::Token,
            rail: PaymentRail::Native,
            payment_token: s.native_token.address.clone(),
            paid: required,
            amount: 400,
            tier_index: 0,
        }
    );
}

#[test]
fn nft_purchase_event_carries_the_count() {
    let s = setup();
    s.start_configured_sale();

    let buyer = s.tier0_members[1].clone();
    let required = s.client.required_payment(&4i128, &PaymentRail::Stable);
    s.stable_sac.mint(&buyer, &required);

    s.client.buy_nfts(
        &buyer,
        &4u32,
        &2u32,
        &s.tier0_proof(1),
        &PaymentRail::Stable,
        &Some(s.stable_token.address.clone()),
    );

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    let event_data: PurchaseCompleted = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        PurchaseCompleted {
            buyer: buyer.clone(),
            kind: PurchaseKind::Nft,
            rail: PaymentRail::Stable,
            payment_token: s.stable_token.address.clone(),
            paid: required,
            amount: 4,
            tier_index: 2,
        }
    );
}
