//! Contention tests: concurrent operations must never oversell stock,
//! overdraw debt or partially apply a batch.

mod common;

use std::sync::atomic::{AtomicU64, Ordering};

use aviary_core::{Caller, ProductKind, RuleViolation};
use aviary_ledger::{
    LedgerConfig, MakePayment, PlaceOrder, ReceiveSupply, TransferStock,
};

use common::{rule, World};

fn contended_world() -> World {
    // Heavy deliberate contention; give commits plenty of headroom.
    World::with_config(LedgerConfig {
        max_commit_retries: 10_000,
        ..LedgerConfig::default()
    })
}

#[test]
fn concurrent_orders_sell_exactly_the_available_stock() {
    let world = contended_world();
    world.stock_store(100);

    let sold = AtomicU64::new(0);
    let rejected = AtomicU64::new(0);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..25 {
                    let result = world.engine.place_order(
                        Caller::Customer(world.customer),
                        PlaceOrder {
                            customer: world.customer,
                            store: world.store,
                            lines: world.line(1),
                            paid: 0,
                        },
                    );
                    match result {
                        Ok(_) => {
                            sold.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(err) => {
                            assert!(matches!(
                                rule(err),
                                RuleViolation::InsufficientStock { .. }
                            ));
                            rejected.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            });
        }
    });

    assert_eq!(sold.load(Ordering::Relaxed), 100);
    assert_eq!(rejected.load(Ordering::Relaxed), 100);
    assert_eq!(world.engine.stock_level(world.store, world.seed_mix).unwrap(), 0);
    // Every sold unit was charged, none paid up front.
    assert_eq!(world.engine.debt_balance(world.customer).unwrap(), 90_000);
}

#[test]
fn opposing_transfers_conserve_total_stock() {
    let world = contended_world();
    world
        .engine
        .receive_supply(
            Caller::Admin,
            ReceiveSupply {
                vendor: world.vendor,
                warehouse: world.warehouse,
                product: world.seed_mix,
                quantity: 100,
                pack_size: "400g bag".into(),
            },
        )
        .unwrap();
    world
        .engine
        .transfer_stock(
            Caller::Admin,
            TransferStock {
                source: world.warehouse,
                destination: world.store,
                carrier: world.carrier,
                kind: ProductKind::Goods,
                product: world.seed_mix,
                quantity: 50,
            },
        )
        .unwrap();

    let world = &world;
    std::thread::scope(|scope| {
        for direction in 0..4 {
            scope.spawn(move || {
                let (source, destination) = if direction % 2 == 0 {
                    (world.warehouse, world.store)
                } else {
                    (world.store, world.warehouse)
                };
                for _ in 0..30 {
                    // Either outcome is fine; only conservation matters.
                    let _ = world.engine.transfer_stock(
                        Caller::Admin,
                        TransferStock {
                            source,
                            destination,
                            carrier: world.carrier,
                            kind: ProductKind::Goods,
                            product: world.seed_mix,
                            quantity: 1,
                        },
                    );
                }
            });
        }
    });

    let at_warehouse = world.engine.stock_level(world.warehouse, world.seed_mix).unwrap();
    let at_store = world.engine.stock_level(world.store, world.seed_mix).unwrap();
    assert_eq!(at_warehouse + at_store, 100);
}

#[test]
fn concurrent_payments_cannot_overdraw_the_balance() {
    let world = contended_world();
    world.stock_store(10);
    world
        .engine
        .place_order(
            Caller::Admin,
            PlaceOrder {
                customer: world.customer,
                store: world.store,
                lines: world.line(1),
                paid: 0,
            },
        )
        .unwrap();
    assert_eq!(world.engine.debt_balance(world.customer).unwrap(), 900);

    // Two racing payments of 600 against a balance of 900: exactly one lands.
    let settled = AtomicU64::new(0);
    std::thread::scope(|scope| {
        for _ in 0..2 {
            scope.spawn(|| {
                let result = world.engine.make_payment(
                    Caller::Customer(world.customer),
                    MakePayment {
                        customer: world.customer,
                        amount: 600,
                    },
                );
                match result {
                    Ok(_) => {
                        settled.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(err) => {
                        assert!(matches!(rule(err), RuleViolation::Overpayment { .. }));
                    }
                }
            });
        }
    });

    assert_eq!(settled.load(Ordering::Relaxed), 1);
    assert_eq!(world.engine.debt_balance(world.customer).unwrap(), 300);
}
