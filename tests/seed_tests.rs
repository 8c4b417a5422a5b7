//! Tests for the demo fixture and counter-cache maintenance.

use clientele::db::{create_pool, run_migrations, DbPool};
use clientele::seed::seed;
use clientele::store::{AddressStore, ClientStore, OrderStore};

fn seeded_db() -> DbPool {
    let pool = create_pool(":memory:").expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    seed(&pool).expect("Failed to seed");
    pool
}

#[test]
fn seeding_produces_expected_row_counts() {
    let pool = seeded_db();

    assert_eq!(ClientStore::new(pool.clone()).count().unwrap(), 3);
    assert_eq!(OrderStore::new(pool.clone()).count().unwrap(), 5);
    assert_eq!(AddressStore::new(pool).count().unwrap(), 2);
}

#[test]
fn counter_cache_matches_live_order_count() {
    let pool = seeded_db();
    let clients = ClientStore::new(pool.clone());
    let orders = OrderStore::new(pool);

    let bob = clients.find(2).unwrap();
    assert_eq!(bob.name, "Bob");
    assert_eq!(bob.orders_count, 2);
    assert_eq!(orders.for_client(bob.id).unwrap().len(), 2);

    let carol = clients.find(3).unwrap();
    assert_eq!(carol.orders_count, 3);
    assert_eq!(orders.for_client(carol.id).unwrap().len(), 3);

    let alice = clients.find(1).unwrap();
    assert_eq!(alice.orders_count, 0);
}

#[test]
fn deleting_an_order_decrements_the_counter_cache() {
    let pool = seeded_db();
    let clients = ClientStore::new(pool.clone());
    let orders = OrderStore::new(pool);

    let bob_order = orders.for_client(2).unwrap()[0].id;
    assert!(orders.delete(bob_order).unwrap());

    let bob = clients.find(2).unwrap();
    assert_eq!(bob.orders_count, 1);
    assert_eq!(orders.for_client(2).unwrap().len(), 1);
}

#[test]
fn addresses_belong_to_the_first_two_clients() {
    let pool = seeded_db();
    let addresses = AddressStore::new(pool);

    assert_eq!(addresses.for_client(1).unwrap().unwrap().pref, "Osaka");
    assert_eq!(addresses.for_client(2).unwrap().unwrap().pref, "Tokyo");
    assert!(addresses.for_client(3).unwrap().is_none());
}
