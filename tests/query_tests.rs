//! Tests for lookups, filters, projections, grouping, and joins.

use clientele::db::{create_pool, run_migrations, DbPool};
use clientele::error::Error;
use clientele::seed::seed;
use clientele::store::{ClientStore, OrderStore};

fn seeded_db() -> DbPool {
    let pool = create_pool(":memory:").expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    seed(&pool).expect("Failed to seed");
    pool
}

#[test]
fn find_on_missing_id_fails_loudly() {
    let clients = ClientStore::new(seeded_db());

    assert!(matches!(
        clients.find(100),
        Err(Error::NotFound { entity: "client", id: 100 })
    ));
}

#[test]
fn find_many_names_the_missing_id() {
    let clients = ClientStore::new(seeded_db());

    let pair = clients.find_many(&[1, 2]).unwrap();
    assert_eq!(pair.len(), 2);
    assert_eq!(pair[0].name, "Alice");

    assert!(matches!(
        clients.find_many(&[1, 100]),
        Err(Error::NotFound { entity: "client", id: 100 })
    ));
}

#[test]
fn first_and_last_follow_primary_key_order() {
    let clients = ClientStore::new(seeded_db());

    assert_eq!(clients.first().unwrap().unwrap().name, "Alice");
    assert_eq!(clients.last().unwrap().unwrap().name, "Carol");
}

#[test]
fn batched_iteration_visits_every_client_once() {
    let clients = ClientStore::new(seeded_db());

    let mut visited = Vec::new();
    let seen = clients
        .for_each_in_batches(2, |c| {
            visited.push(c.id);
            Ok(())
        })
        .unwrap();

    assert_eq!(seen, 3);
    assert_eq!(visited, vec![1, 2, 3]);
}

#[test]
fn counter_cache_filters_select_the_right_clients() {
    let clients = ClientStore::new(seeded_db());

    let active: Vec<String> = clients
        .with_orders_above(0)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(active, vec!["Bob", "Carol"]);

    let two_orders = clients.by_orders_count(2).unwrap();
    assert_eq!(two_orders.len(), 1);
    assert_eq!(two_orders[0].name, "Bob");
}

#[test]
fn projection_withholds_unselected_columns() {
    let clients = ClientStore::new(seeded_db());

    let digest = clients.first_digest().unwrap().unwrap();
    assert_eq!(digest.orders_count().unwrap(), 0); // Alice has no orders

    assert!(matches!(
        digest.name(),
        Err(Error::MissingAttribute { attribute: "name" })
    ));
}

#[test]
fn signups_group_onto_a_single_day() {
    let clients = ClientStore::new(seeded_db());

    let rows = clients.signups_by_day().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].signups, 3);
}

#[test]
fn daily_totals_respect_the_having_floor() {
    let orders = OrderStore::new(seeded_db());

    // Fixture days: today 20, 1d ago 10, 2d ago 100, 3d ago 100.
    let all_days = orders.daily_totals(0).unwrap();
    assert_eq!(all_days.len(), 4);
    assert_eq!(all_days.iter().map(|r| r.total_price).sum::<i64>(), 230);

    let over_ten = orders.daily_totals(10).unwrap();
    assert_eq!(over_ten.len(), 3);
    assert!(over_ten.iter().all(|r| r.total_price > 10));
}

#[test]
fn osaka_join_returns_exactly_alice() {
    let clients = ClientStore::new(seeded_db());

    let via_association = clients.find_by_pref("Osaka").unwrap();
    assert_eq!(via_association.len(), 1);
    assert_eq!(via_association[0].name, "Alice");

    let via_raw_sql = clients.find_by_pref_outer("Osaka").unwrap();
    assert_eq!(via_raw_sql.len(), 1);
    assert_eq!(via_raw_sql[0].name, "Alice");

    assert!(clients.find_by_pref("Hokkaido").unwrap().is_empty());
}
