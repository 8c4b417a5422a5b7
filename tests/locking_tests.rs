//! Tests for optimistic locking, read-only enforcement, and locked
//! address updates.

use clientele::db::{create_pool, run_migrations, DbPool};
use clientele::error::Error;
use clientele::seed::seed;
use clientele::store::{AddressStore, ClientStore};

fn seeded_db() -> DbPool {
    let pool = create_pool(":memory:").expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    seed(&pool).expect("Failed to seed");
    pool
}

#[test]
fn stale_copy_cannot_overwrite_a_newer_save() {
    let clients = ClientStore::new(seeded_db());

    let mut copy_a = clients.find(1).unwrap();
    let mut copy_b = clients.find(1).unwrap();

    copy_a.name = "Michael".into();
    clients.save(&mut copy_a).unwrap();
    assert_eq!(copy_a.lock_version, 1);

    copy_b.name = "should fail".into();
    assert!(matches!(
        clients.save(&mut copy_b),
        Err(Error::Stale { entity: "client", id: 1 })
    ));

    // The winning write is what persisted.
    let reloaded = clients.find(1).unwrap();
    assert_eq!(reloaded.name, "Michael");
    assert_eq!(reloaded.lock_version, 1);
}

#[test]
fn refreshed_copy_can_save_after_a_conflict() {
    let clients = ClientStore::new(seeded_db());

    let mut copy_a = clients.find(1).unwrap();
    copy_a.name = "Michael".into();
    clients.save(&mut copy_a).unwrap();

    let mut fresh = clients.find(1).unwrap();
    fresh.name = "Mike".into();
    clients.save(&mut fresh).unwrap();

    let reloaded = clients.find(1).unwrap();
    assert_eq!(reloaded.name, "Mike");
    assert_eq!(reloaded.lock_version, 2);
}

#[test]
fn read_only_records_refuse_to_save() {
    let clients = ClientStore::new(seeded_db());

    let mut client = clients.first().unwrap().unwrap();
    client.mark_readonly();
    client.name = "hoge".into();

    assert!(matches!(
        clients.save(&mut client),
        Err(Error::ReadOnly { entity: "client" })
    ));

    // Nothing was written.
    let reloaded = clients.find(client.id).unwrap();
    assert_eq!(reloaded.name, "Alice");
    assert_eq!(reloaded.lock_version, 0);
}

#[test]
fn update_pref_rewrites_under_the_write_lock() {
    let addresses = AddressStore::new(seeded_db());

    let first = addresses.first().unwrap().unwrap();
    assert_eq!(first.pref, "Osaka");

    let moved = addresses.update_pref(first.id, "Hokkaido").unwrap();
    assert_eq!(moved.pref, "Hokkaido");
    assert_eq!(addresses.first().unwrap().unwrap().pref, "Hokkaido");
}

#[test]
fn increment_views_counts_up_from_zero() {
    let addresses = AddressStore::new(seeded_db());

    let first = addresses.first().unwrap().unwrap();
    assert_eq!(first.views, 0);

    assert_eq!(addresses.increment_views(first.id).unwrap(), 1);
    assert_eq!(addresses.increment_views(first.id).unwrap(), 2);
    assert_eq!(addresses.first().unwrap().unwrap().views, 2);
}
