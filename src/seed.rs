//! Fixture data for the showcase: three clients, two addresses, five
//! orders spread over the last four days.

use chrono::{Duration, Utc};
use tracing::info;

use crate::db::DbPool;
use crate::error::Result;
use crate::store::{AddressStore, ClientStore, OrderStore};

/// Row counts produced by [`seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub clients: usize,
    pub orders: usize,
    pub addresses: usize,
}

/// Populate a freshly migrated database with the demo fixture.
///
/// Orders go through [`OrderStore::create`] so the counter caches are live
/// from the start: Bob ends up with 2 orders, Carol with 3.
pub fn seed(pool: &DbPool) -> Result<SeedSummary> {
    let clients = ClientStore::new(pool.clone());
    let addresses = AddressStore::new(pool.clone());
    let orders = OrderStore::new(pool.clone());

    let alice = clients.create("Alice")?;
    let bob = clients.create("Bob")?;
    let carol = clients.create("Carol")?;

    addresses.create(alice.id, "Osaka")?;
    addresses.create(bob.id, "Tokyo")?;

    let now = Utc::now();
    orders.create(bob.id, 20, now)?;
    orders.create(bob.id, 50, now - Duration::days(2))?;
    orders.create(carol.id, 10, now - Duration::days(1))?;
    orders.create(carol.id, 50, now - Duration::days(2))?;
    orders.create(carol.id, 100, now - Duration::days(3))?;

    let summary = SeedSummary {
        clients: 3,
        orders: 5,
        addresses: 2,
    };
    info!(
        clients = summary.clients,
        orders = summary.orders,
        addresses = summary.addresses,
        "seeded demo fixture"
    );
    Ok(summary)
}
