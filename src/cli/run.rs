//! Handler for the `run` command: the full query and locking showcase.
//!
//! Every section mirrors one relational pattern: lookups, batched
//! iteration, filters, projections, grouped aggregation, read-only
//! enforcement, optimistic and pessimistic locking, and joins. Errors
//! raised on purpose (missing row, stale write, read-only save) are
//! caught and printed rather than propagated.

use tabled::{Table, Tabled};
use tracing::debug;

use crate::cli::output;
use crate::config::Config;
use crate::db::{create_pool, run_migrations, DbPool};
use crate::domain::Client;
use crate::error::Result;
use crate::seed;
use crate::store::{AddressStore, ClientStore, OrderStore};

#[derive(Tabled)]
struct ClientLine {
    #[tabled(rename = "Id")]
    id: i32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Orders")]
    orders: i32,
    #[tabled(rename = "Version")]
    version: i32,
}

impl From<&Client> for ClientLine {
    fn from(c: &Client) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            orders: c.orders_count,
            version: c.lock_version,
        }
    }
}

fn print_clients(clients: &[Client]) {
    let lines: Vec<ClientLine> = clients.iter().map(Into::into).collect();
    output::table(&Table::new(lines).to_string());
}

/// Execute `run`.
pub fn execute(config: &Config) -> Result<()> {
    let pool = create_pool(&config.database.url)?;
    run_migrations(&pool)?;
    let summary = seed::seed(&pool)?;
    output::ok(&format!(
        "seeded {} clients, {} orders, {} addresses",
        summary.clients, summary.orders, summary.addresses
    ));

    lookups(&pool)?;
    batches(&pool)?;
    filters(&pool)?;
    projection(&pool)?;
    grouping(&pool)?;
    read_only(&pool)?;
    optimistic_locking(&pool)?;
    pessimistic_locking(&pool)?;
    joins(&pool)?;

    println!();
    Ok(())
}

fn lookups(pool: &DbPool) -> Result<()> {
    let clients = ClientStore::new(pool.clone());

    output::section("Lookups");
    output::key_value("find(1)", clients.find(1)?.name);
    if let Some(c) = clients.first()? {
        output::key_value("first", c.name);
    }
    if let Some(c) = clients.last()? {
        output::key_value("last", c.name);
    }

    let pair = clients.find_many(&[1, 2])?;
    let names: Vec<&str> = pair.iter().map(|c| c.name.as_str()).collect();
    output::key_value("find_many([1, 2])", names.join(", "));

    // Lookups by a missing id fail loudly instead of returning nothing.
    if let Err(e) = clients.find(100) {
        output::warn(&format!("find(100): {e}"));
    }
    if let Err(e) = clients.find_many(&[100]) {
        output::warn(&format!("find_many([100]): {e}"));
    }

    output::key_value("count", clients.count()?);
    print_clients(&clients.all()?);
    Ok(())
}

fn batches(pool: &DbPool) -> Result<()> {
    let clients = ClientStore::new(pool.clone());

    output::section("Batched iteration");
    let mut batch_log = Vec::new();
    let seen = clients.for_each_in_batches(2, |c| {
        debug!(id = c.id, name = %c.name, "visiting client");
        batch_log.push(c.id);
        Ok(())
    })?;
    output::key_value("batch size", 2);
    output::key_value("rows visited", seen);
    output::key_value("visit order", format!("{batch_log:?}"));
    Ok(())
}

fn filters(pool: &DbPool) -> Result<()> {
    let clients = ClientStore::new(pool.clone());

    output::section("Filters");
    output::note("clients with orders_count > 0:");
    print_clients(&clients.with_orders_above(0)?);
    output::note("clients with orders_count = 2:");
    print_clients(&clients.by_orders_count(2)?);
    Ok(())
}

fn projection(pool: &DbPool) -> Result<()> {
    let clients = ClientStore::new(pool.clone());

    output::section("Column projection");
    if let Some(digest) = clients.first_digest()? {
        output::key_value("digest.orders_count()", digest.orders_count()?);
        // The select only loaded orders_count; name was never fetched.
        if let Err(e) = digest.name() {
            output::warn(&format!("digest.name(): {e}"));
        }
    }
    Ok(())
}

fn grouping(pool: &DbPool) -> Result<()> {
    let clients = ClientStore::new(pool.clone());
    let orders = OrderStore::new(pool.clone());

    output::section("Grouping and aggregation");
    for row in clients.signups_by_day()? {
        output::key_value(&row.day, format!("{} signups", row.signups));
    }
    output::note("order totals per day (HAVING sum > 10):");
    for row in orders.daily_totals(10)? {
        output::key_value(&row.day, row.total_price);
    }
    Ok(())
}

fn read_only(pool: &DbPool) -> Result<()> {
    let clients = ClientStore::new(pool.clone());

    output::section("Read-only records");
    if let Some(mut client) = clients.first()? {
        client.mark_readonly();
        client.name = "hoge".into();
        match clients.save(&mut client) {
            Err(e) => output::warn(&format!("save: {e}")),
            Ok(()) => output::ok("save succeeded unexpectedly"),
        }
    }
    Ok(())
}

fn optimistic_locking(pool: &DbPool) -> Result<()> {
    let clients = ClientStore::new(pool.clone());

    output::section("Optimistic locking");
    let mut copy_a = clients.find(1)?;
    let mut copy_b = clients.find(1)?;

    copy_a.name = "Michael".into();
    clients.save(&mut copy_a)?;
    output::ok(&format!(
        "first save wins: name = {}, lock_version = {}",
        copy_a.name, copy_a.lock_version
    ));

    copy_b.name = "should fail".into();
    match clients.save(&mut copy_b) {
        Err(e) => output::warn(&format!("second save: {e}")),
        Ok(()) => output::ok("second save succeeded unexpectedly"),
    }
    Ok(())
}

fn pessimistic_locking(pool: &DbPool) -> Result<()> {
    let addresses = AddressStore::new(pool.clone());

    output::section("Pessimistic locking");
    if let Some(address) = addresses.first()? {
        let moved = addresses.update_pref(address.id, "Hokkaido")?;
        output::key_value("update_pref", &moved.pref);

        let views = addresses.increment_views(address.id)?;
        output::key_value("increment_views", views);
        let views = addresses.increment_views(address.id)?;
        output::key_value("increment_views", views);
    }
    Ok(())
}

fn joins(pool: &DbPool) -> Result<()> {
    let clients = ClientStore::new(pool.clone());

    output::section("Joins");
    output::note("explicit LEFT OUTER JOIN, pref = 'Osaka':");
    print_clients(&clients.find_by_pref_outer("Osaka")?);
    output::note("join through the declared association:");
    print_clients(&clients.find_by_pref("Osaka")?);
    Ok(())
}
