//! Handler for the `stats` command: per-day order totals.

use tabled::{Table, Tabled};

use crate::cli::output;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::error::Result;
use crate::seed;
use crate::store::OrderStore;

#[derive(Tabled)]
struct TotalLine {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Total")]
    total: i64,
}

/// Execute `stats`.
///
/// The database is memory-only and vanishes between runs, so the fixture
/// is re-seeded before aggregating.
pub fn execute(config: &Config, min_total: i64) -> Result<()> {
    let pool = create_pool(&config.database.url)?;
    run_migrations(&pool)?;
    seed::seed(&pool)?;

    let orders = OrderStore::new(pool);
    let totals = orders.daily_totals(min_total)?;

    output::section(&format!("Order totals per day (sum > {min_total})"));
    if totals.is_empty() {
        output::note("no day clears the floor");
        return Ok(());
    }

    let lines: Vec<TotalLine> = totals
        .into_iter()
        .map(|row| TotalLine {
            day: row.day,
            total: row.total_price,
        })
        .collect();
    output::table(&Table::new(lines).to_string());
    println!();
    Ok(())
}
