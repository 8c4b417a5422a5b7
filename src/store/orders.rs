//! Order store: counter-cached creation/deletion and per-day aggregation.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use super::{get_conn, last_insert_rowid, parse_ts};
use crate::db::model::{DailyTotalRow, NewOrderRow, OrderRow};
use crate::db::schema::{clients, orders};
use crate::db::DbPool;
use crate::domain::Order;
use crate::error::{Error, Result};

/// SQLite-backed order store.
pub struct OrderStore {
    pool: DbPool,
}

impl OrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn from_row(row: OrderRow) -> Result<Order> {
        Ok(Order {
            id: row.id,
            client_id: row.client_id,
            price: row.price,
            ordered_date: row.ordered_date.as_deref().map(parse_ts).transpose()?,
            created_at: parse_ts(&row.created_at)?,
            updated_at: parse_ts(&row.updated_at)?,
        })
    }

    /// Insert an order and bump the owner's counter cache in one immediate
    /// transaction. `placed_at` backdates `ordered_date` and `created_at`
    /// so seeded history lands on the intended days.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] (rolling back the insert) when
    /// `client_id` references no client.
    pub fn create(&self, client_id: i32, price: i32, placed_at: DateTime<Utc>) -> Result<Order> {
        let mut conn = get_conn(&self.pool)?;
        let now = Utc::now();
        let row = NewOrderRow {
            client_id,
            price,
            ordered_date: Some(placed_at.to_rfc3339()),
            created_at: placed_at.to_rfc3339(),
            updated_at: now.to_rfc3339(),
        };

        conn.immediate_transaction(|conn| {
            diesel::insert_into(orders::table).values(&row).execute(conn)?;
            let id = last_insert_rowid(conn)?;

            let touched = diesel::update(clients::table.find(client_id))
                .set(clients::orders_count.eq(clients::orders_count + 1))
                .execute(conn)?;
            if touched == 0 {
                return Err(Error::NotFound { entity: "client", id: client_id });
            }

            Ok(Order {
                id,
                client_id,
                price,
                ordered_date: Some(placed_at),
                created_at: placed_at,
                updated_at: now,
            })
        })
    }

    /// Delete an order and decrement the owner's counter cache in one
    /// immediate transaction. Returns whether a row was removed.
    pub fn delete(&self, id: i32) -> Result<bool> {
        let mut conn = get_conn(&self.pool)?;

        conn.immediate_transaction(|conn| {
            let row: Option<OrderRow> = orders::table
                .find(id)
                .select(OrderRow::as_select())
                .first(conn)
                .optional()?;
            let Some(row) = row else { return Ok(false) };

            diesel::delete(orders::table.find(id)).execute(conn)?;
            diesel::update(clients::table.find(row.client_id))
                .set(clients::orders_count.eq(clients::orders_count - 1))
                .execute(conn)?;

            Ok(true)
        })
    }

    pub fn count(&self) -> Result<i64> {
        let mut conn = get_conn(&self.pool)?;
        Ok(orders::table.count().get_result(&mut conn)?)
    }

    /// All orders placed by one client, oldest first.
    pub fn for_client(&self, client_id: i32) -> Result<Vec<Order>> {
        let mut conn = get_conn(&self.pool)?;

        let rows: Vec<OrderRow> = orders::table
            .filter(orders::client_id.eq(client_id))
            .order(orders::id.asc())
            .select(OrderRow::as_select())
            .load(&mut conn)?;

        rows.into_iter().map(Self::from_row).collect()
    }

    /// Per-day order totals, keeping only days whose sum exceeds
    /// `min_total`.
    pub fn daily_totals(&self, min_total: i64) -> Result<Vec<DailyTotalRow>> {
        let mut conn = get_conn(&self.pool)?;

        Ok(diesel::sql_query(
            "SELECT date(created_at) AS day, SUM(price) AS total_price \
             FROM orders GROUP BY date(created_at) \
             HAVING SUM(price) > ? ORDER BY day",
        )
        .bind::<BigInt, _>(min_total)
        .load(&mut conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, DbPool};
    use crate::store::ClientStore;

    fn setup_test_db() -> DbPool {
        let pool = create_pool(":memory:").expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        pool
    }

    #[test]
    fn create_maintains_counter_cache() {
        let pool = setup_test_db();
        let clients = ClientStore::new(pool.clone());
        let orders = OrderStore::new(pool);

        let bob = clients.create("Bob").unwrap();
        orders.create(bob.id, 20, Utc::now()).unwrap();
        orders.create(bob.id, 50, Utc::now()).unwrap();

        assert_eq!(clients.find(bob.id).unwrap().orders_count, 2);
    }

    #[test]
    fn create_for_missing_client_rolls_back() {
        let pool = setup_test_db();
        let orders = OrderStore::new(pool);

        let result = orders.create(42, 10, Utc::now());

        assert!(matches!(
            result,
            Err(Error::NotFound { entity: "client", id: 42 })
        ));
        assert_eq!(orders.count().unwrap(), 0);
    }

    #[test]
    fn delete_decrements_counter_cache() {
        let pool = setup_test_db();
        let clients = ClientStore::new(pool.clone());
        let orders = OrderStore::new(pool);

        let bob = clients.create("Bob").unwrap();
        let order = orders.create(bob.id, 20, Utc::now()).unwrap();

        assert!(orders.delete(order.id).unwrap());
        assert!(!orders.delete(order.id).unwrap()); // Already deleted
        assert_eq!(clients.find(bob.id).unwrap().orders_count, 0);
    }
}
