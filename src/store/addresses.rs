//! Address store: has-one lookups and lock-holding counter updates.

use diesel::prelude::*;

use super::{get_conn, last_insert_rowid};
use crate::db::model::{AddressRow, NewAddressRow};
use crate::db::schema::addresses;
use crate::db::DbPool;
use crate::domain::Address;
use crate::error::{Error, Result};

/// SQLite-backed address store.
pub struct AddressStore {
    pool: DbPool,
}

impl AddressStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn from_row(row: AddressRow) -> Address {
        Address {
            id: row.id,
            client_id: row.client_id,
            pref: row.pref,
            views: row.views,
        }
    }

    pub fn create(&self, client_id: i32, pref: &str) -> Result<Address> {
        let mut conn = get_conn(&self.pool)?;
        let row = NewAddressRow {
            client_id,
            pref: pref.to_string(),
            views: 0,
        };

        let id = conn.immediate_transaction(|conn| {
            diesel::insert_into(addresses::table).values(&row).execute(conn)?;
            last_insert_rowid(conn)
        })?;

        Ok(Address {
            id,
            client_id,
            pref: pref.to_string(),
            views: 0,
        })
    }

    pub fn first(&self) -> Result<Option<Address>> {
        let mut conn = get_conn(&self.pool)?;

        let row: Option<AddressRow> = addresses::table
            .order(addresses::id.asc())
            .select(AddressRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Self::from_row))
    }

    /// The has-one side of the client association.
    pub fn for_client(&self, client_id: i32) -> Result<Option<Address>> {
        let mut conn = get_conn(&self.pool)?;

        let row: Option<AddressRow> = addresses::table
            .filter(addresses::client_id.eq(client_id))
            .order(addresses::id.asc())
            .select(AddressRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Self::from_row))
    }

    pub fn count(&self) -> Result<i64> {
        let mut conn = get_conn(&self.pool)?;
        Ok(addresses::table.count().get_result(&mut conn)?)
    }

    /// Rewrite `pref` while holding the database write lock for the whole
    /// transaction. SQLite has no row-level `SELECT ... FOR UPDATE`; an
    /// immediate transaction serializes concurrent writers the same way.
    pub fn update_pref(&self, id: i32, pref: &str) -> Result<Address> {
        let mut conn = get_conn(&self.pool)?;

        conn.immediate_transaction(|conn| {
            let touched = diesel::update(addresses::table.find(id))
                .set(addresses::pref.eq(pref))
                .execute(conn)?;
            if touched == 0 {
                return Err(Error::NotFound { entity: "address", id });
            }

            let row: AddressRow = addresses::table
                .find(id)
                .select(AddressRow::as_select())
                .first(conn)?;
            Ok(Self::from_row(row))
        })
    }

    /// Increment the view counter under the write lock and return the new
    /// value.
    pub fn increment_views(&self, id: i32) -> Result<i32> {
        let mut conn = get_conn(&self.pool)?;

        conn.immediate_transaction(|conn| {
            let touched = diesel::update(addresses::table.find(id))
                .set(addresses::views.eq(addresses::views + 1))
                .execute(conn)?;
            if touched == 0 {
                return Err(Error::NotFound { entity: "address", id });
            }

            Ok(addresses::table
                .find(id)
                .select(addresses::views)
                .first(conn)?)
        })
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
    fn create_and_fetch_for_client() {
        let pool = setup_test_db();
        let clients = ClientStore::new(pool.clone());
        let store = AddressStore::new(pool);

        let alice = clients.create("Alice").unwrap();
        store.create(alice.id, "Osaka").unwrap();

        let address = store.for_client(alice.id).unwrap().unwrap();
        assert_eq!(address.pref, "Osaka");
        assert_eq!(address.views, 0);
    }

    #[test]
    fn increment_views_returns_new_value() {
        let pool = setup_test_db();
        let clients = ClientStore::new(pool.clone());
        let store = AddressStore::new(pool);

        let alice = clients.create("Alice").unwrap();
        let address = store.create(alice.id, "Osaka").unwrap();

        assert_eq!(store.increment_views(address.id).unwrap(), 1);
        assert_eq!(store.increment_views(address.id).unwrap(), 2);
    }

    #[test]
    fn update_pref_on_missing_row_is_not_found() {
        let store = AddressStore::new(setup_test_db());

        assert!(matches!(
            store.update_pref(9, "Hokkaido"),
            Err(Error::NotFound { entity: "address", id: 9 })
        ));
    }
}
