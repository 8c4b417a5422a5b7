//! Client store: lookups, filters, projections, and optimistic locking.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_types::Text;

use super::{get_conn, last_insert_rowid, parse_ts};
use crate::db::model::{ClientRow, NewClientRow, SignupRow};
use crate::db::schema::{addresses, clients};
use crate::db::DbPool;
use crate::domain::{Client, ClientDigest};
use crate::error::{Error, Result};

/// SQLite-backed client store.
pub struct ClientStore {
    pool: DbPool,
}

impl ClientStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn from_row(row: ClientRow) -> Result<Client> {
        Ok(Client::new(
            row.id,
            row.name,
            row.orders_count,
            row.lock_version,
            parse_ts(&row.created_at)?,
            parse_ts(&row.updated_at)?,
        ))
    }

    /// Insert a new client with zeroed counters.
    pub fn create(&self, name: &str) -> Result<Client> {
        let mut conn = get_conn(&self.pool)?;
        let now = Utc::now();
        let row = NewClientRow {
            name: name.to_string(),
            orders_count: 0,
            lock_version: 0,
            created_at: now.to_rfc3339(),
            updated_at: now.to_rfc3339(),
        };

        let id = conn.immediate_transaction(|conn| {
            diesel::insert_into(clients::table).values(&row).execute(conn)?;
            last_insert_rowid(conn)
        })?;

        Ok(Client::new(id, name.to_string(), 0, 0, now, now))
    }

    /// Look up a client by primary key.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] when no row matches, never an empty
    /// result.
    pub fn find(&self, id: i32) -> Result<Client> {
        let mut conn = get_conn(&self.pool)?;

        let row: Option<ClientRow> = clients::table
            .find(id)
            .select(ClientRow::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(Self::from_row)
            .transpose()?
            .ok_or(Error::NotFound { entity: "client", id })
    }

    /// Look up several clients by primary key. All ids must exist.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] naming the first missing id.
    pub fn find_many(&self, ids: &[i32]) -> Result<Vec<Client>> {
        let mut conn = get_conn(&self.pool)?;

        let rows: Vec<ClientRow> = clients::table
            .filter(clients::id.eq_any(ids))
            .order(clients::id.asc())
            .select(ClientRow::as_select())
            .load(&mut conn)?;

        if rows.len() != ids.len() {
            let loaded: Vec<i32> = rows.iter().map(|r| r.id).collect();
            if let Some(missing) = ids.iter().find(|id| !loaded.contains(id)) {
                return Err(Error::NotFound { entity: "client", id: *missing });
            }
        }

        rows.into_iter().map(Self::from_row).collect()
    }

    /// First client in primary-key order, if any.
    pub fn first(&self) -> Result<Option<Client>> {
        let mut conn = get_conn(&self.pool)?;

        let row: Option<ClientRow> = clients::table
            .order(clients::id.asc())
            .select(ClientRow::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(Self::from_row).transpose()
    }

    /// Last client in primary-key order, if any.
    pub fn last(&self) -> Result<Option<Client>> {
        let mut conn = get_conn(&self.pool)?;

        let row: Option<ClientRow> = clients::table
            .order(clients::id.desc())
            .select(ClientRow::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(Self::from_row).transpose()
    }

    pub fn all(&self) -> Result<Vec<Client>> {
        let mut conn = get_conn(&self.pool)?;

        let rows: Vec<ClientRow> = clients::table
            .order(clients::id.asc())
            .select(ClientRow::as_select())
            .load(&mut conn)?;

        rows.into_iter().map(Self::from_row).collect()
    }

    pub fn count(&self) -> Result<i64> {
        let mut conn = get_conn(&self.pool)?;
        Ok(clients::table.count().get_result(&mut conn)?)
    }

    /// Visit every client in primary-key order, loading `batch_size` rows
    /// at a time via keyset pagination. Returns the number of rows seen.
    pub fn for_each_in_batches<F>(&self, batch_size: i64, mut f: F) -> Result<usize>
    where
        F: FnMut(&Client) -> Result<()>,
    {
        let batch_size = batch_size.max(1);
        let mut conn = get_conn(&self.pool)?;
        let mut last_id = 0;
        let mut seen = 0;

        loop {
            let rows: Vec<ClientRow> = clients::table
                .filter(clients::id.gt(last_id))
                .order(clients::id.asc())
                .limit(batch_size)
                .select(ClientRow::as_select())
                .load(&mut conn)?;

            let Some(tail) = rows.last() else { break };
            last_id = tail.id;

            for row in rows {
                let client = Self::from_row(row)?;
                f(&client)?;
                seen += 1;
            }
        }

        Ok(seen)
    }

    /// Clients whose counter cache exceeds `min` orders.
    pub fn with_orders_above(&self, min: i32) -> Result<Vec<Client>> {
        let mut conn = get_conn(&self.pool)?;

        let rows: Vec<ClientRow> = clients::table
            .filter(clients::orders_count.gt(min))
            .order(clients::id.asc())
            .select(ClientRow::as_select())
            .load(&mut conn)?;

        rows.into_iter().map(Self::from_row).collect()
    }

    /// Clients with exactly `n` orders according to the counter cache.
    pub fn by_orders_count(&self, n: i32) -> Result<Vec<Client>> {
        let mut conn = get_conn(&self.pool)?;

        let rows: Vec<ClientRow> = clients::table
            .filter(clients::orders_count.eq(n))
            .order(clients::id.asc())
            .select(ClientRow::as_select())
            .load(&mut conn)?;

        rows.into_iter().map(Self::from_row).collect()
    }

    /// First client loaded through an `orders_count`-only projection.
    ///
    /// The digest's other accessors fail with
    /// [`Error::MissingAttribute`] since those columns were never read.
    pub fn first_digest(&self) -> Result<Option<ClientDigest>> {
        let mut conn = get_conn(&self.pool)?;

        let orders_count: Option<i32> = clients::table
            .order(clients::id.asc())
            .select(clients::orders_count)
            .first(&mut conn)
            .optional()?;

        Ok(orders_count.map(|orders_count| ClientDigest {
            name: None,
            orders_count: Some(orders_count),
        }))
    }

    /// Signup counts grouped by `date(created_at)`.
    pub fn signups_by_day(&self) -> Result<Vec<SignupRow>> {
        let mut conn = get_conn(&self.pool)?;

        Ok(diesel::sql_query(
            "SELECT date(created_at) AS day, COUNT(*) AS signups \
             FROM clients GROUP BY date(created_at) ORDER BY day",
        )
        .load(&mut conn)?)
    }

    /// Persist in-memory changes to a loaded client.
    ///
    /// The UPDATE is guarded by the `lock_version` the record was loaded
    /// with; if another writer got there first, zero rows match and the
    /// write is rejected as stale. On success the version is bumped both
    /// in the row and in `client`.
    ///
    /// # Errors
    /// [`Error::ReadOnly`] for records marked read-only,
    /// [`Error::Stale`] when the guarded UPDATE matches no row.
    pub fn save(&self, client: &mut Client) -> Result<()> {
        if client.is_readonly() {
            return Err(Error::ReadOnly { entity: "client" });
        }

        let mut conn = get_conn(&self.pool)?;
        let now = Utc::now();

        let updated = diesel::update(
            clients::table
                .filter(clients::id.eq(client.id))
                .filter(clients::lock_version.eq(client.lock_version)),
        )
        .set((
            clients::name.eq(&client.name),
            clients::orders_count.eq(client.orders_count),
            clients::lock_version.eq(client.lock_version + 1),
            clients::updated_at.eq(now.to_rfc3339()),
        ))
        .execute(&mut conn)?;

        if updated == 0 {
            return Err(Error::Stale { entity: "client", id: client.id });
        }

        client.lock_version += 1;
        client.updated_at = now;
        Ok(())
    }

    /// Clients whose address matches `pref`, joined through the declared
    /// association.
    pub fn find_by_pref(&self, pref: &str) -> Result<Vec<Client>> {
        let mut conn = get_conn(&self.pool)?;

        let rows: Vec<ClientRow> = clients::table
            .inner_join(addresses::table)
            .filter(addresses::pref.eq(pref))
            .order(clients::id.asc())
            .select(ClientRow::as_select())
            .load(&mut conn)?;

        rows.into_iter().map(Self::from_row).collect()
    }

    /// Same result via an explicit LEFT OUTER JOIN written as raw SQL.
    pub fn find_by_pref_outer(&self, pref: &str) -> Result<Vec<Client>> {
        let mut conn = get_conn(&self.pool)?;

        let rows: Vec<ClientRow> = diesel::sql_query(
            "SELECT clients.* FROM clients \
             LEFT OUTER JOIN addresses ON addresses.client_id = clients.id \
             WHERE addresses.pref = ? ORDER BY clients.id",
        )
        .bind::<Text, _>(pref)
        .load(&mut conn)?;

        rows.into_iter().map(Self::from_row).collect()
    }
}
