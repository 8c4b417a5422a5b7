//! SQLite-backed stores built on Diesel.
//!
//! Each store owns a pool handle and maps between database rows and the
//! domain types in [`crate::domain`]. Locking policies live here: the
//! client store implements version-guarded (optimistic) saves, and the
//! order/address stores wrap their multi-statement writes in immediate
//! transactions, SQLite's equivalent of taking the write lock up front.

pub mod addresses;
pub mod clients;
pub mod orders;

pub use addresses::AddressStore;
pub use clients::ClientStore;
pub use orders::OrderStore;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::SqliteConnection;

use crate::db::DbPool;
use crate::error::{Error, Result};

pub(crate) type PooledConn = PooledConnection<ConnectionManager<SqliteConnection>>;

pub(crate) fn get_conn(pool: &DbPool) -> Result<PooledConn> {
    pool.get().map_err(|e| Error::Connection(e.to_string()))
}

pub(crate) fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Parse(e.to_string()))
}

/// Rowid of the most recent insert on this connection. Only valid inside
/// the same transaction as the insert it refers to.
pub(crate) fn last_insert_rowid(conn: &mut SqliteConnection) -> Result<i32> {
    use diesel::dsl::sql;
    use diesel::sql_types::Integer;

    diesel::select(sql::<Integer>("last_insert_rowid()"))
        .get_result::<i32>(conn)
        .map_err(Into::into)
}
