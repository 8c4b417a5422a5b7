//! Domain types mapped from database rows by the stores.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// A client who owns zero-or-one address and zero-or-many orders.
///
/// `orders_count` is a counter cache kept in sync by the order store.
/// `lock_version` backs optimistic locking: it is compared and bumped on
/// every save, and a mismatch rejects the write as stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub orders_count: i32,
    pub lock_version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    readonly: bool,
}

impl Client {
    pub(crate) fn new(
        id: i32,
        name: String,
        orders_count: i32,
        lock_version: i32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            orders_count,
            lock_version,
            created_at,
            updated_at,
            readonly: false,
        }
    }

    /// Mark this loaded record read-only. Saving it afterwards fails with
    /// [`Error::ReadOnly`] instead of silently writing.
    pub fn mark_readonly(&mut self) {
        self.readonly = true;
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }
}

/// An order placed by a client.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub client_id: i32,
    pub price: i32,
    pub ordered_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A client's address. `pref` is a region name, `views` a plain counter.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub id: i32,
    pub client_id: i32,
    pub pref: String,
    pub views: i32,
}

/// A partial client loaded by a column projection.
///
/// Columns excluded from the select are `None`; their accessors fail with
/// [`Error::MissingAttribute`] rather than pretending the data was loaded.
#[derive(Debug, Clone, Default)]
pub struct ClientDigest {
    pub(crate) name: Option<String>,
    pub(crate) orders_count: Option<i32>,
}

impl ClientDigest {
    pub fn name(&self) -> Result<&str> {
        self.name
            .as_deref()
            .ok_or(Error::MissingAttribute { attribute: "name" })
    }

    pub fn orders_count(&self) -> Result<i32> {
        self.orders_count
            .ok_or(Error::MissingAttribute { attribute: "orders_count" })
    }
}
