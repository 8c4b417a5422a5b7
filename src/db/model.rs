//! Database model types for Diesel ORM.

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};

use super::schema::{addresses, clients, orders};

/// Database row for a client.
///
/// Derives `QueryableByName` so raw `sql_query` joins selecting `clients.*`
/// can load into the same type.
#[derive(Queryable, Selectable, QueryableByName, Debug, Clone)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ClientRow {
    pub id: i32,
    pub name: String,
    pub orders_count: i32,
    pub lock_version: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Database row for a client (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = clients)]
pub struct NewClientRow {
    pub name: String,
    pub orders_count: i32,
    pub lock_version: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Database row for an order.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderRow {
    pub id: i32,
    pub client_id: i32,
    pub price: i32,
    pub ordered_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Database row for an order (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub client_id: i32,
    pub price: i32,
    pub ordered_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Database row for an address.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = addresses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AddressRow {
    pub id: i32,
    pub client_id: i32,
    pub pref: String,
    pub views: i32,
}

/// Database row for an address (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = addresses)]
pub struct NewAddressRow {
    pub client_id: i32,
    pub pref: String,
    pub views: i32,
}

/// Result row for `date(created_at)` groupings over clients.
#[derive(QueryableByName, Debug, Clone)]
pub struct SignupRow {
    #[diesel(sql_type = Text)]
    pub day: String,
    #[diesel(sql_type = BigInt)]
    pub signups: i64,
}

/// Result row for the per-day order totals aggregation.
#[derive(QueryableByName, Debug, Clone)]
pub struct DailyTotalRow {
    #[diesel(sql_type = Text)]
    pub day: String,
    #[diesel(sql_type = BigInt)]
    pub total_price: i64,
}
