//! Clientele - a client/order bookkeeping showcase over SQLite.
//!
//! A small data layer built on Diesel that exercises the usual relational
//! patterns against an in-memory SQLite database: primary-key and batched
//! lookups, conditional filters, column projections, grouped aggregation
//! with HAVING, join queries, a counter cache, and both optimistic
//! (version-guarded) and pessimistic (immediate-transaction) locking.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`db`] - Connection pool, embedded migrations, Diesel schema/rows
//! - [`domain`] - `Client`, `Order`, `Address`, and partial projections
//! - [`store`] - Typed stores implementing the query and locking policies
//! - [`seed`] - Demo fixture (Alice/Bob/Carol and their orders)
//! - [`error`] - Error types for the crate
//! - [`cli`] - The `clientele` command-line surface
//!
//! # Example
//!
//! ```no_run
//! use clientele::db::{create_pool, run_migrations};
//! use clientele::store::ClientStore;
//!
//! let pool = create_pool(":memory:").unwrap();
//! run_migrations(&pool).unwrap();
//! clientele::seed::seed(&pool).unwrap();
//!
//! let clients = ClientStore::new(pool);
//! let bob = clients.find(2).unwrap();
//! assert_eq!(bob.orders_count, 2);
//! ```

pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod seed;
pub mod store;
