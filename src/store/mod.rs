//! Record store: persistence contract for products and its implementations.

mod memory;
mod postgres;

pub use memory::InMemoryProductStore;
pub use postgres::{connect, ensure_database_exists, ensure_schema, PgProductStore};

use crate::error::StoreResult;
use crate::models::{NewProduct, Product};
use async_trait::async_trait;

/// Persistence contract the handlers rely on.
///
/// Lookups return `None` for a missing id. No method holds a lock across calls,
/// so a find followed by a save is not atomic against other writers.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, highest price first (ties by ascending id).
    async fn list(&self) -> StoreResult<Vec<Product>>;

    async fn find(&self, id: i32) -> StoreResult<Option<Product>>;

    /// Insert with a fresh id and `availability = true`.
    async fn create(&self, input: NewProduct) -> StoreResult<Product>;

    /// Persist name, price and availability of an existing record.
    /// Returns `None` if the record no longer exists.
    async fn save(&self, product: &Product) -> StoreResult<Option<Product>>;

    /// Remove by id. Returns whether a record was removed.
    async fn destroy(&self, id: i32) -> StoreResult<bool>;

    /// Round trip used by the readiness probe.
    async fn ping(&self) -> StoreResult<()>;
}
