use super::ProductStore;
use crate::error::StoreResult;
use crate::models::{NewProduct, Product};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, Product>,
}

/// In-memory store for tests and database-less runs. Ids are never reused.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductStore {
    table: Arc<RwLock<Table>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        let table = self.table.read().await;
        let mut products: Vec<Product> = table.rows.values().cloned().collect();
        // rows iterate in id order, and the sort is stable
        products.sort_by(|a, b| b.price.total_cmp(&a.price));
        Ok(products)
    }

    async fn find(&self, id: i32) -> StoreResult<Option<Product>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, input: NewProduct) -> StoreResult<Product> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let now = Utc::now();
        let product = Product {
            id: table.last_id,
            name: input.name,
            price: input.price,
            availability: true,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(product.id, product.clone());
        tracing::info!(product_id = product.id, "created product");
        Ok(product)
    }

    async fn save(&self, product: &Product) -> StoreResult<Option<Product>> {
        let mut table = self.table.write().await;
        let Some(row) = table.rows.get_mut(&product.id) else {
            return Ok(None);
        };
        row.name = product.name.clone();
        row.price = product.price;
        row.availability = product.availability;
        row.updated_at = Utc::now();
        tracing::info!(product_id = product.id, "saved product");
        Ok(Some(row.clone()))
    }

    async fn destroy(&self, id: i32) -> StoreResult<bool> {
        let removed = self.table.write().await.rows.remove(&id).is_some();
        if removed {
            tracing::info!(product_id = id, "deleted product");
        }
        Ok(removed)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, price: f64) -> NewProduct {
        NewProduct { name: name.into(), price }
    }

    #[tokio::test]
    async fn create_assigns_ids_and_defaults() {
        let store = InMemoryProductStore::new();
        let a = store.create(input("A", 10.0)).await.unwrap();
        let b = store.create(input("B", 20.0)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert!(a.availability);
        assert_eq!(store.find(2).await.unwrap(), Some(b));
    }

    #[tokio::test]
    async fn list_orders_by_price_desc_then_id() {
        let store = InMemoryProductStore::new();
        store.create(input("cheap", 5.0)).await.unwrap();
        store.create(input("dear", 300.0)).await.unwrap();
        store.create(input("mid", 50.0)).await.unwrap();
        store.create(input("mid too", 50.0)).await.unwrap();
        let names: Vec<_> = store.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["dear", "mid", "mid too", "cheap"]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = InMemoryProductStore::new();
        let first = store.create(input("A", 1.0)).await.unwrap();
        assert!(store.destroy(first.id).await.unwrap());
        assert!(!store.destroy(first.id).await.unwrap());
        let second = store.create(input("B", 1.0)).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.find(first.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_missing_record_is_none() {
        let store = InMemoryProductStore::new();
        let mut p = store.create(input("A", 1.0)).await.unwrap();
        p.availability = false;
        let saved = store.save(&p).await.unwrap().unwrap();
        assert!(!saved.availability);
        store.destroy(p.id).await.unwrap();
        assert_eq!(store.save(&p).await.unwrap(), None);
    }
}
