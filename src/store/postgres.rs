//! PostgreSQL record store, database bootstrap and `products` DDL.

use super::ProductStore;
use crate::error::{AppError, ConfigError, StoreError, StoreResult};
use crate::models::{NewProduct, Product};
use crate::settings::Settings;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

const COLUMNS: &str = "id, name, price, availability, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        let sql = format!("SELECT {} FROM products ORDER BY price DESC, id ASC", COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find(&self, id: i32) -> StoreResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, input: NewProduct) -> StoreResult<Product> {
        let sql = format!(
            "INSERT INTO products (name, price) VALUES ($1, $2) RETURNING {}",
            COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&input.name)
            .bind(input.price)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(product_id = product.id, "created product");
        Ok(product)
    }

    async fn save(&self, product: &Product) -> StoreResult<Option<Product>> {
        let sql = format!(
            r#"
            UPDATE products
            SET name = $2, price = $3, availability = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        );
        tracing::debug!(sql = %sql, id = product.id, "query");
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(product.id)
            .bind(&product.name)
            .bind(product.price)
            .bind(product.availability)
            .fetch_optional(&self.pool)
            .await?;
        if row.is_some() {
            tracing::info!(product_id = product.id, "saved product");
        }
        Ok(row)
    }

    async fn destroy(&self, id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        let removed = result.rows_affected() > 0;
        if removed {
            tracing::info!(product_id = id, "deleted product");
        }
        Ok(removed)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Create the `products` table if it does not exist. `SERIAL` ids are never handed out twice.
pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            price DOUBLE PRECISION NOT NULL CHECK (price > 0),
            availability BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Create the database named in `database_url` if missing, connecting through the `postgres` database.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let Some((admin, db_name)) = admin_options(database_url)? else {
        return Ok(());
    };
    let mut conn = admin.connect().await.map_err(StoreError::from)?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await
        .map_err(StoreError::from)?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await
            .map_err(StoreError::from)?;
    }
    Ok(())
}

/// Build the PostgreSQL store from settings.
///
/// With `db_strict_startup` any connection failure is returned. Otherwise the
/// failure is logged and a lazily connecting pool is used, so store-backed
/// requests fail with 500 until the database is reachable.
pub async fn connect(settings: &Settings) -> Result<PgProductStore, AppError> {
    let options = PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .acquire_timeout(settings.db_acquire_timeout);

    let eager = async {
        ensure_database_exists(&settings.database_url).await?;
        let pool = options.clone().connect(&settings.database_url).await.map_err(StoreError::from)?;
        ensure_schema(&pool).await?;
        Ok::<_, AppError>(pool)
    };

    match eager.await {
        Ok(pool) => {
            tracing::info!("connected to the database");
            Ok(PgProductStore::new(pool))
        }
        Err(e) if settings.db_strict_startup => Err(e),
        Err(e) => {
            tracing::error!(error = %e, "could not connect to the database, continuing with a lazy pool");
            let pool = options
                .connect_lazy(&settings.database_url)
                .map_err(|e| ConfigError::DatabaseUrl(e.to_string()))?;
            Ok(PgProductStore::new(pool))
        }
    }
}

/// Options for the `postgres` maintenance database plus the target database name.
/// Host, socket and TLS settings from the URL carry over. `None` when the URL
/// names no database or already targets `postgres`.
fn admin_options(url: &str) -> Result<Option<(PgConnectOptions, String)>, ConfigError> {
    let options = PgConnectOptions::from_str(url).map_err(|e| ConfigError::DatabaseUrl(e.to_string()))?;
    let db_name = match options.get_database().map(str::trim) {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(None),
    };
    Ok(Some((options.database("postgres"), db_name)))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_options_switch_to_the_postgres_database() {
        let (admin, name) = admin_options("postgres://u:p@localhost:5432/productos?sslmode=disable")
            .unwrap()
            .unwrap();
        assert_eq!(name, "productos");
        assert_eq!(admin.get_database(), Some("postgres"));
        assert_eq!(admin.get_host(), "localhost");
        assert_eq!(admin.get_port(), 5432);
    }

    #[test]
    fn slashes_in_the_query_do_not_move_the_database_name() {
        let (admin, name) = admin_options("postgres:///productos?host=/var/run/postgresql")
            .unwrap()
            .unwrap();
        assert_eq!(name, "productos");
        assert_eq!(admin.get_database(), Some("postgres"));
        assert_eq!(
            admin.get_socket().map(|p| p.to_string_lossy().into_owned()),
            Some("/var/run/postgresql".to_string())
        );

        let (_, name) = admin_options("postgres://u@db/productos?sslrootcert=/etc/ca.pem")
            .unwrap()
            .unwrap();
        assert_eq!(name, "productos");
    }

    #[test]
    fn maintenance_database_needs_no_bootstrap() {
        assert!(admin_options("postgres://u@localhost/postgres").unwrap().is_none());
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("shop"), "\"shop\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
