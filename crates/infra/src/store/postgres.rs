//! Postgres-backed storage implementation.
//!
//! Each collection is a flat table keyed by a `TEXT` id. There are no foreign
//! keys: inventory lines may reference deleted products, and the warehouse
//! cascade is performed by the caller in two separate statements.
//!
//! Aggregations run in the database (`SUM`, `LEFT JOIN`, `GROUP BY`) so raw
//! rows never leave it.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|-----------------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Database (other) | any other | `Backend` |
//! | PoolClosed / other | N/A | `Backend` |

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use stockyard_catalog::{Product, ProductFilter, ProductId, Warehouse, WarehouseId};
use stockyard_core::{DomainError, Id};
use stockyard_inventory::{InventoryItem, InventoryItemId};

use super::{
    CapacityTotals, CategoryCount, InventoryStore, ProductStore, StatisticsStore, Storage,
    StoreError, StoreResult, ValuationLine, WarehouseStore,
};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        price DOUBLE PRECISION NOT NULL CHECK (price >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS warehouses (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        location TEXT NOT NULL,
        capacity BIGINT NOT NULL CHECK (capacity >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS inventory_items (
        id TEXT PRIMARY KEY,
        warehouse_id TEXT NOT NULL,
        product_id TEXT NOT NULL,
        quantity BIGINT NOT NULL CHECK (quantity >= 0)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS inventory_items_warehouse_idx ON inventory_items (warehouse_id)",
    "CREATE INDEX IF NOT EXISTS products_category_idx ON products (category)",
];

/// Postgres storage backend.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and handles
/// connection management; single statements are atomic, nothing spans
/// collections.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect to `database_url` and make sure the tables exist.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", "-", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create tables and indexes if they are missing (idempotent).
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", "-", e))?;
        }
        tracing::info!("storage schema ready");
        Ok(())
    }
}

#[async_trait]
impl ProductStore for PostgresStore {
    #[instrument(skip(self, product), fields(product_id = %product.id_typed()), err)]
    async fn insert_product(&self, product: Product) -> StoreResult<()> {
        sqlx::query("INSERT INTO products (id, name, category, price) VALUES ($1, $2, $3, $4)")
            .bind(product.id_typed().as_str())
            .bind(product.name())
            .bind(product.category())
            .bind(product.price())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_product", "products", e))?;
        Ok(())
    }

    async fn get_product(&self, id: &ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query("SELECT id, name, category, price FROM products WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_product", "products", e))?;
        row.map(|r| decode::<ProductRow>(&r, "products")?.into_domain())
            .transpose()
    }

    async fn list_products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, category, price
            FROM products
            WHERE ($1::TEXT IS NULL OR category = $1)
            ORDER BY id ASC
            "#,
        )
        .bind(filter.category.as_deref())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", "products", e))?;

        rows.iter()
            .map(|r| decode::<ProductRow>(r, "products")?.into_domain())
            .collect()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete_product(&self, id: &ProductId) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", "products", e))?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl WarehouseStore for PostgresStore {
    #[instrument(skip(self, warehouse), fields(warehouse_id = %warehouse.id_typed()), err)]
    async fn insert_warehouse(&self, warehouse: Warehouse) -> StoreResult<()> {
        sqlx::query("INSERT INTO warehouses (id, name, location, capacity) VALUES ($1, $2, $3, $4)")
            .bind(warehouse.id_typed().as_str())
            .bind(warehouse.name())
            .bind(warehouse.location())
            .bind(warehouse.capacity())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_warehouse", "warehouses", e))?;
        Ok(())
    }

    async fn get_warehouse(&self, id: &WarehouseId) -> StoreResult<Option<Warehouse>> {
        let row = sqlx::query("SELECT id, name, location, capacity FROM warehouses WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_warehouse", "warehouses", e))?;
        row.map(|r| decode::<WarehouseRow>(&r, "warehouses")?.into_domain())
            .transpose()
    }

    async fn list_warehouses(&self) -> StoreResult<Vec<Warehouse>> {
        let rows = sqlx::query("SELECT id, name, location, capacity FROM warehouses ORDER BY id ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_warehouses", "warehouses", e))?;
        rows.iter()
            .map(|r| decode::<WarehouseRow>(r, "warehouses")?.into_domain())
            .collect()
    }

    #[instrument(skip(self), fields(warehouse_id = %id), err)]
    async fn delete_warehouse(&self, id: &WarehouseId) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM warehouses WHERE id = $1")
            .bind(id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_warehouse", "warehouses", e))?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl InventoryStore for PostgresStore {
    #[instrument(skip(self, item), fields(item_id = %item.id_typed(), warehouse_id = %item.warehouse_id()), err)]
    async fn insert_item(&self, item: InventoryItem) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO inventory_items (id, warehouse_id, product_id, quantity) VALUES ($1, $2, $3, $4)",
        )
        .bind(item.id_typed().as_str())
        .bind(item.warehouse_id().as_str())
        .bind(item.product_id().as_str())
        .bind(item.quantity())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_item", "inventory_items", e))?;
        Ok(())
    }

    async fn get_item(
        &self,
        warehouse_id: &WarehouseId,
        item_id: &InventoryItemId,
    ) -> StoreResult<Option<InventoryItem>> {
        let row = sqlx::query(
            r#"
            SELECT id, warehouse_id, product_id, quantity
            FROM inventory_items
            WHERE id = $1 AND warehouse_id = $2
            "#,
        )
        .bind(item_id.as_str())
        .bind(warehouse_id.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_item", "inventory_items", e))?;
        row.map(|r| decode::<InventoryItemRow>(&r, "inventory_items")?.into_domain())
            .transpose()
    }

    async fn list_items(&self, warehouse_id: &WarehouseId) -> StoreResult<Vec<InventoryItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, warehouse_id, product_id, quantity
            FROM inventory_items
            WHERE warehouse_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(warehouse_id.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_items", "inventory_items", e))?;
        rows.iter()
            .map(|r| decode::<InventoryItemRow>(r, "inventory_items")?.into_domain())
            .collect()
    }

    #[instrument(skip(self), fields(warehouse_id = %warehouse_id, item_id = %item_id), err)]
    async fn delete_item(
        &self,
        warehouse_id: &WarehouseId,
        item_id: &InventoryItemId,
    ) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1 AND warehouse_id = $2")
            .bind(item_id.as_str())
            .bind(warehouse_id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_item", "inventory_items", e))?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(warehouse_id = %warehouse_id), err)]
    async fn delete_items_for_warehouse(&self, warehouse_id: &WarehouseId) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE warehouse_id = $1")
            .bind(warehouse_id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_items_for_warehouse", "inventory_items", e))?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl StatisticsStore for PostgresStore {
    async fn capacity_totals(&self) -> StoreResult<CapacityTotals> {
        // SUM(BIGINT) is NUMERIC; clamp before the cast so totals saturate at
        // i64::MAX like the in-memory store instead of raising out-of-range.
        let row = sqlx::query(
            r#"
            SELECT
                LEAST(COALESCE((SELECT SUM(capacity) FROM warehouses), 0),
                      9223372036854775807)::BIGINT AS total_capacity,
                LEAST(COALESCE((SELECT SUM(quantity) FROM inventory_items), 0),
                      9223372036854775807)::BIGINT AS used_capacity
            "#,
        )
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("capacity_totals", "warehouses", e))?;

        Ok(CapacityTotals {
            total_capacity: get_column(&row, "total_capacity", "warehouses")?,
            used_capacity: get_column(&row, "used_capacity", "inventory_items")?,
        })
    }

    async fn valuation_lines(&self, warehouse_id: &WarehouseId) -> StoreResult<Vec<ValuationLine>> {
        let rows = sqlx::query(
            r#"
            SELECT i.quantity, p.price
            FROM inventory_items i
            LEFT JOIN products p ON p.id = i.product_id
            WHERE i.warehouse_id = $1
            "#,
        )
        .bind(warehouse_id.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("valuation_lines", "inventory_items", e))?;

        rows.iter()
            .map(|r| -> StoreResult<ValuationLine> {
                Ok(ValuationLine {
                    quantity: get_column(r, "quantity", "inventory_items")?,
                    price: get_column(r, "price", "products")?,
                })
            })
            .collect()
    }

    async fn category_counts(&self) -> StoreResult<Vec<CategoryCount>> {
        let rows = sqlx::query("SELECT category, COUNT(*) AS count FROM products GROUP BY category")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("category_counts", "products", e))?;

        rows.iter()
            .map(|r| -> StoreResult<CategoryCount> {
                let count: i64 = get_column(r, "count", "products")?;
                Ok(CategoryCount {
                    category: get_column(r, "category", "products")?,
                    count: u64::try_from(count).unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl Storage for PostgresStore {
    #[instrument(skip(self), err)]
    async fn clear_all(&self) -> StoreResult<()> {
        sqlx::query("TRUNCATE products, warehouses, inventory_items")
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("clear_all", "-", e))?;
        Ok(())
    }
}

struct ProductRow {
    id: String,
    name: String,
    category: String,
    price: f64,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for ProductRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            price: row.try_get("price")?,
        })
    }
}

impl ProductRow {
    fn into_domain(self) -> StoreResult<Product> {
        let id = ProductId::new(parse_id(&self.id, "products")?);
        Product::new(id, self.name, self.category, self.price)
            .map_err(|e| decode_error("products", e))
    }
}

struct WarehouseRow {
    id: String,
    name: String,
    location: String,
    capacity: i64,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for WarehouseRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(WarehouseRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            location: row.try_get("location")?,
            capacity: row.try_get("capacity")?,
        })
    }
}

impl WarehouseRow {
    fn into_domain(self) -> StoreResult<Warehouse> {
        let id = WarehouseId::new(parse_id(&self.id, "warehouses")?);
        Warehouse::new(id, self.name, self.location, self.capacity)
            .map_err(|e| decode_error("warehouses", e))
    }
}

struct InventoryItemRow {
    id: String,
    warehouse_id: String,
    product_id: String,
    quantity: i64,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for InventoryItemRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(InventoryItemRow {
            id: row.try_get("id")?,
            warehouse_id: row.try_get("warehouse_id")?,
            product_id: row.try_get("product_id")?,
            quantity: row.try_get("quantity")?,
        })
    }
}

impl InventoryItemRow {
    fn into_domain(self) -> StoreResult<InventoryItem> {
        const COLLECTION: &str = "inventory_items";
        InventoryItem::new(
            InventoryItemId::new(parse_id(&self.id, COLLECTION)?),
            WarehouseId::new(parse_id(&self.warehouse_id, COLLECTION)?),
            ProductId::new(parse_id(&self.product_id, COLLECTION)?),
            self.quantity,
        )
        .map_err(|e| decode_error(COLLECTION, e))
    }
}

fn decode<'r, T>(row: &'r sqlx::postgres::PgRow, collection: &'static str) -> StoreResult<T>
where
    T: FromRow<'r, sqlx::postgres::PgRow>,
{
    T::from_row(row).map_err(|e| StoreError::Decode {
        collection,
        message: e.to_string(),
    })
}

fn get_column<'r, T>(
    row: &'r sqlx::postgres::PgRow,
    column: &str,
    collection: &'static str,
) -> StoreResult<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column).map_err(|e| StoreError::Decode {
        collection,
        message: format!("{column}: {e}"),
    })
}

fn parse_id(raw: &str, collection: &'static str) -> StoreResult<Id> {
    Id::parse(raw).map_err(|e| decode_error(collection, e))
}

fn decode_error(collection: &'static str, err: DomainError) -> StoreError {
    StoreError::Decode {
        collection,
        message: err.to_string(),
    }
}

fn map_sqlx_error(operation: &'static str, collection: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                StoreError::Duplicate {
                    collection,
                    key: db_err.message().to_string(),
                }
            } else {
                StoreError::backend(operation, db_err.message().to_string())
            }
        }
        sqlx::Error::PoolClosed => StoreError::backend(operation, "connection pool closed"),
        other => StoreError::backend(operation, other.to_string()),
    }
}
