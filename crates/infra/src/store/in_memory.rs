use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use stockyard_catalog::{Product, ProductFilter, ProductId, Warehouse, WarehouseId};
use stockyard_core::Entity;
use stockyard_inventory::{InventoryItem, InventoryItemId};

use super::{
    CapacityTotals, CategoryCount, InventoryStore, ProductStore, StatisticsStore, Storage,
    StoreError, StoreResult, ValuationLine, WarehouseStore,
};

/// In-memory collection of entities keyed by their id, for tests/dev.
///
/// Backed by a `BTreeMap`, so every listing comes out in id order.
#[derive(Debug)]
pub struct InMemoryCollection<V: Entity> {
    name: &'static str,
    inner: RwLock<BTreeMap<V::Id, V>>,
}

impl<V> InMemoryCollection<V>
where
    V: Entity + Clone,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<V::Id, V>>> {
        self.inner
            .read()
            .map_err(|_| StoreError::backend(self.name, "collection lock poisoned"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<V::Id, V>>> {
        self.inner
            .write()
            .map_err(|_| StoreError::backend(self.name, "collection lock poisoned"))
    }

    /// Insert a record whose id must not exist yet.
    pub fn insert_new(&self, value: V) -> StoreResult<()> {
        let mut map = self.write()?;
        let key = value.id().clone();
        if map.contains_key(&key) {
            return Err(StoreError::Duplicate {
                collection: self.name,
                key: key.to_string(),
            });
        }
        map.insert(key, value);
        Ok(())
    }

    pub fn get(&self, id: &V::Id) -> StoreResult<Option<V>> {
        Ok(self.read()?.get(id).cloned())
    }

    pub fn find(&self, predicate: impl Fn(&V) -> bool) -> StoreResult<Vec<V>> {
        Ok(self
            .read()?
            .values()
            .filter(|v| predicate(v))
            .cloned()
            .collect())
    }

    pub fn remove(&self, id: &V::Id) -> StoreResult<u64> {
        Ok(u64::from(self.write()?.remove(id).is_some()))
    }

    pub fn remove_where(&self, predicate: impl Fn(&V) -> bool) -> StoreResult<u64> {
        let mut map = self.write()?;
        let before = map.len();
        map.retain(|_k, v| !predicate(v));
        Ok((before - map.len()) as u64)
    }

    /// Fold over every record under a single read lock.
    pub fn fold<B>(&self, init: B, f: impl FnMut(B, &V) -> B) -> StoreResult<B> {
        Ok(self.read()?.values().fold(init, f))
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.write()?.clear();
        Ok(())
    }
}

/// In-memory storage backend (dev/test, and the fake substituted in tests).
#[derive(Debug)]
pub struct InMemoryStore {
    products: InMemoryCollection<Product>,
    warehouses: InMemoryCollection<Warehouse>,
    items: InMemoryCollection<InventoryItem>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            products: InMemoryCollection::new("products"),
            warehouses: InMemoryCollection::new("warehouses"),
            items: InMemoryCollection::new("inventory_items"),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn insert_product(&self, product: Product) -> StoreResult<()> {
        self.products.insert_new(product)
    }

    async fn get_product(&self, id: &ProductId) -> StoreResult<Option<Product>> {
        self.products.get(id)
    }

    async fn list_products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        self.products.find(|p| filter.matches(p))
    }

    async fn delete_product(&self, id: &ProductId) -> StoreResult<u64> {
        self.products.remove(id)
    }
}

#[async_trait]
impl WarehouseStore for InMemoryStore {
    async fn insert_warehouse(&self, warehouse: Warehouse) -> StoreResult<()> {
        self.warehouses.insert_new(warehouse)
    }

    async fn get_warehouse(&self, id: &WarehouseId) -> StoreResult<Option<Warehouse>> {
        self.warehouses.get(id)
    }

    async fn list_warehouses(&self) -> StoreResult<Vec<Warehouse>> {
        self.warehouses.find(|_| true)
    }

    async fn delete_warehouse(&self, id: &WarehouseId) -> StoreResult<u64> {
        self.warehouses.remove(id)
    }
}

#[async_trait]
impl InventoryStore for InMemoryStore {
    async fn insert_item(&self, item: InventoryItem) -> StoreResult<()> {
        self.items.insert_new(item)
    }

    async fn get_item(
        &self,
        warehouse_id: &WarehouseId,
        item_id: &InventoryItemId,
    ) -> StoreResult<Option<InventoryItem>> {
        Ok(self
            .items
            .get(item_id)?
            .filter(|item| item.belongs_to(warehouse_id)))
    }

    async fn list_items(&self, warehouse_id: &WarehouseId) -> StoreResult<Vec<InventoryItem>> {
        self.items.find(|item| item.belongs_to(warehouse_id))
    }

    async fn delete_item(
        &self,
        warehouse_id: &WarehouseId,
        item_id: &InventoryItemId,
    ) -> StoreResult<u64> {
        self.items
            .remove_where(|item| item.id_typed() == item_id && item.belongs_to(warehouse_id))
    }

    async fn delete_items_for_warehouse(&self, warehouse_id: &WarehouseId) -> StoreResult<u64> {
        self.items.remove_where(|item| item.belongs_to(warehouse_id))
    }
}

#[async_trait]
impl StatisticsStore for InMemoryStore {
    async fn capacity_totals(&self) -> StoreResult<CapacityTotals> {
        let total_capacity = self
            .warehouses
            .fold(0i64, |acc, w| acc.saturating_add(w.capacity()))?;
        let used_capacity = self
            .items
            .fold(0i64, |acc, i| acc.saturating_add(i.quantity()))?;
        Ok(CapacityTotals {
            total_capacity,
            used_capacity,
        })
    }

    async fn valuation_lines(&self, warehouse_id: &WarehouseId) -> StoreResult<Vec<ValuationLine>> {
        let lines = self.items.find(|item| item.belongs_to(warehouse_id))?;
        lines
            .iter()
            .map(|item| -> StoreResult<ValuationLine> {
                let price = self.products.get(item.product_id())?.map(|p| p.price());
                Ok(ValuationLine {
                    quantity: item.quantity(),
                    price,
                })
            })
            .collect()
    }

    async fn category_counts(&self) -> StoreResult<Vec<CategoryCount>> {
        let groups = self.products.fold(HashMap::<String, u64>::new(), |mut acc, p| {
            *acc.entry(p.category().to_string()).or_default() += 1;
            acc
        })?;
        Ok(groups
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect())
    }
}

#[async_trait]
impl Storage for InMemoryStore {
    async fn clear_all(&self) -> StoreResult<()> {
        self.products.clear()?;
        self.warehouses.clear()?;
        self.items.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockyard_core::Id;

    fn product(id: &str, category: &str, price: f64) -> Product {
        Product::new(ProductId::new(Id::parse(id).unwrap()), "Item", category, price).unwrap()
    }

    fn warehouse(capacity: i64) -> Warehouse {
        Warehouse::new(WarehouseId::generate(), "Main", "Oslo", capacity).unwrap()
    }

    fn item(warehouse_id: &WarehouseId, product_id: &str, quantity: i64) -> InventoryItem {
        InventoryItem::new(
            InventoryItemId::generate(),
            warehouse_id.clone(),
            ProductId::new(Id::parse(product_id).unwrap()),
            quantity,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn duplicate_product_id_is_rejected() {
        let store = InMemoryStore::new();
        store.insert_product(product("p1", "a", 1.0)).await.unwrap();

        let err = store.insert_product(product("p1", "b", 2.0)).await.unwrap_err();
        match err {
            StoreError::Duplicate { collection, key } => {
                assert_eq!(collection, "products");
                assert_eq!(key, "p1");
            }
            other => panic!("expected Duplicate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn listings_are_ordered_by_id_and_filtered() {
        let store = InMemoryStore::new();
        store.insert_product(product("b", "tools", 1.0)).await.unwrap();
        store.insert_product(product("a", "tools", 1.0)).await.unwrap();
        store.insert_product(product("c", "food", 1.0)).await.unwrap();

        let tools = store
            .list_products(&ProductFilter::by_category("tools"))
            .await
            .unwrap();
        let ids: Vec<_> = tools.iter().map(|p| p.id_typed().as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let none = store
            .list_products(&ProductFilter::by_category("toys"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn composite_lookup_respects_warehouse() {
        let store = InMemoryStore::new();
        let w1 = warehouse(10);
        let w2 = warehouse(10);
        let line = item(w1.id_typed(), "p1", 3);
        let line_id = line.id_typed().clone();
        store.insert_item(line).await.unwrap();

        assert!(store.get_item(w1.id_typed(), &line_id).await.unwrap().is_some());
        assert!(store.get_item(w2.id_typed(), &line_id).await.unwrap().is_none());
        assert_eq!(store.delete_item(w2.id_typed(), &line_id).await.unwrap(), 0);
        assert_eq!(store.delete_item(w1.id_typed(), &line_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_items_for_warehouse_only_touches_that_warehouse() {
        let store = InMemoryStore::new();
        let w1 = warehouse(10);
        let w2 = warehouse(10);
        store.insert_item(item(w1.id_typed(), "p1", 1)).await.unwrap();
        store.insert_item(item(w1.id_typed(), "p2", 1)).await.unwrap();
        store.insert_item(item(w2.id_typed(), "p1", 1)).await.unwrap();

        assert_eq!(store.delete_items_for_warehouse(w1.id_typed()).await.unwrap(), 2);
        assert!(store.list_items(w1.id_typed()).await.unwrap().is_empty());
        assert_eq!(store.list_items(w2.id_typed()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn valuation_lines_keep_lines_without_a_product() {
        let store = InMemoryStore::new();
        let w = warehouse(10);
        store.insert_product(product("p1", "a", 2.5)).await.unwrap();
        store.insert_item(item(w.id_typed(), "p1", 4)).await.unwrap();
        store.insert_item(item(w.id_typed(), "gone", 9)).await.unwrap();

        let mut lines = store.valuation_lines(w.id_typed()).await.unwrap();
        lines.sort_by_key(|l| l.quantity);
        assert_eq!(
            lines,
            vec![
                ValuationLine { quantity: 4, price: Some(2.5) },
                ValuationLine { quantity: 9, price: None },
            ]
        );
    }

    #[tokio::test]
    async fn capacity_totals_saturate_at_i64_max() {
        let store = InMemoryStore::new();
        let a = warehouse(i64::MAX);
        let b = warehouse(10);
        store.insert_item(item(a.id_typed(), "p1", i64::MAX)).await.unwrap();
        store.insert_item(item(b.id_typed(), "p1", 1)).await.unwrap();
        store.insert_warehouse(a).await.unwrap();
        store.insert_warehouse(b).await.unwrap();

        let totals = store.capacity_totals().await.unwrap();
        assert_eq!(totals.total_capacity, i64::MAX);
        assert_eq!(totals.used_capacity, i64::MAX);
    }

    #[tokio::test]
    async fn clear_all_empties_every_collection() {
        let store = InMemoryStore::new();
        let w = warehouse(5);
        store.insert_product(product("p1", "a", 1.0)).await.unwrap();
        store.insert_item(item(w.id_typed(), "p1", 1)).await.unwrap();
        store.insert_warehouse(w).await.unwrap();

        store.clear_all().await.unwrap();

        assert!(store.list_products(&ProductFilter::default()).await.unwrap().is_empty());
        assert!(store.list_warehouses().await.unwrap().is_empty());
        assert_eq!(store.capacity_totals().await.unwrap(), CapacityTotals::default());
    }
}
