use crate::domain::model::Order;
use crate::domain::ports::OrderStore;
use crate::utils::error::{PlannerError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

fn next_id(orders: &[Order]) -> u64 {
    orders.iter().map(|order| order.id).max().unwrap_or(0) + 1
}

fn replace(orders: &mut [Order], order: Order) -> Result<()> {
    let slot = orders
        .iter_mut()
        .find(|existing| existing.id == order.id)
        .ok_or(PlannerError::NotFound {
            entity: "Order",
            id: order.id,
        })?;
    *slot = order;
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<Mutex<Vec<Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: Arc::new(Mutex::new(orders)),
        }
    }
}

impl OrderStore for InMemoryOrderStore {
    async fn list_orders(&self) -> Result<Vec<Order>> {
        Ok(self.orders.lock().await.clone())
    }

    async fn get_order(&self, id: u64) -> Result<Option<Order>> {
        let orders = self.orders.lock().await;
        Ok(orders.iter().find(|order| order.id == id).cloned())
    }

    async fn insert_order(&self, mut order: Order) -> Result<u64> {
        let mut orders = self.orders.lock().await;
        order.id = next_id(&orders);
        let id = order.id;
        orders.push(order);
        Ok(id)
    }

    async fn update_order(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.lock().await;
        replace(&mut orders, order)
    }
}

/// Orders kept as one JSON array in a file. A missing file reads as no orders.
#[derive(Debug, Clone)]
pub struct JsonFileOrderStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileOrderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn read_all(&self) -> Result<Vec<Order>> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("{} does not exist yet, starting empty", self.path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes a sibling temp file and renames it over the data file, so a
    /// crash mid-write leaves the previous contents intact.
    async fn write_all(&self, orders: &[Order]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let data = serde_json::to_vec_pretty(orders)?;
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, data).await?;
        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            tracing::warn!("⚠️ Failed to replace {}: {}", self.path.display(), e);
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl OrderStore for JsonFileOrderStore {
    async fn list_orders(&self) -> Result<Vec<Order>> {
        self.read_all().await
    }

    async fn get_order(&self, id: u64) -> Result<Option<Order>> {
        Ok(self.read_all().await?.into_iter().find(|order| order.id == id))
    }

    async fn insert_order(&self, mut order: Order) -> Result<u64> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.read_all().await?;
        order.id = next_id(&orders);
        let id = order.id;
        orders.push(order);
        self.write_all(&orders).await?;
        Ok(id)
    }

    async fn update_order(&self, order: Order) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.read_all().await?;
        replace(&mut orders, order)?;
        self.write_all(&orders).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn order(id: u64) -> Order {
        Order {
            id,
            user_id: Some(1),
            menu_id: 1,
            skipped_weekdays: Vec::new(),
            is_processed: false,
            is_paid: false,
            change_requests: Vec::new(),
            days: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_assigns_increasing_ids() {
        let store = InMemoryOrderStore::with_orders(vec![order(4)]);
        assert_eq!(store.insert_order(order(0)).await.unwrap(), 5);
        assert_eq!(store.insert_order(order(0)).await.unwrap(), 6);
        assert_eq!(store.list_orders().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_unknown_order_fails() {
        let store = InMemoryOrderStore::new();
        assert!(matches!(
            store.update_order(order(9)).await,
            Err(PlannerError::NotFound { entity: "Order", id: 9 })
        ));
    }

    #[tokio::test]
    async fn test_json_file_store_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("orders.json");
        let store = JsonFileOrderStore::new(&path);

        assert!(store.list_orders().await.unwrap().is_empty());

        let id = store.insert_order(order(0)).await.unwrap();
        assert_eq!(id, 1);

        let mut stored = store.get_order(id).await.unwrap().unwrap();
        stored.is_paid = true;
        store.update_order(stored).await.unwrap();

        let reopened = JsonFileOrderStore::new(&path);
        let orders = reopened.list_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert!(orders[0].is_paid);
    }

    #[tokio::test]
    async fn test_json_file_store_replaces_file_through_temp() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("orders.json");
        let store = JsonFileOrderStore::new(&path);
        store.insert_order(order(0)).await.unwrap();

        // a half-written temp file left behind by an interrupted write
        let temp_path = temp_dir.path().join("orders.json.tmp");
        tokio::fs::write(&temp_path, b"[{\"id\": 1, \"men").await.unwrap();
        assert_eq!(store.list_orders().await.unwrap().len(), 1);

        store.insert_order(order(0)).await.unwrap();
        assert!(!temp_path.exists());
        assert_eq!(store.list_orders().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_json_file_store_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("orders.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = JsonFileOrderStore::new(&path);
        assert!(matches!(
            store.list_orders().await,
            Err(PlannerError::SerializationError(_))
        ));
    }
}
