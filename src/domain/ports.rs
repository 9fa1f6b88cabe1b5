use crate::domain::model::{DayDishes, Order};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Persistence for orders and their day records.
pub trait OrderStore: Send + Sync {
    fn list_orders(&self) -> impl std::future::Future<Output = Result<Vec<Order>>> + Send;

    fn get_order(&self, id: u64)
        -> impl std::future::Future<Output = Result<Option<Order>>> + Send;

    /// Stores a new order under a fresh id and returns that id.
    fn insert_order(&self, order: Order) -> impl std::future::Future<Output = Result<u64>> + Send;

    fn update_order(&self, order: Order) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait MealPlanProvider: Send + Sync {
    /// One slot per calendar day starting at `start`, `day_count` slots long.
    async fn meal_plan(&self, menu_id: u64, start: NaiveDate, day_count: usize)
        -> Result<Vec<DayDishes>>;
}

pub trait PlannerSettings: Send + Sync {
    fn terminating_window_days(&self) -> u32;
}
