use crate::core::calendar::{expand, validate_start_date};
use crate::core::plan::{build_order_days, replacement_dishes, select_dish, selected_dishes};
use crate::core::status::{StatusConditions, TERMINATING_WINDOW_DAYS};
use crate::domain::model::{
    Order, OrderChangeRequest, OrderDay, OrderDayDish, OrderStats, OrderStatus, OrderUpdate, WeekDay,
};
use crate::domain::ports::{MealPlanProvider, OrderStore, PlannerSettings};
use crate::utils::error::{PlannerError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub start_date: NaiveDate,
    pub days_count: u32,
    #[serde(default)]
    pub skipped_weekdays: Vec<WeekDay>,
    pub menu_id: u64,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub is_processed: bool,
    #[serde(default)]
    pub is_paid: bool,
}

/// Listing filter. Pages are 1-based and only apply when `limit` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub user_id: Option<u64>,
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// One page of matching orders plus the number of matches over all pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total_count: usize,
    pub page: u32,
    pub limit: Option<u32>,
}

pub struct OrderService<S: OrderStore, M: MealPlanProvider> {
    store: S,
    meal_plans: M,
    window_days: u32,
}

impl<S: OrderStore, M: MealPlanProvider> OrderService<S, M> {
    pub fn new(store: S, meal_plans: M) -> Self {
        Self::with_window(store, meal_plans, TERMINATING_WINDOW_DAYS)
    }

    pub fn with_window(store: S, meal_plans: M, window_days: u32) -> Self {
        Self {
            store,
            meal_plans,
            window_days,
        }
    }

    pub fn from_settings(store: S, meal_plans: M, settings: &impl PlannerSettings) -> Self {
        Self::with_window(store, meal_plans, settings.terminating_window_days())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn conditions(&self, today: NaiveDate) -> StatusConditions {
        StatusConditions::new(today, self.window_days)
    }

    /// Customer order: must not start before `today`, always unprocessed and unpaid.
    pub async fn create_order(&self, request: OrderRequest, today: NaiveDate) -> Result<Order> {
        validate_start_date(request.start_date, today)?;

        let request = OrderRequest {
            is_processed: false,
            is_paid: false,
            ..request
        };
        self.place(request).await
    }

    /// Admin order: any start date, processed/paid flags taken from the request.
    pub async fn admin_create_order(&self, request: OrderRequest) -> Result<Order> {
        self.place(request).await
    }

    async fn place(&self, request: OrderRequest) -> Result<Order> {
        let entries = expand(request.start_date, request.days_count, &request.skipped_weekdays)?;

        let plan = self
            .meal_plans
            .meal_plan(request.menu_id, request.start_date, entries.len())
            .await?;
        let days = build_order_days(&entries, &plan)?;

        let order = Order {
            id: 0,
            user_id: request.user_id,
            menu_id: request.menu_id,
            skipped_weekdays: request.skipped_weekdays,
            is_processed: request.is_processed,
            is_paid: request.is_paid,
            days,
            change_requests: Vec::new(),
        };

        let id = self.store.insert_order(order).await?;
        tracing::info!(
            "📅 Order {} planned: {} delivery days over {} calendar days from {}",
            id,
            request.days_count,
            entries.len(),
            request.start_date
        );

        self.get_order(id, None).await
    }

    pub async fn get_order(&self, id: u64, user_id: Option<u64>) -> Result<Order> {
        self.store
            .get_order(id)
            .await?
            .filter(|order| user_id.is_none() || order.user_id == user_id)
            .ok_or(PlannerError::NotFound { entity: "Order", id })
    }

    pub async fn order_days(&self, id: u64, user_id: Option<u64>) -> Result<Vec<OrderDay>> {
        let mut days = self.get_order(id, user_id).await?.days;
        days.sort_by_key(|day| day.date);
        Ok(days)
    }

    pub async fn status_of(&self, id: u64, today: NaiveDate) -> Result<Option<OrderStatus>> {
        let order = self.get_order(id, None).await?;
        Ok(self.conditions(today).classify(&order))
    }

    pub async fn stats(&self, today: NaiveDate) -> Result<OrderStats> {
        let orders = self.store.list_orders().await?;
        let stats = self.conditions(today).tally(&orders);
        tracing::debug!("order stats for {}: {:?}", today, stats);
        Ok(stats)
    }

    /// Orders matching `filter`, newest first, cut to the requested page.
    pub async fn find(&self, filter: OrderFilter, today: NaiveDate) -> Result<OrderPage> {
        let page = filter.page.unwrap_or(1);
        if page == 0 || filter.limit == Some(0) {
            return Err(PlannerError::invalid_argument(format!(
                "page and limit must be at least 1, got page {} limit {:?}",
                page, filter.limit
            )));
        }

        let conditions = self.conditions(today);
        let mut orders: Vec<Order> = self
            .store
            .list_orders()
            .await?
            .into_iter()
            .filter(|order| filter.user_id.is_none() || order.user_id == filter.user_id)
            .filter(|order| {
                filter
                    .status
                    .map_or(true, |status| conditions.matches(order, status))
            })
            .collect();

        orders.sort_by(|a, b| b.id.cmp(&a.id));
        let total_count = orders.len();

        if let Some(limit) = filter.limit {
            let skip = (page as usize - 1).saturating_mul(limit as usize);
            orders = orders.into_iter().skip(skip).take(limit as usize).collect();
        }

        Ok(OrderPage {
            orders,
            total_count,
            page,
            limit: filter.limit,
        })
    }

    /// Admin edit of payment, processing and owner. Days are left untouched.
    pub async fn update_order(&self, id: u64, update: OrderUpdate) -> Result<Order> {
        if update.is_empty() {
            return Err(PlannerError::invalid_argument("nothing to update"));
        }

        let mut order = self.get_order(id, None).await?;
        update.apply(&mut order);
        self.store.update_order(order).await?;

        tracing::info!("✏️ Order {} updated: {:?}", id, update);
        self.get_order(id, None).await
    }

    pub async fn select_dish(
        &self,
        order_id: u64,
        day_id: u64,
        dish_type_id: u64,
        dish_id: u64,
        user_id: Option<u64>,
    ) -> Result<OrderDayDish> {
        let mut order = self.get_order(order_id, user_id).await?;
        let day = order
            .day_mut(day_id)
            .ok_or(PlannerError::NotFound { entity: "Day", id: day_id })?;

        let chosen = select_dish(day, dish_type_id, dish_id)?;
        self.store.update_order(order).await?;

        tracing::debug!(
            "order {} day {}: dish {} selected for type {}",
            order_id,
            day_id,
            dish_id,
            dish_type_id
        );
        Ok(chosen)
    }

    /// Unselected dishes of one type that the customer may switch to.
    pub async fn replacement_dishes(
        &self,
        order_id: u64,
        day_id: u64,
        dish_type_id: u64,
        user_id: Option<u64>,
    ) -> Result<Vec<OrderDayDish>> {
        let order = self.get_order(order_id, user_id).await?;
        let day = order
            .day(day_id)
            .ok_or(PlannerError::NotFound { entity: "Day", id: day_id })?;

        Ok(replacement_dishes(day, dish_type_id).into_iter().cloned().collect())
    }

    /// Selected dishes of one order day, ordered by dish type.
    pub async fn selected_dishes(
        &self,
        order_id: u64,
        day_id: u64,
        user_id: Option<u64>,
    ) -> Result<Vec<OrderDayDish>> {
        let order = self.get_order(order_id, user_id).await?;
        let day = order
            .day(day_id)
            .ok_or(PlannerError::NotFound { entity: "Day", id: day_id })?;

        Ok(selected_dishes(day).into_iter().cloned().collect())
    }

    /// Records a customer's change request on one of their own orders.
    pub async fn request_change(
        &self,
        order_id: u64,
        user_id: u64,
        message: &str,
        today: NaiveDate,
    ) -> Result<OrderChangeRequest> {
        let message = message.trim();
        if message.is_empty() {
            return Err(PlannerError::invalid_argument("change request message is empty"));
        }

        let mut order = self.get_order(order_id, Some(user_id)).await?;
        let request = OrderChangeRequest {
            id: order.change_requests.iter().map(|r| r.id).max().unwrap_or(0) + 1,
            order_id,
            message: message.to_string(),
            created_on: today,
        };
        order.change_requests.push(request.clone());
        self.store.update_order(order).await?;

        tracing::info!("📨 Change request {} filed for order {}", request.id, order_id);
        Ok(request)
    }
}
