use crate::utils::error::PlannerError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of week numbered Monday=1 .. Sunday=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WeekDay {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl WeekDay {
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
        WeekDay::Sunday,
    ];

    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

impl From<chrono::Weekday> for WeekDay {
    fn from(day: chrono::Weekday) -> Self {
        // number_from_monday() is always 1..=7
        Self::ALL[day.number_from_monday() as usize - 1]
    }
}

impl TryFrom<u8> for WeekDay {
    type Error = PlannerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=7 => Ok(Self::ALL[value as usize - 1]),
            _ => Err(PlannerError::invalid_argument(format!(
                "weekday must be between 1 (Monday) and 7 (Sunday), got {}",
                value
            ))),
        }
    }
}

impl From<WeekDay> for u8 {
    fn from(day: WeekDay) -> Self {
        day.number()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipType {
    WeekdaySkipped,
    Frozen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub is_skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDayDish {
    pub dish_type_id: u64,
    pub dish_id: u64,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDay {
    pub id: u64,
    pub date: NaiveDate,
    pub is_skipped: bool,
    #[serde(default)]
    pub skip_type: Option<SkipType>,
    #[serde(default)]
    pub dishes: Vec<OrderDayDish>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    #[serde(default)]
    pub user_id: Option<u64>,
    pub menu_id: u64,
    #[serde(default)]
    pub skipped_weekdays: Vec<WeekDay>,
    #[serde(default)]
    pub is_processed: bool,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub days: Vec<OrderDay>,
    #[serde(default)]
    pub change_requests: Vec<OrderChangeRequest>,
}

impl Order {
    pub fn day(&self, day_id: u64) -> Option<&OrderDay> {
        self.days.iter().find(|day| day.id == day_id)
    }

    pub fn day_mut(&mut self, day_id: u64) -> Option<&mut OrderDay> {
        self.days.iter_mut().find(|day| day.id == day_id)
    }
}

/// Free-text change a customer asked for on one of their orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderChangeRequest {
    pub id: u64,
    pub order_id: u64,
    pub message: String,
    pub created_on: NaiveDate,
}

/// Admin edit of an existing order. `None` leaves the field as it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(default)]
    pub is_processed: Option<bool>,
    #[serde(default)]
    pub is_paid: Option<bool>,
    #[serde(default)]
    pub user_id: Option<u64>,
}

impl OrderUpdate {
    pub fn is_empty(&self) -> bool {
        self.is_processed.is_none() && self.is_paid.is_none() && self.user_id.is_none()
    }

    pub fn apply(&self, order: &mut Order) {
        if let Some(is_processed) = self.is_processed {
            order.is_processed = is_processed;
        }
        if let Some(is_paid) = self.is_paid {
            order.is_paid = is_paid;
        }
        if let Some(user_id) = self.user_id {
            order.user_id = Some(user_id);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Active,
    Frozen,
    Unpaid,
    Completed,
    Pending,
    Terminating,
    Unprocessed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Active,
        OrderStatus::Frozen,
        OrderStatus::Unpaid,
        OrderStatus::Completed,
        OrderStatus::Pending,
        OrderStatus::Terminating,
        OrderStatus::Unprocessed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Active => "ACTIVE",
            OrderStatus::Frozen => "FROZEN",
            OrderStatus::Unpaid => "UNPAID",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Pending => "PENDING",
            OrderStatus::Terminating => "TERMINATING",
            OrderStatus::Unprocessed => "UNPROCESSED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| PlannerError::invalid_argument(format!("unknown order status: {}", s)))
    }
}

/// Per-status counters. Buckets overlap: one order may be counted in several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStats {
    pub all: usize,
    pub active: usize,
    pub frozen: usize,
    pub unpaid: usize,
    pub completed: usize,
    pub pending: usize,
    pub terminating: usize,
    pub unprocessed: usize,
}

impl OrderStats {
    pub fn count(&self, status: OrderStatus) -> usize {
        match status {
            OrderStatus::Active => self.active,
            OrderStatus::Frozen => self.frozen,
            OrderStatus::Unpaid => self.unpaid,
            OrderStatus::Completed => self.completed,
            OrderStatus::Pending => self.pending,
            OrderStatus::Terminating => self.terminating,
            OrderStatus::Unprocessed => self.unprocessed,
        }
    }

    pub(crate) fn bump(&mut self, status: OrderStatus) {
        let counter = match status {
            OrderStatus::Active => &mut self.active,
            OrderStatus::Frozen => &mut self.frozen,
            OrderStatus::Unpaid => &mut self.unpaid,
            OrderStatus::Completed => &mut self.completed,
            OrderStatus::Pending => &mut self.pending,
            OrderStatus::Terminating => &mut self.terminating,
            OrderStatus::Unprocessed => &mut self.unprocessed,
        };
        *counter += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub days_count: usize,
    pub days_left: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishChoice {
    pub dish_type_id: u64,
    pub dish_id: u64,
    #[serde(default)]
    pub is_primary: bool,
}

/// Dishes offered for one day slot of a meal plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDishes {
    pub dishes: Vec<DishChoice>,
}
