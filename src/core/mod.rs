pub mod calendar;
pub mod plan;
pub mod service;
pub mod status;
pub mod summary;

pub use crate::domain::model::{DayEntry, Order, OrderStats, OrderStatus, WeekDay};
pub use crate::domain::ports::{MealPlanProvider, OrderStore, PlannerSettings};
pub use crate::utils::error::Result;
