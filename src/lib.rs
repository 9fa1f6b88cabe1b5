pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{OutputFormat, PlannerConfig};

pub use crate::adapters::{InMemoryOrderStore, JsonFileOrderStore, MenuCatalog};
pub use crate::core::calendar::expand;
pub use crate::core::service::{OrderFilter, OrderPage, OrderRequest, OrderService};
pub use crate::core::status::{classify, StatusConditions, TERMINATING_WINDOW_DAYS};
pub use crate::domain::model::{
    DayEntry, Order, OrderChangeRequest, OrderDay, OrderStats, OrderStatus, OrderUpdate, SkipType, WeekDay,
};
pub use crate::utils::error::{PlannerError, Result};
