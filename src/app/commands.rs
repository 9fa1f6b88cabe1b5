use crate::adapters::{JsonFileOrderStore, MenuCatalog};
use crate::app::render::{self, OrderRow};
use crate::config::{CliConfig, Command, PlannerConfig};
use crate::core::calendar::expand;
use crate::core::service::{OrderFilter, OrderRequest, OrderService};
use crate::core::status::StatusConditions;
use crate::core::summary::summarize;
use crate::config::OutputFormat;
use crate::domain::model::{Order, OrderStatus, OrderUpdate};
use crate::domain::ports::PlannerSettings;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;

/// Listing rows. With `listed_as` every row carries the status it was
/// selected by, otherwise the single derived status.
pub fn order_rows(
    orders: &[Order],
    conditions: &StatusConditions,
    listed_as: Option<OrderStatus>,
) -> Vec<OrderRow> {
    orders
        .iter()
        .map(|order| {
            let summary = summarize(order, conditions.today());
            OrderRow {
                id: order.id,
                user_id: order.user_id,
                status: listed_as.or_else(|| conditions.classify(order)),
                days_count: summary.map_or(0, |s| s.days_count),
                days_left: summary.map_or(0, |s| s.days_left),
                start_date: summary.map(|s| s.start_date),
                end_date: summary.map(|s| s.end_date),
            }
        })
        .collect()
}

async fn load_menus(config: &PlannerConfig) -> Result<MenuCatalog> {
    let path = config.menus_path();
    if Path::new(path).exists() {
        MenuCatalog::from_file(path).await
    } else {
        tracing::warn!("⚠️ Menu file {} not found, no menus available", path);
        Ok(MenuCatalog::default())
    }
}

fn order_service(
    config: &PlannerConfig,
    menus: MenuCatalog,
) -> OrderService<JsonFileOrderStore, MenuCatalog> {
    OrderService::from_settings(JsonFileOrderStore::new(config.orders_path()), menus, config)
}

/// Runs one CLI command, writing its result to `out`.
pub async fn run<W: Write>(cli: &CliConfig, out: &mut W) -> Result<()> {
    let config = cli.planner_config()?;
    let format = config.output_format()?;
    let today: NaiveDate = cli.today();

    tracing::debug!("evaluating against {} with {:?} output", today, format);

    match &cli.command {
        Command::Expand(schedule) => {
            schedule.validate()?;
            let entries = expand(
                schedule.start,
                schedule.day_count()?,
                &schedule.skipped_weekdays()?,
            )?;
            render::write_entries(out, &entries, format)
        }
        Command::Classify {
            status,
            user,
            page,
            limit,
        } => {
            let service = order_service(&config, MenuCatalog::default());
            let filter = OrderFilter {
                user_id: *user,
                status: *status,
                page: *page,
                limit: *limit,
            };
            let found = service.find(filter, today).await?;
            let conditions = StatusConditions::new(today, config.terminating_window_days());
            let rows = order_rows(&found.orders, &conditions, *status);
            render::write_orders(out, &rows, format)?;

            if format == OutputFormat::Table && found.limit.is_some() {
                writeln!(
                    out,
                    "page {}: {} of {} orders",
                    found.page,
                    rows.len(),
                    found.total_count
                )?;
            }
            Ok(())
        }
        Command::Stats => {
            let service = order_service(&config, MenuCatalog::default());
            let stats = service.stats(today).await?;
            render::write_stats(out, &stats, format)
        }
        Command::Create {
            schedule,
            menu_id,
            user,
            admin,
            processed,
            paid,
        } => {
            schedule.validate()?;
            let service = order_service(&config, load_menus(&config).await?);
            let request = OrderRequest {
                start_date: schedule.start,
                days_count: schedule.day_count()?,
                skipped_weekdays: schedule.skipped_weekdays()?,
                menu_id: *menu_id,
                user_id: *user,
                is_processed: *processed,
                is_paid: *paid,
            };

            let order = if *admin {
                service.admin_create_order(request).await?
            } else {
                service.create_order(request, today).await?
            };

            let conditions = StatusConditions::new(today, config.terminating_window_days());
            render::write_orders(out, &order_rows(&[order], &conditions, None), format)
        }
        Command::Days { order, user } => {
            let service = order_service(&config, MenuCatalog::default());
            let days = service.order_days(*order, *user).await?;
            render::write_days(out, &days, format)
        }
        Command::SelectDish {
            order,
            day,
            dish_type,
            dish,
            user,
        } => {
            let service = order_service(&config, MenuCatalog::default());
            service
                .select_dish(*order, *day, *dish_type, *dish, *user)
                .await?;
            let days = service.order_days(*order, *user).await?;
            let changed: Vec<_> = days.into_iter().filter(|d| d.id == *day).collect();
            render::write_days(out, &changed, format)
        }
        Command::Update {
            order,
            processed,
            paid,
            user,
        } => {
            let service = order_service(&config, MenuCatalog::default());
            let update = OrderUpdate {
                is_processed: *processed,
                is_paid: *paid,
                user_id: *user,
            };
            let updated = service.update_order(*order, update).await?;
            let conditions = StatusConditions::new(today, config.terminating_window_days());
            render::write_orders(out, &order_rows(&[updated], &conditions, None), format)
        }
        Command::RequestChange {
            order,
            user,
            message,
        } => {
            let service = order_service(&config, MenuCatalog::default());
            let request = service.request_change(*order, *user, message, today).await?;
            render::write_change_request(out, &request, format)
        }
    }
}
