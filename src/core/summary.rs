use crate::domain::model::{Order, OrderSummary};
use chrono::NaiveDate;

/// Delivery-day counts and date range of an order. `None` if it has no days.
pub fn summarize(order: &Order, today: NaiveDate) -> Option<OrderSummary> {
    let start_date = order.days.iter().map(|day| day.date).min()?;
    let end_date = order.days.iter().map(|day| day.date).max()?;

    let delivery_days = order.days.iter().filter(|day| !day.is_skipped);
    let (days_count, days_left) = delivery_days.fold((0usize, 0usize), |(count, left), day| {
        (count + 1, left + usize::from(day.date > today))
    });

    Some(OrderSummary {
        days_count,
        days_left,
        start_date,
        end_date,
    })
}
