use crate::domain::model::{Order, OrderStats, OrderStatus, SkipType};
use chrono::{Days, NaiveDate};

/// How far ahead of today an order's last day may lie for it to count as terminating.
pub const TERMINATING_WINDOW_DAYS: u32 = 4;

/// Status conditions evaluated against a fixed calendar day.
///
/// Each condition is tested on its own; an order can satisfy several at
/// once. [`StatusConditions::classify`] resolves them to a single status by
/// precedence, [`StatusConditions::tally`] counts every bucket independently.
///
/// Conditions of the form "every day ..." require the order to have at least
/// one day, so an order without days is never completed, pending or
/// terminating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusConditions {
    today: NaiveDate,
    expiry: NaiveDate,
}

impl StatusConditions {
    pub fn new(today: NaiveDate, window_days: u32) -> Self {
        let expiry = today
            .checked_add_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MAX);
        Self { today, expiry }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn expiry(&self) -> NaiveDate {
        self.expiry
    }

    pub fn matches(&self, order: &Order, status: OrderStatus) -> bool {
        match status {
            OrderStatus::Active => self.is_active(order),
            OrderStatus::Frozen => self.is_frozen(order),
            OrderStatus::Unpaid => order.is_processed && !order.is_paid,
            OrderStatus::Completed => self.is_completed(order),
            OrderStatus::Pending => self.is_pending(order),
            OrderStatus::Terminating => self.is_terminating(order),
            OrderStatus::Unprocessed => !order.is_processed,
        }
    }

    /// Single status for one order, or `None` when no condition holds.
    pub fn classify(&self, order: &Order) -> Option<OrderStatus> {
        const PRECEDENCE: [OrderStatus; 7] = [
            OrderStatus::Unprocessed,
            OrderStatus::Active,
            OrderStatus::Frozen,
            OrderStatus::Unpaid,
            OrderStatus::Completed,
            OrderStatus::Pending,
            OrderStatus::Terminating,
        ];

        PRECEDENCE
            .into_iter()
            .find(|status| self.matches(order, *status))
    }

    pub fn tally<'a>(&self, orders: impl IntoIterator<Item = &'a Order>) -> OrderStats {
        let mut stats = OrderStats::default();
        for order in orders {
            stats.all += 1;
            for status in OrderStatus::ALL {
                if self.matches(order, status) {
                    stats.bump(status);
                }
            }
        }
        stats
    }

    fn is_active(&self, order: &Order) -> bool {
        order.is_processed
            && order.days.iter().any(|day| {
                day.date == self.today
                    && matches!(day.skip_type, None | Some(SkipType::WeekdaySkipped))
            })
    }

    fn is_frozen(&self, order: &Order) -> bool {
        order.is_processed
            && order
                .days
                .iter()
                .any(|day| day.date == self.today && day.skip_type == Some(SkipType::Frozen))
    }

    fn is_completed(&self, order: &Order) -> bool {
        !order.days.is_empty() && order.days.iter().all(|day| day.date < self.today)
    }

    fn is_pending(&self, order: &Order) -> bool {
        order.is_processed
            && !order.days.is_empty()
            && order.days.iter().all(|day| day.date > self.today)
    }

    fn is_terminating(&self, order: &Order) -> bool {
        order.is_processed
            && order.days.iter().any(|day| day.date >= self.today)
            && order.days.iter().all(|day| day.date <= self.expiry)
    }
}

/// Classifies `order` against `today` with the default terminating window.
pub fn classify(order: &Order, today: NaiveDate) -> Option<OrderStatus> {
    StatusConditions::new(today, TERMINATING_WINDOW_DAYS).classify(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::OrderDay;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn offset(days: i64) -> NaiveDate {
        today() + chrono::Duration::days(days)
    }

    fn order(is_processed: bool, is_paid: bool, days: &[(i64, Option<SkipType>)]) -> Order {
        Order {
            id: 1,
            user_id: None,
            menu_id: 1,
            skipped_weekdays: Vec::new(),
            is_processed,
            is_paid,
            change_requests: Vec::new(),
            days: days
                .iter()
                .enumerate()
                .map(|(i, (delta, skip_type))| OrderDay {
                    id: i as u64 + 1,
                    date: offset(*delta),
                    is_skipped: skip_type.is_some(),
                    skip_type: *skip_type,
                    dishes: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_unprocessed_wins_over_everything() {
        let o = order(false, false, &[(0, None)]);
        assert_eq!(classify(&o, today()), Some(OrderStatus::Unprocessed));
    }

    #[test]
    fn test_active_beats_unpaid() {
        let o = order(true, false, &[(0, None), (1, None)]);
        let conditions = StatusConditions::new(today(), TERMINATING_WINDOW_DAYS);
        assert!(conditions.matches(&o, OrderStatus::Unpaid));
        assert_eq!(conditions.classify(&o), Some(OrderStatus::Active));
    }

    #[test]
    fn test_weekday_skipped_today_is_still_active() {
        let o = order(true, true, &[(0, Some(SkipType::WeekdaySkipped)), (1, None)]);
        assert_eq!(classify(&o, today()), Some(OrderStatus::Active));
    }

    #[test]
    fn test_frozen_today() {
        let o = order(true, false, &[(-1, None), (0, Some(SkipType::Frozen)), (1, None)]);
        assert_eq!(classify(&o, today()), Some(OrderStatus::Frozen));
    }

    #[test]
    fn test_unpaid_without_delivery_today() {
        let o = order(true, false, &[(3, None), (10, None)]);
        assert_eq!(classify(&o, today()), Some(OrderStatus::Unpaid));
    }

    #[test]
    fn test_completed_regardless_of_flags() {
        for (processed, paid) in [(true, true), (true, false), (false, true), (false, false)] {
            let o = order(processed, paid, &[(-5, None), (-1, None)]);
            let conditions = StatusConditions::new(today(), TERMINATING_WINDOW_DAYS);
            assert!(conditions.matches(&o, OrderStatus::Completed));
        }
        assert_eq!(classify(&order(true, true, &[(-5, None), (-1, None)]), today()), Some(OrderStatus::Completed));
    }

    #[test]
    fn test_pending_when_all_days_in_future() {
        let o = order(true, true, &[(1, None), (9, None)]);
        assert_eq!(classify(&o, today()), Some(OrderStatus::Pending));
    }

    #[test]
    fn test_terminating_window_boundary() {
        let conditions = StatusConditions::new(today(), TERMINATING_WINDOW_DAYS);
        assert_eq!(conditions.expiry(), offset(4));

        let inside = order(true, true, &[(0, None), (4, None)]);
        assert!(conditions.matches(&inside, OrderStatus::Terminating));

        let outside = order(true, true, &[(0, None), (5, None)]);
        assert!(!conditions.matches(&outside, OrderStatus::Terminating));
    }

    #[test]
    fn test_terminating_is_reported_when_nothing_earlier_matches() {
        // nothing today, one frozen day left two days out
        let o = order(true, true, &[(-1, None), (2, Some(SkipType::Frozen))]);
        assert_eq!(classify(&o, today()), Some(OrderStatus::Terminating));
    }

    #[test]
    fn test_processed_paid_order_without_days_is_unclassified() {
        let o = order(true, true, &[]);
        assert_eq!(classify(&o, today()), None);
        assert_eq!(classify(&order(true, false, &[]), today()), Some(OrderStatus::Unpaid));
    }

    #[test]
    fn test_tally_counts_overlapping_buckets() {
        let orders = vec![
            order(true, false, &[(0, None), (2, None)]),
            order(false, false, &[(-3, None)]),
            order(true, true, &[(1, None)]),
        ];
        let stats = StatusConditions::new(today(), TERMINATING_WINDOW_DAYS).tally(&orders);

        assert_eq!(stats.all, 3);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.unpaid, 1);
        assert_eq!(stats.unprocessed, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.terminating, 2);
        assert_eq!(stats.frozen, 0);
    }

    #[test]
    fn test_custom_window() {
        let conditions = StatusConditions::new(today(), 7);
        let o = order(true, true, &[(0, None), (6, None)]);
        assert!(conditions.matches(&o, OrderStatus::Terminating));
    }
}
