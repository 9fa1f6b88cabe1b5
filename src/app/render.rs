use crate::config::OutputFormat;
use crate::core::plan::selected_dishes;
use crate::domain::model::{DayEntry, OrderChangeRequest, OrderDay, OrderStats, OrderStatus, SkipType};
use crate::utils::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

/// One line of the order listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRow {
    pub id: u64,
    pub user_id: Option<u64>,
    pub status: Option<OrderStatus>,
    pub days_count: usize,
    pub days_left: usize,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct DayRow {
    id: u64,
    date: NaiveDate,
    is_skipped: bool,
    skip_type: Option<SkipType>,
    selected_dishes: String,
}

impl From<&OrderDay> for DayRow {
    fn from(day: &OrderDay) -> Self {
        let selected_dishes = selected_dishes(day)
            .iter()
            .map(|dish| format!("{}:{}", dish.dish_type_id, dish.dish_id))
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            id: day.id,
            date: day.date,
            is_skipped: day.is_skipped,
            skip_type: day.skip_type,
            selected_dishes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct StatRow {
    status: &'static str,
    count: usize,
}

fn stat_rows(stats: &OrderStats) -> Vec<StatRow> {
    std::iter::once(StatRow {
        status: "ALL",
        count: stats.all,
    })
    .chain(OrderStatus::ALL.into_iter().map(|status| StatRow {
        status: status.as_str(),
        count: stats.count(status),
    }))
    .collect()
}

fn write_csv<W: Write, T: Serialize>(out: &mut W, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn date_or_dash(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.to_string())
}

pub fn write_entries<W: Write>(out: &mut W, entries: &[DayEntry], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, entries),
        OutputFormat::Csv => write_csv(out, entries),
        OutputFormat::Table => {
            writeln!(out, "{:<12} {:<4} {}", "date", "dow", "delivery")?;
            for entry in entries {
                let delivery = if entry.is_skipped { "skipped" } else { "yes" };
                writeln!(
                    out,
                    "{:<12} {:<4} {}",
                    entry.date.to_string(),
                    entry.date.format("%a").to_string(),
                    delivery
                )?;
            }
            let deliveries = entries.iter().filter(|e| !e.is_skipped).count();
            writeln!(out, "{} delivery days, {} calendar days", deliveries, entries.len())?;
            Ok(())
        }
    }
}

pub fn write_orders<W: Write>(out: &mut W, rows: &[OrderRow], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, rows),
        OutputFormat::Csv => write_csv(out, rows),
        OutputFormat::Table => {
            writeln!(
                out,
                "{:<6} {:<6} {:<12} {:>5} {:>5} {:<12} {:<12}",
                "id", "user", "status", "days", "left", "start", "end"
            )?;
            for row in rows {
                writeln!(
                    out,
                    "{:<6} {:<6} {:<12} {:>5} {:>5} {:<12} {:<12}",
                    row.id,
                    row.user_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                    row.status.map_or("-", OrderStatus::as_str),
                    row.days_count,
                    row.days_left,
                    date_or_dash(row.start_date),
                    date_or_dash(row.end_date)
                )?;
            }
            Ok(())
        }
    }
}

pub fn write_stats<W: Write>(out: &mut W, stats: &OrderStats, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, stats),
        OutputFormat::Csv => write_csv(out, &stat_rows(stats)),
        OutputFormat::Table => {
            for row in stat_rows(stats) {
                writeln!(out, "{:<12} {:>6}", row.status, row.count)?;
            }
            Ok(())
        }
    }
}

pub fn write_days<W: Write>(out: &mut W, days: &[OrderDay], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, days),
        OutputFormat::Csv => {
            let rows: Vec<DayRow> = days.iter().map(DayRow::from).collect();
            write_csv(out, &rows)
        }
        OutputFormat::Table => {
            writeln!(out, "{:<6} {:<12} {:<16} {}", "id", "date", "skip", "dishes")?;
            for row in days.iter().map(DayRow::from) {
                let skip = match row.skip_type {
                    Some(SkipType::WeekdaySkipped) => "weekday",
                    Some(SkipType::Frozen) => "frozen",
                    None if row.is_skipped => "skipped",
                    None => "-",
                };
                writeln!(
                    out,
                    "{:<6} {:<12} {:<16} {}",
                    row.id,
                    row.date.to_string(),
                    skip,
                    row.selected_dishes
                )?;
            }
            Ok(())
        }
    }
}

pub fn write_change_request<W: Write>(
    out: &mut W,
    request: &OrderChangeRequest,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, request),
        OutputFormat::Csv => write_csv(out, std::slice::from_ref(request)),
        OutputFormat::Table => {
            writeln!(
                out,
                "change request {} on order {} ({}): {}",
                request.id, request.order_id, request.created_on, request.message
            )?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<DayEntry> {
        vec![
            DayEntry {
                date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
                is_skipped: true,
            },
            DayEntry {
                date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
                is_skipped: false,
            },
        ]
    }

    #[test]
    fn test_entries_as_csv() {
        let mut out = Vec::new();
        write_entries(&mut out, &entries(), OutputFormat::Csv).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "date,is_skipped\n2026-10-17,true\n2026-10-18,false\n");
    }

    #[test]
    fn test_entries_as_json() {
        let mut out = Vec::new();
        write_entries(&mut out, &entries(), OutputFormat::Json).unwrap();
        let parsed: Vec<DayEntry> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, entries());
    }

    #[test]
    fn test_entries_table_footer() {
        let mut out = Vec::new();
        write_entries(&mut out, &entries(), OutputFormat::Table).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Sat"));
        assert!(text.ends_with("1 delivery days, 2 calendar days\n"));
    }

    #[test]
    fn test_stats_csv_lists_every_bucket() {
        let stats = OrderStats {
            all: 3,
            unpaid: 2,
            ..OrderStats::default()
        };
        let mut out = Vec::new();
        write_stats(&mut out, &stats, OutputFormat::Csv).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("status,count\nALL,3\nACTIVE,0\n"));
        assert!(text.contains("UNPAID,2\n"));
        assert_eq!(text.lines().count(), 9);
    }

    #[test]
    fn test_orders_table_marks_unclassified() {
        let rows = [OrderRow {
            id: 4,
            user_id: None,
            status: None,
            days_count: 0,
            days_left: 0,
            start_date: None,
            end_date: None,
        }];
        let mut out = Vec::new();
        write_orders(&mut out, &rows, OutputFormat::Table).unwrap();
        let text = String::from_utf8(out).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert!(line.starts_with("4      -      -"));
    }
}
