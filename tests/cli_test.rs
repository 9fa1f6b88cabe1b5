#![cfg(feature = "cli")]

use anyhow::Result;
use clap::Parser;
use order_calendar::app::commands;
use order_calendar::{CliConfig, DayEntry, OrderStats};
use tempfile::TempDir;

const MENUS: &str = r#"{
  "menus": [
    {
      "id": 1,
      "name": "Balance",
      "days": [
        {"dishes": [{"dish_type_id": 1, "dish_id": 10, "is_primary": true}]},
        {"dishes": [{"dish_type_id": 1, "dish_id": 11, "is_primary": true}]}
      ]
    }
  ]
}"#;

struct Workspace {
    _dir: TempDir,
    config_path: String,
}

/// 建立臨時目錄，內含 TOML 配置與菜單檔案
async fn workspace() -> Result<Workspace> {
    let dir = TempDir::new()?;
    let base = dir.path().to_str().unwrap().replace('\\', "/");

    tokio::fs::write(format!("{}/menus.json", base), MENUS).await?;

    let config = format!(
        r#"
[planner]
terminating_window_days = 4

[storage]
orders_path = "{base}/orders.json"
menus_path = "{base}/menus.json"

[output]
format = "table"
"#
    );
    let config_path = format!("{}/order-calendar.toml", base);
    tokio::fs::write(&config_path, config).await?;

    Ok(Workspace {
        _dir: dir,
        config_path,
    })
}

async fn run(args: &[&str]) -> Result<String> {
    let cli = CliConfig::try_parse_from(std::iter::once("order-calendar").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    commands::run(&cli, &mut out).await?;
    Ok(String::from_utf8(out)?)
}

#[tokio::test]
async fn test_expand_outputs_json() -> Result<()> {
    let output = run(&[
        "expand", "--start", "2026-10-18", "--days", "2", "--skip", "7", "--format", "json",
    ])
    .await?;

    let entries: Vec<DayEntry> = serde_json::from_str(&output)?;
    assert_eq!(entries.len(), 3);
    assert!(entries[0].is_skipped);
    Ok(())
}

#[tokio::test]
async fn test_expand_rejects_every_weekday_skipped() {
    let result = run(&[
        "expand",
        "--start",
        "2026-10-18",
        "--days",
        "5",
        "--skip",
        "1,2,3,4,5,6,7",
    ])
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_create_then_stats_and_classify() -> Result<()> {
    let ws = workspace().await?;
    let config = ws.config_path.as_str();

    let created = run(&[
        "--config", config, "--today", "2026-10-15", "create", "--start", "2026-10-15", "--days",
        "3", "--menu-id", "1", "--user", "5", "--admin", "--processed",
    ])
    .await?;
    assert!(created.contains("ACTIVE"));

    let stats_json = run(&["--config", config, "--today", "2026-10-15", "--format", "json", "stats"]).await?;
    let stats: OrderStats = serde_json::from_str(&stats_json)?;
    assert_eq!(stats.all, 1);
    assert_eq!(stats.active, 1);
    assert_eq!(stats.unpaid, 1);
    assert_eq!(stats.terminating, 1);

    let listing = run(&[
        "--config", config, "--today", "2026-10-25", "--format", "csv", "classify",
    ])
    .await?;
    let mut lines = listing.lines();
    assert_eq!(
        lines.next(),
        Some("id,user_id,status,days_count,days_left,start_date,end_date")
    );
    // still unpaid, which outranks completed
    assert_eq!(lines.next(), Some("1,5,UNPAID,3,0,2026-10-15,2026-10-17"));

    let days = run(&["--config", config, "days", "--order", "1", "--format", "csv"]).await?;
    assert!(days.contains("1,2026-10-15,false,,1:10"));

    let changed = run(&[
        "--config", config, "select-dish", "--order", "1", "--day", "2", "--dish-type", "1",
        "--dish", "11",
    ])
    .await?;
    assert!(changed.contains("1:11"));

    Ok(())
}

#[tokio::test]
async fn test_customer_order_in_the_past_is_rejected() -> Result<()> {
    let ws = workspace().await?;

    let result = run(&[
        "--config",
        ws.config_path.as_str(),
        "--today",
        "2026-10-15",
        "create",
        "--start",
        "2026-10-10",
        "--days",
        "3",
        "--menu-id",
        "1",
    ])
    .await;
    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_status_filter_labels_rows_and_update_marks_paid() -> Result<()> {
    let ws = workspace().await?;
    let config = ws.config_path.as_str();

    run(&[
        "--config", config, "--today", "2026-10-15", "create", "--start", "2026-10-15", "--days",
        "3", "--menu-id", "1", "--user", "5", "--admin", "--processed",
    ])
    .await?;

    // delivering today: derived status is ACTIVE, the unpaid listing says UNPAID
    let all = run(&["--config", config, "--today", "2026-10-15", "--format", "csv", "classify"]).await?;
    assert!(all.contains("1,5,ACTIVE,"));
    let unpaid = run(&[
        "--config", config, "--today", "2026-10-15", "--format", "csv", "classify", "--status",
        "unpaid",
    ])
    .await?;
    assert!(unpaid.contains("1,5,UNPAID,"));

    let updated = run(&[
        "--config", config, "--today", "2026-10-25", "--format", "csv", "update", "--order", "1",
        "--paid", "true",
    ])
    .await?;
    assert!(updated.contains("1,5,COMPLETED,3,0,2026-10-15,2026-10-17"));

    let paged = run(&[
        "--config", config, "--today", "2026-10-25", "classify", "--page", "1", "--limit", "10",
    ])
    .await?;
    assert!(paged.ends_with("page 1: 1 of 1 orders\n"));

    let request = run(&[
        "--config", config, "--today", "2026-10-15", "--format", "json", "request-change",
        "--order", "1", "--user", "5", "--message", "ring twice",
    ])
    .await?;
    let request: serde_json::Value = serde_json::from_str(&request)?;
    assert_eq!(request["message"], "ring twice");
    assert_eq!(request["order_id"], 1);

    Ok(())
}
