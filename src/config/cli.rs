use crate::config::toml_config::{OutputFormat, PlannerConfig};
use crate::core::calendar::day_count_from_i64;
use crate::domain::model::{OrderStatus, WeekDay};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "order-calendar")]
#[command(about = "Plans delivery calendars and tracks meal-subscription order status")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the order data file from config
    #[arg(long, global = true)]
    pub orders: Option<String>,

    /// Override the menu data file from config
    #[arg(long, global = true)]
    pub menus: Option<String>,

    /// Calendar day to evaluate against (defaults to the local date)
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    /// Output format: table, json or csv
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Expand a delivery calendar without storing anything
    Expand(ScheduleArgs),
    /// Show the status of stored orders
    Classify {
        #[arg(long)]
        status: Option<OrderStatus>,
        #[arg(long)]
        user: Option<u64>,
        /// Page to show, starting at 1
        #[arg(long, requires = "limit")]
        page: Option<u32>,
        /// Orders per page
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Count stored orders per status
    Stats,
    /// Plan and store a new order
    Create {
        #[command(flatten)]
        schedule: ScheduleArgs,
        #[arg(long)]
        menu_id: u64,
        #[arg(long)]
        user: Option<u64>,
        /// Skip the start-date check and honour --processed / --paid
        #[arg(long)]
        admin: bool,
        #[arg(long, requires = "admin")]
        processed: bool,
        #[arg(long, requires = "admin")]
        paid: bool,
    },
    /// List the days of one order
    Days {
        #[arg(long)]
        order: u64,
        #[arg(long)]
        user: Option<u64>,
    },
    /// Choose another dish of the same type for an order day
    SelectDish {
        #[arg(long)]
        order: u64,
        #[arg(long)]
        day: u64,
        #[arg(long)]
        dish_type: u64,
        #[arg(long)]
        dish: u64,
        #[arg(long)]
        user: Option<u64>,
    },
    /// Change processing, payment or owner of a stored order
    Update {
        #[arg(long)]
        order: u64,
        #[arg(long)]
        processed: Option<bool>,
        #[arg(long)]
        paid: Option<bool>,
        #[arg(long)]
        user: Option<u64>,
    },
    /// File a change request on one of the customer's orders
    RequestChange {
        #[arg(long)]
        order: u64,
        #[arg(long)]
        user: u64,
        #[arg(long)]
        message: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ScheduleArgs {
    /// First calendar day of the order (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Number of delivery days
    #[arg(long, allow_negative_numbers = true)]
    pub days: i64,

    /// Weekdays without delivery, 1=Monday .. 7=Sunday
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<u8>,
}

impl ScheduleArgs {
    pub fn day_count(&self) -> Result<u32> {
        day_count_from_i64(self.days)
    }

    pub fn skipped_weekdays(&self) -> Result<Vec<WeekDay>> {
        self.skip.iter().map(|&day| WeekDay::try_from(day)).collect()
    }
}

impl CliConfig {
    /// 載入 TOML 配置並套用命令列覆蓋設定
    pub fn planner_config(&self) -> Result<PlannerConfig> {
        let mut config = match &self.config {
            Some(path) => PlannerConfig::from_file(path)?,
            None => PlannerConfig::default(),
        };

        if let Some(orders) = &self.orders {
            config.storage.orders_path = Some(orders.clone());
        }
        if let Some(menus) = &self.menus {
            config.storage.menus_path = Some(menus.clone());
        }
        if let Some(format) = self.format {
            config.output.format = Some(format.to_string());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

impl Validate for ScheduleArgs {
    fn validate(&self) -> Result<()> {
        self.day_count()?;
        self.skipped_weekdays()?;
        Ok(())
    }
}
