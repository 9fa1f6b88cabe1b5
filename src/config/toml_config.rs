use crate::core::status::TERMINATING_WINDOW_DAYS;
use crate::domain::ports::PlannerSettings;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

pub const VALID_FORMATS: [&str; 3] = ["table", "json", "csv"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub planner: PlannerSection,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerSection {
    pub terminating_window_days: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub orders_path: Option<String>,
    pub menus_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(PlannerError::InvalidConfigValueError {
                field: "output.format".to_string(),
                value: other.to_string(),
                reason: format!("Valid formats: {}", VALID_FORMATS.join(", ")),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Csv => "csv",
        };
        f.write_str(name)
    }
}

impl PlannerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlannerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PlannerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ORDERS_PATH})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(days) = self.planner.terminating_window_days {
            validation::validate_range("planner.terminating_window_days", days, 0, 366)?;
        }

        if let Some(path) = &self.storage.orders_path {
            validation::validate_path("storage.orders_path", path)?;
            validation::validate_file_extension("storage.orders_path", path, &["json"])?;
        }

        if let Some(path) = &self.storage.menus_path {
            validation::validate_path("storage.menus_path", path)?;
            validation::validate_file_extension("storage.menus_path", path, &["json"])?;
        }

        if let Some(format) = &self.output.format {
            validation::validate_one_of("output.format", format, &VALID_FORMATS)?;
        }

        Ok(())
    }

    /// 取得訂單資料路徑
    pub fn orders_path(&self) -> &str {
        self.storage.orders_path.as_deref().unwrap_or("./orders.json")
    }

    /// 取得菜單資料路徑
    pub fn menus_path(&self) -> &str {
        self.storage.menus_path.as_deref().unwrap_or("./menus.json")
    }

    /// 取得輸出格式
    pub fn output_format(&self) -> Result<OutputFormat> {
        self.output
            .format
            .as_deref()
            .map_or(Ok(OutputFormat::default()), str::parse)
    }
}

impl PlannerSettings for PlannerConfig {
    fn terminating_window_days(&self) -> u32 {
        self.planner
            .terminating_window_days
            .unwrap_or(TERMINATING_WINDOW_DAYS)
    }
}

impl Validate for PlannerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
