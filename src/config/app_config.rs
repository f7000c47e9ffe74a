use crate::core::ConfigProvider;
use crate::utils::error::{Result, TrackerError};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_COURSE_LIST_URL: &str =
    "https://raw.githubusercontent.com/atcupps/Jupiterp/main/datagen/data/courses_list.txt";
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://app.testudo.umd.edu/soc";
pub const DEFAULT_TERM: &str = "202501";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub course_list_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            course_list_url: DEFAULT_COURSE_LIST_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub term: String,
    pub chunk_divisor: usize,
    pub request_delay_ms: u64,
    pub max_attempts: u32,
    pub timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            term: DEFAULT_TERM.to_string(),
            chunk_divisor: 50,
            request_delay_ms: 1000,
            max_attempts: 3,
            timeout_seconds: 30,
        }
    }
}

fn default_table() -> String {
    "seats".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyMode {
    #[default]
    Console,
    Smtp,
    File,
}

impl FromStr for NotifyMode {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(NotifyMode::Console),
            "smtp" => Ok(NotifyMode::Smtp),
            "file" => Ok(NotifyMode::File),
            other => Err(TrackerError::InvalidConfigValueError {
                field: "notify.mode".to_string(),
                value: other.to_string(),
                reason: "Valid modes: console, smtp, file".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub mode: NotifyMode,
    pub from_email: Option<String>,
    pub password: Option<String>,
    pub to_email: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub output_dir: Option<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            mode: NotifyMode::Console,
            from_email: None,
            password: None,
            to_email: None,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            output_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub format: LogFormat,
}

fn parse_env<T: FromStr>(field: &str, value: String) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| TrackerError::InvalidConfigValueError {
            field: field.to_string(),
            value,
            reason: "Could not parse value".to_string(),
        })
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrackerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrackerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPABASE_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrackerError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 只靠環境變數組出配置 (沒有設定檔時)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| TrackerError::MissingConfigError {
                    field: key.to_string(),
                })
        };

        let mut catalog = CatalogConfig::default();
        if let Some(term) = lookup("TERM_CODE") {
            catalog.term = term;
        }
        if let Some(base_url) = lookup("CATALOG_BASE_URL") {
            catalog.base_url = base_url;
        }

        let mut source = SourceConfig::default();
        if let Some(url) = lookup("COURSE_LIST_URL") {
            source.course_list_url = url;
        }

        let mut notify = NotifyConfig {
            from_email: lookup("HANDLER_EMAIL"),
            password: lookup("HANDLER_PASSWORD"),
            to_email: lookup("DEST_EMAIL"),
            output_dir: lookup("ALERT_OUTPUT_DIR"),
            ..NotifyConfig::default()
        };
        if let Some(mode) = lookup("NOTIFY_MODE") {
            notify.mode = mode.parse()?;
        }
        if let Some(host) = lookup("SMTP_HOST") {
            notify.smtp_host = host;
        }
        if let Some(port) = lookup("SMTP_PORT") {
            notify.smtp_port = parse_env("SMTP_PORT", port)?;
        }

        let mut logging = LoggingConfig::default();
        if let Some(verbose) = lookup("SEAT_TRACKER_VERBOSE") {
            logging.verbose = matches!(verbose.trim(), "1" | "true" | "yes");
        }
        if let Some(format) = lookup("SEAT_TRACKER_LOG_FORMAT") {
            logging.format = format.parse()?;
        }

        Ok(Self {
            source,
            catalog,
            store: StoreConfig {
                url: required("SUPABASE_URL")?,
                key: required("SUPABASE_KEY")?,
                table: default_table(),
            },
            notify,
            logging,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_seconds)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.course_list_url", &self.source.course_list_url)?;
        validation::validate_url("catalog.base_url", &self.catalog.base_url)?;
        validation::validate_url("store.url", &self.store.url)?;

        validation::validate_non_empty_string("catalog.term", &self.catalog.term)?;
        validation::validate_non_empty_string("store.key", &self.store.key)?;
        validation::validate_non_empty_string("store.table", &self.store.table)?;
        validation::validate_positive_number("catalog.chunk_divisor", self.catalog.chunk_divisor, 1)?;
        validation::validate_range("catalog.max_attempts", self.catalog.max_attempts, 1, 10)?;
        validation::validate_range("catalog.timeout_seconds", self.catalog.timeout_seconds, 1, 600)?;

        match self.notify.mode {
            NotifyMode::Console => {}
            NotifyMode::Smtp => {
                validation::validate_required_field("notify.from_email", &self.notify.from_email)?;
                validation::validate_required_field("notify.password", &self.notify.password)?;
                validation::validate_required_field("notify.to_email", &self.notify.to_email)?;
                validation::validate_non_empty_string("notify.smtp_host", &self.notify.smtp_host)?;
            }
            NotifyMode::File => {
                validation::validate_required_field("notify.from_email", &self.notify.from_email)?;
                validation::validate_required_field("notify.to_email", &self.notify.to_email)?;
                validation::validate_required_field("notify.output_dir", &self.notify.output_dir)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn course_list_url(&self) -> &str {
        &self.source.course_list_url
    }

    fn catalog_base_url(&self) -> &str {
        &self.catalog.base_url
    }

    fn term(&self) -> &str {
        &self.catalog.term
    }

    fn chunk_divisor(&self) -> usize {
        self.catalog.chunk_divisor
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(self.catalog.request_delay_ms)
    }

    fn max_attempts(&self) -> u32 {
        self.catalog.max_attempts
    }

    fn seats_table(&self) -> &str {
        &self.store.table
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
