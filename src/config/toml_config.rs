use crate::adapters::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::resolver::PriceTable;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub llm: LlmConfig,
    pub logging: Option<LoggingConfig>,
    pub pricing: Option<PricingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub entries: Vec<PriceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceEntry {
    pub make: String,
    pub model: String,
    pub price: u32,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 沒有設定檔時，從 OPENAI_* 環境變數組出配置
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            llm: LlmConfig {
                api_key: var("OPENAI_API_KEY"),
                model: var("OPENAI_MODEL"),
                base_url: var("OPENAI_BASE_URL"),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// 替換環境變數 (例如 ${OPENAI_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 取得 API 金鑰；未替換的 ${VAR} 視為未設定
    pub fn api_key(&self) -> Result<&str> {
        let key = validation::validate_required_field("llm.api_key", &self.llm.api_key)?;
        if key.trim().is_empty() || key.starts_with("${") {
            return Err(AppError::MissingConfigError {
                field: "llm.api_key".to_string(),
            });
        }
        Ok(key.as_str())
    }

    pub fn model(&self) -> &str {
        self.llm.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn temperature(&self) -> f32 {
        self.llm.temperature.unwrap_or(0.0)
    }

    pub fn base_url(&self) -> &str {
        self.llm.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn bind_str(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind.as_deref())
            .unwrap_or(DEFAULT_BIND)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind_str()
            .parse()
            .map_err(|e| AppError::InvalidConfigValueError {
                field: "server.bind".to_string(),
                value: self.bind_str().to_string(),
                reason: format!("Invalid socket address: {}", e),
            })
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    /// 有設定 [[pricing.entries]] 就用它，否則用內建價格表
    pub fn price_table(&self) -> Result<PriceTable> {
        match &self.pricing {
            Some(pricing) if !pricing.entries.is_empty() => PriceTable::from_entries(
                pricing
                    .entries
                    .iter()
                    .map(|e| (e.make.as_str(), e.model.as_str(), e.price)),
            ),
            _ => Ok(PriceTable::default_catalog()),
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        self.api_key()?;
        validation::validate_non_empty_string("llm.model", self.model())?;
        validation::validate_range("llm.temperature", self.temperature(), 0.0, 2.0)?;
        validation::validate_url("llm.base_url", self.base_url())?;
        if let Some(timeout) = self.llm.timeout_seconds {
            validation::validate_positive_number("llm.timeout_seconds", timeout, 1)?;
        }
        self.bind_addr()?;
        self.price_table()?;
        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
