pub mod toml_config;

pub use toml_config::AppConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "price-my-car")]
#[command(about = "Estimate the price of a car from its listing text")]
pub struct CliConfig {
    #[arg(long, env = "PRICE_MY_CAR_CONFIG", help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "PRICE_MY_CAR_BIND", help = "Address to listen on, e.g. 0.0.0.0:8000")]
    pub bind: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 設定檔優先，沒有就用環境變數；命令列參數覆寫 bind
    pub fn load_app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::from_env(),
        };

        if let Some(bind) = &self.bind {
            config.server.get_or_insert_with(Default::default).bind = Some(bind.clone());
        }

        Ok(config)
    }

    pub fn json_logs(&self, config: &AppConfig) -> bool {
        self.json_logs || config.json_logs()
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_bind_flag_overrides_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nbind = \"127.0.0.1:9000\"\n[llm]\napi_key = \"sk-test\"\n")
            .unwrap();

        let cli = CliConfig::parse_from([
            "price-my-car",
            "--config",
            temp_file.path().to_str().unwrap(),
            "--bind",
            "127.0.0.1:9100",
        ]);
        let config = cli.load_app_config().unwrap();

        assert_eq!(config.bind_str(), "127.0.0.1:9100");
        assert_eq!(config.api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_json_logs_from_flag_or_file() {
        let cli = CliConfig::parse_from(["price-my-car", "--json-logs"]);
        assert!(cli.json_logs(&AppConfig::default()));

        let cli = CliConfig::parse_from(["price-my-car"]);
        let config = AppConfig::from_toml_str("[logging]\njson = true\n").unwrap();
        assert!(cli.json_logs(&config));
    }
}
