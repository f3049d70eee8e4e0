use clap::Parser;
use price_my_car::adapters::http;
use price_my_car::app::build_pipeline;
use price_my_car::utils::logger;
use price_my_car::CliConfig;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = CliConfig::parse();

    // 先載入配置，才知道日誌格式
    let config = match cli.load_app_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    logger::init_logger(cli.verbose, cli.json_logs(&config));
    tracing::info!("Starting price-my-car server");

    let pipeline = match build_pipeline(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let bind = config.bind_addr()?;
    http::serve(Arc::new(pipeline), bind).await?;

    tracing::info!("✅ Server stopped");
    Ok(())
}
