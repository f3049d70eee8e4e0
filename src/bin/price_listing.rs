use anyhow::Context;
use clap::Parser;
use price_my_car::app::build_pipeline;
use price_my_car::utils::logger;
use price_my_car::{AppConfig, CarListingRequest, PipelineOutcome};
use std::path::PathBuf;

/// 從命令列估價單筆刊登，不啟動 HTTP 伺服器
#[derive(Debug, Parser)]
#[command(name = "price_listing")]
#[command(about = "Price a single car listing from the command line")]
struct Args {
    #[arg(long)]
    title: String,

    #[arg(long)]
    description: String,

    #[arg(long, env = "PRICE_MY_CAR_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::from_env(),
    };
    let pipeline = build_pipeline(&config).context("building pipeline")?;

    let request = CarListingRequest::new(args.title, args.description);
    match pipeline.run(&request).await {
        PipelineOutcome::Success(estimate) => {
            println!("{}", serde_json::to_string_pretty(&estimate)?);
            Ok(())
        }
        other => {
            eprintln!("❌ Could not price listing ({})", other.kind());
            std::process::exit(2);
        }
    }
}
