// Application wiring: builds the concrete pipeline from loaded configuration.

use crate::adapters::openai::OpenAiGenerator;
use crate::config::AppConfig;
use crate::core::extractor::LlmVehicleExtractor;
use crate::core::pipeline::PricingPipeline;
use crate::core::resolver::PriceTable;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::Validate;

pub type OpenAiPipeline = PricingPipeline<LlmVehicleExtractor<OpenAiGenerator>, PriceTable>;

pub fn build_pipeline(config: &AppConfig) -> Result<OpenAiPipeline> {
    config.validate()?;

    let timeout = config.request_timeout();
    let generator = OpenAiGenerator::new(config.api_key()?)
        .with_base_url(config.base_url())
        .with_model(config.model())
        .with_temperature(config.temperature())
        .with_request_timeout(timeout)
        .map_err(|e| AppError::ConfigValidationError {
            field: "llm".to_string(),
            message: e.to_string(),
        })?;

    let table = config.price_table()?;
    tracing::info!(
        model = %generator.model(),
        base_url = %generator.base_url(),
        known_vehicles = table.len(),
        "⚙️ Pipeline configured"
    );

    let extractor = LlmVehicleExtractor::new(generator).with_timeout(timeout);
    Ok(PricingPipeline::new(extractor, table))
}
