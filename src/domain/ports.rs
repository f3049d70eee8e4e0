use crate::domain::model::{CarListingRequest, ExtractedVehicle, PipelineOutcome, PriceEstimate};
use crate::utils::error::{ExtractionError, GenerationError, UnknownVehicleError};
use async_trait::async_trait;

/// 送給生成式模型的提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Outbound capability: turn a prompt into raw model text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError>;
}

#[async_trait]
pub trait VehicleExtractor: Send + Sync {
    async fn extract(
        &self,
        title: &str,
        description: &str,
    ) -> Result<ExtractedVehicle, ExtractionError>;
}

/// Synchronous by contract: resolution never suspends the caller.
pub trait PriceResolver: Send + Sync {
    fn resolve(&self, make: &str, model: &str) -> Result<PriceEstimate, UnknownVehicleError>;
}

/// Inbound operation used by the HTTP boundary and the CLI.
#[async_trait]
pub trait ListingPricer: Send + Sync {
    async fn price_car_listing(&self, request: CarListingRequest) -> PipelineOutcome;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for std::sync::Arc<T> {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        (**self).generate(prompt).await
    }
}

#[async_trait]
impl<T: VehicleExtractor + ?Sized> VehicleExtractor for std::sync::Arc<T> {
    async fn extract(
        &self,
        title: &str,
        description: &str,
    ) -> Result<ExtractedVehicle, ExtractionError> {
        (**self).extract(title, description).await
    }
}

impl<T: PriceResolver + ?Sized> PriceResolver for std::sync::Arc<T> {
    fn resolve(&self, make: &str, model: &str) -> Result<PriceEstimate, UnknownVehicleError> {
        (**self).resolve(make, model)
    }
}
