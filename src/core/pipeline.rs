use crate::domain::model::{CarListingRequest, ExtractionFailureReason, PipelineOutcome};
use crate::domain::ports::{ListingPricer, PriceResolver, VehicleExtractor};
use crate::utils::error::ExtractionError;
use async_trait::async_trait;

/// validate → extract → resolve，任何一步失敗即結束，不重試
pub struct PricingPipeline<E: VehicleExtractor, R: PriceResolver> {
    extractor: E,
    resolver: R,
}

impl<E: VehicleExtractor, R: PriceResolver> PricingPipeline<E, R> {
    pub fn new(extractor: E, resolver: R) -> Self {
        Self {
            extractor,
            resolver,
        }
    }

    pub async fn run(&self, request: &CarListingRequest) -> PipelineOutcome {
        if let Err(e) = request.validate() {
            tracing::info!(error = %e, "📋 Rejected malformed listing");
            return PipelineOutcome::MalformedInput(e.violations);
        }

        let extracted = self
            .extractor
            .extract(&request.title, &request.description)
            .await
            // 替身或其他實作的輸出也走同一條驗證
            .and_then(|vehicle| vehicle.validated());

        let vehicle = match extracted {
            Ok(vehicle) => vehicle,
            Err(ExtractionError::VehicleNotIdentifiable) => {
                tracing::info!("🔍 Model could not identify a vehicle in the listing");
                return PipelineOutcome::ExtractionFailure(
                    ExtractionFailureReason::VehicleNotIdentifiable,
                );
            }
            Err(ExtractionError::MalformedModelOutput { detail }) => {
                tracing::error!(%detail, "❌ Model output could not be validated");
                return PipelineOutcome::ExtractionFailure(
                    ExtractionFailureReason::MalformedModelOutput,
                );
            }
            Err(ExtractionError::Transport(cause)) => {
                tracing::error!(error = %cause, "❌ Generative service call failed");
                return PipelineOutcome::TransportFailure {
                    cause: cause.to_string(),
                };
            }
        };

        tracing::debug!(make = %vehicle.make, model = %vehicle.model, "Extracted vehicle");

        match self.resolver.resolve(&vehicle.make, &vehicle.model) {
            Ok(estimate) => {
                tracing::info!(
                    make = %estimate.make,
                    model = %estimate.model,
                    price = estimate.price,
                    "✅ Priced listing"
                );
                PipelineOutcome::Success(estimate)
            }
            Err(e) => {
                tracing::info!(make = %e.make, model = %e.model, "No price for vehicle");
                PipelineOutcome::UnknownVehicleFailure {
                    make: e.make,
                    model: e.model,
                }
            }
        }
    }
}

#[async_trait]
impl<E: VehicleExtractor, R: PriceResolver> ListingPricer for PricingPipeline<E, R> {
    async fn price_car_listing(&self, request: CarListingRequest) -> PipelineOutcome {
        self.run(&request).await
    }
}
