pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod testing;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::AppConfig;
pub use crate::core::{
    extractor::LlmVehicleExtractor, pipeline::PricingPipeline, resolver::PriceTable,
};
pub use crate::domain::model::{
    CarListingRequest, ExtractedVehicle, ExtractionFailureReason, PipelineOutcome, PriceEstimate,
};
pub use crate::utils::error::{AppError, ExtractionError, GenerationError, Result, UnknownVehicleError};
