pub mod extractor;
pub mod pipeline;
pub mod resolver;

pub use crate::domain::model::{
    CarListingRequest, ExtractedVehicle, ExtractionFailureReason, PipelineOutcome, PriceEstimate,
};
pub use crate::domain::ports::{ListingPricer, PriceResolver, Prompt, TextGenerator, VehicleExtractor};
