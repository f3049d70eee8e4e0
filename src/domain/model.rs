use crate::utils::error::{ExtractionError, FieldViolation, InputError};
use crate::utils::validation::check_non_blank;
use serde::{Deserialize, Serialize};

/// 模型被要求在無法辨識時輸出的值
pub const UNKNOWN_SENTINEL: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarListingRequest {
    pub title: String,
    pub description: String,
}

impl CarListingRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// 檢查 title/description 皆非空白，一次回報所有欄位
    pub fn validate(&self) -> Result<(), InputError> {
        let violations: Vec<FieldViolation> = [
            check_non_blank("title", &self.title),
            check_non_blank("description", &self.description),
        ]
        .into_iter()
        .flatten()
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(InputError { violations })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedVehicle {
    pub make: String,
    pub model: String,
}

impl ExtractedVehicle {
    /// Builds a vehicle from possibly-absent model fields, rejecting blank or
    /// sentinel values instead of defaulting them.
    pub fn from_parts(make: Option<String>, model: Option<String>) -> Result<Self, ExtractionError> {
        match (make, model) {
            (Some(make), Some(model)) => Self { make, model }.validated(),
            _ => Err(ExtractionError::VehicleNotIdentifiable),
        }
    }

    /// Trims both fields and enforces that neither is blank or the
    /// "unknown" sentinel.
    pub fn validated(self) -> Result<Self, ExtractionError> {
        let make = self.make.trim();
        let model = self.model.trim();

        if is_unidentified(make) || is_unidentified(model) {
            return Err(ExtractionError::VehicleNotIdentifiable);
        }

        Ok(Self {
            make: make.to_string(),
            model: model.to_string(),
        })
    }
}

fn is_unidentified(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case(UNKNOWN_SENTINEL)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub make: String,
    pub model: String,
    pub price: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionFailureReason {
    VehicleNotIdentifiable,
    MalformedModelOutput,
}

/// 單次請求的最終結果，每個終止狀態都有自己的變體
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Success(PriceEstimate),
    MalformedInput(Vec<FieldViolation>),
    ExtractionFailure(ExtractionFailureReason),
    UnknownVehicleFailure { make: String, model: String },
    TransportFailure { cause: String },
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success(_))
    }

    /// 日誌用的短標籤
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineOutcome::Success(_) => "success",
            PipelineOutcome::MalformedInput(_) => "malformed_input",
            PipelineOutcome::ExtractionFailure(ExtractionFailureReason::VehicleNotIdentifiable) => {
                "vehicle_not_identifiable"
            }
            PipelineOutcome::ExtractionFailure(ExtractionFailureReason::MalformedModelOutput) => {
                "malformed_model_output"
            }
            PipelineOutcome::UnknownVehicleFailure { .. } => "unknown_vehicle",
            PipelineOutcome::TransportFailure { .. } => "transport_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_validation_reports_both_fields() {
        let err = CarListingRequest::new("", "  ").validate().unwrap_err();
        let fields: Vec<&str> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "description"]);
    }

    #[test]
    fn test_request_validation_accepts_text() {
        assert!(CarListingRequest::new("Selling a 2007 Honda Accord", "It's a reliable car.")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_vehicle_is_trimmed() {
        let vehicle = ExtractedVehicle {
            make: "  Honda ".into(),
            model: "Accord\n".into(),
        }
        .validated()
        .unwrap();
        assert_eq!(vehicle.make, "Honda");
        assert_eq!(vehicle.model, "Accord");
    }

    #[test]
    fn test_blank_or_sentinel_fields_are_rejected() {
        for (make, model) in [("", "Accord"), ("Honda", "   "), ("Unknown", "unknown"), ("Honda", "UNKNOWN")] {
            let result = ExtractedVehicle {
                make: make.into(),
                model: model.into(),
            }
            .validated();
            assert_eq!(result, Err(ExtractionError::VehicleNotIdentifiable), "{make}/{model}");
        }
    }

    #[test]
    fn test_missing_parts_are_not_defaulted() {
        assert_eq!(
            ExtractedVehicle::from_parts(None, Some("Accord".into())),
            Err(ExtractionError::VehicleNotIdentifiable)
        );
        assert!(ExtractedVehicle::from_parts(Some("Ford".into()), Some("Focus".into())).is_ok());
    }
}
