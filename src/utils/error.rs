use serde::Serialize;
use thiserror::Error;

/// 啟動、配置與伺服器層級的錯誤
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

impl AppError {
    /// 給終端使用者看的訊息，不含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::IoError(_) => "Could not read or write a required file.".to_string(),
            AppError::ConfigValidationError { field, .. } => {
                format!("The configuration is invalid ({}).", field)
            }
            AppError::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured.", field)
            }
            AppError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            AppError::ServerError { .. } => "The server could not be started.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// 呼叫生成式模型服務時的傳輸層錯誤
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Generator configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unreadable API response: {0}")]
    Parse(String),
}

/// Extractor 的三種失敗情況
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("Model output is not a valid vehicle object: {detail}")]
    MalformedModelOutput { detail: String },

    #[error("Could not identify a vehicle make and model in the listing")]
    VehicleNotIdentifiable,

    #[error("Extraction transport failure: {0}")]
    Transport(#[from] GenerationError),
}

/// 價格表中找不到此 (make, model)；保留原始大小寫
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Pricing for make '{make}' and model '{model}' is not available.")]
pub struct UnknownVehicleError {
    pub make: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// 請求本身不合法 (client error)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputError {
    pub violations: Vec<FieldViolation>,
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect();
        write!(f, "Malformed input: {}", fields.join("; "))
    }
}

impl std::error::Error for InputError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_vehicle_message_keeps_original_casing() {
        let err = UnknownVehicleError {
            make: "Tesla".to_string(),
            model: "Model S".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Pricing for make 'Tesla' and model 'Model S' is not available."
        );
    }

    #[test]
    fn test_transport_error_wraps_generation_error() {
        let err: ExtractionError = GenerationError::Network("connection reset".into()).into();
        assert!(matches!(err, ExtractionError::Transport(GenerationError::Network(_))));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_input_error_lists_every_field() {
        let err = InputError {
            violations: vec![
                FieldViolation {
                    field: "title".into(),
                    message: "must not be empty".into(),
                },
                FieldViolation {
                    field: "description".into(),
                    message: "must not be empty".into(),
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("title: must not be empty"));
        assert!(text.contains("description: must not be empty"));
    }

    #[test]
    fn test_user_friendly_message_hides_values() {
        let err = AppError::InvalidConfigValueError {
            field: "llm.api_key".into(),
            value: "sk-secret".into(),
            reason: "Value cannot be empty or whitespace-only".into(),
        };
        assert!(!err.user_friendly_message().contains("sk-secret"));
    }
}
