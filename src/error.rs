use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Invalid {name} band [{min}, {max}]: bounds must be finite, non-negative and min <= max")]
    InvalidBand { name: String, min: f64, max: f64 },

    #[error("Invalid column mapping for {record_kind}: {details}")]
    InvalidColumnMapping {
        record_kind: String,
        details: String,
    },

    #[error("Invalid category rule '{category}': {details}")]
    InvalidCategoryRule { category: String, details: String },

    #[error("Invalid trend event '{label}': {details}")]
    InvalidTrendEvent { label: String, details: String },

    #[error("Invalid {name} {value}: must be greater than zero")]
    InvalidLimit { name: String, value: usize },

    #[error("Invalid price policy: {0}")]
    InvalidPricePolicy(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InsightsError>;
