/// Configuration errors. Never fatal to the host: the engine falls back to
/// built-in defaults and reports these as warnings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    #[error("{field} = {value} outside [{min}, {max}]")]
    ThresholdOutOfBounds {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
