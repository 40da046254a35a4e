use thiserror::Error;

/// Errors from loading or saving a [`GameConfig`](crate::GameConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The JSON could not be read as a config
    #[error("Failed to parse game config")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
    /// The config could not be written out as JSON
    #[error("Failed to serialize game config")]
    Serialize { source: serde_json::Error },
    /// A field parsed but is out of range
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
