//! Error handling for the event viewer
//!
//! This module defines the crate error type and a Result alias. Errors only
//! surface at the outer edges (settings files, input files, the CLI). Bad data
//! flowing through the pipeline is never an error: it is reported through a
//! [`ValidationReport`](crate::pipeline::ValidationReport) instead.

use thiserror::Error;

/// Main error type for event viewer operations
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Errors related to settings loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to reading an input data matrix
    #[error("Input error: {0}")]
    Input(String),

    /// Errors related to resolving a host locale
    #[error("Unknown locale: {0}")]
    Locale(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ViewerError>,
    },
}

impl ViewerError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ViewerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        ViewerError::Serialization(err.to_string())
    }
}

/// Result type alias for event viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ViewerError::Input("no rows".to_string());
        assert_eq!(err.to_string(), "Input error: no rows");
    }

    #[test]
    fn test_error_with_context() {
        let err = ViewerError::Config("bad padding".to_string());
        let with_ctx = err.with_context("Failed to load settings.json");
        assert!(with_ctx.to_string().contains("Failed to load settings.json"));
        assert!(with_ctx.to_string().contains("bad padding"));
    }

    #[test]
    fn test_result_ext_context() {
        let res: Result<()> = Err(ViewerError::Locale("xx-YY".to_string()));
        let err = res.context("Building formatter").unwrap_err();
        assert!(matches!(err, ViewerError::WithContext { .. }));
        assert!(err.to_string().starts_with("Building formatter"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<u32, _> = serde_json::from_str::<u32>("{");
        let err: ViewerError = parse.unwrap_err().into();
        assert!(matches!(err, ViewerError::Serialization(_)));
    }
}
