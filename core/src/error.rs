//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// `Provider`, `Schema` and `Document` mirror the three failure classes of the
/// generation pipeline and are always constructed explicitly.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Schema introspection failed (connectivity loss, unreadable source).
    #[from(ignore)]
    #[display("Provider Error: {_0}")]
    Provider(String),

    /// A table yields no usable columns.
    #[from(ignore)]
    #[display("Schema Error: {_0}")]
    Schema(String),

    /// The assembled document would be inconsistent.
    #[from(ignore)]
    #[display("Document Error: {_0}")]
    Document(String),

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Generic errors (configuration, serialization).
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        // String must land in General, never in one of the pipeline variants
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_pipeline_variants_display() {
        let err = AppError::Schema("table 'empty' has no columns".into());
        assert_eq!(
            format!("{}", err),
            "Schema Error: table 'empty' has no columns"
        );
        let err = AppError::Document("duplicate operationId 'list_users'".into());
        assert_eq!(
            err.to_string(),
            "Document Error: duplicate operationId 'list_users'"
        );
        let err = AppError::Provider("connection reset".into());
        assert_eq!(err.to_string(), "Provider Error: connection reset");
    }
}
