//! Purpose: Uncategorized error type for failures that carry no native status code.
//! Exports: `Error`, `ErrorKind`, `to_exit_code`.
//! Role: Covers `to_string` failures, CLI usage/IO errors, and wraps `ConfigError` for `?`.
//! Invariants: Only `ErrorKind::Status` errors expose a `ConfigError` through `status()`.
use std::error::Error as StdError;
use std::fmt;

use crate::core::status::ConfigError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    NotFound,
    Io,
    Status,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The wrapped native status error, if this error came from one.
    pub fn status(&self) -> Option<&ConfigError> {
        if self.kind != ErrorKind::Status {
            return None;
        }
        self.source
            .as_ref()
            .and_then(|source| source.downcast_ref::<ConfigError>())
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::new(ErrorKind::Status)
            .with_message(err.context().to_string())
            .with_source(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(status) = self.status() {
            write!(f, " (code: {}, {})", status.code(), status.classified_message())?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::Io => 4,
        ErrorKind::Status => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, to_exit_code};
    use crate::core::status::{ConfigError, ErrorCode};

    #[test]
    fn exit_code_mapping_is_stable() {
        let cases = [
            (ErrorKind::Internal, 1),
            (ErrorKind::Usage, 2),
            (ErrorKind::NotFound, 3),
            (ErrorKind::Io, 4),
            (ErrorKind::Status, 5),
        ];

        for (kind, code) in cases {
            assert_eq!(to_exit_code(kind), code);
        }
    }

    #[test]
    fn status_is_recovered_only_from_wrapped_config_errors() {
        let wrapped: Error = ConfigError::new(ErrorCode::Invalid as i32, "Failed to set x").into();
        assert_eq!(wrapped.kind(), ErrorKind::Status);
        let status = wrapped.status().expect("status");
        assert_eq!(status.code(), ErrorCode::Invalid as i32);
        assert_eq!(wrapped.message(), Some("Failed to set x"));

        let plain = Error::new(ErrorKind::Internal).with_message("to_string failed");
        assert!(plain.status().is_none());
        assert_eq!(plain.to_string(), "Internal: to_string failed");
    }
}
