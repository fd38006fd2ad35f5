use thiserror::Error;

/// Category of a [`SnippetError`], independent of the message it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Persistence,
    UnsupportedOperation,
}

impl ErrorKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Validation Error",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Persistence => "I/O Error",
            ErrorKind::UnsupportedOperation => "Unsupported Operation",
        }
    }
}

#[derive(Error, Debug)]
pub enum SnippetError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Persistence {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{0}")]
    UnsupportedOperation(String),
}

pub type Result<T> = std::result::Result<T, SnippetError>;

impl SnippetError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps a lower-level failure at the storage boundary, keeping it as the source.
    pub fn persistence_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Persistence {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SnippetError::Validation(_) => ErrorKind::Validation,
            SnippetError::NotFound(_) => ErrorKind::NotFound,
            SnippetError::Persistence { .. } => ErrorKind::Persistence,
            SnippetError::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
        }
    }

    /// Message prefixed with its category, e.g. `[Not Found] No snippet found with ID: 7`.
    pub fn formatted(&self) -> String {
        match self {
            SnippetError::Persistence {
                source: Some(source),
                ..
            } => format!("[{}] {}: {}", self.kind().display_name(), self, source),
            _ => format!("[{}] {}", self.kind().display_name(), self),
        }
    }
}

impl From<std::io::Error> for SnippetError {
    fn from(err: std::io::Error) -> Self {
        Self::persistence_with("I/O failure", err)
    }
}

impl From<serde_json::Error> for SnippetError {
    fn from(err: serde_json::Error) -> Self {
        Self::persistence_with("Failed to process JSON data", err)
    }
}

impl From<serde_yaml::Error> for SnippetError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::persistence_with("Failed to process YAML data", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(SnippetError::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(SnippetError::not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(
            SnippetError::persistence("x").kind(),
            ErrorKind::Persistence
        );
        assert_eq!(
            SnippetError::unsupported("x").kind(),
            ErrorKind::UnsupportedOperation
        );
    }

    #[test]
    fn test_formatted_message_carries_category() {
        let err = SnippetError::not_found("No snippet found with ID: 7");
        assert_eq!(err.formatted(), "[Not Found] No snippet found with ID: 7");
    }

    #[test]
    fn test_io_error_maps_to_persistence() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SnippetError = io.into();
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert!(err.formatted().contains("denied"));
    }
}
