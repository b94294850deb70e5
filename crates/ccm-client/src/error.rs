//! Error types for ccm-client

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Kind of write call that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Publish,
    Unpublish,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Publish => "publish",
            Self::Unpublish => "unpublish",
            Self::Delete => "delete",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{resource} '{id}' not found")]
    NotFound { resource: String, id: String },

    /// A create/update/publish/unpublish/delete call was rejected
    #[error("Failed to {operation} {target}: {message}")]
    RemoteWrite {
        operation: Operation,
        target: String,
        status: Option<u16>,
        message: String,
    },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn remote_write(
        operation: Operation,
        target: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::RemoteWrite {
            operation,
            target: target.into(),
            status,
            message: message.into(),
        }
    }

    /// Whether the write was rejected because of a stale version stamp
    pub fn is_version_conflict(&self) -> bool {
        matches!(
            self,
            Self::RemoteWrite {
                status: Some(409),
                ..
            }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_write_display() {
        let err = Error::remote_write(
            Operation::Publish,
            "content type 'blog'",
            Some(422),
            "Validation error",
        );
        assert_eq!(
            err.to_string(),
            "Failed to publish content type 'blog': Validation error"
        );
        assert!(!err.is_version_conflict());
    }

    #[test]
    fn test_version_conflict_detection() {
        let err = Error::remote_write(Operation::Update, "locale 'fr-FR'", Some(409), "conflict");
        assert!(err.is_version_conflict());

        let err = Error::remote_write(Operation::Update, "locale 'fr-FR'", None, "injected");
        assert!(!err.is_version_conflict());
    }
}
