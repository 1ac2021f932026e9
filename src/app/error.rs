use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StorageUnavailable,
    MalformedDocument,
    ValidationFailed,
    NotFound,
    Unauthorized,
    Forbidden,
    ImagePicker,
}

/// Recoverable failure of a single operation. The message is meant to be shown
/// to the user as-is; nothing here is fatal to the process.
#[derive(Debug, Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::StorageUnavailable,
            message: message.into(),
        }
    }

    pub fn malformed_document(key: &str) -> Self {
        Self {
            kind: ErrorKind::MalformedDocument,
            message: format!("stored document {} is malformed", key),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ValidationFailed,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Unauthorized,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Forbidden,
            message: message.into(),
        }
    }

    pub fn image_picker(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ImagePicker,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;
