use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read {operation}: {reason}")]
    StorageRead {
        operation: &'static str,
        reason: String,
    },

    #[error("Failed to write {operation}: {reason}")]
    StorageWrite {
        operation: &'static str,
        reason: String,
    },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("'{name}' already exists")]
    AlreadyExists { name: String },

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn read(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::StorageRead {
            operation,
            reason: err.to_string(),
        }
    }

    pub fn write(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::StorageWrite {
            operation,
            reason: err.to_string(),
        }
    }

    pub fn tracker_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: "Tracker",
            id: id.to_string(),
        }
    }

    /// True for failures that came from the storage collaborator.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::StorageRead { .. } | Self::StorageWrite { .. })
    }
}
