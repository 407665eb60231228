use thiserror::Error;

use crate::models::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotReady,
    NoEditSession,
    IndexOutOfRange,
    ValidationError,
    StorageInitError,
    StorageReadError,
    StorageWriteError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotReady => "NOT_READY",
            Self::NoEditSession => "NO_EDIT_SESSION",
            Self::IndexOutOfRange => "INDEX_OUT_OF_RANGE",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::StorageInitError => "STORAGE_INIT_ERROR",
            Self::StorageReadError => "STORAGE_READ_ERROR",
            Self::StorageWriteError => "STORAGE_WRITE_ERROR",
        }
    }

    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::StorageInitError | Self::StorageReadError | Self::StorageWriteError
        )
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct GoalsError {
    pub code: ErrorCode,
    pub message: String,
    /// Populated only for `ErrorCode::ValidationError`.
    pub field_errors: FieldErrors,
}

impl GoalsError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field_errors: FieldErrors::default(),
        }
    }

    pub fn not_ready() -> Self {
        Self::new(ErrorCode::NotReady, "Goal collection has not finished loading")
    }

    pub fn no_edit_session() -> Self {
        Self::new(ErrorCode::NoEditSession, "No goal is being created or edited")
    }

    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::new(
            ErrorCode::IndexOutOfRange,
            format!("Goal index {index} is out of range (have {len} goals)"),
        )
    }

    pub fn validation(field_errors: FieldErrors) -> Self {
        Self {
            code: ErrorCode::ValidationError,
            message: format!("Invalid goal: {}", field_errors.summary()),
            field_errors,
        }
    }

    pub fn storage_init(err: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::StorageInitError, format!("Could not open goal storage: {err}"))
    }

    pub fn storage_read(err: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::StorageReadError, format!("Could not read goals: {err}"))
    }

    pub fn storage_write(err: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::StorageWriteError, format!("Could not write goals: {err}"))
    }

    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::ValidationError
    }
}

impl From<FieldErrors> for GoalsError {
    fn from(errors: FieldErrors) -> Self {
        Self::validation(errors)
    }
}
