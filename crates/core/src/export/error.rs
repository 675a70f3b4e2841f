//! Export pipeline error types.

use rasid_shared::AppError;
use thiserror::Error;

use crate::period::PeriodError;
use crate::render::RenderError;
use crate::reports::ReportError;
use crate::storage::StorageError;

/// Which stage of the export failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorKind {
    /// Input rejected before any computation.
    Validation,
    /// Document writer failed.
    Render,
    /// Artifact could not be stored.
    Delivery,
}

/// Errors that can occur during an export.
///
/// Stage errors are carried unchanged.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Invalid request.
    #[error(transparent)]
    Validation(#[from] ReportError),

    /// Rendering failed.
    #[error(transparent)]
    Render(RenderError),

    /// Delivery failed.
    #[error(transparent)]
    Delivery(#[from] StorageError),
}

impl ExportError {
    /// Stage the error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ExportErrorKind {
        match self {
            Self::Validation(_) => ExportErrorKind::Validation,
            Self::Render(_) => ExportErrorKind::Render,
            Self::Delivery(_) => ExportErrorKind::Delivery,
        }
    }
}

impl From<RenderError> for ExportError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Validation(inner) => Self::Validation(inner),
            other => Self::Render(other),
        }
    }
}

impl From<PeriodError> for ExportError {
    fn from(err: PeriodError) -> Self {
        Self::Validation(err.into())
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ExportErrorKind::Validation => Self::Validation(message),
            ExportErrorKind::Render => Self::Render(message),
            ExportErrorKind::Delivery => Self::Delivery(message),
        }
    }
}
