use thiserror::Error;

use crate::{
    models::{export::Notice, invoice::FieldName},
    platform::PlatformError,
};

pub const CLIPBOARD_FAILED_MESSAGE: &str = "Could not copy the receipt. Please try again.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invoice preview is not available")]
    SourceUnavailable,

    #[error("Another export is already running")]
    ExportInProgress,

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: FieldName, value: String },

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Clipboard write failed")]
    ClipboardFailed(#[source] PlatformError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] genpdf::error::Error),

    // Anything unexpected; the context travels inside the anyhow error.
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Converts the error into the one-line message shown to the user.
    pub fn to_notice(&self) -> Notice {
        let message = match self {
            AppError::SourceUnavailable => {
                "Invoice preview is not available. Open the invoice and try again."
            }
            AppError::ExportInProgress => "Please wait, another export is still running.",
            AppError::UnknownField(_) | AppError::InvalidValue { .. } => {
                return Notice::error(self.to_string());
            }
            AppError::FontNotFound(_) => "Fonts for the invoice are missing.",
            AppError::ClipboardFailed(_) => CLIPBOARD_FAILED_MESSAGE,

            // Everything else is logged with full detail and shown generically.
            e => {
                tracing::error!("Export failed: {:?}", e);
                "Something went wrong while exporting the invoice."
            }
        };

        Notice::error(message)
    }
}
