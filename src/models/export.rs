// src/models/export.rs

use std::fmt;

pub const PDF_MIME: &str = "application/pdf";

/// A generated file ready to be downloaded or attached to a share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPdf {
    pub file: ExportFile,
    /// True when the preview was taller than one page and got cut off.
    pub clipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: Option<String>,
    pub file: Option<ExportFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub title: String,
    /// Print-only markup of the preview. Form controls are never part of it.
    pub html: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportAction {
    Print,
    DownloadPdf,
    SharePdf,
    ShareText,
    ShareWhatsApp,
    CopyText,
}

impl fmt::Display for ExportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportAction::Print => "print",
            ExportAction::DownloadPdf => "download",
            ExportAction::SharePdf => "share",
            ExportAction::ShareText => "share-text",
            ExportAction::ShareWhatsApp => "whatsapp",
            ExportAction::CopyText => "copy",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    Idle,
    InProgress(ExportAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-line message surfaced to the user, the equivalent of an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
