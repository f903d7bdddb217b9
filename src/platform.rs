// src/platform.rs

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::export::{Notice, PrintJob, SharePayload};

pub mod desktop;
pub mod headless;

pub use desktop::DesktopPlatform;
pub use headless::{HeadlessPlatform, PlatformEvent};

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Not supported on this platform")]
    Unsupported,

    #[error("Cancelled by the user")]
    Declined,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Command `{command}` failed: {reason}")]
    Command { command: String, reason: String },
}

impl PlatformError {
    /// Errors after which an export should try its fallback path.
    pub fn allows_fallback(&self) -> bool {
        matches!(self, PlatformError::Unsupported | PlatformError::Declined)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareCapabilities {
    pub text: bool,
    pub files: bool,
}

/// Everything the widget needs from its host environment: print dialog,
/// share sheet, clipboard, downloads, URL opener and user notices.
#[async_trait]
pub trait Platform: Send + Sync {
    fn share_capabilities(&self) -> ShareCapabilities;

    async fn print(&self, job: PrintJob) -> Result<(), PlatformError>;

    async fn share(&self, payload: SharePayload) -> Result<(), PlatformError>;

    async fn write_clipboard(&self, text: &str) -> Result<(), PlatformError>;

    /// Saves a staged file under `file_name` and returns where it ended up.
    async fn save_download(&self, staged: &Path, file_name: &str) -> Result<PathBuf, PlatformError>;

    async fn open_url(&self, url: &str) -> Result<(), PlatformError>;

    fn notify(&self, notice: &Notice);
}
