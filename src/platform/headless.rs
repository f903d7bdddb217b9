// src/platform/headless.rs

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    models::export::{Notice, PrintJob, SharePayload},
    platform::{Platform, PlatformError, ShareCapabilities},
};

/// What the widget asked the platform to do, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    Printed { title: String, html: String },
    Shared { title: String, text: Option<String>, file_name: Option<String> },
    ClipboardWrite(String),
    Downloaded { file_name: String, bytes: Vec<u8> },
    OpenedUrl(String),
    Notified(Notice),
}

/// Platform without any real surface. It records every call and can be told
/// to refuse or fail specific ones. Used for scripted runs and tests.
pub struct HeadlessPlatform {
    capabilities: ShareCapabilities,
    events: Mutex<Vec<PlatformEvent>>,
    clipboard_failures: Mutex<u32>,
    decline_share: bool,
    refuse_urls: bool,
    fail_downloads: bool,
    share_delay: Option<Duration>,
}

impl HeadlessPlatform {
    pub fn new(capabilities: ShareCapabilities) -> Self {
        Self {
            capabilities,
            events: Mutex::new(Vec::new()),
            clipboard_failures: Mutex::new(0),
            decline_share: false,
            refuse_urls: false,
            fail_downloads: false,
            share_delay: None,
        }
    }

    /// The next `count` clipboard writes fail.
    pub fn with_clipboard_failures(self, count: u32) -> Self {
        *self.clipboard_failures.lock().unwrap_or_else(|e| e.into_inner()) = count;
        self
    }

    pub fn declining_shares(mut self) -> Self {
        self.decline_share = true;
        self
    }

    pub fn refusing_urls(mut self) -> Self {
        self.refuse_urls = true;
        self
    }

    pub fn failing_downloads(mut self) -> Self {
        self.fail_downloads = true;
        self
    }

    /// Keeps share calls in flight for a while.
    pub fn with_share_delay(mut self, delay: Duration) -> Self {
        self.share_delay = Some(delay);
        self
    }

    pub fn events(&self) -> Vec<PlatformEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PlatformEvent::Notified(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: PlatformEvent) {
        tracing::debug!("Headless platform: {:?}", event);
        self.events.lock().unwrap_or_else(|e| e.into_inner()).push(event);
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new(ShareCapabilities { text: true, files: true })
    }
}

#[async_trait]
impl Platform for HeadlessPlatform {
    fn share_capabilities(&self) -> ShareCapabilities {
        self.capabilities
    }

    async fn print(&self, job: PrintJob) -> Result<(), PlatformError> {
        self.record(PlatformEvent::Printed { title: job.title, html: job.html });
        Ok(())
    }

    async fn share(&self, payload: SharePayload) -> Result<(), PlatformError> {
        if let Some(delay) = self.share_delay {
            tokio::time::sleep(delay).await;
        }

        let file_share = payload.file.is_some();
        if (file_share && !self.capabilities.files) || (!file_share && !self.capabilities.text) {
            return Err(PlatformError::Unsupported);
        }
        if self.decline_share {
            return Err(PlatformError::Declined);
        }

        self.record(PlatformEvent::Shared {
            title: payload.title,
            text: payload.text,
            file_name: payload.file.map(|file| file.name),
        });
        Ok(())
    }

    async fn write_clipboard(&self, text: &str) -> Result<(), PlatformError> {
        {
            let mut failures = self.clipboard_failures.lock().unwrap_or_else(|e| e.into_inner());
            if *failures > 0 {
                *failures -= 1;
                return Err(PlatformError::Command {
                    command: "clipboard".into(),
                    reason: "clipboard is busy".into(),
                });
            }
        }

        self.record(PlatformEvent::ClipboardWrite(text.to_string()));
        Ok(())
    }

    async fn save_download(&self, staged: &Path, file_name: &str) -> Result<PathBuf, PlatformError> {
        if self.fail_downloads {
            return Err(PlatformError::Command {
                command: "save".into(),
                reason: "no space left on device".into(),
            });
        }
        let bytes = tokio::fs::read(staged).await?;
        self.record(PlatformEvent::Downloaded { file_name: file_name.to_string(), bytes });
        Ok(PathBuf::from(file_name))
    }

    async fn open_url(&self, url: &str) -> Result<(), PlatformError> {
        if self.refuse_urls {
            return Err(PlatformError::Unsupported);
        }
        self.record(PlatformEvent::OpenedUrl(url.to_string()));
        Ok(())
    }

    fn notify(&self, notice: &Notice) {
        self.record(PlatformEvent::Notified(notice.clone()));
    }
}
