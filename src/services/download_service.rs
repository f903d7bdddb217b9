// src/services/download_service.rs

use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use tempfile::NamedTempFile;

use crate::{common::error::AppError, models::export::ExportFile, platform::Platform};

const FILE_PREFIX: &str = "chitfund_invoice_";
const DEFAULT_STEM: &str = "customer";

/// `chitfund_invoice_<name>.pdf`, whitespace runs collapsed to `_`.
pub fn pdf_file_name(customer_name: &str) -> String {
    let words: Vec<&str> = customer_name.split_whitespace().collect();
    let stem = if words.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        words.join("_")
    };
    let stem = stem.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");

    format!("{FILE_PREFIX}{stem}.pdf")
}

/// Bytes waiting to be handed to the platform's save flow. The backing file
/// is removed when this value is dropped, whatever happened in between.
pub struct StagedFile {
    file: NamedTempFile,
}

impl StagedFile {
    pub fn stage(spool_dir: &Path, export: &ExportFile) -> Result<Self, AppError> {
        std::fs::create_dir_all(spool_dir)?;
        let mut file = tempfile::Builder::new()
            .prefix("staged-")
            .suffix(".part")
            .tempfile_in(spool_dir)?;
        file.write_all(&export.bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[derive(Clone)]
pub struct DownloadService {
    platform: Arc<dyn Platform>,
    spool_dir: PathBuf,
}

impl DownloadService {
    pub fn new(platform: Arc<dyn Platform>, spool_dir: PathBuf) -> Self {
        Self { platform, spool_dir }
    }

    /// Stages the file and triggers the platform save. Returns where it was saved.
    pub async fn download(&self, export: &ExportFile) -> Result<PathBuf, AppError> {
        let staged = StagedFile::stage(&self.spool_dir, export)?;
        tracing::debug!("Staged {} at {}", export.name, staged.path().display());

        let saved = self.platform.save_download(staged.path(), &export.name).await?;
        Ok(saved)
    }
}
