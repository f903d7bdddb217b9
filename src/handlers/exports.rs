// src/handlers/exports.rs

use crate::{
    common::error::AppError,
    handlers::widget::InvoiceWidget,
    models::export::{ExportAction, GeneratedPdf, Notice},
    services::download_service::pdf_file_name,
};

pub const CLIPPED_NOTE: &str = "The invoice was taller than one page and was cut off at the bottom.";

// --- EXPORT ACTIONS ---
// Every action runs behind the widget's busy flag and ends in at most one
// notice, which is also handed to the platform.

impl InvoiceWidget {
    /// Opens the platform print flow for the preview. Success is silent.
    pub async fn print(&self) -> Option<Notice> {
        let result = self.run_print().await;
        self.settle(ExportAction::Print, result)
    }

    pub async fn download_pdf(&self) -> Option<Notice> {
        let result = self.run_download_pdf().await.map(Some);
        self.settle(ExportAction::DownloadPdf, result)
    }

    /// Shares the PDF, or downloads it and opens a compose view when files
    /// cannot be shared.
    pub async fn share_pdf(&self) -> Option<Notice> {
        let result = self.run_share_pdf().await.map(Some);
        self.settle(ExportAction::SharePdf, result)
    }

    pub async fn share_text(&self) -> Option<Notice> {
        let result = async {
            let _busy = self.gate.begin(ExportAction::ShareText)?;
            let draft = self.draft().ok_or(AppError::SourceUnavailable)?;
            self.state.share_service.share_text(draft).await
        }
        .await;

        self.settle(ExportAction::ShareText, result.map(Some))
    }

    pub async fn share_whatsapp(&self) -> Option<Notice> {
        let result = async {
            let _busy = self.gate.begin(ExportAction::ShareWhatsApp)?;
            let draft = self.draft().ok_or(AppError::SourceUnavailable)?;
            self.state.share_service.share_whatsapp(draft).await
        }
        .await;

        self.settle(ExportAction::ShareWhatsApp, result.map(Some))
    }

    pub async fn copy(&self) -> Option<Notice> {
        let result = async {
            let _busy = self.gate.begin(ExportAction::CopyText)?;
            let draft = self.draft().ok_or(AppError::SourceUnavailable)?;
            self.state.share_service.copy(draft).await
        }
        .await;

        self.settle(ExportAction::CopyText, result.map(Some))
    }

    async fn run_print(&self) -> Result<Option<Notice>, AppError> {
        let _busy = self.gate.begin(ExportAction::Print)?;
        let doc = self.preview().ok_or(AppError::SourceUnavailable)?;
        self.state.print_service.print(doc).await;
        Ok(None)
    }

    async fn run_download_pdf(&self) -> Result<Notice, AppError> {
        let _busy = self.gate.begin(ExportAction::DownloadPdf)?;
        let pdf = self.generate_pdf().await?;

        let saved = self.state.download_service.download(&pdf.file).await?;
        let notice = Notice::info(format!("Invoice saved to {}", saved.display()));
        Ok(with_clip_note(notice, &pdf))
    }

    async fn run_share_pdf(&self) -> Result<Notice, AppError> {
        let _busy = self.gate.begin(ExportAction::SharePdf)?;
        let pdf = self.generate_pdf().await?;
        let customer = self.current_customer()?;

        let notice = self.state.share_service.share_pdf(pdf.file.clone(), &customer).await?;
        Ok(with_clip_note(notice, &pdf))
    }

    // --- HELPERS ---

    async fn generate_pdf(&self) -> Result<GeneratedPdf, AppError> {
        let file_name = pdf_file_name(&self.current_customer()?);
        self.state
            .document_service
            .generate_pdf(self.preview(), file_name)
            .await
    }

    fn current_customer(&self) -> Result<String, AppError> {
        self.draft()
            .map(|draft| draft.customer_name.clone())
            .ok_or(AppError::SourceUnavailable)
    }

    /// Turns the outcome into the notice shown to the user.
    fn settle(&self, action: ExportAction, result: Result<Option<Notice>, AppError>) -> Option<Notice> {
        let notice = match result {
            Ok(notice) => notice,
            Err(e) => {
                tracing::warn!("Export {} failed: {}", action, e);
                Some(e.to_notice())
            }
        }?;

        self.state.platform.notify(&notice);
        Some(notice)
    }
}

fn with_clip_note(notice: Notice, pdf: &GeneratedPdf) -> Notice {
    if pdf.clipped {
        Notice { message: format!("{} {}", notice.message, CLIPPED_NOTE), ..notice }
    } else {
        notice
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::{AppConfig, AppState},
        models::{export::NoticeLevel, invoice::FieldName},
        platform::{HeadlessPlatform, PlatformEvent, ShareCapabilities},
    };

    fn widget_on(platform: HeadlessPlatform) -> (InvoiceWidget, Arc<HeadlessPlatform>, tempfile::TempDir) {
        let spool = tempfile::tempdir().unwrap();
        let platform = Arc::new(platform);
        let config = AppConfig {
            fonts_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/fonts").into(),
            spool_dir: spool.path().to_path_buf(),
            ..AppConfig::default()
        };
        let state = AppState::new(config, platform.clone());
        (InvoiceWidget::mount(state), platform, spool)
    }

    #[tokio::test]
    async fn print_is_silent_on_success() {
        let (widget, platform, _spool) = widget_on(HeadlessPlatform::default());

        assert!(widget.print().await.is_none());
        assert!(matches!(platform.events().as_slice(), [PlatformEvent::Printed { .. }]));
    }

    #[tokio::test]
    async fn unmounted_widget_reports_missing_source() {
        let (mut widget, platform, _spool) = widget_on(HeadlessPlatform::default());
        widget.unmount();

        let notice = widget.download_pdf().await.unwrap();

        assert_eq!(notice, AppError::SourceUnavailable.to_notice());
        assert_eq!(platform.events(), [PlatformEvent::Notified(notice)]);
    }

    #[tokio::test]
    async fn download_saves_a_named_pdf() {
        let (mut widget, platform, _spool) = widget_on(HeadlessPlatform::default());
        widget.update(FieldName::CustomerName, "Meena Kumari").unwrap();

        let notice = widget.download_pdf().await.unwrap();

        assert_eq!(notice.level, NoticeLevel::Info);
        match &platform.events()[0] {
            PlatformEvent::Downloaded { file_name, bytes } => {
                assert_eq!(file_name, "chitfund_invoice_Meena_Kumari.pdf");
                assert!(bytes.starts_with(b"%PDF"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_download_becomes_an_error_notice() {
        let (widget, platform, _spool) = widget_on(HeadlessPlatform::default().failing_downloads());

        let notice = widget.download_pdf().await.unwrap();

        assert!(notice.is_error());
        assert_eq!(platform.notices(), [notice]);
    }

    #[tokio::test]
    async fn missing_fonts_only_block_pdf_exports() {
        let platform = Arc::new(HeadlessPlatform::new(ShareCapabilities { text: false, files: false }));
        let config = AppConfig { fonts_dir: "/nonexistent".into(), ..AppConfig::default() };
        let widget = InvoiceWidget::mount(AppState::new(config, platform.clone()));

        let notice = widget.share_pdf().await.unwrap();
        assert_eq!(notice, AppError::FontNotFound(String::new()).to_notice());

        let notice = widget.copy().await.unwrap();
        assert!(!notice.is_error());
    }

    #[test]
    fn clipped_pdfs_carry_a_note() {
        let pdf = GeneratedPdf {
            file: crate::models::export::ExportFile {
                name: "x.pdf".into(),
                mime: crate::models::export::PDF_MIME,
                bytes: Vec::new(),
            },
            clipped: true,
        };

        let notice = with_clip_note(Notice::info("Invoice saved"), &pdf);

        assert!(notice.message.ends_with(CLIPPED_NOTE));
        assert_eq!(notice.level, NoticeLevel::Info);
    }
}
