// src/services/print_service.rs

use std::sync::Arc;

use crate::{
    models::{export::PrintJob, preview::PreviewDocument},
    platform::Platform,
    services::markup,
};

#[derive(Clone)]
pub struct PrintService {
    platform: Arc<dyn Platform>,
}

impl PrintService {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }

    /// Sends the preview to the platform print flow. A failed or cancelled
    /// print looks the same as a successful one to the caller.
    pub async fn print(&self, doc: &PreviewDocument) {
        let job = PrintJob {
            title: format!("{} - {}", doc.title, doc.signatures.receiver),
            html: markup::render_print_page(doc),
        };

        if let Err(e) = self.platform.print(job).await {
            tracing::warn!("Print did not go through: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        models::{invoice::InvoiceDraft, preview::Organization},
        platform::{HeadlessPlatform, PlatformEvent},
        services::preview_service::PreviewService,
    };

    #[tokio::test]
    async fn prints_the_preview_markup() {
        let platform = Arc::new(HeadlessPlatform::default());
        let doc = PreviewService::new(Organization::default())
            .render(&InvoiceDraft::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));

        PrintService::new(platform.clone()).print(&doc).await;

        match platform.events().as_slice() {
            [PlatformEvent::Printed { title, html }] => {
                assert_eq!(title, "Receipt - -");
                assert_eq!(html, &markup::render_print_page(&doc));
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }
}
