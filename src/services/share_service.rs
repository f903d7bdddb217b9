// src/services/share_service.rs

use std::sync::Arc;

use crate::{
    common::{
        error::AppError,
        format::{format_currency, format_date, or_placeholder, PLACEHOLDER},
    },
    models::{
        export::{ExportFile, Notice, SharePayload},
        invoice::InvoiceDraft,
    },
    platform::Platform,
    services::download_service::DownloadService,
};

pub const SHARE_TITLE: &str = "Chit Fund Receipt";
pub const PDF_SHARE_TITLE: &str = "Chit Fund Invoice";
pub const SIGNATURE_LINE: &str = "-- Generated via ChitFund Invoice App";
pub const COPIED_FOR_SHARING: &str = "Receipt copied to clipboard. Paste it into WhatsApp or anywhere.";
pub const COPIED: &str = "Copied receipt text to clipboard";

const WHATSAPP_COMPOSE: &str = "https://wa.me/?text=";

/// Line-delimited summary of every draft field, in fixed order.
pub fn build_plain_text(draft: &InvoiceDraft) -> String {
    let choice = |label: Option<&'static str>| label.unwrap_or(PLACEHOLDER);

    format!(
        "Chit Fund Receipt\n\n\
         Name: {}\n\
         Date: {}\n\
         Chit No: {}\n\
         Plan: {} (Amount: {})\n\
         Cash Received: {}\n\
         Payment Type: {}\n\
         User: {}\n\
         Collection Agent: {}\n\
         Notes: {}\n\
         Authorized Signatory: {}\n\n\
         {}",
        or_placeholder(&draft.customer_name),
        format_date(draft.date),
        or_placeholder(&draft.chit_number),
        or_placeholder(&draft.plan_name),
        format_currency(&draft.plan_amount),
        format_currency(&draft.cash_received),
        choice(draft.payment_type.map(|p| p.label())),
        choice(draft.user_type.map(|u| u.label())),
        or_placeholder(&draft.agent_name),
        or_placeholder(&draft.notes),
        or_placeholder(&draft.signature),
        SIGNATURE_LINE,
    )
}

pub fn whatsapp_url(text: &str) -> String {
    format!("{WHATSAPP_COMPOSE}{}", urlencoding::encode(text))
}

/// Text for the compose view opened after a PDF had to be downloaded instead
/// of shared. The file cannot be attached automatically from there.
pub fn compose_message(customer_name: &str, file_name: &str) -> String {
    let customer = customer_name.trim();
    let customer = if customer.is_empty() { "customer" } else { customer };
    format!(
        "Chit Fund invoice for {customer}. The PDF was downloaded as {file_name}; \
         please attach it to this chat."
    )
}

#[derive(Clone)]
pub struct ShareService {
    platform: Arc<dyn Platform>,
    downloads: DownloadService,
}

impl ShareService {
    pub fn new(platform: Arc<dyn Platform>, downloads: DownloadService) -> Self {
        Self { platform, downloads }
    }

    /// Share sheet first, clipboard otherwise.
    pub async fn share_text(&self, draft: &InvoiceDraft) -> Result<Notice, AppError> {
        let text = build_plain_text(draft);

        if self.platform.share_capabilities().text {
            match self.platform.share(text_payload(&text)).await {
                Ok(()) => return Ok(Notice::info("Receipt shared")),
                Err(e) => tracing::info!("Text share failed ({}), copying instead", e),
            }
        }

        self.copy_with_retry(&text).await?;
        Ok(Notice::info(COPIED_FOR_SHARING))
    }

    /// Share sheet first, then a WhatsApp compose link, then the clipboard.
    pub async fn share_whatsapp(&self, draft: &InvoiceDraft) -> Result<Notice, AppError> {
        let text = build_plain_text(draft);

        if self.platform.share_capabilities().text {
            match self.platform.share(text_payload(&text)).await {
                Ok(()) => return Ok(Notice::info("Receipt shared")),
                Err(e) => tracing::info!("Text share failed ({}), opening WhatsApp", e),
            }
        }

        match self.platform.open_url(&whatsapp_url(&text)).await {
            Ok(()) => Ok(Notice::info("Opened WhatsApp with the receipt text")),
            Err(e) => {
                tracing::warn!("Could not open WhatsApp: {}", e);
                self.copy_with_retry(&text).await?;
                Ok(Notice::info(COPIED_FOR_SHARING))
            }
        }
    }

    pub async fn copy(&self, draft: &InvoiceDraft) -> Result<Notice, AppError> {
        self.copy_with_retry(&build_plain_text(draft)).await?;
        Ok(Notice::info(COPIED))
    }

    /// Shares the PDF as an attachment. Without file sharing the file is
    /// downloaded first and a compose view is opened with a text message.
    pub async fn share_pdf(&self, file: ExportFile, customer_name: &str) -> Result<Notice, AppError> {
        if self.platform.share_capabilities().files {
            let payload = SharePayload {
                title: PDF_SHARE_TITLE.to_string(),
                text: Some(format!("{} for {}", PDF_SHARE_TITLE, or_placeholder(customer_name.trim()))),
                file: Some(file.clone()),
            };
            match self.platform.share(payload).await {
                Ok(()) => return Ok(Notice::info("Invoice shared")),
                Err(e) if e.allows_fallback() => {
                    tracing::info!("File share unavailable ({}), downloading instead", e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        // 1. Download, so the user has the file to attach
        let saved = self.downloads.download(&file).await?;

        // 2. Compose view with text only
        let message = compose_message(customer_name, &file.name);
        match self.platform.open_url(&whatsapp_url(&message)).await {
            Ok(()) => Ok(Notice::info(format!(
                "Invoice downloaded as {}. Attach it in the chat that just opened.",
                file.name
            ))),
            Err(e) => {
                tracing::warn!("Could not open the compose view: {}", e);
                Ok(Notice::info(format!(
                    "Invoice downloaded to {}. Share it from there.",
                    saved.display()
                )))
            }
        }
    }

    /// One silent retry, then the failure surfaces.
    async fn copy_with_retry(&self, text: &str) -> Result<(), AppError> {
        if let Err(first) = self.platform.write_clipboard(text).await {
            tracing::debug!("Clipboard write failed ({}), retrying once", first);
            self.platform
                .write_clipboard(text)
                .await
                .map_err(AppError::ClipboardFailed)?;
        }
        Ok(())
    }
}

fn text_payload(text: &str) -> SharePayload {
    SharePayload {
        title: SHARE_TITLE.to_string(),
        text: Some(text.to_string()),
        file: None,
    }
}
