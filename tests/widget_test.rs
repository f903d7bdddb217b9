// tests/widget_test.rs

use std::{path::PathBuf, sync::Arc, time::Duration};

use chitfund_invoice::{
    common::error::AppError,
    config::{AppConfig, AppState},
    handlers::InvoiceWidget,
    models::{export::ExportStatus, invoice::FieldName},
    platform::{HeadlessPlatform, PlatformEvent, ShareCapabilities},
    services::{form_store::Clock, share_service::COPIED},
};
use chrono::NaiveDate;

struct Harness {
    widget: InvoiceWidget,
    platform: Arc<HeadlessPlatform>,
    spool: tempfile::TempDir,
}

fn harness(platform: HeadlessPlatform) -> Harness {
    let spool = tempfile::tempdir().unwrap();
    let platform = Arc::new(platform);
    let config = AppConfig {
        fonts_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fonts"),
        spool_dir: spool.path().to_path_buf(),
        ..AppConfig::default()
    };
    let clock: Clock = Arc::new(|| NaiveDate::from_ymd_opt(2024, 4, 2).unwrap());
    let widget = InvoiceWidget::mount_with_clock(AppState::new(config, platform.clone()), clock);

    Harness { widget, platform, spool }
}

fn fill_meena(widget: &mut InvoiceWidget) {
    widget.update(FieldName::CustomerName, "Meena").unwrap();
    widget.update(FieldName::PlanName, "Monthly Plan").unwrap();
    widget.update(FieldName::PlanAmount, "200000").unwrap();
    widget.update(FieldName::CashReceived, "5000").unwrap();
}

#[tokio::test]
async fn meena_receipt_flows_into_preview_and_text() {
    let mut h = harness(HeadlessPlatform::new(ShareCapabilities { text: false, files: false }));
    fill_meena(&mut h.widget);

    let doc = h.widget.preview().unwrap();
    assert_eq!(doc.date, "02/04/2024");
    assert_eq!(doc.cell("Plan Amount"), Some("2,00,000"));
    assert_eq!(doc.cell("Cash Received"), Some("₹5,000"));

    let notice = h.widget.copy().await.unwrap();
    assert_eq!(notice.message, COPIED);
    match &h.platform.events()[0] {
        PlatformEvent::ClipboardWrite(text) => {
            assert!(text.contains("Name: Meena\n"));
            assert!(text.contains("Plan: Monthly Plan (Amount: ₹2,00,000)\n"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn reset_brings_back_the_defaults() {
    let mut h = harness(HeadlessPlatform::default());
    fill_meena(&mut h.widget);

    h.widget.reset();

    let draft = h.widget.draft().unwrap();
    assert_eq!(draft.customer_name, "");
    assert_eq!(draft.cash_received, "₹");
    assert_eq!(draft.notes, "Nil");
    assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 4, 2));
}

#[tokio::test]
async fn pdf_without_a_mounted_preview_downloads_nothing() {
    let mut h = harness(HeadlessPlatform::default());
    h.widget.unmount();

    let notice = h.widget.download_pdf().await.unwrap();

    assert_eq!(notice, AppError::SourceUnavailable.to_notice());
    assert!(!h.platform.events().iter().any(|e| matches!(e, PlatformEvent::Downloaded { .. })));
}

#[tokio::test]
async fn pdf_share_without_file_support_downloads_then_opens_compose() {
    let mut h = harness(HeadlessPlatform::new(ShareCapabilities { text: true, files: false }));
    fill_meena(&mut h.widget);

    let notice = h.widget.share_pdf().await.unwrap();

    assert!(!notice.is_error());
    let events = h.platform.events();
    assert!(matches!(
        &events[0],
        PlatformEvent::Downloaded { file_name, bytes }
            if file_name == "chitfund_invoice_Meena.pdf" && bytes.starts_with(b"%PDF")
    ));
    assert!(matches!(&events[1], PlatformEvent::OpenedUrl(url) if url.starts_with("https://wa.me/?text=")));

    // Staged bytes never outlive the action.
    assert_eq!(std::fs::read_dir(h.spool.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn exports_are_rejected_while_one_is_running() {
    let h = harness(HeadlessPlatform::default().with_share_delay(Duration::from_millis(50)));

    let (first, second) = tokio::join!(h.widget.share_text(), h.widget.copy());

    assert_eq!(first.unwrap().message, "Receipt shared");
    assert_eq!(second.unwrap(), AppError::ExportInProgress.to_notice());
    assert_eq!(h.widget.export_status(), ExportStatus::Idle);

    // The rejected action left no trace on the clipboard.
    assert!(!h.platform.events().iter().any(|e| matches!(e, PlatformEvent::ClipboardWrite(_))));
}

#[tokio::test]
async fn gate_is_idle_again_after_a_failure() {
    let h = harness(HeadlessPlatform::default().failing_downloads());

    assert!(h.widget.download_pdf().await.unwrap().is_error());
    assert_eq!(h.widget.export_status(), ExportStatus::Idle);

    assert!(h.widget.print().await.is_none());
    assert_eq!(h.widget.export_status(), ExportStatus::Idle);
}

#[tokio::test]
async fn clipboard_failure_is_retried_then_reported() {
    let no_sharing = || HeadlessPlatform::new(ShareCapabilities { text: false, files: false });

    let h = harness(no_sharing().with_clipboard_failures(1));
    assert!(!h.widget.share_text().await.unwrap().is_error());

    let h = harness(no_sharing().with_clipboard_failures(2));
    let notice = h.widget.share_text().await.unwrap();
    assert!(notice.is_error());
    assert_eq!(h.platform.notices(), [notice]);
}
