// src/handlers/widget.rs

use serde::Serialize;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        export::{ExportStatus, Notice},
        invoice::{FieldName, InvoiceDraft},
        preview::PreviewDocument,
    },
    services::{
        form_store::{system_clock, Clock},
        ExportGate, FormStore,
    },
};

/// Form state plus the preview derived from it, alive while mounted.
struct Mounted {
    store: FormStore,
    preview: PreviewDocument,
}

/// Draft and preview side by side, as dumped by the host's `json` command.
#[derive(Debug, Serialize)]
pub struct WidgetSnapshot<'a> {
    pub draft: &'a InvoiceDraft,
    pub preview: &'a PreviewDocument,
}

/// The invoice widget: an explicitly owned draft, its live preview and the
/// export actions (see `handlers::exports`).
pub struct InvoiceWidget {
    pub(crate) state: AppState,
    pub(crate) gate: ExportGate,
    clock: Clock,
    mounted: Option<Mounted>,
}

impl InvoiceWidget {
    /// Creates a mounted widget with a fresh draft dated today.
    pub fn mount(state: AppState) -> Self {
        Self::mount_with_clock(state, system_clock())
    }

    pub fn mount_with_clock(state: AppState, clock: Clock) -> Self {
        let mut widget = Self {
            state,
            gate: ExportGate::new(),
            clock,
            mounted: None,
        };
        widget.remount();
        widget
    }

    /// Mounts again after `unmount`, with a new default draft.
    pub fn remount(&mut self) {
        let store = FormStore::new(self.clock.clone());
        let preview = self.state.preview_service.render(store.draft());
        self.mounted = Some(Mounted { store, preview });
        tracing::debug!("Invoice widget mounted");
    }

    /// Discards the draft and the preview.
    pub fn unmount(&mut self) {
        self.mounted = None;
        tracing::debug!("Invoice widget unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn draft(&self) -> Option<&InvoiceDraft> {
        self.mounted.as_ref().map(|m| m.store.draft())
    }

    pub fn preview(&self) -> Option<&PreviewDocument> {
        self.mounted.as_ref().map(|m| &m.preview)
    }

    pub fn snapshot(&self) -> Option<WidgetSnapshot<'_>> {
        self.mounted.as_ref().map(|m| WidgetSnapshot {
            draft: m.store.draft(),
            preview: &m.preview,
        })
    }

    pub fn revision(&self) -> Option<u64> {
        self.mounted.as_ref().map(|m| m.store.revision())
    }

    pub fn export_status(&self) -> ExportStatus {
        self.gate.status()
    }

    /// Field edit from the form. The preview is re-derived right away.
    pub fn update(&mut self, field: FieldName, value: &str) -> Result<(), AppError> {
        let mounted = self.mounted.as_mut().ok_or(AppError::SourceUnavailable)?;
        mounted.store.update(field, value)?;
        mounted.preview = self.state.preview_service.render(mounted.store.draft());
        Ok(())
    }

    /// Same as `update`, taking the form control name, and reporting
    /// problems as a notice instead of an error.
    pub fn edit(&mut self, field: &str, value: &str) -> Option<Notice> {
        let result = field.parse::<FieldName>().and_then(|field| self.update(field, value));
        result.err().map(|e| {
            let notice = e.to_notice();
            self.state.platform.notify(&notice);
            notice
        })
    }

    pub fn reset(&mut self) {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.store.reset();
            mounted.preview = self.state.preview_service.render(mounted.store.draft());
        }
    }
}
