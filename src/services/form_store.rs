// src/services/form_store.rs

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::{
    common::error::AppError,
    models::invoice::{FieldName, InvoiceDraft},
};

/// Source of "today" for new drafts.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(|| Local::now().date_naive())
}

/// Owns the single in-memory Invoice Draft of a mounted widget.
pub struct FormStore {
    draft: InvoiceDraft,
    clock: Clock,
    revision: u64,
}

impl FormStore {
    pub fn new(clock: Clock) -> Self {
        let draft = InvoiceDraft::new(clock());
        Self { draft, clock, revision: 0 }
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    /// Bumped on every accepted change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn update(&mut self, field: FieldName, value: &str) -> Result<(), AppError> {
        self.draft.set(field, value)?;
        self.revision += 1;
        tracing::trace!("Field {} updated (revision {})", field, self.revision);
        Ok(())
    }

    /// Replaces the draft with a fresh default one, dated today.
    pub fn reset(&mut self) {
        self.draft = InvoiceDraft::new((self.clock)());
        self.revision += 1;
        tracing::debug!("Draft reset (revision {})", self.revision);
    }
}
