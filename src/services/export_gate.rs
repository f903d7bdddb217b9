// src/services/export_gate.rs

use std::sync::{Arc, Mutex};

use crate::{
    common::error::AppError,
    models::export::{ExportAction, ExportStatus},
};

/// Busy flag shared by all export actions of one widget. While an action
/// holds the guard, every other trigger is rejected instead of queued.
#[derive(Clone)]
pub struct ExportGate {
    status: Arc<Mutex<ExportStatus>>,
}

impl ExportGate {
    pub fn new() -> Self {
        Self { status: Arc::new(Mutex::new(ExportStatus::Idle)) }
    }

    pub fn status(&self) -> ExportStatus {
        *self.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn begin(&self, action: ExportAction) -> Result<ExportGuard, AppError> {
        let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
        if let ExportStatus::InProgress(running) = *status {
            tracing::info!("Rejected {} while {} is running", action, running);
            return Err(AppError::ExportInProgress);
        }

        *status = ExportStatus::InProgress(action);
        tracing::debug!("Export {} started", action);
        Ok(ExportGuard { status: Arc::clone(&self.status), action })
    }
}

impl Default for ExportGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the gate to idle when dropped, on success, error or cancellation.
pub struct ExportGuard {
    status: Arc<Mutex<ExportStatus>>,
    action: ExportAction,
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        *self.status.lock().unwrap_or_else(|e| e.into_inner()) = ExportStatus::Idle;
        tracing::debug!("Export {} finished", self.action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_action_is_rejected_while_busy() {
        let gate = ExportGate::new();

        let guard = gate.begin(ExportAction::SharePdf).unwrap();
        assert_eq!(gate.status(), ExportStatus::InProgress(ExportAction::SharePdf));
        assert!(matches!(gate.begin(ExportAction::DownloadPdf), Err(AppError::ExportInProgress)));

        drop(guard);
        assert_eq!(gate.status(), ExportStatus::Idle);
        assert!(gate.begin(ExportAction::DownloadPdf).is_ok());
    }

    #[test]
    fn gate_reopens_after_a_failed_action() {
        let gate = ExportGate::new();

        let result: Result<(), AppError> = (|| {
            let _busy = gate.begin(ExportAction::CopyText)?;
            Err(AppError::SourceUnavailable)
        })();

        assert!(result.is_err());
        assert_eq!(gate.status(), ExportStatus::Idle);
    }
}
