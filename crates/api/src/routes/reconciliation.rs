//! Storage reconciliation routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::AppState;
use lumora_core::reconciliation::{ReconciliationError, ReconciliationService, RunOutcome};
use lumora_core::report::ReportFormatter;
use lumora_db::FileRecordRepository;
use lumora_shared::AppError;

/// Creates the reconciliation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/storage/reconciliation", get(run_reconciliation))
}

// ============================================================================
// Request Types
// ============================================================================

/// Output format for the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Structured JSON payload.
    #[default]
    Json,
    /// Plain-text summary.
    Text,
}

/// Query parameters for a reconciliation run.
#[derive(Debug, Default, Deserialize)]
pub struct ReconciliationQuery {
    /// Only audit objects under this prefix. Overrides the configured prefix.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Response format.
    #[serde(default)]
    pub format: ReportFormat,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// HTTP status for a run outcome.
fn status_for(outcome: &Result<RunOutcome, ReconciliationError>) -> StatusCode {
    match outcome {
        Ok(RunOutcome::Complete(_)) => StatusCode::OK,
        Ok(RunOutcome::StoreUnavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
        Err(err) => {
            let app_error = AppError::from(err.clone());
            StatusCode::from_u16(app_error.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/storage/reconciliation`
/// Run one reconciliation between `uploaded_files` and the object store.
async fn run_reconciliation(
    State(state): State<AppState>,
    Query(query): Query<ReconciliationQuery>,
) -> Response {
    let records = Arc::new(FileRecordRepository::new((*state.db).clone()));
    let mut service =
        ReconciliationService::from_audit_config(records, state.storage.clone(), &state.audit);
    if query.prefix.is_some() {
        service = service.with_prefix(query.prefix.clone());
    }

    let outcome = service.run().await;
    match &outcome {
        Ok(RunOutcome::Complete(result)) => info!(
            orphaned = result.orphaned.count,
            discrepancy_bytes = result.discrepancy_bytes,
            "Reconciliation served"
        ),
        Ok(RunOutcome::StoreUnavailable { reason, .. }) => {
            warn!(error = %reason, "Reconciliation served without store");
        }
        Err(e) => error!(error = %e, code = e.error_code(), "Reconciliation failed"),
    }

    let status = status_for(&outcome);
    let report = ReportFormatter::render(&outcome);

    match query.format {
        ReportFormat::Json => (status, Json(report)).into_response(),
        ReportFormat::Text => (status, ReportFormatter::summary_text(&report)).into_response(),
    }
}
