/// Commands for backup, restore and wiping all data

use serde::Serialize;

use crate::{AppError, FocusFlow, ImportReport, Snapshot, Store};

/// Response from an import
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub report: ImportReport,
    pub message: String,
}

/// Response from clearing all data
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
}

/// Snapshot every collection and the recognised settings
pub async fn export_data<S: Store>(app: &FocusFlow<S>) -> Result<Snapshot, AppError> {
    Ok(app.store().export_all().await?)
}

/// Parse snapshot JSON text
pub fn parse_snapshot(text: &str) -> Result<Snapshot, AppError> {
    Ok(serde_json::from_str(text)?)
}

/// Restore a snapshot; existing records are kept and counted as skipped
pub async fn import_data<S: Store>(
    app: &mut FocusFlow<S>,
    snapshot: Snapshot,
) -> Result<ImportResponse, AppError> {
    let report = app.import(snapshot).await?;

    let mut message = format!(
        "Imported {} record{} and {} setting{}.",
        report.inserted,
        if report.inserted == 1 { "" } else { "s" },
        report.settings,
        if report.settings == 1 { "" } else { "s" },
    );
    if report.skipped > 0 {
        message.push_str(&format!(" Skipped {} already present.", report.skipped));
    }

    Ok(ImportResponse {
        success: true,
        report,
        message,
    })
}

/// Delete every record and setting
///
/// Refuses to run unless `confirmed` is set.
pub async fn clear_data<S: Store>(
    app: &mut FocusFlow<S>,
    confirmed: bool,
) -> Result<ClearResponse, AppError> {
    if !confirmed {
        return Err(AppError::Usage(
            "Refusing to delete all data without confirmation (pass --yes)".to_string(),
        ));
    }

    app.clear().await?;

    Ok(ClearResponse {
        success: true,
        message: "All data cleared.".to_string(),
    })
}
