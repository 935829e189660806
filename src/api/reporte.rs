use axum::{extract::State, http::header, response::IntoResponse};
use std::sync::Arc;

use super::{ApiError, AppState};

/// GET /api/reportes/ventas
/// Streams the full sales history as a semicolon-separated CSV download.
pub async fn exportar_ventas(
    State(state): State<Arc<AppState>>,
) -> Result<axum::response::Response, ApiError> {
    let csv = state.reporte_service().reporte_ventas().await?;
    let filename = state.reporte_service().nombre_archivo();

    tracing::info!("Reporte de ventas generado: {filename}");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
