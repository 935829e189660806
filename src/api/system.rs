use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::constants::documentos::{TIPO_BOLETA, TIPO_FACTURA};

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub database_ok: bool,
    pub total_documentos: usize,
    pub facturas_emitidas: u64,
    pub boletas_emitidas: u64,
    pub total_clientes: usize,
    pub total_productos: usize,
}

/// GET /api/system/status
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let database_ok = state.store().ping().await.is_ok();

    let total_documentos = state.store().list_documentos().await?.len();
    let facturas_emitidas = state.store().count_documentos_por_tipo(TIPO_FACTURA).await?;
    let boletas_emitidas = state.store().count_documentos_por_tipo(TIPO_BOLETA).await?;
    let total_clientes = state.store().list_clientes().await?.len();
    let total_productos = state.store().list_productos().await?.len();

    Ok(Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        database_ok,
        total_documentos,
        facturas_emitidas,
        boletas_emitidas,
        total_clientes,
        total_productos,
    })))
}
