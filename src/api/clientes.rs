use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ClienteDto};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClientePayload {
    pub nombre: String,
    pub ruc_dni: String,
    pub direccion: Option<String>,
}

fn validar(payload: &ClientePayload) -> Result<(String, String), ApiError> {
    let nombre = payload.nombre.trim();
    let ruc_dni = payload.ruc_dni.trim();
    if nombre.is_empty() {
        return Err(ApiError::validation("El nombre es obligatorio"));
    }
    if ruc_dni.is_empty() {
        return Err(ApiError::validation("El RUC/DNI es obligatorio"));
    }
    Ok((nombre.to_string(), ruc_dni.to_string()))
}

/// GET /api/clientes
/// Lists all clientes, or filters by `?q=` over nombre and RUC/DNI.
pub async fn list_clientes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<ClienteDto>>>, ApiError> {
    let clientes = match query.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => state.store().search_clientes(q).await?,
        _ => state.store().list_clientes().await?,
    };

    let dtos: Vec<ClienteDto> = clientes.into_iter().map(ClienteDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /api/clientes/{id}
pub async fn get_cliente(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ClienteDto>>, ApiError> {
    let cliente = state
        .store()
        .get_cliente(id)
        .await?
        .ok_or_else(|| ApiError::cliente_not_found(id))?;

    Ok(Json(ApiResponse::success(ClienteDto::from(cliente))))
}

/// POST /api/clientes
/// Registers a cliente. RUC/DNI is unique across the registry.
pub async fn create_cliente(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ClientePayload>,
) -> Result<Json<ApiResponse<ClienteDto>>, ApiError> {
    let (nombre, ruc_dni) = validar(&payload)?;

    if state
        .store()
        .get_cliente_by_ruc_dni(&ruc_dni)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(format!(
            "Ya existe un cliente con RUC/DNI {ruc_dni}"
        )));
    }

    let cliente = state
        .store()
        .create_cliente(&nombre, &ruc_dni, payload.direccion.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(ClienteDto::from(cliente))))
}

/// PUT /api/clientes/{id}
pub async fn update_cliente(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ClientePayload>,
) -> Result<Json<ApiResponse<ClienteDto>>, ApiError> {
    let (nombre, ruc_dni) = validar(&payload)?;

    // Another cliente may already hold the requested RUC/DNI
    if let Some(existing) = state.store().get_cliente_by_ruc_dni(&ruc_dni).await?
        && existing.id != id
    {
        return Err(ApiError::conflict(format!(
            "Ya existe un cliente con RUC/DNI {ruc_dni}"
        )));
    }

    let cliente = state
        .store()
        .update_cliente(id, &nombre, &ruc_dni, payload.direccion.as_deref())
        .await?
        .ok_or_else(|| ApiError::cliente_not_found(id))?;

    Ok(Json(ApiResponse::success(ClienteDto::from(cliente))))
}

/// DELETE /api/clientes/{id}
/// Removal is unguarded: documents that reference the cliente keep their
/// row and the listings fall back to the placeholder name.
pub async fn delete_cliente(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let deleted = state.store().delete_cliente(id).await?;
    if !deleted {
        return Err(ApiError::cliente_not_found(id));
    }

    tracing::info!("Cliente {} eliminado", id);

    Ok(Json(ApiResponse::success(true)))
}
