use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ProductoDto};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// The price travels as a string, the way the catalog form posts it. Unlike
/// issuance line items there is no leniency here: a malformed price rejects
/// the request.
#[derive(Debug, Deserialize)]
pub struct ProductoPayload {
    pub nombre: String,
    pub precio_unitario: String,
}

fn validar(payload: &ProductoPayload) -> Result<(String, f64), ApiError> {
    let nombre = payload.nombre.trim();
    if nombre.is_empty() {
        return Err(ApiError::validation("El nombre es obligatorio"));
    }

    let precio: f64 = payload
        .precio_unitario
        .trim()
        .parse()
        .map_err(|_| ApiError::validation("El precio unitario debe ser un número válido"))?;

    if precio < 0.0 {
        return Err(ApiError::validation(
            "El precio unitario no puede ser negativo",
        ));
    }

    Ok((nombre.to_string(), precio))
}

/// GET /api/productos
/// Lists the catalog, or filters by `?q=` over nombre.
pub async fn list_productos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<ProductoDto>>>, ApiError> {
    let productos = match query.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => state.store().search_productos(q).await?,
        _ => state.store().list_productos().await?,
    };

    let dtos: Vec<ProductoDto> = productos.into_iter().map(ProductoDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /api/productos/{id}
pub async fn get_producto(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ProductoDto>>, ApiError> {
    let producto = state
        .store()
        .get_producto(id)
        .await?
        .ok_or_else(|| ApiError::producto_not_found(id))?;

    Ok(Json(ApiResponse::success(ProductoDto::from(producto))))
}

/// POST /api/productos
/// Adds a catalog entry. Nombres are unique.
pub async fn create_producto(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProductoPayload>,
) -> Result<Json<ApiResponse<ProductoDto>>, ApiError> {
    let (nombre, precio) = validar(&payload)?;

    if state
        .store()
        .get_producto_by_nombre(&nombre)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(format!(
            "Ya existe un producto llamado '{nombre}'"
        )));
    }

    let producto = state.store().create_producto(&nombre, precio).await?;

    Ok(Json(ApiResponse::success(ProductoDto::from(producto))))
}

/// PUT /api/productos/{id}
/// Price changes only affect documents issued afterwards; existing lines
/// keep the price captured at issuance.
pub async fn update_producto(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ProductoPayload>,
) -> Result<Json<ApiResponse<ProductoDto>>, ApiError> {
    let (nombre, precio) = validar(&payload)?;

    if let Some(existing) = state.store().get_producto_by_nombre(&nombre).await?
        && existing.id != id
    {
        return Err(ApiError::conflict(format!(
            "Ya existe un producto llamado '{nombre}'"
        )));
    }

    let producto = state
        .store()
        .update_producto(id, &nombre, precio)
        .await?
        .ok_or_else(|| ApiError::producto_not_found(id))?;

    Ok(Json(ApiResponse::success(ProductoDto::from(producto))))
}

/// DELETE /api/productos/{id}
/// Unguarded, like cliente removal. Document lines that reference the
/// producto keep their snapshot and show the placeholder name.
pub async fn delete_producto(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let deleted = state.store().delete_producto(id).await?;
    if !deleted {
        return Err(ApiError::producto_not_found(id));
    }

    tracing::info!("Producto {} eliminado", id);

    Ok(Json(ApiResponse::success(true)))
}
