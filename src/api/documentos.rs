use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::AuthUser;
use super::{
    ApiError, ApiResponse, AppState, ClienteDto, DocumentoDetalleDto, DocumentoResumenDto,
    EmpresaDto, LineaDto,
};
use crate::constants::reporte::SIN_DATO;
use crate::services::{ItemSolicitado, SolicitudEmision};

/// A requested line as posted by the issuance form. Both fields stay as
/// strings so that malformed entries can be skipped instead of failing
/// deserialization of the whole request.
#[derive(Debug, Deserialize)]
pub struct ItemPayload {
    pub producto_id: String,
    pub cantidad: String,
}

#[derive(Debug, Deserialize)]
pub struct EmitirRequest {
    pub tipo: String,
    pub cliente_id: i32,
    pub items: Vec<ItemPayload>,
    #[serde(default)]
    pub aplicar_igv: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnularRequest {
    pub motivo: String,
}

/// POST /api/documentos
/// Issues a factura or boleta attributed to the authenticated employee.
pub async fn emitir_documento(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<EmitirRequest>,
) -> Result<Json<ApiResponse<DocumentoDetalleDto>>, ApiError> {
    let solicitud = SolicitudEmision {
        tipo: payload.tipo,
        cliente_id: payload.cliente_id,
        items: payload
            .items
            .into_iter()
            .map(|item| ItemSolicitado {
                producto_id: item.producto_id,
                cantidad: item.cantidad,
            })
            .collect(),
        aplicar_igv: payload.aplicar_igv,
        user_id: user.id,
    };

    let emitido = state.documento_service().emitir(solicitud).await?;

    let dto = armar_detalle(&state, emitido.documento, emitido.detalles).await?;
    Ok(Json(ApiResponse::success(dto)))
}

/// GET /api/documentos
/// Full history, newest first, with cliente and employee names resolved.
pub async fn list_documentos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<DocumentoResumenDto>>>, ApiError> {
    let documentos = state.store().list_documentos().await?;

    let mut dtos = Vec::with_capacity(documentos.len());
    for doc in documentos {
        let cliente_nombre = state
            .store()
            .get_cliente(doc.cliente_id)
            .await?
            .map_or_else(|| SIN_DATO.to_string(), |c| c.nombre);

        let emitido_por = state
            .store()
            .get_user_by_id(doc.user_id)
            .await?
            .map_or_else(|| SIN_DATO.to_string(), |u| u.username);

        dtos.push(DocumentoResumenDto {
            id: doc.id,
            tipo: doc.tipo,
            numero_documento: doc.numero_documento,
            fecha_emision: doc.fecha_emision,
            cliente_nombre,
            total: doc.total,
            anulado: doc.anulado,
            emitido_por,
        });
    }

    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /api/documentos/{id}
/// Print-ready view: lines, resolved names and the issuing company block.
pub async fn get_documento(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DocumentoDetalleDto>>, ApiError> {
    let documento = state
        .store()
        .get_documento(id)
        .await?
        .ok_or_else(|| ApiError::documento_not_found(id))?;

    let detalles = state.store().get_detalles(id).await?;

    let dto = armar_detalle(&state, documento, detalles).await?;
    Ok(Json(ApiResponse::success(dto)))
}

/// POST /api/documentos/{id}/anular
/// Voids the documento. Terminal: a voided documento stays voided and keeps
/// its original motivo and timestamp.
pub async fn anular_documento(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<AnularRequest>,
) -> Result<Json<ApiResponse<DocumentoDetalleDto>>, ApiError> {
    let documento = state
        .documento_service()
        .anular(id, &payload.motivo)
        .await?;

    let detalles = state.store().get_detalles(id).await?;

    let dto = armar_detalle(&state, documento, detalles).await?;
    Ok(Json(ApiResponse::success(dto)))
}

async fn armar_detalle(
    state: &AppState,
    documento: crate::entities::documentos::Model,
    detalles: Vec<crate::entities::detalle_documentos::Model>,
) -> Result<DocumentoDetalleDto, ApiError> {
    let cliente = state
        .store()
        .get_cliente(documento.cliente_id)
        .await?
        .map(ClienteDto::from);

    let emitido_por = state
        .store()
        .get_user_by_id(documento.user_id)
        .await?
        .map_or_else(|| SIN_DATO.to_string(), |u| u.username);

    let mut lineas = Vec::with_capacity(detalles.len());
    for detalle in detalles {
        let producto_nombre = state
            .store()
            .get_producto(detalle.producto_id)
            .await?
            .map_or_else(|| "Servicio Eliminado".to_string(), |p| p.nombre);

        lineas.push(LineaDto {
            producto_id: detalle.producto_id,
            producto_nombre,
            cantidad: detalle.cantidad,
            precio_unitario: detalle.precio_unitario,
            importe: detalle.precio_unitario * f64::from(detalle.cantidad),
        });
    }

    let empresa = {
        let config = state.config().read().await;
        EmpresaDto {
            nombre: config.empresa.nombre.clone(),
            ruc: config.empresa.ruc.clone(),
            direccion: config.empresa.direccion.clone(),
            telefono: config.empresa.telefono.clone(),
            correo: config.empresa.correo.clone(),
        }
    };

    Ok(DocumentoDetalleDto {
        id: documento.id,
        tipo: documento.tipo,
        numero_documento: documento.numero_documento,
        fecha_emision: documento.fecha_emision,
        subtotal: documento.subtotal,
        impuestos: documento.impuestos,
        total: documento.total,
        anulado: documento.anulado,
        motivo_anulacion: documento.motivo_anulacion,
        fecha_anulacion: documento.fecha_anulacion,
        cliente,
        emitido_por,
        empresa,
        lineas,
    })
}
