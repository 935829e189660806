use serde::Serialize;

use crate::entities::{clientes, productos};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClienteDto {
    pub id: i32,
    pub nombre: String,
    pub ruc_dni: String,
    pub direccion: Option<String>,
}

impl From<clientes::Model> for ClienteDto {
    fn from(model: clientes::Model) -> Self {
        Self {
            id: model.id,
            nombre: model.nombre,
            ruc_dni: model.ruc_dni,
            direccion: model.direccion,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductoDto {
    pub id: i32,
    pub nombre: String,
    pub precio_unitario: f64,
}

impl From<productos::Model> for ProductoDto {
    fn from(model: productos::Model) -> Self {
        Self {
            id: model.id,
            nombre: model.nombre,
            precio_unitario: model.precio_unitario,
        }
    }
}

/// One row of the documentos listing, with the cliente and user names
/// resolved (or the placeholder when the referenced row was deleted).
#[derive(Debug, Serialize)]
pub struct DocumentoResumenDto {
    pub id: i32,
    pub tipo: String,
    pub numero_documento: String,
    pub fecha_emision: String,
    pub cliente_nombre: String,
    pub total: f64,
    pub anulado: bool,
    pub emitido_por: String,
}

#[derive(Debug, Serialize)]
pub struct LineaDto {
    pub producto_id: i32,
    pub producto_nombre: String,
    pub cantidad: i32,
    pub precio_unitario: f64,
    pub importe: f64,
}

#[derive(Debug, Serialize)]
pub struct EmpresaDto {
    pub nombre: String,
    pub ruc: String,
    pub direccion: String,
    pub telefono: String,
    pub correo: String,
}

/// Full document view as rendered on the print/detail screen.
#[derive(Debug, Serialize)]
pub struct DocumentoDetalleDto {
    pub id: i32,
    pub tipo: String,
    pub numero_documento: String,
    pub fecha_emision: String,
    pub subtotal: f64,
    pub impuestos: f64,
    pub total: f64,
    pub anulado: bool,
    pub motivo_anulacion: Option<String>,
    pub fecha_anulacion: Option<String>,
    pub cliente: Option<ClienteDto>,
    pub emitido_por: String,
    pub empresa: EmpresaDto,
    pub lineas: Vec<LineaDto>,
}
