//! Domain service for the document issuance and lifecycle workflow.

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::{detalle_documentos, documentos};

/// Errors surfaced by the issuance workflow. All of them reject the request
/// and leave the store unchanged.
#[derive(Debug, Error)]
pub enum EmisionError {
    #[error("Debe seleccionar un cliente válido (id {0})")]
    ClienteInvalido(i32),

    #[error("El tipo de documento no puede estar vacío")]
    TipoInvalido,

    #[error("El documento debe contener al menos un producto válido")]
    DocumentoVacio,

    /// Correlative collision under concurrent issuance; the UNIQUE index on
    /// numero_documento rejects the second writer.
    #[error("Número de documento en conflicto: {0}")]
    NumeroEnConflicto(String),

    #[error("Database error: {0}")]
    Database(String),
}

#[derive(Debug, Error)]
pub enum AnulacionError {
    #[error("Documento no encontrado: {0}")]
    DocumentoInvalido(i32),

    #[error("Debe proporcionar un motivo para la anulación")]
    MotivoRequerido,

    /// The document is already voided; terminal state, nothing is mutated.
    #[error("{tipo} N° {numero} ya está anulado")]
    YaAnulado { tipo: String, numero: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for AnulacionError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// One requested line item. Both fields travel as strings (the way the form
/// posts them) and are parsed leniently: entries that fail to parse are
/// skipped, not rejected.
#[derive(Debug, Clone)]
pub struct ItemSolicitado {
    pub producto_id: String,
    pub cantidad: String,
}

/// Issuance request. `user_id` is the authenticated employee, passed in
/// explicitly by the caller.
#[derive(Debug, Clone)]
pub struct SolicitudEmision {
    pub tipo: String,
    pub cliente_id: i32,
    pub items: Vec<ItemSolicitado>,
    pub aplicar_igv: bool,
    pub user_id: i32,
}

/// A freshly issued documento with its lines.
#[derive(Debug, Clone)]
pub struct DocumentoEmitido {
    pub documento: documentos::Model,
    pub detalles: Vec<detalle_documentos::Model>,
}

/// Domain service trait for documento operations.
#[async_trait]
pub trait DocumentoService: Send + Sync {
    /// Issues a new documento: validates the cliente, applies the lenient
    /// line-skip policy, snapshots prices, computes totals, assigns the next
    /// per-tipo correlative number and persists documento + detalles as one
    /// unit.
    async fn emitir(&self, solicitud: SolicitudEmision) -> Result<DocumentoEmitido, EmisionError>;

    /// Voids a documento exactly once, recording motivo and timestamp.
    async fn anular(
        &self,
        documento_id: i32,
        motivo: &str,
    ) -> Result<documentos::Model, AnulacionError>;
}
