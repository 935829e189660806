use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::entities::{detalle_documentos, documentos, prelude::*};

/// Read-side repository for issued documentos. Writes (issuance, void) live
/// in the documento service because they span multiple rows or need
/// precondition checks.
pub struct DocumentoRepository {
    conn: DatabaseConnection,
}

impl DocumentoRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<documentos::Model>> {
        Documentos::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query documento by ID")
    }

    /// History view: newest first
    pub async fn list_recent_first(&self) -> Result<Vec<documentos::Model>> {
        Documentos::find()
            .order_by_desc(documentos::Column::FechaEmision)
            .order_by_desc(documentos::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list documentos")
    }

    /// Report order: ascending issuance time. RFC 3339 UTC strings sort
    /// chronologically; id breaks ties within the same instant.
    pub async fn list_by_emision_asc(&self) -> Result<Vec<documentos::Model>> {
        Documentos::find()
            .order_by_asc(documentos::Column::FechaEmision)
            .order_by_asc(documentos::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list documentos for report")
    }

    /// Existing documents of a tipo, for correlative numbering
    pub async fn count_by_tipo(&self, tipo: &str) -> Result<u64> {
        Documentos::find()
            .filter(documentos::Column::Tipo.eq(tipo))
            .count(&self.conn)
            .await
            .context("Failed to count documentos by tipo")
    }

    pub async fn get_detalles(&self, documento_id: i32) -> Result<Vec<detalle_documentos::Model>> {
        DetalleDocumentos::find()
            .filter(detalle_documentos::Column::DocumentoId.eq(documento_id))
            .order_by_asc(detalle_documentos::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query detalles for documento")
    }
}
