//! `SeaORM` implementation of the [`DocumentoService`] trait.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::constants::IGV_RATE;
use crate::entities::{detalle_documentos, documentos, prelude::*};
use crate::services::documento_service::{
    AnulacionError, DocumentoEmitido, DocumentoService, EmisionError, SolicitudEmision,
};

/// SeaORM-based implementation of [`DocumentoService`].
pub struct SeaOrmDocumentoService {
    conn: DatabaseConnection,
}

/// A line that survived validation, with the price snapshot taken
struct DetalleValidado {
    producto_id: i32,
    cantidad: i32,
    precio_unitario: f64,
}

impl SeaOrmDocumentoService {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Applies the lenient-skip policy over the requested items: entries with
    /// unparsable fields, unknown productos or non-positive quantities are
    /// dropped silently. Surviving lines carry the producto's current price
    /// as a snapshot.
    async fn validar_items(
        &self,
        txn: &DatabaseTransaction,
        items: &[crate::services::documento_service::ItemSolicitado],
    ) -> Result<Vec<DetalleValidado>, EmisionError> {
        let mut validados = Vec::with_capacity(items.len());

        for item in items {
            let Some((producto_id, cantidad)) = parsear_item(&item.producto_id, &item.cantidad)
            else {
                debug!(
                    "Item descartado (no numérico): producto_id={:?} cantidad={:?}",
                    item.producto_id, item.cantidad
                );
                continue;
            };

            let producto = Productos::find_by_id(producto_id)
                .one(txn)
                .await
                .map_err(|e| EmisionError::Database(e.to_string()))?;

            let Some(producto) = producto else {
                debug!("Item descartado (producto inexistente): {producto_id}");
                continue;
            };

            validados.push(DetalleValidado {
                producto_id: producto.id,
                cantidad,
                precio_unitario: producto.precio_unitario,
            });
        }

        Ok(validados)
    }
}

#[async_trait]
impl DocumentoService for SeaOrmDocumentoService {
    async fn emitir(&self, solicitud: SolicitudEmision) -> Result<DocumentoEmitido, EmisionError> {
        if solicitud.tipo.trim().is_empty() {
            return Err(EmisionError::TipoInvalido);
        }

        let cliente = Clientes::find_by_id(solicitud.cliente_id)
            .one(&self.conn)
            .await
            .map_err(|e| EmisionError::Database(e.to_string()))?;

        if cliente.is_none() {
            return Err(EmisionError::ClienteInvalido(solicitud.cliente_id));
        }

        // The correlative count and every insert share one transaction so a
        // failed line write cannot leave an orphan documento header.
        let txn = self
            .conn
            .begin()
            .await
            .map_err(|e| EmisionError::Database(e.to_string()))?;

        let detalles = self.validar_items(&txn, &solicitud.items).await?;

        if detalles.is_empty() {
            return Err(EmisionError::DocumentoVacio);
        }

        let subtotal: f64 = detalles
            .iter()
            .map(|d| d.precio_unitario * f64::from(d.cantidad))
            .sum();
        let impuestos = calcular_impuestos(subtotal, solicitud.aplicar_igv);
        let total = subtotal + impuestos;

        // Read-count-then-use correlative numbering, as observed in the
        // original system. The UNIQUE index on numero_documento turns a
        // concurrent collision into a surfaced conflict.
        let existentes = Documentos::find()
            .filter(documentos::Column::Tipo.eq(solicitud.tipo.as_str()))
            .count(&txn)
            .await
            .map_err(|e| EmisionError::Database(e.to_string()))?;
        let numero = numero_documento(&solicitud.tipo, existentes + 1);

        let ahora = chrono::Utc::now().to_rfc3339();

        let documento = documentos::ActiveModel {
            tipo: Set(solicitud.tipo.clone()),
            numero_documento: Set(numero.clone()),
            fecha_emision: Set(ahora),
            subtotal: Set(subtotal),
            impuestos: Set(impuestos),
            total: Set(total),
            anulado: Set(false),
            motivo_anulacion: Set(None),
            fecha_anulacion: Set(None),
            cliente_id: Set(solicitud.cliente_id),
            user_id: Set(solicitud.user_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| clasificar_error_insercion(&e, &numero))?;

        let mut guardados = Vec::with_capacity(detalles.len());
        for detalle in detalles {
            let guardado = detalle_documentos::ActiveModel {
                documento_id: Set(documento.id),
                producto_id: Set(detalle.producto_id),
                cantidad: Set(detalle.cantidad),
                precio_unitario: Set(detalle.precio_unitario),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| EmisionError::Database(e.to_string()))?;
            guardados.push(guardado);
        }

        txn.commit()
            .await
            .map_err(|e| EmisionError::Database(e.to_string()))?;

        info!(
            "{} N° {} emitida: subtotal {:.2}, impuestos {:.2}, total {:.2}",
            documento.tipo, documento.numero_documento, subtotal, impuestos, total
        );

        Ok(DocumentoEmitido {
            documento,
            detalles: guardados,
        })
    }

    async fn anular(
        &self,
        documento_id: i32,
        motivo: &str,
    ) -> Result<documentos::Model, AnulacionError> {
        let documento = Documentos::find_by_id(documento_id)
            .one(&self.conn)
            .await?
            .ok_or(AnulacionError::DocumentoInvalido(documento_id))?;

        if motivo.trim().is_empty() {
            return Err(AnulacionError::MotivoRequerido);
        }

        if documento.anulado {
            return Err(AnulacionError::YaAnulado {
                tipo: documento.tipo,
                numero: documento.numero_documento,
            });
        }

        let tipo = documento.tipo.clone();
        let numero = documento.numero_documento.clone();

        let mut active: documentos::ActiveModel = documento.into();
        active.anulado = Set(true);
        active.motivo_anulacion = Set(Some(motivo.to_string()));
        active.fecha_anulacion = Set(Some(chrono::Utc::now().to_rfc3339()));

        let actualizado = active.update(&self.conn).await?;

        info!("{tipo} N° {numero} anulada. Motivo: {motivo}");

        Ok(actualizado)
    }
}

/// Parses one requested line. `None` means the line is skipped: ids or
/// quantities that are not positive integers never reach the store.
fn parsear_item(producto_id: &str, cantidad: &str) -> Option<(i32, i32)> {
    let producto_id = producto_id.trim().parse::<i32>().ok()?;
    let cantidad = cantidad.trim().parse::<i32>().ok()?;

    if cantidad > 0 { Some((producto_id, cantidad)) } else { None }
}

fn calcular_impuestos(subtotal: f64, aplicar_igv: bool) -> f64 {
    if aplicar_igv { subtotal * IGV_RATE } else { 0.0 }
}

/// `<TipoInicial>-<correlativo>`, e.g. the third "Factura" becomes `F-3`
fn numero_documento(tipo: &str, correlativo: u64) -> String {
    let inicial: String = tipo
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default();

    format!("{inicial}-{correlativo}")
}

fn clasificar_error_insercion(err: &sea_orm::DbErr, numero: &str) -> EmisionError {
    let message = err.to_string();
    if message.contains("UNIQUE") {
        EmisionError::NumeroEnConflicto(numero.to_string())
    } else {
        EmisionError::Database(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsea_item_valido() {
        assert_eq!(parsear_item("3", "2"), Some((3, 2)));
        assert_eq!(parsear_item(" 7 ", " 1 "), Some((7, 1)));
    }

    #[test]
    fn descarta_item_no_numerico() {
        assert_eq!(parsear_item("abc", "2"), None);
        assert_eq!(parsear_item("3", "dos"), None);
        assert_eq!(parsear_item("", ""), None);
        assert_eq!(parsear_item("3", "1.5"), None);
    }

    #[test]
    fn descarta_cantidad_no_positiva() {
        assert_eq!(parsear_item("3", "0"), None);
        assert_eq!(parsear_item("3", "-1"), None);
    }

    #[test]
    fn impuestos_solo_con_igv() {
        assert!((calcular_impuestos(25.0, true) - 4.5).abs() < 1e-9);
        assert!(calcular_impuestos(25.0, false).abs() < f64::EPSILON);
    }

    #[test]
    fn numera_por_inicial_del_tipo() {
        assert_eq!(numero_documento("Factura", 1), "F-1");
        assert_eq!(numero_documento("Boleta", 12), "B-12");
        assert_eq!(numero_documento("factura", 3), "F-3");
    }
}
