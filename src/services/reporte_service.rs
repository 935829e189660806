//! Sales report export: the full documento history as semicolon-delimited
//! text, ordered by issuance time.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::constants::reporte::{ESTADO_ACTIVO, ESTADO_ANULADO, SIN_DATO, TITULO};
use crate::db::Store;
use crate::entities::documentos;

const CABECERA: [&str; 10] = [
    "Nº CORRELATIVO",
    "TIPO DOCUMENTO",
    "CLIENTE",
    "RUC/DNI",
    "ATENDIDO POR",
    "FECHA EMISION",
    "TOTAL VENTA (S/.)",
    "SUBTOTAL",
    "IMPUESTOS",
    "ESTADO",
];

pub struct ReporteService {
    store: Store,
}

impl ReporteService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Builds the report body. Deterministic for a given store state except
    /// for the generation timestamp line.
    pub async fn reporte_ventas(&self) -> Result<String> {
        let documentos = self.store.list_documentos_por_emision().await?;

        // Resolve names in one pass instead of one query per row. Deleted
        // clientes/users simply miss the map and render as N/A.
        let clientes: HashMap<i32, (String, String)> = self
            .store
            .list_clientes()
            .await?
            .into_iter()
            .map(|c| (c.id, (c.nombre, c.ruc_dni)))
            .collect();

        let mut lineas = Vec::with_capacity(documentos.len() + 4);

        lineas.push(TITULO.to_string());
        lineas.push(format!(
            "Generado el: {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S")
        ));
        lineas.push(String::new());
        lineas.push(CABECERA.join(";"));

        let mut usuarios: HashMap<i32, Option<String>> = HashMap::new();

        for doc in documentos {
            let (cliente_nombre, ruc_dni) = clientes
                .get(&doc.cliente_id)
                .cloned()
                .unwrap_or_else(|| (SIN_DATO.to_string(), SIN_DATO.to_string()));

            let atendido_por = match usuarios.entry(doc.user_id) {
                std::collections::hash_map::Entry::Occupied(e) => e.get().clone(),
                std::collections::hash_map::Entry::Vacant(e) => {
                    let username = self
                        .store
                        .get_user_by_id(doc.user_id)
                        .await?
                        .map(|u| u.username);
                    e.insert(username).clone()
                }
            };

            lineas.push(fila_reporte(
                &doc,
                &cliente_nombre,
                &ruc_dni,
                atendido_por.as_deref().unwrap_or(SIN_DATO),
            ));
        }

        Ok(lineas.join("\n"))
    }

    /// Suggested download filename, e.g. `Reporte_Ventas_20260829_153000.csv`
    #[must_use]
    pub fn nombre_archivo(&self) -> String {
        format!(
            "Reporte_Ventas_{}.csv",
            Utc::now().format("%Y%m%d_%H%M%S")
        )
    }
}

fn fila_reporte(
    doc: &documentos::Model,
    cliente_nombre: &str,
    ruc_dni: &str,
    atendido_por: &str,
) -> String {
    let fecha = formatear_fecha(&doc.fecha_emision);
    let estado = if doc.anulado {
        ESTADO_ANULADO
    } else {
        ESTADO_ACTIVO
    };

    format!(
        "{};{};{};{};{};{};{:.2};{:.2};{:.2};{}",
        doc.numero_documento,
        doc.tipo,
        cliente_nombre,
        ruc_dni,
        atendido_por,
        fecha,
        doc.total,
        doc.subtotal,
        doc.impuestos,
        estado
    )
}

/// Stored timestamps are RFC 3339; the report shows `YYYY-MM-DD HH:MM:SS`.
/// An unparsable value passes through unchanged rather than failing the
/// whole report.
fn formatear_fecha(rfc3339: &str) -> String {
    DateTime::parse_from_rfc3339(rfc3339).map_or_else(
        |_| rfc3339.to_string(),
        |dt| {
            dt.with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        },
    )
}
