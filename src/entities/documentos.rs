use sea_orm::entity::prelude::*;

/// An issued Factura or Boleta. Totals are derived at issuance and never
/// edited afterwards; once `anulado` is set the row is terminal.
///
/// `cliente_id`/`user_id` are plain references without an enforced foreign
/// key: deleting a cliente leaves historical documentos in place and readers
/// render a placeholder instead.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "documentos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// "Factura" or "Boleta"
    pub tipo: String,

    /// Human-facing correlative number, e.g. `F-3`. Immutable once assigned.
    #[sea_orm(unique)]
    pub numero_documento: String,

    /// RFC 3339 UTC timestamp
    pub fecha_emision: String,

    pub subtotal: f64,

    pub impuestos: f64,

    pub total: f64,

    pub anulado: bool,

    pub motivo_anulacion: Option<String>,

    pub fecha_anulacion: Option<String>,

    pub cliente_id: i32,

    /// Issuing employee ("atendido por")
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
