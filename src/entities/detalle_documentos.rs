use sea_orm::entity::prelude::*;

/// One product line within a documento. Immutable after creation;
/// `precio_unitario` is a price-at-time-of-sale snapshot, decoupled from the
/// producto's current price.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "detalle_documentos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub documento_id: i32,

    pub producto_id: i32,

    pub cantidad: i32,

    pub precio_unitario: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
