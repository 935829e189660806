use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::entities::{prelude::*, productos};

/// Repository for sellable products/services
pub struct ProductoRepository {
    conn: DatabaseConnection,
}

impl ProductoRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<productos::Model>> {
        Productos::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query producto by ID")
    }

    pub async fn get_by_nombre(&self, nombre: &str) -> Result<Option<productos::Model>> {
        Productos::find()
            .filter(productos::Column::Nombre.eq(nombre))
            .one(&self.conn)
            .await
            .context("Failed to query producto by nombre")
    }

    pub async fn list_all(&self) -> Result<Vec<productos::Model>> {
        Productos::find()
            .order_by_asc(productos::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list productos")
    }

    pub async fn search(&self, query: &str) -> Result<Vec<productos::Model>> {
        let pattern = format!("%{query}%");

        Productos::find()
            .filter(productos::Column::Nombre.like(&pattern))
            .order_by_asc(productos::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to search productos")
    }

    pub async fn create(&self, nombre: &str, precio_unitario: f64) -> Result<productos::Model> {
        let active = productos::ActiveModel {
            nombre: Set(nombre.to_string()),
            precio_unitario: Set(precio_unitario),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert producto")?;

        info!(
            "Producto registrado: {} (S/. {:.2})",
            model.nombre, model.precio_unitario
        );
        Ok(model)
    }

    pub async fn update(
        &self,
        id: i32,
        nombre: &str,
        precio_unitario: f64,
    ) -> Result<Option<productos::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: productos::ActiveModel = existing.into();
        active.nombre = Set(nombre.to_string());
        active.precio_unitario = Set(precio_unitario);

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update producto")?;

        Ok(Some(model))
    }

    /// Delete is unguarded: historical detalle rows keep their snapshot price
    /// and render `Servicio Eliminado` for the name.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Productos::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete producto")?;

        Ok(result.rows_affected > 0)
    }
}
