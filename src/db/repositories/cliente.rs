use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::entities::{clientes, prelude::*};

/// Repository for billing counterparties (clientes)
pub struct ClienteRepository {
    conn: DatabaseConnection,
}

impl ClienteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<clientes::Model>> {
        Clientes::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query cliente by ID")
    }

    pub async fn get_by_ruc_dni(&self, ruc_dni: &str) -> Result<Option<clientes::Model>> {
        Clientes::find()
            .filter(clientes::Column::RucDni.eq(ruc_dni))
            .one(&self.conn)
            .await
            .context("Failed to query cliente by RUC/DNI")
    }

    pub async fn list_all(&self) -> Result<Vec<clientes::Model>> {
        Clientes::find()
            .order_by_asc(clientes::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list clientes")
    }

    /// Substring search over nombre and ruc_dni, matching the index view's
    /// search box.
    pub async fn search(&self, query: &str) -> Result<Vec<clientes::Model>> {
        let pattern = format!("%{query}%");

        Clientes::find()
            .filter(
                Condition::any()
                    .add(clientes::Column::Nombre.like(&pattern))
                    .add(clientes::Column::RucDni.like(&pattern)),
            )
            .order_by_asc(clientes::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to search clientes")
    }

    pub async fn create(
        &self,
        nombre: &str,
        ruc_dni: &str,
        direccion: Option<&str>,
    ) -> Result<clientes::Model> {
        let active = clientes::ActiveModel {
            nombre: Set(nombre.to_string()),
            ruc_dni: Set(ruc_dni.to_string()),
            direccion: Set(direccion.map(ToString::to_string)),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert cliente")?;

        info!("Cliente registrado: {} ({})", model.nombre, model.ruc_dni);
        Ok(model)
    }

    pub async fn update(
        &self,
        id: i32,
        nombre: &str,
        ruc_dni: &str,
        direccion: Option<&str>,
    ) -> Result<Option<clientes::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: clientes::ActiveModel = existing.into();
        active.nombre = Set(nombre.to_string());
        active.ruc_dni = Set(ruc_dni.to_string());
        active.direccion = Set(direccion.map(ToString::to_string));

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update cliente")?;

        Ok(Some(model))
    }

    /// Delete is unguarded: documentos referencing this cliente are left in
    /// place and later render an `N/A` placeholder.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Clientes::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete cliente")?;

        Ok(result.rows_affected > 0)
    }
}
