use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{clientes, detalle_documentos, documentos, productos};

pub mod migrator;
pub mod repositories;

pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") && !db_url.contains("memory") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn cliente_repo(&self) -> repositories::cliente::ClienteRepository {
        repositories::cliente::ClienteRepository::new(self.conn.clone())
    }

    fn producto_repo(&self) -> repositories::producto::ProductoRepository {
        repositories::producto::ProductoRepository::new(self.conn.clone())
    }

    fn documento_repo(&self) -> repositories::documento::DocumentoRepository {
        repositories::documento::DocumentoRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // ========== Clientes ==========

    pub async fn get_cliente(&self, id: i32) -> Result<Option<clientes::Model>> {
        self.cliente_repo().get(id).await
    }

    pub async fn get_cliente_by_ruc_dni(&self, ruc_dni: &str) -> Result<Option<clientes::Model>> {
        self.cliente_repo().get_by_ruc_dni(ruc_dni).await
    }

    pub async fn list_clientes(&self) -> Result<Vec<clientes::Model>> {
        self.cliente_repo().list_all().await
    }

    pub async fn search_clientes(&self, query: &str) -> Result<Vec<clientes::Model>> {
        self.cliente_repo().search(query).await
    }

    pub async fn create_cliente(
        &self,
        nombre: &str,
        ruc_dni: &str,
        direccion: Option<&str>,
    ) -> Result<clientes::Model> {
        self.cliente_repo().create(nombre, ruc_dni, direccion).await
    }

    pub async fn update_cliente(
        &self,
        id: i32,
        nombre: &str,
        ruc_dni: &str,
        direccion: Option<&str>,
    ) -> Result<Option<clientes::Model>> {
        self.cliente_repo()
            .update(id, nombre, ruc_dni, direccion)
            .await
    }

    pub async fn delete_cliente(&self, id: i32) -> Result<bool> {
        self.cliente_repo().delete(id).await
    }

    // ========== Productos ==========

    pub async fn get_producto(&self, id: i32) -> Result<Option<productos::Model>> {
        self.producto_repo().get(id).await
    }

    pub async fn get_producto_by_nombre(&self, nombre: &str) -> Result<Option<productos::Model>> {
        self.producto_repo().get_by_nombre(nombre).await
    }

    pub async fn list_productos(&self) -> Result<Vec<productos::Model>> {
        self.producto_repo().list_all().await
    }

    pub async fn search_productos(&self, query: &str) -> Result<Vec<productos::Model>> {
        self.producto_repo().search(query).await
    }

    pub async fn create_producto(
        &self,
        nombre: &str,
        precio_unitario: f64,
    ) -> Result<productos::Model> {
        self.producto_repo().create(nombre, precio_unitario).await
    }

    pub async fn update_producto(
        &self,
        id: i32,
        nombre: &str,
        precio_unitario: f64,
    ) -> Result<Option<productos::Model>> {
        self.producto_repo()
            .update(id, nombre, precio_unitario)
            .await
    }

    pub async fn delete_producto(&self, id: i32) -> Result<bool> {
        self.producto_repo().delete(id).await
    }

    // ========== Documentos ==========

    pub async fn get_documento(&self, id: i32) -> Result<Option<documentos::Model>> {
        self.documento_repo().get(id).await
    }

    pub async fn list_documentos(&self) -> Result<Vec<documentos::Model>> {
        self.documento_repo().list_recent_first().await
    }

    pub async fn list_documentos_por_emision(&self) -> Result<Vec<documentos::Model>> {
        self.documento_repo().list_by_emision_asc().await
    }

    pub async fn count_documentos_por_tipo(&self, tipo: &str) -> Result<u64> {
        self.documento_repo().count_by_tipo(tipo).await
    }

    pub async fn get_detalles(&self, documento_id: i32) -> Result<Vec<detalle_documentos::Model>> {
        self.documento_repo().get_detalles(documento_id).await
    }

    // ========== Users ==========

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo().create(username, password, config).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_password(
        &self,
        username: &str,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(username, new_password, config)
            .await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn regenerate_user_api_key(&self, username: &str) -> Result<String> {
        self.user_repo().regenerate_api_key(username).await
    }
}
