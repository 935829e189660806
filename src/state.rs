use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{DocumentoService, ReporteService, SeaOrmDocumentoService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub documento_service: Arc<dyn DocumentoService>,

    pub reporte_service: Arc<ReporteService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let documento_service: Arc<dyn DocumentoService> =
            Arc::new(SeaOrmDocumentoService::new(store.conn.clone()));

        let reporte_service = Arc::new(ReporteService::new(store.clone()));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            documento_service,
            reporte_service,
        })
    }
}
