pub mod documento_service;
pub use documento_service::{
    AnulacionError, DocumentoEmitido, DocumentoService, EmisionError, ItemSolicitado,
    SolicitudEmision,
};

pub mod documento_service_impl;
pub use documento_service_impl::SeaOrmDocumentoService;

pub mod reporte_service;
pub use reporte_service::ReporteService;
