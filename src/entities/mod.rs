pub mod prelude;

pub mod clientes;
pub mod detalle_documentos;
pub mod documentos;
pub mod productos;
pub mod users;
