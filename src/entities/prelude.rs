pub use super::clientes::Entity as Clientes;
pub use super::detalle_documentos::Entity as DetalleDocumentos;
pub use super::documentos::Entity as Documentos;
pub use super::productos::Entity as Productos;
pub use super::users::Entity as Users;
