pub mod cliente;
pub mod documento;
pub mod producto;
pub mod user;
