/// IGV tax rate applied to the subtotal when a document is issued with tax.
/// Fixed configuration constant, not per-product.
pub const IGV_RATE: f64 = 0.18;

pub mod documentos {

    pub const TIPO_FACTURA: &str = "Factura";

    pub const TIPO_BOLETA: &str = "Boleta";
}

pub mod reporte {

    pub const TITULO: &str = "REPORTE DE VENTAS - HISTORIAL COMPLETO";

    /// Placeholder for deleted clientes/users referenced by history rows
    pub const SIN_DATO: &str = "N/A";

    pub const ESTADO_ACTIVO: &str = "ACTIVO";

    pub const ESTADO_ANULADO: &str = "ANULADO";
}

pub mod sesiones {

    /// Web session inactivity expiry, in minutes
    pub const INACTIVITY_MINUTES: i64 = 60;
}
