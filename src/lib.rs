// Biblioteca raíz del crate `metrodash`.
// Analíticas de movilidad de Barcelona: demanda por línea de metro a partir
// del informe mensual de viajeros y cobertura de estaciones por barrio.
pub mod algorithm;
pub mod config;
pub mod error;
pub mod excel;
pub mod export;
pub mod graficos;
pub mod models;
pub mod server;

pub use error::{AnalisisError, Result};
/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
