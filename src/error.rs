//! Errores de las analíticas.
//!
//! El texto de cada variante es el mensaje que se muestra directamente al
//! usuario en el dashboard, así que debe ser autoexplicativo.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalisisError>;

#[derive(Error, Debug)]
pub enum AnalisisError {
    /// Falta un fichero de entrada
    #[error("Error: no se encontró el archivo {path}")]
    ArchivoNoEncontrado { path: String },

    #[error("Error: la hoja '{hoja}' no existe en {path} (hojas disponibles: {disponibles})")]
    HojaNoEncontrada {
        path: String,
        hoja: String,
        disponibles: String,
    },

    #[error("Error: la columna '{columna}' no existe en la hoja '{hoja}'")]
    ColumnaNoEncontrada { hoja: String, columna: String },

    #[error("No se detectaron bloques de línea en la hoja '{hoja}'")]
    SinBloques { hoja: String },

    /// Hay bloques, pero ninguno produjo un total válido
    #[error("Se detectaron {bloques} bloques en la hoja '{hoja}' pero ninguno tiene un total válido")]
    SinTotales { hoja: String, bloques: usize },

    #[error("Error leyendo el libro Excel: {0}")]
    Lectura(#[from] calamine::Error),

    #[error("Error escribiendo CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error de configuración JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuración inválida: {reason}")]
    Config { reason: String },

    #[error("Error generando gráfico: {reason}")]
    Grafico { reason: String },
}
