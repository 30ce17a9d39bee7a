//! Módulo `excel` dividido en submódulos para mantener el código organizado.
//!
//! Submódulos:
//! - `io`: lectura de hojas con calamine y conversión a `Sheet` tipada
//! - `bloques`: extractor de bloques del informe mensual de viajeros
//! - `tabla`: hojas con encabezado (población por barrio, paradas de transporte)

/// Helpers de IO: `read_sheet`, `list_sheets`
pub mod io;

/// Extractor de totales por línea: `extract_totals`
pub mod bloques;

/// Tablas con encabezado y búsqueda de columnas
pub mod tabla;

pub use bloques::{BlockMarkers, detect_blocks, extract_totals, totals_from_blocks};
pub use io::{list_sheets, normalize_header, read_sheet};
pub use tabla::{Table, read_stops, read_zone_attributes};
