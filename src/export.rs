//! Exportación del dataset completo de barrios a CSV.

use log::info;
use std::path::Path;

use crate::error::Result;
use crate::models::ZoneRecord;

/// Escribe (sobrescribiendo) la tabla enriquecida en `path`.
/// `+inf` se escribe como `inf`. Con cero filas se escribe sólo el encabezado.
pub fn write_zone_csv<P: AsRef<Path>>(path: P, records: &[ZoneRecord]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::Writer::from_path(path)?;
    if records.is_empty() {
        wtr.write_record(ZoneRecord::CSV_HEADERS)?;
    }
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush()?;

    info!("CSV con {} barrios escrito en {}", records.len(), path.display());
    Ok(())
}
