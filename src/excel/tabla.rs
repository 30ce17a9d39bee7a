use log::warn;

use crate::config::ColumnasCobertura;
use crate::error::{AnalisisError, Result};
use crate::excel::io::normalize_header;
use crate::models::{Cell, Sheet, StopRecord, ZoneAttributes};

/// Hoja con encabezado: la primera fila no vacía. Las columnas conservan
/// su índice absoluto en la hoja.
#[derive(Debug, Clone)]
pub struct Table {
    pub hoja: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn from_sheet(hoja: &str, sheet: Sheet) -> Self {
        let mut rows = sheet
            .rows()
            .skip_while(|r| r.iter().all(Cell::is_empty))
            .map(|r| r.to_vec());
        let headers = rows
            .next()
            .map(|h| h.iter().map(|c| c.as_text().unwrap_or_default()).collect())
            .unwrap_or_default();
        Self {
            hoja: hoja.to_string(),
            headers,
            rows: rows.collect(),
        }
    }

    /// Índice de la columna `name`: primero coincidencia exacta, luego
    /// ignorando espacios y mayúsculas.
    pub fn column(&self, name: &str) -> Result<usize> {
        let wanted = name.trim();
        if let Some(i) = self.headers.iter().position(|h| h.trim() == wanted) {
            return Ok(i);
        }
        let norm = normalize_header(wanted);
        self.headers
            .iter()
            .position(|h| normalize_header(h) == norm)
            .ok_or_else(|| AnalisisError::ColumnaNoEncontrada {
                hoja: self.hoja.clone(),
                columna: name.to_string(),
            })
    }

    pub fn get<'a>(row: &'a [Cell], col: usize) -> Option<&'a Cell> {
        row.get(col).filter(|c| !c.is_empty())
    }
}

/// Tabla de población por barrio → atributos de cada barrio.
/// Las filas sin nombre de barrio (p. ej. filas de totales vacías) se descartan.
pub fn read_zone_attributes(table: &Table, cols: &ColumnasCobertura) -> Result<Vec<ZoneAttributes>> {
    let i_districte = table.column(&cols.districte)?;
    let i_barri = table.column(&cols.barri)?;
    let i_poblacio = table.column(&cols.poblacio)?;
    let i_superficie = table.column(&cols.superficie)?;
    let i_densitat = table.column(&cols.densitat)?;

    let mut zonas = Vec::new();
    for row in &table.rows {
        let Some(zone) = Table::get(row, i_barri).and_then(Cell::as_text) else {
            continue;
        };
        let number = |col: usize, campo: &str| -> f64 {
            match Table::get(row, col).and_then(Cell::as_number) {
                Some(v) => v,
                None => {
                    warn!("Barri '{}': '{}' no numérico, se usa 0", zone, campo);
                    0.0
                }
            }
        };
        zonas.push(ZoneAttributes {
            district: Table::get(row, i_districte)
                .and_then(Cell::as_text)
                .unwrap_or_default(),
            population: number(i_poblacio, &cols.poblacio),
            area_ha: number(i_superficie, &cols.superficie),
            net_density: number(i_densitat, &cols.densitat),
            zone,
        });
    }
    Ok(zonas)
}

/// Tabla de paradas → capa y barrio de cada parada.
pub fn read_stops(table: &Table, cols: &ColumnasCobertura) -> Result<Vec<StopRecord>> {
    let i_capa = table.column(&cols.capa)?;
    let i_barri = table.column(&cols.barri_transporte)?;

    Ok(table
        .rows
        .iter()
        .map(|row| StopRecord {
            layer: Table::get(row, i_capa).and_then(Cell::as_text),
            zone: Table::get(row, i_barri).and_then(Cell::as_text),
        })
        .collect())
}
