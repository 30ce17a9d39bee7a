use calamine::{Data, Reader, open_workbook_auto};
use log::debug;
use std::path::Path;

use crate::error::{AnalisisError, Result};
use crate::models::{Cell, Sheet};

/// Convierte un `Data` de calamine a una `Cell` tipada.
pub fn data_to_cell(d: &Data) -> Cell {
    match d {
        Data::String(s) => Cell::text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::text(s),
        Data::DurationIso(s) => Cell::text(s),
        Data::Error(_) => Cell::Empty,
        Data::Empty => Cell::Empty,
    }
}

/// Normaliza encabezados eliminando espacios y pasando a minúsculas.
pub fn normalize_header(s: &str) -> String {
    s.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect()
}

pub(crate) fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AnalisisError::ArchivoNoEncontrado {
            path: path.display().to_string(),
        })
    }
}

/// Nombres de las hojas del libro, en orden.
pub fn list_sheets<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    ensure_exists(path)?;
    let workbook = open_workbook_auto(path)?;
    Ok(workbook.sheet_names().to_owned())
}

/// Lee la hoja `sheet_name` completa en memoria.
///
/// calamine empieza el rango en la primera celda usada; se rellena ese
/// desplazamiento para que los índices (fila, columna) sean absolutos.
pub fn read_sheet<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Sheet> {
    let path = path.as_ref();
    ensure_exists(path)?;

    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_owned();
    if !names.iter().any(|n| n == sheet_name) {
        return Err(AnalisisError::HojaNoEncontrada {
            path: path.display().to_string(),
            hoja: sheet_name.to_string(),
            disponibles: names.join(", "),
        });
    }

    let range = workbook.worksheet_range(sheet_name)?;
    let (row0, col0) = range.start().unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row0 as usize];
    for r in range.rows() {
        let mut row_vec: Vec<Cell> = vec![Cell::Empty; col0 as usize];
        row_vec.extend(r.iter().map(data_to_cell));
        rows.push(row_vec);
    }

    debug!(
        "Hoja '{}' de {} leída: {} filas",
        sheet_name,
        path.display(),
        rows.len()
    );
    Ok(Sheet::new(rows))
}
