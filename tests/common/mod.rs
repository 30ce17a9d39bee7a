//! Utilidades compartidas por los tests de integración: libros Excel de prueba.
#![allow(dead_code)]

use std::path::Path;

pub enum V {
    T(&'static str),
    N(f64),
    E,
}

/// Escribe un libro con una hoja `hoja` cuyo contenido es `rows` (fila 1 = `rows[0]`).
pub fn write_xlsx(path: &Path, hoja: &str, rows: &[Vec<V>]) {
    let mut book = umya_spreadsheet::new_file();
    let ws = book.new_sheet(hoja).unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, v) in row.iter().enumerate() {
            let coord = ((c + 1) as u32, (r + 1) as u32);
            match v {
                V::T(s) => {
                    ws.get_cell_mut(coord).set_value(*s);
                }
                V::N(n) => {
                    ws.get_cell_mut(coord).set_value_number(*n);
                }
                V::E => {}
            }
        }
    }
    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}

/// Informe mensual con dos líneas y el funicular.
pub fn informe_mensual(path: &Path) {
    use V::*;
    let rows = vec![
        vec![T("Resum dades mensuals de viatgers FMB")],
        vec![],
        vec![E, T("VIATGERS REALS LÍNIA 1 (gener - juny 2025)")],
        vec![E, T("LÍNIA 1"), T("MES"), T("VIATGERS"), T("ACUMULAT")],
        vec![E, E, T("gener"), N(10_000.0), N(10_000.0)],
        vec![E, E, T("febrer"), N(12_000.0), N(22_000.0)],
        vec![E, E, T("TOTAL"), E, N(22_000.0)],
        vec![],
        vec![E, T("VIATGERS REALS LÍNIA 2 (gener - juny 2025)")],
        vec![E, T("LÍNIA 2"), T("MES"), T("VIATGERS"), T("ACUMULAT")],
        vec![E, E, T("gener"), N(30_000.0), N(30_000.0)],
        vec![E, E, T("febrer"), N(20_000.0), N(50_000.0)],
        vec![],
        vec![E, T("FUNICULAR")],
        vec![E, T("LÍNIA"), T("MES"), T("VIATGERS"), T("ACUMULAT")],
        vec![E, E, T("gener"), N(3_000.0), N(3_000.0)],
    ];
    write_xlsx(path, "Mensuals", &rows);
}
