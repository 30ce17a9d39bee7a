//! Extractor de bloques del informe mensual de viajeros.
//!
//! El informe es una hoja "humana": una sección por línea, cada una
//! introducida por una fila título (`VIATGERS REALS LÍNIA ...` o `FUNICULAR`),
//! seguida de una fila de encabezado con una columna `ACUMULAT`. El total
//! del periodo es el último valor numérico de esa columna dentro del bloque.
//!
//! Nada de este módulo devuelve error: un bloque sin encabezado o sin total
//! simplemente no aparece en el resultado.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::models::{Block, Cell, LineTotals, Sheet};

/// Marcadores de texto que delimitan los bloques del informe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockMarkers {
    /// Una celda que lo contiene marca una fila título
    pub titulo: String,
    /// Una celda exactamente igual marca un bloque independiente
    pub independiente: String,
    /// El nombre de la línea empieza en este texto y acaba en el primer '('
    pub ancla_nombre: String,
    /// Tokens de línea que deben aparecer en la fila de encabezado
    pub tokens_linea: Vec<String>,
    /// Token de la columna acumulada
    pub token_acumulado: String,
    /// Filas que se examinan tras el título buscando el encabezado
    pub ventana: usize,
}

impl Default for BlockMarkers {
    fn default() -> Self {
        Self {
            titulo: "VIATGERS REALS LÍNIA".to_string(),
            independiente: "FUNICULAR".to_string(),
            ancla_nombre: "LÍNIA".to_string(),
            tokens_linea: vec!["LÍNIA".to_string(), "LINIA".to_string()],
            token_acumulado: "ACUMULAT".to_string(),
            ventana: 12,
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_uppercase().contains(&needle.to_uppercase())
}

/// Posición (en bytes de `haystack`) de la primera aparición de `needle`
/// sin distinguir mayúsculas. Siempre cae en un límite de carácter.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle_up = needle.to_uppercase();
    haystack
        .char_indices()
        .map(|(i, _)| i)
        .find(|&i| haystack[i..].to_uppercase().starts_with(&needle_up))
}

fn is_title_row(row: &[Cell], markers: &BlockMarkers) -> bool {
    let independiente = markers.independiente.to_uppercase();
    row.iter().filter_map(Cell::as_str).any(|s| {
        contains_ignore_case(s, &markers.titulo) || s.trim().to_uppercase() == independiente
    })
}

/// Índices de las filas título, en orden.
pub fn find_title_rows(sheet: &Sheet, markers: &BlockMarkers) -> Vec<usize> {
    sheet
        .rows()
        .enumerate()
        .filter(|(_, row)| is_title_row(row, markers))
        .map(|(idx, _)| idx)
        .collect()
}

/// Nombre del bloque a partir de su fila título.
/// `index` es la posición del bloque (0-based), sólo para el nombre de reserva.
pub fn derive_title(row: &[Cell], index: usize, markers: &BlockMarkers) -> String {
    let raw = match row.iter().find_map(Cell::as_text) {
        Some(t) => t,
        None => return format!("{}_{}", markers.ancla_nombre, index + 1),
    };

    if let Some(pos) = find_ignore_case(&raw, &markers.ancla_nombre) {
        let tail = &raw[pos..];
        return tail.split('(').next().unwrap_or(tail).trim().to_string();
    }
    if contains_ignore_case(&raw, &markers.independiente) {
        return markers.independiente.clone();
    }
    raw
}

/// Busca la fila de encabezado y la columna `ACUMULAT` tras la fila título.
/// Devuelve `(fila, columna)`.
pub fn find_header(sheet: &Sheet, title_row: usize, markers: &BlockMarkers) -> Option<(usize, usize)> {
    let start = title_row + 1;
    let end = (start + markers.ventana).min(sheet.len());
    let acumulado = markers.token_acumulado.to_uppercase();
    let tokens: Vec<String> = markers.tokens_linea.iter().map(|t| t.to_uppercase()).collect();

    (start..end).find_map(|r| {
        let row = sheet.row(r);
        let text = row
            .iter()
            .filter_map(Cell::as_text)
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        if !tokens.iter().any(|t| text.contains(t.as_str())) || !text.contains(&acumulado) {
            return None;
        }
        row.iter()
            .position(|c| c.as_str().is_some_and(|s| s.to_uppercase().contains(&acumulado)))
            .map(|col| (r, col))
    })
}

/// Localiza todos los bloques de la hoja, tengan o no encabezado.
pub fn detect_blocks(sheet: &Sheet, markers: &BlockMarkers) -> Vec<Block> {
    let titles = find_title_rows(sheet, markers);
    debug!("Filas título encontradas: {:?}", titles);

    titles
        .iter()
        .enumerate()
        .map(|(i, &title_row)| {
            let header = find_header(sheet, title_row, markers);
            let end_row = titles.get(i + 1).copied().unwrap_or(sheet.len());
            Block {
                title: derive_title(sheet.row(title_row), i, markers),
                title_row,
                start_row: header.map_or(title_row + 1, |(h, _)| h + 1),
                end_row,
                header_row: header.map(|(h, _)| h),
                accumulator_column: header.map(|(_, c)| c),
            }
        })
        .collect()
}

/// Total del bloque: primer valor numérico de la columna acumulada
/// recorriendo de abajo hacia arriba. Devuelve `(fila, total)`.
///
/// El orden inverso importa: encima del total del periodo están los
/// subtotales mensuales de la misma columna.
pub fn block_total(sheet: &Sheet, block: &Block) -> Option<(usize, f64)> {
    block.header_row?;
    let col = block.accumulator_column?;
    (block.start_row..block.end_row)
        .rev()
        .find_map(|r| sheet.cell(r, col).as_number().map(|v| (r, v)))
}

fn log_total_context(sheet: &Sheet, total_row: usize, col: usize) {
    let desde = total_row.saturating_sub(1);
    let hasta = (total_row + 2).min(sheet.len());
    for r in desde..hasta {
        let vals: Vec<String> = (col.saturating_sub(1)..=col)
            .filter_map(|c| sheet.cell(r, c).as_text())
            .collect();
        if !vals.is_empty() {
            debug!("  Fila {}: {}", r + 1, vals.join(" | "));
        }
    }
}

/// Totales de bloques ya detectados. Los bloques sin encabezado, sin total
/// numérico o con total <= 0 se omiten.
pub fn totals_from_blocks(sheet: &Sheet, blocks: &[Block]) -> LineTotals {
    let mut totals = LineTotals::new();

    for block in blocks {
        debug!(
            "Procesando bloque '{}': filas {}..{}",
            block.title,
            block.start_row,
            block.end_row.saturating_sub(1)
        );

        let (Some(header_row), Some(col)) = (block.header_row, block.accumulator_column) else {
            debug!("  Sin encabezado/columna ACUMULAT para '{}'; saltando", block.title);
            continue;
        };
        debug!("  Encabezado en fila {}, columna ACUMULAT={}", header_row, col);

        match block_total(sheet, block) {
            Some((row, total)) => {
                debug!("  Total encontrado en fila {}: {:.2}", row + 1, total);
                log_total_context(sheet, row, col);
                if !totals.insert(block.title.clone(), total) {
                    debug!("  Total no positivo para '{}' ({}); descartado", block.title, total);
                }
            }
            None => debug!("  No se encontró total para '{}'", block.title),
        }
    }

    totals
}

/// Recupera el total acumulado de cada línea del informe.
///
/// Nunca falla: si no hay bloques devuelve un mapa vacío.
pub fn extract_totals(sheet: &Sheet, markers: &BlockMarkers) -> LineTotals {
    let blocks = detect_blocks(sheet, markers);
    if blocks.is_empty() {
        warn!("No se encontraron bloques de línea ({} filas examinadas)", sheet.len());
        return LineTotals::new();
    }

    let totals = totals_from_blocks(sheet, &blocks);
    info!(
        "{} bloques detectados, {} totales válidos",
        blocks.len(),
        totals.len()
    );
    for t in totals.iter() {
        debug!("  {}: {:.2}", t.line, t.total);
    }
    totals
}
