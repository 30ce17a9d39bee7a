// Estructuras de datos principales

use serde::Serialize;

static EMPTY_CELL: Cell = Cell::Empty;

/// Celda tipada de una hoja de cálculo.
///
/// Las hojas de origen no tienen esquema fiable, así que cada decisión
/// "¿es numérico?" pasa por `as_number` en vez de comprobar tipos sueltos.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Construye una celda de texto recortada; un texto vacío queda como `Empty`.
    pub fn text<S: AsRef<str>>(s: S) -> Self {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Texto sólo si la celda es `Text` (un número nunca cuenta como texto).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Representación textual de cualquier celda no vacía.
    /// Los números enteros se muestran sin decimales.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                    Some(format!("{}", *f as i64))
                } else {
                    Some(format!("{}", f))
                }
            }
        }
    }

    /// Coerción numérica: números finitos tal cual, texto parseado si se puede.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(f) if f.is_finite() => Some(*f),
            Cell::Text(s) => parse_number(s),
            _ => None,
        }
    }
}

/// Parsea texto como número. Acepta coma decimal sólo cuando es el único
/// separador ("1234,5"); cualquier valor no finito se descarta.
fn parse_number(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    let parsed = t.parse::<f64>().ok().or_else(|| {
        if t.matches(',').count() == 1 && !t.contains('.') {
            t.replace(',', ".").parse::<f64>().ok()
        } else {
            None
        }
    })?;
    parsed.is_finite().then_some(parsed)
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::text(s)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::text(s)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Number(f)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Number(i as f64)
    }
}

/// Rejilla 2-D de celdas. Las filas pueden tener longitudes distintas;
/// leer fuera de rango devuelve `Cell::Empty`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Número de filas.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, r: usize) -> &[Cell] {
        self.rows.get(r).map(|row| row.as_slice()).unwrap_or(&[])
    }

    pub fn cell(&self, r: usize, c: usize) -> &Cell {
        self.row(r).get(c).unwrap_or(&EMPTY_CELL)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|row| row.as_slice())
    }
}

impl From<Vec<Vec<Cell>>> for Sheet {
    fn from(rows: Vec<Vec<Cell>>) -> Self {
        Sheet::new(rows)
    }
}

/// Sección del informe mensual (una por línea o sub-línea).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub title: String,
    pub title_row: usize,
    /// Primera fila de datos (tras el encabezado, o tras el título si no hay encabezado)
    pub start_row: usize,
    /// Exclusivo: fila título del siguiente bloque o fin de hoja
    pub end_row: usize,
    pub header_row: Option<usize>,
    pub accumulator_column: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTotal {
    pub line: String,
    pub total: f64,
}

/// Totales por línea en orden de primera aparición.
/// Sólo se guardan totales > 0; un título repetido sobrescribe el valor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LineTotals {
    entries: Vec<LineTotal>,
}

impl LineTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta o sobrescribe. Devuelve `false` si el total no es positivo.
    pub fn insert(&mut self, line: impl Into<String>, total: f64) -> bool {
        if !(total > 0.0) {
            return false;
        }
        let line = line.into();
        match self.entries.iter_mut().find(|e| e.line == line) {
            Some(existing) => existing.total = total,
            None => self.entries.push(LineTotal { line, total }),
        }
        true
    }

    pub fn get(&self, line: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.line == line).map(|e| e.total)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineTotal> {
        self.entries.iter()
    }

    /// Suma de todos los totales.
    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|e| e.total).sum()
    }
}

/// Fila de la tabla de paradas de transporte público.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StopRecord {
    pub layer: Option<String>,
    pub zone: Option<String>,
}

/// Atributos de un barrio tal como vienen en la tabla de población.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneAttributes {
    pub district: String,
    pub zone: String,
    pub population: f64,
    pub area_ha: f64,
    pub net_density: f64,
}

/// Barrio enriquecido con el recuento de estaciones y las dos métricas derivadas.
/// Los nombres serializados son las columnas del CSV de salida.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneRecord {
    #[serde(rename = "Nom_Districte")]
    pub district: String,
    #[serde(rename = "Nom_Barri")]
    pub zone: String,
    #[serde(rename = "Població")]
    pub population: f64,
    #[serde(rename = "Superfície (ha)")]
    pub area_ha: f64,
    #[serde(rename = "Densitat neta (hab/ha)")]
    pub net_density: f64,
    #[serde(rename = "Nombre_Estacions_Metro")]
    pub station_count: u32,
    /// `+inf` cuando el barrio no tiene estaciones
    #[serde(rename = "Poblacio_per_Estacio")]
    pub population_per_station: f64,
    /// `0` cuando no hay superficie
    #[serde(rename = "Estacions_per_km2")]
    pub stations_per_km2: f64,
}

impl ZoneRecord {
    pub const CSV_HEADERS: [&'static str; 8] = [
        "Nom_Districte",
        "Nom_Barri",
        "Població",
        "Superfície (ha)",
        "Densitat neta (hab/ha)",
        "Nombre_Estacions_Metro",
        "Poblacio_per_Estacio",
        "Estacions_per_km2",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_number_coercion() {
        assert_eq!(Cell::Number(12.5).as_number(), Some(12.5));
        assert_eq!(Cell::text(" 980 ").as_number(), Some(980.0));
        assert_eq!(Cell::text("1234,5").as_number(), Some(1234.5));
        assert_eq!(Cell::text("1.234,5").as_number(), None);
        assert_eq!(Cell::text("TOTAL").as_number(), None);
        assert_eq!(Cell::text("inf").as_number(), None);
        assert_eq!(Cell::Number(f64::NAN).as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
    }

    #[test]
    fn test_text_vacio_es_empty() {
        assert_eq!(Cell::text("   "), Cell::Empty);
        assert_eq!(Cell::from("  LÍNIA 1 "), Cell::Text("LÍNIA 1".to_string()));
    }

    #[test]
    fn test_as_text_numeros() {
        assert_eq!(Cell::Number(2025.0).as_text(), Some("2025".to_string()));
        assert_eq!(Cell::Number(0.5).as_text(), Some("0.5".to_string()));
        assert_eq!(Cell::Number(3.0).as_str(), None);
    }

    #[test]
    fn test_sheet_fuera_de_rango() {
        let sheet = Sheet::from(vec![vec![Cell::from("a")], vec![]]);
        assert_eq!(sheet.len(), 2);
        assert!(sheet.cell(0, 5).is_empty());
        assert!(sheet.cell(9, 0).is_empty());
        assert!(sheet.row(9).is_empty());
    }

    #[test]
    fn test_line_totals_sobrescribe_y_filtra() {
        let mut totals = LineTotals::new();
        assert!(totals.insert("LÍNIA 1", 10.0));
        assert!(totals.insert("LÍNIA 2", 5.0));
        assert!(totals.insert("LÍNIA 1", 20.0));
        assert!(!totals.insert("LÍNIA 3", 0.0));
        assert!(!totals.insert("LÍNIA 4", -3.0));
        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get("LÍNIA 1"), Some(20.0));
        let orden: Vec<&str> = totals.iter().map(|e| e.line.as_str()).collect();
        assert_eq!(orden, vec!["LÍNIA 1", "LÍNIA 2"]);
        assert_eq!(totals.sum(), 25.0);
    }
}
