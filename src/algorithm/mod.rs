//! Puntos de entrada de las dos analíticas del dashboard.
//!
//! Cada análisis se ejecuta de principio a fin en cada llamada (sin caché) y
//! devuelve un resultado completo o un `AnalisisError` cuyo texto se muestra
//! tal cual al usuario.

pub mod cobertura;
pub mod demanda;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{CoberturaConfig, DemandaConfig};
use crate::error::{AnalisisError, Result};
use crate::excel::io::ensure_exists;
use crate::excel::{Table, detect_blocks, read_sheet, read_stops, read_zone_attributes, totals_from_blocks};
use crate::export::write_zone_csv;
use crate::graficos::{SKYBLUE, TOMATO, render_horizontal_bars, render_line_totals};
use crate::models::{Block, LineTotals, ZoneRecord};

pub use cobertura::{count_stations, merge_and_derive, top_pressure, top_without_stations};
pub use demanda::{DemandaReport, Orden};

#[derive(Debug, Clone, Serialize)]
pub struct DemandaResultado {
    pub informe: DemandaReport,
    pub totales: LineTotals,
    pub bloques: Vec<Block>,
    /// `None` si el gráfico no pudo generarse
    pub grafico: Option<PathBuf>,
    pub generado: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoberturaResultado {
    pub zonas: Vec<ZoneRecord>,
    pub presion: Vec<ZoneRecord>,
    pub sin_metro: Vec<ZoneRecord>,
    pub csv: PathBuf,
    pub graficos: Vec<PathBuf>,
    pub estado: String,
    pub generado: DateTime<Utc>,
}

/// Los gráficos son opcionales: un fallo se registra y no invalida el análisis.
fn try_render<F>(path: &Path, render: F) -> Option<PathBuf>
where
    F: FnOnce(&Path) -> std::result::Result<(), Box<dyn std::error::Error>>,
{
    match render(path) {
        Ok(()) => Some(path.to_path_buf()),
        Err(e) => {
            let err = AnalisisError::Grafico { reason: e.to_string() };
            warn!("{} ({})", err, path.display());
            None
        }
    }
}

/// Demanda por línea: lee el informe mensual, extrae el total acumulado de
/// cada bloque y construye el ranking.
pub fn analizar_demanda(cfg: &DemandaConfig, orden: Orden) -> Result<DemandaResultado> {
    ensure_exists(&cfg.archivo)?;
    info!("Leyendo informe de viajeros: {}", cfg.archivo.display());
    let sheet = read_sheet(&cfg.archivo, &cfg.hoja)?;

    let bloques = detect_blocks(&sheet, &cfg.marcadores);
    if bloques.is_empty() {
        return Err(AnalisisError::SinBloques { hoja: cfg.hoja.clone() });
    }
    let totales = totals_from_blocks(&sheet, &bloques);
    if totales.is_empty() {
        return Err(AnalisisError::SinTotales {
            hoja: cfg.hoja.clone(),
            bloques: bloques.len(),
        });
    }

    let informe = DemandaReport::from_totals(&totales, orden);
    info!(
        "{} líneas, {:.0} viajeros en total",
        informe.lineas.len(),
        informe.total_viajeros
    );
    let grafico = try_render(&cfg.grafico, |p| render_line_totals(p, &informe, &cfg.titulo_grafico));

    Ok(DemandaResultado {
        informe,
        totales,
        bloques,
        grafico,
        generado: Utc::now(),
    })
}

/// Cobertura de metro: cruza paradas con población por barrio, calcula los
/// indicadores, escribe el CSV completo y los dos gráficos de top-N.
pub fn analizar_cobertura(cfg: &CoberturaConfig) -> Result<CoberturaResultado> {
    ensure_exists(&cfg.archivo_poblacion)?;
    ensure_exists(&cfg.archivo_transporte)?;

    let transporte = Table::from_sheet(
        &cfg.hoja_transporte,
        read_sheet(&cfg.archivo_transporte, &cfg.hoja_transporte)?,
    );
    let poblacion = Table::from_sheet(
        &cfg.hoja_poblacion,
        read_sheet(&cfg.archivo_poblacion, &cfg.hoja_poblacion)?,
    );

    let stops = read_stops(&transporte, &cfg.columnas)?;
    let zone_counts = count_stations(&stops, &cfg.marcador_capa);
    let atributos = read_zone_attributes(&poblacion, &cfg.columnas)?;
    let zonas = merge_and_derive(&atributos, &zone_counts);
    info!(
        "{} paradas leídas, {} barrios, {} con estación",
        stops.len(),
        zonas.len(),
        zonas.iter().filter(|z| z.station_count > 0).count()
    );

    let presion = top_pressure(&zonas, cfg.top_n);
    let sin_metro = top_without_stations(&zonas, cfg.top_n);

    write_zone_csv(&cfg.csv_salida, &cobertura::sort_for_export(&zonas))?;

    let mut graficos = Vec::new();
    if !presion.is_empty() {
        let barras: Vec<(String, f64)> = presion
            .iter()
            .map(|z| (z.zone.clone(), z.population_per_station))
            .collect();
        graficos.extend(try_render(&cfg.grafico_presion, |p| {
            render_horizontal_bars(
                p,
                &format!("Top {} Barris amb Més Població per Estació de Metro", cfg.top_n),
                "Població per Estació (Habitants)",
                &barras,
                TOMATO,
            )
        }));
    }
    if !sin_metro.is_empty() {
        let barras: Vec<(String, f64)> = sin_metro
            .iter()
            .map(|z| (z.zone.clone(), z.population))
            .collect();
        graficos.extend(try_render(&cfg.grafico_sin_metro, |p| {
            render_horizontal_bars(
                p,
                &format!("Top {} Barris Més Poblats SENSE Estació de Metro", cfg.top_n),
                "Població Total",
                &barras,
                SKYBLUE,
            )
        }));
    }

    Ok(CoberturaResultado {
        zonas,
        presion,
        sin_metro,
        csv: cfg.csv_salida.clone(),
        graficos,
        estado: "Anàlisi completada amb èxit.".to_string(),
        generado: Utc::now(),
    })
}
