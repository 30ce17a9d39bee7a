//! Cobertura de metro por barrio: recuento de estaciones, cruce con la
//! tabla de población y los dos indicadores derivados.

use log::debug;
use std::collections::BTreeMap;

use crate::models::{StopRecord, ZoneAttributes, ZoneRecord};

/// Cuenta paradas por barrio, quedándose sólo con las de la capa `marcador`
/// (sin distinguir mayúsculas). Una capa ausente nunca coincide y las
/// paradas sin barrio se ignoran.
pub fn count_stations(stops: &[StopRecord], marcador: &str) -> BTreeMap<String, u32> {
    let marcador = marcador.to_lowercase();
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for stop in stops {
        let es_estacion = stop
            .layer
            .as_deref()
            .is_some_and(|l| l.to_lowercase().contains(&marcador));
        if !es_estacion {
            continue;
        }
        if let Some(zone) = stop.zone.as_deref() {
            *counts.entry(zone.to_string()).or_insert(0) += 1;
        }
    }
    debug!("{} barrios con estaciones '{}'", counts.len(), marcador);
    counts
}

/// Habitantes por estación. Sin estaciones el indicador es `+inf`
/// (barrio sin cobertura), nunca un error de división.
pub fn population_per_station(population: f64, stations: u32) -> f64 {
    if stations > 0 {
        (population / stations as f64).round_ties_even()
    } else {
        f64::INFINITY
    }
}

/// Estaciones por km² (100 ha = 1 km²). Sin superficie el indicador es `0`,
/// al revés que `population_per_station`.
pub fn stations_per_km2(stations: u32, area_ha: f64) -> f64 {
    if area_ha > 0.0 {
        stations as f64 / (area_ha / 100.0)
    } else {
        0.0
    }
}

/// Left join de los atributos de barrio con el recuento de estaciones.
/// Cada fila de `zone_attributes` aparece exactamente una vez en la salida.
pub fn merge_and_derive(
    zone_attributes: &[ZoneAttributes],
    zone_counts: &BTreeMap<String, u32>,
) -> Vec<ZoneRecord> {
    zone_attributes
        .iter()
        .map(|z| {
            let station_count = zone_counts.get(&z.zone).copied().unwrap_or(0);
            ZoneRecord {
                district: z.district.clone(),
                zone: z.zone.clone(),
                population: z.population,
                area_ha: z.area_ha,
                net_density: z.net_density,
                station_count,
                population_per_station: population_per_station(z.population, station_count),
                stations_per_km2: stations_per_km2(station_count, z.area_ha),
            }
        })
        .collect()
}

/// Top-N barrios con más habitantes por estación (excluye los `+inf`).
pub fn top_pressure(records: &[ZoneRecord], n: usize) -> Vec<ZoneRecord> {
    let mut out: Vec<ZoneRecord> = records
        .iter()
        .filter(|r| r.population_per_station.is_finite())
        .cloned()
        .collect();
    out.sort_by(|a, b| b.population_per_station.total_cmp(&a.population_per_station));
    out.truncate(n);
    out
}

/// Top-N barrios más poblados sin ninguna estación.
pub fn top_without_stations(records: &[ZoneRecord], n: usize) -> Vec<ZoneRecord> {
    let mut out: Vec<ZoneRecord> = records
        .iter()
        .filter(|r| r.station_count == 0)
        .cloned()
        .collect();
    out.sort_by(|a, b| b.population.total_cmp(&a.population));
    out.truncate(n);
    out
}

/// Orden del CSV completo: habitantes por estación descendente, `+inf` primero.
pub fn sort_for_export(records: &[ZoneRecord]) -> Vec<ZoneRecord> {
    let mut out = records.to_vec();
    out.sort_by(|a, b| b.population_per_station.total_cmp(&a.population_per_station));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_per_station_redondeo() {
        assert_eq!(population_per_station(1000.0, 3), 333.0);
        assert_eq!(population_per_station(1001.0, 2), 500.0); // 500.5 → par
        assert_eq!(population_per_station(1003.0, 2), 502.0); // 501.5 → par
        assert!(population_per_station(1000.0, 0).is_infinite());
    }

    #[test]
    fn test_stations_per_km2_sin_superficie() {
        assert_eq!(stations_per_km2(4, 50.0), 8.0);
        assert_eq!(stations_per_km2(4, 0.0), 0.0);
        assert_eq!(stations_per_km2(4, -1.0), 0.0);
    }

    #[test]
    fn test_count_stations_ignora_sin_barrio() {
        let stops = vec![
            StopRecord { layer: Some("METRO".into()), zone: None },
            StopRecord { layer: Some("metro".into()), zone: Some("Sants".into()) },
        ];
        let counts = count_stations(&stops, "Metro");
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("Sants"), Some(&1));
    }
}
