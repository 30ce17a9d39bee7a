//! Configuración explícita del dashboard.
//!
//! Rutas de entrada/salida, nombres de hoja y columnas, marcadores de bloque,
//! ventana de búsqueda y top-N. Los valores por defecto son los de los
//! ficheros publicados por el Ajuntament y TMB; cualquier campo puede
//! sobrescribirse desde un JSON parcial.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AnalisisError, Result};
use crate::excel::BlockMarkers;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub servidor: ServidorConfig,
    pub demanda: DemandaConfig,
    pub cobertura: CoberturaConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServidorConfig {
    pub bind: String,
}

impl Default for ServidorConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Demanda por línea (informe mensual de viajeros FMB).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandaConfig {
    pub archivo: PathBuf,
    pub hoja: String,
    pub marcadores: BlockMarkers,
    pub grafico: PathBuf,
    pub titulo_grafico: String,
}

impl Default for DemandaConfig {
    fn default() -> Self {
        Self {
            archivo: PathBuf::from(
                "Resum dades mensuals i diàries de viatgers FMB 2025_1er Semestre.xlsx",
            ),
            hoja: "Mensuals".to_string(),
            marcadores: BlockMarkers::default(),
            grafico: PathBuf::from("temp_chart.svg"),
            titulo_grafico: "Líneas de Metro por Número de Viajeros - 1er Semestre 2025"
                .to_string(),
        }
    }
}

/// Nombres de columna de las dos tablas de cobertura.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnasCobertura {
    /// Capa de la parada (tabla de transporte)
    pub capa: String,
    /// Barrio de la parada (tabla de transporte)
    pub barri_transporte: String,
    pub districte: String,
    pub barri: String,
    pub poblacio: String,
    pub superficie: String,
    pub densitat: String,
}

impl Default for ColumnasCobertura {
    fn default() -> Self {
        Self {
            capa: "NOM_CAPA".to_string(),
            barri_transporte: "NOM_BARRI".to_string(),
            districte: "Nom_Districte".to_string(),
            barri: "Nom_Barri".to_string(),
            poblacio: "Població".to_string(),
            superficie: "Superfície (ha)".to_string(),
            densitat: "Densitat neta (hab/ha)".to_string(),
        }
    }
}

/// Cobertura de metro por barrio (paradas × población).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoberturaConfig {
    pub archivo_poblacion: PathBuf,
    pub hoja_poblacion: String,
    pub archivo_transporte: PathBuf,
    pub hoja_transporte: String,
    pub columnas: ColumnasCobertura,
    /// Subcadena (sin distinguir mayúsculas) de la capa que cuenta como estación
    pub marcador_capa: String,
    pub top_n: usize,
    pub csv_salida: PathBuf,
    pub grafico_presion: PathBuf,
    pub grafico_sin_metro: PathBuf,
}

impl Default for CoberturaConfig {
    fn default() -> Self {
        Self {
            archivo_poblacion: PathBuf::from("Densitat Poblacio Barcelona 2021.xlsx"),
            hoja_poblacion: "Densitat Poblacio Barcelona 202".to_string(),
            archivo_transporte: PathBuf::from("Transport Public Barcelona.xlsx"),
            hoja_transporte: "Parades Transport Public Barcel".to_string(),
            columnas: ColumnasCobertura::default(),
            marcador_capa: "Metro".to_string(),
            top_n: 10,
            csv_salida: PathBuf::from("analisis_transporte_poblacion.csv"),
            grafico_presion: PathBuf::from("top_presion.svg"),
            grafico_sin_metro: PathBuf::from("top_sin_metro.svg"),
        }
    }
}

impl DashboardConfig {
    /// Carga un JSON (posiblemente parcial); los campos ausentes toman el valor por defecto.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AnalisisError::ArchivoNoEncontrado {
                path: path.display().to_string(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: DashboardConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.demanda.marcadores.ventana == 0 {
            return Err(AnalisisError::Config {
                reason: "demanda.marcadores.ventana debe ser mayor que 0".to_string(),
            });
        }
        if self.demanda.marcadores.titulo.trim().is_empty()
            || self.demanda.marcadores.token_acumulado.trim().is_empty()
        {
            return Err(AnalisisError::Config {
                reason: "los marcadores de título y acumulado no pueden estar vacíos".to_string(),
            });
        }
        let m = &self.demanda.marcadores;
        if m.tokens_linea.iter().all(|t| t.trim().is_empty()) {
            return Err(AnalisisError::Config {
                reason: "demanda.marcadores.tokens_linea necesita al menos un token no vacío".to_string(),
            });
        }
        if m.ancla_nombre.trim().is_empty() {
            return Err(AnalisisError::Config {
                reason: "demanda.marcadores.ancla_nombre no puede estar vacío".to_string(),
            });
        }
        if self.cobertura.top_n == 0 {
            return Err(AnalisisError::Config {
                reason: "cobertura.top_n debe ser mayor que 0".to_string(),
            });
        }
        Ok(())
    }
}
