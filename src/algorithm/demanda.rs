//! Informe de demanda por línea a partir de los totales del extractor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::LineTotals;

/// Orden de clasificación de las líneas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orden {
    #[default]
    Desc,
    Asc,
}

impl FromStr for Orden {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "desc" | "descendente" => Ok(Orden::Desc),
            "asc" | "ascendente" => Ok(Orden::Asc),
            other => Err(format!(
                "orden desconocido: '{}' (use 'desc'/'descendente' o 'asc'/'ascendente')",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineaRanking {
    /// Posición por volumen (1 = mayor demanda), independiente de `Orden`
    pub posicion: usize,
    pub linea: String,
    pub viajeros: f64,
    /// Porcentaje sobre el total de todas las líneas
    pub porcentaje: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandaReport {
    pub orden: Orden,
    pub lineas: Vec<LineaRanking>,
    pub total_viajeros: f64,
    /// Cuota de las tres líneas principales (sólo con 3 o más líneas)
    pub top3_concentracion: Option<f64>,
    /// Diferencia relativa entre la 1ª y la 2ª línea (sólo con 2 o más líneas)
    pub diferencia_primera_segunda: Option<f64>,
}

impl DemandaReport {
    pub fn from_totals(totals: &LineTotals, orden: Orden) -> Self {
        let total_viajeros = totals.sum();
        let pct = |v: f64| if total_viajeros > 0.0 { v / total_viajeros * 100.0 } else { 0.0 };

        let mut ranking: Vec<(String, f64)> =
            totals.iter().map(|t| (t.line.clone(), t.total)).collect();
        ranking.sort_by(|a, b| b.1.total_cmp(&a.1));

        let top3_concentracion = (ranking.len() >= 3)
            .then(|| pct(ranking.iter().take(3).map(|(_, v)| v).sum::<f64>()));
        let diferencia_primera_segunda = match ranking.as_slice() {
            [(_, primera), (_, segunda), ..] if *segunda > 0.0 => {
                Some((primera - segunda) / segunda * 100.0)
            }
            _ => None,
        };

        let mut lineas: Vec<LineaRanking> = ranking
            .into_iter()
            .enumerate()
            .map(|(i, (linea, viajeros))| LineaRanking {
                posicion: i + 1,
                linea,
                viajeros,
                porcentaje: pct(viajeros),
            })
            .collect();
        if orden == Orden::Asc {
            lineas.reverse();
        }

        Self {
            orden,
            lineas,
            total_viajeros,
            top3_concentracion,
            diferencia_primera_segunda,
        }
    }

    fn by_posicion(&self, posicion: usize) -> Option<&LineaRanking> {
        self.lineas.iter().find(|l| l.posicion == posicion)
    }

    /// Análisis en Markdown listo para mostrar en el dashboard.
    pub fn to_markdown(&self) -> String {
        self.to_string()
    }
}

/// El ranking se numera siempre por volumen (`posicion`), sea cual sea `orden`.
impl fmt::Display for DemandaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# 📊 ANÁLISIS DE DEMANDA POR LÍNEA\n")?;
        writeln!(f, "## Resumen General")?;
        writeln!(
            f,
            "**Total de viajeros en todas las líneas:** {}\n",
            format_miles(self.total_viajeros)
        )?;

        let podio = [
            (1, "🏆 Línea con mayor demanda"),
            (2, "🥈 Segunda línea con mayor demanda"),
            (3, "🥉 Tercera línea con mayor demanda"),
        ];
        if !self.lineas.is_empty() {
            writeln!(f, "## Top 3 Líneas\n")?;
        }
        for (pos, titulo) in podio {
            if let Some(l) = self.by_posicion(pos) {
                writeln!(f, "### {}", titulo)?;
                writeln!(f, "* **Línea:** {}", l.linea)?;
                writeln!(f, "* **Viajeros totales:** {}", format_miles(l.viajeros))?;
                writeln!(f, "* **Porcentaje del total:** {:.1}%\n", l.porcentaje)?;
            }
        }

        if self.top3_concentracion.is_some() || self.diferencia_primera_segunda.is_some() {
            writeln!(f, "## 📈 Distribución")?;
            if let Some(c) = self.top3_concentracion {
                writeln!(f, "* Las 3 líneas principales concentran el **{:.1}%** del total", c)?;
            }
            if let Some(d) = self.diferencia_primera_segunda {
                writeln!(f, "* Diferencia entre 1ª y 2ª: **{:+.1}%**", d)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "## 🔍 Ranking completo")?;
        for l in &self.lineas {
            writeln!(
                f,
                "* **{}.** {}: **{}** viajeros (**{:.1}%**)",
                l.posicion,
                l.linea,
                format_miles(l.viajeros),
                l.porcentaje
            )?;
        }
        Ok(())
    }
}

/// Formatea un valor redondeado a entero con separador de miles ",".
pub fn format_miles(v: f64) -> String {
    let n = v.round() as i64;
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}
