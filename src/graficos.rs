//! Gráficos SVG con plotters.
//!
//! Son adaptadores de presentación: reciben datos ya calculados y escriben
//! un fichero que se sobrescribe en cada ejecución.

use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

use crate::algorithm::demanda::{DemandaReport, format_miles};

/// Paleta Set3
const SET3: [RGBColor; 12] = [
    RGBColor(141, 211, 199),
    RGBColor(255, 255, 179),
    RGBColor(190, 186, 218),
    RGBColor(251, 128, 114),
    RGBColor(128, 177, 211),
    RGBColor(253, 180, 98),
    RGBColor(179, 222, 105),
    RGBColor(252, 205, 229),
    RGBColor(217, 217, 217),
    RGBColor(188, 128, 189),
    RGBColor(204, 235, 197),
    RGBColor(255, 237, 111),
];

pub const TOMATO: RGBColor = RGBColor(255, 99, 71);
pub const SKYBLUE: RGBColor = RGBColor(135, 206, 235);

fn upper_bound(max: f64) -> f64 {
    if max > 0.0 { max * 1.1 } else { 1.0 }
}

fn segment_label(nombres: &[String], v: &SegmentValue<i32>) -> String {
    match v {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
            usize::try_from(*i).ok().and_then(|i| nombres.get(i)).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    }
}

/// Barras verticales de viajeros por línea, en el orden del informe.
pub fn render_line_totals(path: &Path, report: &DemandaReport, titulo: &str) -> Result<(), Box<dyn Error>> {
    let n = report.lineas.len();
    if n == 0 {
        return Err("no hay líneas para graficar".into());
    }
    let nombres: Vec<String> = report.lineas.iter().map(|l| l.linea.clone()).collect();
    let max = report.lineas.iter().map(|l| l.viajeros).fold(0.0, f64::max);

    let root = SVGBackend::new(path, (1400, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(titulo, ("sans-serif", 26.0))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(120)
        .build_cartesian_2d((0..n as i32).into_segmented(), 0f64..upper_bound(max))?;

    let x_fmt = |v: &SegmentValue<i32>| segment_label(&nombres, v);
    let y_fmt = |v: &f64| format_miles(*v);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .x_desc("Líneas")
        .y_desc("Total de Viajeros Acumulados")
        .draw()?;

    chart.draw_series(report.lineas.iter().enumerate().map(|(i, l)| {
        let i = i as i32;
        let color = SET3[i as usize % SET3.len()];
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), l.viajeros)],
            color.filled(),
        );
        bar.set_margin(0, 0, 6, 6);
        bar
    }))?;

    chart.draw_series(report.lineas.iter().enumerate().map(|(i, l)| {
        Text::new(
            format_miles(l.viajeros),
            (SegmentValue::CenterOf(i as i32), l.viajeros * 1.01),
            ("sans-serif", 12.0).into_font(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Barras horizontales; el primer elemento de `barras` queda arriba.
pub fn render_horizontal_bars(
    path: &Path,
    titulo: &str,
    eje_x: &str,
    barras: &[(String, f64)],
    color: RGBColor,
) -> Result<(), Box<dyn Error>> {
    let n = barras.len();
    if n == 0 {
        return Err("no hay barrios para graficar".into());
    }
    // el eje Y segmentado crece hacia arriba: se invierte para dejar el mayor arriba
    let nombres: Vec<String> = barras.iter().rev().map(|(nombre, _)| nombre.clone()).collect();
    let max = barras.iter().map(|(_, v)| *v).filter(|v| v.is_finite()).fold(0.0, f64::max);

    let root = SVGBackend::new(path, (1000, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(titulo, ("sans-serif", 22.0))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(220)
        .build_cartesian_2d(0f64..upper_bound(max), (0..n as i32).into_segmented())?;

    let x_fmt = |v: &f64| format_miles(*v);
    let y_fmt = |v: &SegmentValue<i32>| segment_label(&nombres, v);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .x_desc(eje_x)
        .y_desc("Barri")
        .draw()?;

    chart.draw_series(barras.iter().enumerate().map(|(k, (_, v))| {
        let pos = (n - 1 - k) as i32;
        let mut bar = Rectangle::new(
            [(0.0, SegmentValue::Exact(pos)), (*v, SegmentValue::Exact(pos + 1))],
            color.filled(),
        );
        bar.set_margin(4, 4, 0, 0);
        bar
    }))?;

    root.present()?;
    Ok(())
}
