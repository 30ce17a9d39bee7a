mod common;

use common::{V, informe_mensual, write_xlsx};
use metrodash::AnalisisError;
use metrodash::algorithm::{Orden, analizar_demanda};
use metrodash::config::DemandaConfig;
use metrodash::excel::list_sheets;
use std::path::Path;

fn config(dir: &Path, archivo: &str) -> DemandaConfig {
    DemandaConfig {
        archivo: dir.join(archivo),
        grafico: dir.join("lineas.svg"),
        ..DemandaConfig::default()
    }
}

#[test]
fn test_analizar_demanda_informe_completo() {
    let dir = tempfile::tempdir().unwrap();
    informe_mensual(&dir.path().join("viatgers.xlsx"));
    let cfg = config(dir.path(), "viatgers.xlsx");

    let r = analizar_demanda(&cfg, Orden::Desc).unwrap();
    assert_eq!(r.bloques.len(), 3);
    assert_eq!(r.totales.get("LÍNIA 1"), Some(22_000.0));
    assert_eq!(r.totales.get("LÍNIA 2"), Some(50_000.0));
    assert_eq!(r.totales.get("FUNICULAR"), Some(3_000.0));

    let nombres: Vec<&str> = r.informe.lineas.iter().map(|l| l.linea.as_str()).collect();
    assert_eq!(nombres, vec!["LÍNIA 2", "LÍNIA 1", "FUNICULAR"]);
    assert_eq!(r.informe.total_viajeros, 75_000.0);
    assert_eq!(r.informe.top3_concentracion, Some(100.0));

    assert_eq!(r.grafico.as_deref(), Some(cfg.grafico.as_path()));
    assert!(cfg.grafico.exists());
}

#[test]
fn test_analizar_demanda_ascendente() {
    let dir = tempfile::tempdir().unwrap();
    informe_mensual(&dir.path().join("viatgers.xlsx"));
    let cfg = config(dir.path(), "viatgers.xlsx");

    let r = analizar_demanda(&cfg, Orden::Asc).unwrap();
    assert_eq!(r.informe.lineas[0].linea, "FUNICULAR");
    assert_eq!(r.informe.lineas[0].posicion, 3);
    assert!(r.informe.to_markdown().contains("50,000"));
}

#[test]
fn test_archivo_inexistente() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), "no_existe.xlsx");
    let err = analizar_demanda(&cfg, Orden::Desc).unwrap_err();
    assert!(matches!(err, AnalisisError::ArchivoNoEncontrado { .. }));
    assert!(err.to_string().contains("no_existe.xlsx"));
}

#[test]
fn test_hoja_inexistente_lista_disponibles() {
    let dir = tempfile::tempdir().unwrap();
    informe_mensual(&dir.path().join("viatgers.xlsx"));
    let cfg = DemandaConfig {
        hoja: "Diaries".to_string(),
        ..config(dir.path(), "viatgers.xlsx")
    };
    let err = analizar_demanda(&cfg, Orden::Desc).unwrap_err();
    match err {
        AnalisisError::HojaNoEncontrada { hoja, disponibles, .. } => {
            assert_eq!(hoja, "Diaries");
            assert!(disponibles.contains("Mensuals"));
        }
        other => panic!("error inesperado: {}", other),
    }
}

#[test]
fn test_sin_bloques() {
    let dir = tempfile::tempdir().unwrap();
    let rows = vec![vec![V::T("Resum")], vec![V::T("LÍNIA"), V::N(5.0)]];
    write_xlsx(&dir.path().join("buit.xlsx"), "Mensuals", &rows);
    let cfg = config(dir.path(), "buit.xlsx");
    let err = analizar_demanda(&cfg, Orden::Desc).unwrap_err();
    assert!(matches!(err, AnalisisError::SinBloques { .. }));
}

#[test]
fn test_bloques_sin_totales() {
    let dir = tempfile::tempdir().unwrap();
    let rows = vec![
        vec![V::T("VIATGERS REALS LÍNIA 1")],
        vec![V::T("LÍNIA 1"), V::T("ACUMULAT")],
        vec![V::T("gener"), V::N(0.0)],
    ];
    write_xlsx(&dir.path().join("zeros.xlsx"), "Mensuals", &rows);
    let cfg = config(dir.path(), "zeros.xlsx");
    let err = analizar_demanda(&cfg, Orden::Desc).unwrap_err();
    match err {
        AnalisisError::SinTotales { bloques, .. } => assert_eq!(bloques, 1),
        other => panic!("error inesperado: {}", other),
    }
    assert!(!cfg.grafico.exists());
}

#[test]
fn test_list_sheets_incluye_mensuals() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("viatgers.xlsx");
    informe_mensual(&path);
    let hojas = list_sheets(&path).unwrap();
    assert!(hojas.iter().any(|h| h == "Mensuals"));
}
