use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;

use crate::algorithm::{analizar_cobertura, analizar_demanda, Orden};
use crate::config::DashboardConfig;

#[derive(Debug, Deserialize)]
struct DemandaQuery {
    orden: Option<String>,
}

/// GET /demanda?orden=desc|asc
/// Ranking de líneas por viajeros acumulados, con el análisis en Markdown.
async fn demanda_handler(
    config: web::Data<DashboardConfig>,
    query: web::Query<DemandaQuery>,
) -> impl Responder {
    let orden = match query.orden.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(s) => match s.parse::<Orden>() {
            Ok(o) => o,
            Err(e) => return HttpResponse::BadRequest().json(json!({"status": "error", "error": e})),
        },
        None => Orden::default(),
    };

    let cfg = config.demanda.clone();
    let resultado = web::block(move || analizar_demanda(&cfg, orden)).await;
    match resultado {
        Ok(Ok(r)) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "markdown": r.informe.to_markdown(),
            "informe": r.informe,
            "totales": r.totales,
            "bloques": r.bloques,
            "grafico": r.grafico,
            "generado": r.generado,
        })),
        Ok(Err(e)) => {
            error!("/demanda: {}", e);
            HttpResponse::InternalServerError().json(json!({"status": "error", "error": e.to_string()}))
        }
        Err(e) => HttpResponse::InternalServerError().json(json!({"status": "error", "error": format!("worker failed: {}", e)})),
    }
}

/// GET /cobertura
/// Estaciones de metro por barrio, rankings top-N y rutas del CSV y los gráficos.
async fn cobertura_handler(config: web::Data<DashboardConfig>) -> impl Responder {
    let cfg = config.cobertura.clone();
    let resultado = web::block(move || analizar_cobertura(&cfg)).await;
    match resultado {
        Ok(Ok(r)) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "estado": r.estado,
            "zonas_count": r.zonas.len(),
            "presion": r.presion,
            "sin_metro": r.sin_metro,
            "csv": r.csv,
            "graficos": r.graficos,
            "generado": r.generado,
        })),
        Ok(Err(e)) => {
            error!("/cobertura: {}", e);
            HttpResponse::InternalServerError().json(json!({"status": "error", "error": e.to_string()}))
        }
        Err(e) => HttpResponse::InternalServerError().json(json!({"status": "error", "error": format!("worker failed: {}", e)})),
    }
}

async fn help_handler(config: web::Data<DashboardConfig>) -> impl Responder {
    let help = json!({
        "description": "Dashboard de movilidad de Barcelona. GET /demanda devuelve el ranking de líneas de metro por viajeros acumulados; GET /cobertura cruza las paradas de metro con la población por barrio.",
        "get_example_query": "/demanda?orden=asc",
        "orden_choices": ["desc", "descendente", "asc", "ascendente"],
        "note": "Cada petición relee los ficheros Excel y sobrescribe el CSV y los gráficos SVG configurados.",
        "config": config.get_ref(),
    });

    HttpResponse::Ok().json(help)
}

/// Rutas del dashboard, separadas de `run_server` para poder montarlas en tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/demanda", web::get().to(demanda_handler))
        .route("/cobertura", web::get().to(cobertura_handler))
        .route("/help", web::get().to(help_handler));
}

pub async fn run_server(config: DashboardConfig) -> std::io::Result<()> {
    let bind_addr = config.servidor.bind.clone();
    info!("Iniciando servidor en http://{}", bind_addr);
    let data = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(data.clone())
            .configure(routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
