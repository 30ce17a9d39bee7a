// --- Dashboard de movilidad de Barcelona - Archivo principal ---

use env_logger::{Builder, Env};
use log::{error, info};
use metrodash::config::DashboardConfig;
use metrodash::run_server;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_env(Env::default().filter_or("METRODASH_LOG", "info"))
        .init();

    // único argumento opcional: ruta a un JSON de configuración (parcial)
    let config = match std::env::args().nth(1) {
        Some(path) => DashboardConfig::from_json_file(&path).inspect(|_| info!("Configuración cargada de {}", path)),
        None => {
            let cfg = DashboardConfig::default();
            cfg.validate().map(|_| cfg)
        }
    };
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    info!("=== Dashboard de movilidad de Barcelona ===");
    run_server(config).await
}
