use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

use vehicle_tracking::config::environment::EnvironmentConfig;
use vehicle_tracking::database::DatabaseConnection;
use vehicle_tracking::ingest::consumer::QueueConsumer;
use vehicle_tracking::ingest::listener;
use vehicle_tracking::queue::{QueueConfig, RedisQueue};
use vehicle_tracking::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🚚 Vehicle Tracking - Listener GPS y motor de segmentación");
    info!("==========================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    let pool = db_connection.pool().clone();

    // Inicializar la cola de ingesta; si Redis no está, degrada con log
    let queue = RedisQueue::connect(QueueConfig {
        redis_url: config.redis_url.clone(),
        queue_name: config.queue_name.clone(),
    })
    .await;

    if !queue.is_available() {
        warn!("⚠️ Cola de ingesta en modo degradado: las muestras decodificadas se descartarán");
    }

    let state = AppState::new(pool, config, queue);

    info!("🛰️ Listener GPS en {}", state.config.listener_addr());
    info!("🔍 Operaciones del core:");
    info!("   TCP  {} - telemetría CSV y binaria", state.config.listener_addr());
    info!("   📊 trips / parking / mileage - segmentación on-demand");
    info!("   🔑 engine cut/start - comandos con ejecutor simulado");
    info!("   🚦 speed limits - versionado last-writer-wins");

    // Señal de apagado compartida por listener y consumidor
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let listener_handle = tokio::spawn(listener::run(state.clone(), shutdown_rx.clone()));
    let consumer_handle = tokio::spawn(QueueConsumer::new(&state, shutdown_rx).run());

    // Esperar señal de apagado
    shutdown_signal().await;
    let _ = shutdown_tx.send(true);

    if let Err(e) = consumer_handle.await {
        error!("❌ El consumidor terminó con error: {}", e);
    }
    match listener_handle.await {
        Ok(Err(e)) => error!("❌ El listener terminó con error: {}", e),
        Err(e) => error!("❌ El listener terminó con error: {}", e),
        Ok(Ok(())) => {}
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
