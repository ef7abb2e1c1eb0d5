//! Consumidor de la cola de ingesta
//!
//! Desacopla el I/O de sockets del I/O de almacenamiento: desencola
//! paquetes con timeout acotado (para poder revisar el apagado) y los
//! persiste en gps_data. Los fallos de storage son best-effort aquí: se
//! loguean y la ingesta continúa.

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::identity::{classify_tag, DeviceTag};
use crate::dto::telemetry_dto::TelemetryPacket;
use crate::queue::{QueueOperations, RedisQueue};
use crate::repositories::telemetry_repository::TelemetryRepository;
use crate::services::alarm_service::AlarmService;
use crate::state::AppState;

/// Consumidor único de paquetes GPS
pub struct QueueConsumer {
    queue: RedisQueue,
    telemetry: TelemetryRepository,
    alarms: AlarmService,
    shutdown: watch::Receiver<bool>,
}

impl QueueConsumer {
    pub fn new(state: &AppState, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            queue: state.queue.clone(),
            telemetry: TelemetryRepository::new(state.pool.clone()),
            alarms: AlarmService::new(state.pool.clone()),
            shutdown,
        }
    }

    /// Bucle principal: pop bloqueante con timeout, persistir, repetir
    pub async fn run(self) {
        info!("📥 Consumidor de la cola de ingesta iniciado");
        if let Ok(pending) = self.queue.queue_length().await {
            info!("📊 {} paquetes pendientes en la cola", pending);
        }

        loop {
            if *self.shutdown.borrow() {
                info!("🛑 Consumidor de la cola apagándose");
                return;
            }

            match self.queue.pop_packet().await {
                Ok(Some(packet)) => self.persist_packet(packet).await,
                Ok(None) => {
                    // Timeout de BRPOP: volvemos a revisar el apagado
                }
                Err(e) => {
                    error!("❌ Error desencolando paquete: {}", e);
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }
    }

    /// Persistir un paquete resolviendo su tag por el modo que corresponda
    async fn persist_packet(&self, packet: TelemetryPacket) {
        let timestamp = match DateTime::parse_from_rfc3339(&packet.timestamp) {
            Ok(parsed) => parsed.with_timezone(&Utc),
            Err(e) => {
                debug!("⏰ Timestamp de paquete ilegible ({}), usando hora de llegada", e);
                Utc::now()
            }
        };

        let result = match classify_tag(&packet.imei) {
            DeviceTag::VehicleId(id) => self
                .telemetry
                .insert_sample_by_vehicle_id(id, timestamp, packet.lat, packet.lon, packet.speed)
                .await
                .map(Some),
            DeviceTag::Imei(imei) => self
                .telemetry
                .insert_sample_by_imei(&imei, timestamp, packet.lat, packet.lon, packet.speed)
                .await,
        };

        match result {
            Ok(Some(vehicle_id)) => {
                debug!("💾 Muestra persistida para vehículo {}", vehicle_id);
                self.alarms
                    .check_speed_violation(vehicle_id, packet.speed)
                    .await;
            }
            Ok(None) => {
                warn!(
                    "⚠️ IMEI '{}' sin vehículo al persistir, muestra descartada",
                    packet.imei
                );
            }
            Err(e) => {
                error!("❌ Error persistiendo muestra de '{}': {}", packet.imei, e);
            }
        }
    }
}
