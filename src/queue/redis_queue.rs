//! Cola FIFO de paquetes GPS sobre Redis
//!
//! LPUSH por los productores, BRPOP con timeout acotado por el consumidor.
//! Si Redis no está disponible al arrancar, la ingesta degrada: el decode
//! sigue funcionando, el push se vuelve un no-op logueado y la muestra se
//! descarta (disponibilidad sobre durabilidad).

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, error, info, warn};

use super::{QueueConfig, QueueOperations};
use crate::dto::telemetry_dto::TelemetryPacket;
use crate::utils::errors::{AppError, AppResult};

/// Timeout de BRPOP en segundos
const POP_TIMEOUT_SECS: usize = 1;

/// Cliente de la cola Redis
#[derive(Clone)]
pub struct RedisQueue {
    manager: Option<ConnectionManager>,
    config: QueueConfig,
}

impl RedisQueue {
    /// Conectar a Redis; si falla, la cola queda en modo degradado
    pub async fn connect(config: QueueConfig) -> Self {
        info!("🔗 Conectando a Redis: {}", config.redis_url);

        let manager = match Self::try_connect(&config.redis_url).await {
            Ok(manager) => {
                info!("✅ Redis conectado exitosamente");
                Some(manager)
            }
            Err(e) => {
                warn!("⚠️ Redis no disponible ({}), cola en modo degradado", e);
                None
            }
        };

        Self { manager, config }
    }

    async fn try_connect(redis_url: &str) -> Result<ConnectionManager, redis::RedisError> {
        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        // Test de conexión usando un comando simple
        let mut conn = manager.clone();
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;

        Ok(manager)
    }

    /// Verificar si el backend de la cola está disponible
    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }
}

#[async_trait]
impl QueueOperations for RedisQueue {
    async fn push_packet(&self, packet: &TelemetryPacket) -> bool {
        let Some(manager) = &self.manager else {
            warn!("⚠️ Redis no disponible - descartando paquete de {}", packet.imei);
            return false;
        };
        let mut conn = manager.clone();

        let payload = match serde_json::to_string(packet) {
            Ok(payload) => payload,
            Err(e) => {
                error!("❌ Error serializando paquete: {}", e);
                return false;
            }
        };

        let result: Result<i64, redis::RedisError> =
            conn.lpush(&self.config.queue_name, payload).await;

        match result {
            Ok(len) => {
                debug!(
                    "📤 Paquete encolado: {} @ {} (cola: {})",
                    packet.imei, packet.timestamp, len
                );
                true
            }
            Err(e) => {
                error!("❌ Error encolando paquete en Redis: {}", e);
                false
            }
        }
    }

    async fn pop_packet(&self) -> AppResult<Option<TelemetryPacket>> {
        let Some(manager) = &self.manager else {
            // Sin backend no hay nada que desencolar; dormimos el mismo
            // intervalo que el timeout de BRPOP para no quemar CPU.
            tokio::time::sleep(std::time::Duration::from_secs(POP_TIMEOUT_SECS as u64)).await;
            return Ok(None);
        };
        let mut conn = manager.clone();

        let result: Option<(String, String)> = redis::cmd("BRPOP")
            .arg(&self.config.queue_name)
            .arg(POP_TIMEOUT_SECS)
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::Queue(format!("BRPOP failed: {}", e)))?;

        match result {
            Some((_, payload)) => match serde_json::from_str::<TelemetryPacket>(&payload) {
                Ok(packet) => Ok(Some(packet)),
                Err(e) => {
                    warn!("⚠️ Paquete malformado en la cola, descartado: {}", e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn queue_length(&self) -> AppResult<i64> {
        let Some(manager) = &self.manager else {
            return Ok(0);
        };
        let mut conn = manager.clone();

        let len: i64 = conn
            .llen(&self.config.queue_name)
            .await
            .map_err(|e| AppError::Queue(format!("LLEN failed: {}", e)))?;

        Ok(len)
    }
}
