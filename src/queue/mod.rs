//! Cola de ingesta
//!
//! Este módulo contiene el hand-off FIFO entre los workers de red
//! (productores) y el consumidor de persistencia.

pub mod redis_queue;

use async_trait::async_trait;

use crate::dto::telemetry_dto::TelemetryPacket;
use crate::utils::errors::AppResult;

/// Configuración de la cola
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub redis_url: String,
    pub queue_name: String,
}

/// Operaciones de la cola de paquetes GPS
///
/// push es seguro bajo productores concurrentes; pop bloquea con timeout
/// acotado para que el consumidor pueda revisar el apagado periódicamente.
#[async_trait]
pub trait QueueOperations {
    /// Encolar un paquete; devuelve false si el backend no está disponible
    async fn push_packet(&self, packet: &TelemetryPacket) -> bool;

    /// Desencolar un paquete (bloqueante, timeout de 1 segundo)
    async fn pop_packet(&self) -> AppResult<Option<TelemetryPacket>>;

    /// Longitud actual de la cola
    async fn queue_length(&self) -> AppResult<i64>;
}

pub use redis_queue::RedisQueue;
