//! Modelo de comandos de motor
//!
//! Mapea a la tabla engine_control. Una fila se crea en estado pending y el
//! ejecutor simulado la muta exactamente una vez hacia un estado terminal.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Comandos reconocidos por el controlador
pub const COMMAND_CUT: &str = "cut";
pub const COMMAND_START: &str = "start";

/// Estados del ciclo de vida: pending -> {executed, failed}
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_EXECUTED: &str = "executed";
pub const STATUS_FAILED: &str = "failed";

/// Un comando de motor tal como se persiste en engine_control
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EngineCommand {
    pub id: i64,
    pub vehicle_id: i64,
    pub command: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub response: Option<String>,
    pub executed_at: Option<DateTime<Utc>>,
}
