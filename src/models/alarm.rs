//! Modelo de alarmas
//!
//! Mapea a la tabla alarm_logs. El core sólo escribe a través del hook de
//! notificación del servicio de alarmas; la taxonomía completa de severidad
//! vive en la capa externa.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Una entrada del log de alarmas
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AlarmLog {
    pub id: i64,
    pub vehicle_id: i64,
    pub alarm_type: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub severity: String,
    pub category: String,
}
