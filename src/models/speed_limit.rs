//! Modelo de límites de velocidad
//!
//! Mapea a la tabla speed_limits. Invariante: como máximo una fila con
//! is_active = true por vehículo; el versionado es last-writer-wins.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Un límite de velocidad tal como se persiste en speed_limits
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SpeedLimit {
    pub id: i64,
    pub vehicle_id: i64,
    pub speed_limit_kmh: f64,
    pub set_by: Option<String>,
    pub set_at: DateTime<Utc>,
    pub is_active: bool,
}
