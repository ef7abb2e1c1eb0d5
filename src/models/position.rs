//! Modelo de muestras de posición
//!
//! Mapea a la tabla gps_data. Las muestras son append-only: el core nunca
//! las muta ni las borra. El orden para segmentación es timestamp ASC con
//! empates resueltos por orden de inserción (id).

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Una muestra de posición cruda tal como se persiste en gps_data
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PositionSample {
    pub vehicle_id: i64,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
}

/// Última posición conocida por vehículo (feed para el dashboard externo)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LatestPosition {
    pub vehicle_id: i64,
    pub imei: String,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
}
