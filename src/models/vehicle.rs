//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle que mapea exactamente a la tabla
//! vehicles del schema PostgreSQL. El core de ingesta sólo lee id/imei para
//! resolver identidad; el resto son campos del registro de flota.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vehicle principal - mapea exactamente a la tabla vehicles
///
/// Invariante: imei es UNIQUE y apunta como máximo a un id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub imei: String,
    pub license_plate: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub vehicle_type: Option<String>,
    pub driver_name: Option<String>,
    pub department: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
