//! Modelos derivados de segmentación
//!
//! Trips, eventos de estacionamiento y kilometraje diario. Son resultados
//! calculados en fresco sobre una ventana de muestras; el core no los
//! persiste (eso lo decide el consumidor de los reportes).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Un viaje: intervalo maximal con velocidad > 1.0 km/h de al menos 5 minutos
#[derive(Debug, Clone, Serialize)]
pub struct Trip {
    pub vehicle_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub end_latitude: f64,
    pub end_longitude: f64,
    pub distance_km: f64,
    pub distance_miles: f64,
    pub avg_speed_kmh: f64,
    pub max_speed_kmh: f64,
    pub duration_minutes: i64,
}

/// Clasificación de una parada según su duración
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParkingKind {
    Idling,
    Parked,
}

/// Un evento de parada: intervalo maximal con velocidad < 1.0 km/h
#[derive(Debug, Clone, Serialize)]
pub struct ParkingEvent {
    pub vehicle_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub duration_minutes: i64,
    pub kind: ParkingKind,
}

/// Kilometraje recorrido en una fecha calendario (UTC)
#[derive(Debug, Clone, Serialize)]
pub struct DailyMileage {
    pub vehicle_id: i64,
    pub date: NaiveDate,
    pub distance_miles: f64,
}
