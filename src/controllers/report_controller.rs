//! Controlador de reportes de trayectoria
//!
//! Entrada on-demand al motor de segmentación: lee la serie filtrada del
//! almacenamiento y ejecuta el algoritmo pedido. Sin vehículo o sin
//! muestras en la ventana devuelve colecciones vacías, nunca error.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::position::LatestPosition;
use crate::models::trip::{DailyMileage, ParkingEvent, Trip};
use crate::repositories::telemetry_repository::TelemetryRepository;
use crate::services::segmentation_service;
use crate::utils::errors::AppResult;

pub struct ReportController {
    telemetry: TelemetryRepository,
}

impl ReportController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            telemetry: TelemetryRepository::new(pool),
        }
    }

    /// Viajes del vehículo dentro de la ventana opcional
    pub async fn trips(
        &self,
        vehicle_id: i64,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<Trip>> {
        let series = self.telemetry.find_series(vehicle_id, from, to).await?;
        Ok(segmentation_service::detect_trips(&series))
    }

    /// Eventos de estacionamiento/ralentí dentro de la ventana opcional
    pub async fn parking_events(
        &self,
        vehicle_id: i64,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<ParkingEvent>> {
        let series = self.telemetry.find_series(vehicle_id, from, to).await?;
        Ok(segmentation_service::detect_parking_events(&series))
    }

    /// Kilometraje por fecha calendario dentro de la ventana opcional
    pub async fn daily_mileage(
        &self,
        vehicle_id: i64,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<DailyMileage>> {
        let series = self.telemetry.find_series(vehicle_id, from, to).await?;
        Ok(segmentation_service::daily_mileage(&series))
    }

    /// Última posición conocida de cada vehículo (feed del dashboard)
    pub async fn latest_positions(&self) -> AppResult<Vec<LatestPosition>> {
        self.telemetry.latest_positions().await
    }
}
