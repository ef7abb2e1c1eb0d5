//! Controlador de límites de velocidad
//!
//! Versionado last-writer-wins: fijar un límite desactiva todos los
//! activos del vehículo e inserta el nuevo dentro de una transacción.

use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::command_dto::{SetSpeedLimitRequest, SpeedLimitResponse};
use crate::repositories::speed_limit_repository::SpeedLimitRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{not_found_error, AppResult};

pub struct SpeedLimitController {
    limits: SpeedLimitRepository,
    vehicles: VehicleRepository,
}

impl SpeedLimitController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            limits: SpeedLimitRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    /// Fijar un nuevo límite activo para el vehículo
    pub async fn set_limit(
        &self,
        vehicle_id: i64,
        request: SetSpeedLimitRequest,
    ) -> AppResult<SpeedLimitResponse> {
        request.validate()?;

        self.vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))?;

        let row = self
            .limits
            .set_active(vehicle_id, request.speed_limit_kmh, request.set_by.as_deref())
            .await?;

        info!(
            "🚦 Límite de {} km/h fijado para vehículo {}",
            row.speed_limit_kmh, vehicle_id
        );

        Ok(SpeedLimitResponse {
            vehicle_id: row.vehicle_id,
            speed_limit_kmh: row.speed_limit_kmh,
            set_by: row.set_by,
            set_at: row.set_at,
        })
    }

    /// Límite vigente del vehículo; None significa "sin límite fijado"
    pub async fn get_limit(&self, vehicle_id: i64) -> AppResult<Option<SpeedLimitResponse>> {
        let row = self.limits.find_active(vehicle_id).await?;

        Ok(row.map(|limit| SpeedLimitResponse {
            vehicle_id: limit.vehicle_id,
            speed_limit_kmh: limit.speed_limit_kmh,
            set_by: limit.set_by,
            set_at: limit.set_at,
        }))
    }
}
