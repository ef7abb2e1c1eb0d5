use sqlx::PgPool;

use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppResult;

/// Repositorio de vehículos
///
/// El core sólo lo usa para resolver identidad (imei -> id) y para
/// verificar existencia antes de emitir comandos.
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_by_imei(&self, imei: &str) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE imei = $1")
            .bind(imei)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }
}
