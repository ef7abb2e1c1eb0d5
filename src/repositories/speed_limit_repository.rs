use chrono::Utc;
use sqlx::PgPool;

use crate::models::speed_limit::SpeedLimit;
use crate::utils::errors::AppResult;

/// Repositorio de límites de velocidad (tabla speed_limits)
///
/// Invariante: como máximo una fila activa por vehículo. El swap
/// desactivar-luego-insertar corre dentro de UNA transacción para que dos
/// escritores concurrentes nunca dejen dos filas activas.
pub struct SpeedLimitRepository {
    pool: PgPool,
}

impl SpeedLimitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fijar un nuevo límite activo (last-writer-wins)
    pub async fn set_active(
        &self,
        vehicle_id: i64,
        speed_limit_kmh: f64,
        set_by: Option<&str>,
    ) -> AppResult<SpeedLimit> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE speed_limits SET is_active = FALSE WHERE vehicle_id = $1 AND is_active = TRUE",
        )
        .bind(vehicle_id)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, SpeedLimit>(
            r#"
            INSERT INTO speed_limits (vehicle_id, speed_limit_kmh, set_by, set_at, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING *
            "#,
        )
        .bind(vehicle_id)
        .bind(speed_limit_kmh)
        .bind(set_by)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row)
    }

    /// Límite activo más reciente del vehículo, si existe
    pub async fn find_active(&self, vehicle_id: i64) -> AppResult<Option<SpeedLimit>> {
        let row = sqlx::query_as::<_, SpeedLimit>(
            r#"
            SELECT * FROM speed_limits
            WHERE vehicle_id = $1 AND is_active = TRUE
            ORDER BY set_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
