use chrono::Utc;
use sqlx::PgPool;

use crate::models::engine_command::{EngineCommand, STATUS_EXECUTED, STATUS_FAILED, STATUS_PENDING};
use crate::utils::errors::AppResult;

/// Repositorio de comandos de motor (tabla engine_control)
///
/// Máquina de estados pending -> {executed, failed}; las transiciones
/// terminales exigen que la fila siga en pending.
pub struct EngineCommandRepository {
    pool: PgPool,
}

impl EngineCommandRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar un comando en estado pending
    pub async fn insert_pending(&self, vehicle_id: i64, command: &str) -> AppResult<EngineCommand> {
        let row = sqlx::query_as::<_, EngineCommand>(
            r#"
            INSERT INTO engine_control (vehicle_id, command, timestamp, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(vehicle_id)
        .bind(command)
        .bind(Utc::now())
        .bind(STATUS_PENDING)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Transición terminal pending -> executed
    pub async fn mark_executed(&self, id: i64, response: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE engine_control
            SET status = $2, response = $3, executed_at = $4
            WHERE id = $1 AND status = $5
            "#,
        )
        .bind(id)
        .bind(STATUS_EXECUTED)
        .bind(response)
        .bind(Utc::now())
        .bind(STATUS_PENDING)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Transición terminal pending -> failed (reservada para integración
    /// real con dispositivos; el ejecutor simulado no la produce)
    pub async fn mark_failed(&self, id: i64, response: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE engine_control
            SET status = $2, response = $3, executed_at = $4
            WHERE id = $1 AND status = $5
            "#,
        )
        .bind(id)
        .bind(STATUS_FAILED)
        .bind(response)
        .bind(Utc::now())
        .bind(STATUS_PENDING)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Comando más reciente del vehículo; sólo éste determina el estado
    pub async fn find_latest(&self, vehicle_id: i64) -> AppResult<Option<EngineCommand>> {
        let row = sqlx::query_as::<_, EngineCommand>(
            r#"
            SELECT * FROM engine_control
            WHERE vehicle_id = $1
            ORDER BY timestamp DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
