use chrono::Utc;
use sqlx::PgPool;

use crate::utils::errors::AppResult;

/// Repositorio del log de alarmas (tabla alarm_logs)
pub struct AlarmRepository {
    pool: PgPool,
}

impl AlarmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        vehicle_id: i64,
        alarm_type: &str,
        message: &str,
        severity: &str,
        category: &str,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO alarm_logs (vehicle_id, alarm_type, message, timestamp, severity, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(vehicle_id)
        .bind(alarm_type)
        .bind(message)
        .bind(Utc::now())
        .bind(severity)
        .bind(category)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
