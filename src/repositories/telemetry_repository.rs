use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::position::{LatestPosition, PositionSample};
use crate::utils::errors::AppResult;

/// Repositorio de telemetría (tabla gps_data)
///
/// Persistencia append-only de muestras de posición. La serie para
/// segmentación sale ordenada por timestamp con empates por orden de
/// inserción, ya filtrada a coordenadas no nulas.
pub struct TelemetryRepository {
    pool: PgPool,
}

impl TelemetryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar una muestra con vehicle_id ya resuelto (tag numérico).
    /// No se verifica existencia aquí: el storage es la fuente de verdad
    /// (la FK rechaza ids inexistentes).
    pub async fn insert_sample_by_vehicle_id(
        &self,
        vehicle_id: i64,
        timestamp: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        speed: f64,
    ) -> AppResult<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO gps_data (vehicle_id, timestamp, latitude, longitude, speed)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING vehicle_id
            "#,
        )
        .bind(vehicle_id)
        .bind(timestamp)
        .bind(latitude)
        .bind(longitude)
        .bind(speed)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    /// Insertar una muestra resolviendo el IMEI contra vehicles en el mismo
    /// statement. Devuelve None si el IMEI no pertenece a ningún vehículo.
    pub async fn insert_sample_by_imei(
        &self,
        imei: &str,
        timestamp: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        speed: f64,
    ) -> AppResult<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO gps_data (vehicle_id, timestamp, latitude, longitude, speed)
            SELECT id, $1, $2, $3, $4
            FROM vehicles WHERE imei = $5
            RETURNING vehicle_id
            "#,
        )
        .bind(timestamp)
        .bind(latitude)
        .bind(longitude)
        .bind(speed)
        .bind(imei)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.0))
    }

    /// Serie de posición de un vehículo, opcionalmente acotada por ventana,
    /// filtrada a coordenadas no nulas y ordenada para segmentación.
    pub async fn find_series(
        &self,
        vehicle_id: i64,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<PositionSample>> {
        let samples = sqlx::query_as::<_, PositionSample>(
            r#"
            SELECT vehicle_id, timestamp, latitude, longitude, speed
            FROM gps_data
            WHERE vehicle_id = $1
              AND latitude IS NOT NULL
              AND longitude IS NOT NULL
              AND ($2::timestamptz IS NULL OR timestamp >= $2)
              AND ($3::timestamptz IS NULL OR timestamp <= $3)
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .bind(vehicle_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(samples)
    }

    /// Última posición conocida de cada vehículo (feed del dashboard)
    pub async fn latest_positions(&self) -> AppResult<Vec<LatestPosition>> {
        let positions = sqlx::query_as::<_, LatestPosition>(
            r#"
            SELECT DISTINCT ON (g.vehicle_id)
                   g.vehicle_id, v.imei, g.timestamp, g.latitude, g.longitude, g.speed
            FROM gps_data g
            JOIN vehicles v ON v.id = g.vehicle_id
            WHERE g.latitude IS NOT NULL AND g.longitude IS NOT NULL
            ORDER BY g.vehicle_id, g.timestamp DESC, g.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(positions)
    }
}
