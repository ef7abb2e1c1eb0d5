//! DTOs del controlador de comandos y límites
//!
//! Requests explícitos y enumerados para las operaciones mutables: nunca se
//! construye lógica de update a partir de nombres de campos del caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request para emitir un comando de motor (cut | start)
#[derive(Debug, Deserialize)]
pub struct IssueEngineCommandRequest {
    pub command: String,
}

/// Response de emisión: el comando queda pending y se ejecuta aparte
#[derive(Debug, Serialize)]
pub struct EngineCommandResponse {
    pub id: i64,
    pub vehicle_id: i64,
    pub command: String,
    pub status: String,
    pub issued_at: DateTime<Utc>,
}

/// Estado derivado del motor según el último comando del vehículo
#[derive(Debug, Serialize)]
pub struct EngineStatusResponse {
    pub vehicle_id: i64,
    pub state: String,
    pub command: Option<String>,
    pub status: Option<String>,
    pub executed_at: Option<DateTime<Utc>>,
}

/// Request para fijar un nuevo límite de velocidad
#[derive(Debug, Deserialize, Validate)]
pub struct SetSpeedLimitRequest {
    #[validate(range(min = 1.0, max = 255.0))]
    pub speed_limit_kmh: f64,

    #[validate(length(min = 1, max = 100))]
    pub set_by: Option<String>,
}

/// Response del límite vigente de un vehículo
#[derive(Debug, Serialize)]
pub struct SpeedLimitResponse {
    pub vehicle_id: i64,
    pub speed_limit_kmh: f64,
    pub set_by: Option<String>,
    pub set_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_limit_range_validation() {
        let ok = SetSpeedLimitRequest {
            speed_limit_kmh: 50.0,
            set_by: Some("Test Script".to_string()),
        };
        assert!(ok.validate().is_ok());

        let zero = SetSpeedLimitRequest {
            speed_limit_kmh: 0.0,
            set_by: None,
        };
        assert!(zero.validate().is_err());

        let huge = SetSpeedLimitRequest {
            speed_limit_kmh: 900.0,
            set_by: None,
        };
        assert!(huge.validate().is_err());
    }
}
