//! Servicio de alarmas
//!
//! Hook único de notificación que llama el core: registra una alarma con
//! su severidad y categoría en alarm_logs y la loguea. La taxonomía
//! completa (escalado, routing por severidad) vive en la capa externa.

use sqlx::PgPool;
use tracing::{error, warn};

use crate::repositories::alarm_repository::AlarmRepository;
use crate::repositories::speed_limit_repository::SpeedLimitRepository;
use crate::utils::errors::AppResult;

/// Tipos de alarma que el core puede emitir
pub const ALARM_SPEED_VIOLATION: &str = "speed_violation";
pub const ALARM_EXCESSIVE_IDLING: &str = "excessive_idling";
pub const ALARM_UNAUTHORIZED_MOVEMENT: &str = "unauthorized_movement";

/// Clasificación estática tipo -> (severidad, categoría)
fn classify_alarm(alarm_type: &str) -> (&'static str, &'static str) {
    match alarm_type {
        ALARM_SPEED_VIOLATION => ("warning", "safety"),
        ALARM_EXCESSIVE_IDLING => ("info", "efficiency"),
        ALARM_UNAUTHORIZED_MOVEMENT => ("critical", "security"),
        _ => ("info", "general"),
    }
}

/// Servicio de notificación de alarmas
pub struct AlarmService {
    alarms: AlarmRepository,
    speed_limits: SpeedLimitRepository,
}

impl AlarmService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            alarms: AlarmRepository::new(pool.clone()),
            speed_limits: SpeedLimitRepository::new(pool),
        }
    }

    /// Registrar una alarma con severidad derivada de su tipo
    pub async fn log_alarm(&self, vehicle_id: i64, alarm_type: &str, message: &str) -> AppResult<()> {
        let (severity, category) = classify_alarm(alarm_type);

        warn!(
            "🚨 [{} ALARM] Vehículo {}: {}",
            severity.to_uppercase(),
            vehicle_id,
            message
        );

        self.alarms
            .insert(vehicle_id, alarm_type, message, severity, category)
            .await
    }

    /// Comparar la velocidad de una muestra recién persistida contra el
    /// límite activo del vehículo y levantar la alarma si lo supera.
    /// Best-effort: un fallo aquí no interrumpe la ingesta.
    pub async fn check_speed_violation(&self, vehicle_id: i64, speed_kmh: f64) {
        let limit = match self.speed_limits.find_active(vehicle_id).await {
            Ok(limit) => limit,
            Err(e) => {
                error!("❌ Error consultando límite de velocidad: {}", e);
                return;
            }
        };

        let Some(limit) = limit else { return };

        if speed_kmh > limit.speed_limit_kmh {
            let message = format!(
                "Velocidad {:.1} km/h supera el límite de {:.1} km/h",
                speed_kmh, limit.speed_limit_kmh
            );
            if let Err(e) = self
                .log_alarm(vehicle_id, ALARM_SPEED_VIOLATION, &message)
                .await
            {
                error!("❌ Error registrando alarma: {}", e);
            }
        }
    }
}
