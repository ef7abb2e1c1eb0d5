//! Controlador de comandos de motor
//!
//! Emisión de cut/start con ejecución simulada. La emisión retorna de
//! inmediato con el id en pending; la transición a executed ocurre en una
//! tarea independiente tras un retardo fijo (no hay round-trip real con el
//! dispositivo en este diseño).

use std::time::Duration;

use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::dto::command_dto::{EngineCommandResponse, EngineStatusResponse, IssueEngineCommandRequest};
use crate::models::engine_command::{
    COMMAND_CUT, COMMAND_START, STATUS_EXECUTED, STATUS_FAILED, STATUS_PENDING,
};
use crate::repositories::engine_command_repository::EngineCommandRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};

pub struct CommandController {
    pool: PgPool,
    commands: EngineCommandRepository,
    vehicles: VehicleRepository,
    command_delay: Duration,
}

impl CommandController {
    pub fn new(pool: PgPool, command_delay: Duration) -> Self {
        Self {
            commands: EngineCommandRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            pool,
            command_delay,
        }
    }

    /// Emitir un comando de motor. Inserta la fila pending, dispara el
    /// ejecutor simulado y retorna sin bloquear al emisor.
    pub async fn issue_command(
        &self,
        vehicle_id: i64,
        request: IssueEngineCommandRequest,
    ) -> AppResult<EngineCommandResponse> {
        let command = request.command.trim().to_lowercase();
        if command != COMMAND_CUT && command != COMMAND_START {
            return Err(bad_request_error(&format!(
                "Comando desconocido '{}': se acepta 'cut' o 'start'",
                request.command
            )));
        }

        // Verificar que el vehículo existe antes de encolar el comando
        self.vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))?;

        let row = self.commands.insert_pending(vehicle_id, &command).await?;
        info!("🔑 Comando '{}' emitido para vehículo {} (id {})", command, vehicle_id, row.id);

        self.spawn_simulated_executor(row.id, command);

        Ok(EngineCommandResponse {
            id: row.id,
            vehicle_id: row.vehicle_id,
            command: row.command,
            status: row.status,
            issued_at: row.timestamp,
        })
    }

    /// Ejecutor simulado: retardo fijo y transición terminal a executed
    /// con respuesta enlatada, en una tarea independiente del emisor.
    fn spawn_simulated_executor(&self, command_id: i64, command: String) {
        let pool = self.pool.clone();
        let delay = self.command_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let repository = EngineCommandRepository::new(pool);
            let response = format!("OK: comando '{}' confirmado por el dispositivo", command);

            match repository.mark_executed(command_id, &response).await {
                Ok(true) => info!("✅ Comando {} ejecutado", command_id),
                Ok(false) => warn!("⚠️ Comando {} ya no estaba pending, sin transición", command_id),
                Err(e) => error!("❌ Error marcando comando {} como ejecutado: {}", command_id, e),
            }
        });
    }

    /// Estado derivado del motor según el comando más reciente del vehículo
    pub async fn engine_status(&self, vehicle_id: i64) -> AppResult<EngineStatusResponse> {
        let latest = self.commands.find_latest(vehicle_id).await?;

        Ok(match latest {
            Some(command) => EngineStatusResponse {
                vehicle_id,
                state: derive_engine_state(&command.command, &command.status),
                command: Some(command.command),
                status: Some(command.status),
                executed_at: command.executed_at,
            },
            None => EngineStatusResponse {
                vehicle_id,
                state: "unknown".to_string(),
                command: None,
                status: None,
                executed_at: None,
            },
        })
    }
}

/// Estado humano-legible a partir del par (comando, estado)
pub fn derive_engine_state(command: &str, status: &str) -> String {
    match (command, status) {
        (COMMAND_CUT, STATUS_EXECUTED) => "engine off".to_string(),
        (COMMAND_START, STATUS_EXECUTED) => "engine on".to_string(),
        (command, STATUS_PENDING) => format!("processing {}", command),
        (command, STATUS_FAILED) => format!("failed ({})", command),
        _ => "unknown".to_string(),
    }
}
