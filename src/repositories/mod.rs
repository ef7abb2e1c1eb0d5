//! Repositorios de acceso a datos
//!
//! Un repositorio por tabla, construidos con un pool inyectado
//! explícitamente; las conexiones se adquieren por operación.

pub mod alarm_repository;
pub mod engine_command_repository;
pub mod speed_limit_repository;
pub mod telemetry_repository;
pub mod vehicle_repository;
