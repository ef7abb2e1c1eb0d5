//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL, más los shapes derivados de los reportes.

pub mod alarm;
pub mod engine_command;
pub mod position;
pub mod speed_limit;
pub mod trip;
pub mod vehicle;
