//! Controladores de operaciones
//!
//! Orquestan repositorios y servicios para las operaciones que consume la
//! capa externa: comandos de motor, límites de velocidad y reportes.

pub mod command_controller;
pub mod report_controller;
pub mod speed_limit_controller;
