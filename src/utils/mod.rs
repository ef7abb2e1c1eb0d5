//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores y
//! cálculos geográficos comunes.

pub mod errors;
pub mod geo;
