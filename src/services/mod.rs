//! Services module
//!
//! Este módulo contiene la lógica de negocio: el motor de segmentación de
//! trayectorias y el servicio de alarmas.

pub mod alarm_service;
pub mod segmentation_service;
