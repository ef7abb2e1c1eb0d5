//! DTO del paquete de telemetría
//!
//! Mensaje JSON independiente del formato de cable que viaja por la cola de
//! ingesta entre el listener TCP y el consumidor de persistencia.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Paquete GPS serializado hacia/desde la cola
///
/// `imei` transporta el tag crudo del dispositivo (vehicle id numérico o
/// IMEI); `timestamp` se genera en el momento del encolado, no es la hora
/// del dispositivo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryPacket {
    pub imei: String,
    pub lat: f64,
    pub lon: f64,
    pub speed: f64,
    pub heading: f64,
    pub timestamp: String,
}

impl TelemetryPacket {
    /// Construir un paquete con timestamp de encolado en UTC
    pub fn new(imei: String, lat: f64, lon: f64, speed: f64, heading: f64) -> Self {
        Self {
            imei,
            lat,
            lon,
            speed,
            heading,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_roundtrip_json() {
        let packet = TelemetryPacket::new("862123456789012".to_string(), 9.0331, 38.75, 25.5, 0.0);
        let json = serde_json::to_string(&packet).unwrap();
        let back: TelemetryPacket = serde_json::from_str(&json).unwrap();
        assert_eq!(back.imei, "862123456789012");
        assert_eq!(back.lat, 9.0331);
        assert_eq!(back.timestamp, packet.timestamp);
    }
}
