//! Decodificador de telemetría
//!
//! Funciones puras: bytes candidatos -> registro CSV, registro binario, o
//! "no decodificable". Nunca entra en pánico con entrada malformada; todo
//! fallo devuelve la ausencia de registro.
//!
//! El camino binario es una búsqueda heurística acotada sobre layouts
//! candidatos (offsets de fecha-hora, gaps hasta las coordenadas, divisores
//! de escala) que acepta la primera combinación internamente consistente.
//! No hay especificación autoritativa del protocolo del dispositivo: el uso
//! en producción requiere una especificación verificada (el GT06 real
//! empaqueta en BCD con checksums que esta heurística ignora).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::framing::{FRAME_HEADER_EXTENDED, FRAME_HEADER_STANDARD};

/// Códigos de protocolo de localización reconocidos (offset 3 de la trama)
const LOCATION_PROTOCOLS: [u8; 3] = [0x10, 0x12, 0x22];

/// Offsets candidatos del campo fecha-hora de 6 bytes dentro de la trama
const DATETIME_OFFSETS: [usize; 3] = [4, 5, 6];

/// Gaps candidatos (en bytes) entre la fecha-hora y las coordenadas
const COORD_GAPS: [usize; 3] = [1, 0, 2];

/// Divisores de escala candidatos: punto fijo en minutos (valor/30000/60)
/// y grados directos (valor/1e6)
const COORD_DIVISORS: [f64; 2] = [1_800_000.0, 1_000_000.0];

/// Un registro de telemetría decodificado, todavía sin resolver identidad
///
/// `device_tag` es None en el camino binario: la heurística no extrae el
/// IMEI, así que la identidad debe venir por canal aparte o el registro se
/// descarta. `device_time` es la hora que reporta el dispositivo; el
/// timestamp persistido se genera al encolar.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    pub device_tag: Option<String>,
    pub device_time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kmh: f64,
    pub heading: f64,
}

/// Decodificar una trama binaria completa (cabecera ya validada por el
/// reensamblador). Devuelve None si el espacio de búsqueda se agota.
pub fn decode_binary_frame(frame: &[u8]) -> Option<TelemetryRecord> {
    if frame.len() < 5 {
        return None;
    }
    let header = [frame[0], frame[1]];
    if header != FRAME_HEADER_STANDARD && header != FRAME_HEADER_EXTENDED {
        return None;
    }
    if !LOCATION_PROTOCOLS.contains(&frame[3]) {
        return None;
    }

    for &dt_offset in &DATETIME_OFFSETS {
        if dt_offset + 6 > frame.len() {
            continue;
        }
        let Some(device_time) = parse_raw_datetime(&frame[dt_offset..dt_offset + 6]) else {
            continue;
        };

        for &gap in &COORD_GAPS {
            let pos = dt_offset + 6 + gap;
            if pos + 9 > frame.len() {
                continue;
            }

            let lat_raw = u32::from_be_bytes([frame[pos], frame[pos + 1], frame[pos + 2], frame[pos + 3]]);
            let lon_raw = u32::from_be_bytes([
                frame[pos + 4],
                frame[pos + 5],
                frame[pos + 6],
                frame[pos + 7],
            ]);
            let speed_kmh = f64::from(frame[pos + 8]);

            for &divisor in &COORD_DIVISORS {
                let latitude = f64::from(lat_raw) / divisor;
                let longitude = f64::from(lon_raw) / divisor;

                if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
                    return Some(TelemetryRecord {
                        device_tag: None,
                        device_time,
                        latitude,
                        longitude,
                        speed_kmh,
                        heading: 0.0,
                    });
                }
            }
        }
    }

    None
}

/// Parsear 6 bytes crudos (no BCD) como año/mes/día/hora/minuto/segundo.
/// Mes y día fuera de rango caen a 1; hora/minuto/segundo se recortan.
fn parse_raw_datetime(bytes: &[u8]) -> Option<DateTime<Utc>> {
    let year = 2000 + i32::from(bytes[0]);
    let month = if (1..=12).contains(&bytes[1]) { u32::from(bytes[1]) } else { 1 };
    let day = if (1..=31).contains(&bytes[2]) { u32::from(bytes[2]) } else { 1 };
    let hour = u32::from(bytes[3]).min(23);
    let minute = u32::from(bytes[4]).min(59);
    let second = u32::from(bytes[5]).min(59);

    // Día 31 en mes de 30 días (o 29/30 en febrero): cae a 1 igual que
    // cualquier otro día fuera de rango
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, month, 1))?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;

    Some(NaiveDateTime::new(date, time).and_utc())
}

/// Decodificar las líneas CSV contenidas en un chunk de texto crudo.
/// Sin estado de resincronización: una línea malformada se ignora.
pub fn decode_text_chunk(chunk: &str) -> Vec<TelemetryRecord> {
    chunk.lines().filter_map(decode_text_line).collect()
}

/// `<identifier>,<ISO8601-timestamp>[Z],<lat>,<lon>,<speed>`
fn decode_text_line(line: &str) -> Option<TelemetryRecord> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() < 5 {
        return None;
    }

    let identifier = fields[0].trim();
    if identifier.is_empty() {
        return None;
    }

    let raw_timestamp = fields[1].trim().trim_end_matches('Z');
    let device_time = NaiveDateTime::parse_from_str(raw_timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()?
        .and_utc();

    let latitude: f64 = fields[2].trim().parse().ok()?;
    let longitude: f64 = fields[3].trim().parse().ok()?;
    let speed_kmh: f64 = fields[4].trim().parse().ok()?;

    Some(TelemetryRecord {
        device_tag: Some(identifier.to_string()),
        device_time,
        latitude,
        longitude,
        speed_kmh,
        heading: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // Construye una trama con fecha-hora en el offset 4, un byte de gap y
    // coordenadas escaladas en punto fijo de minutos (divisor 1.8e6)
    fn location_frame(protocol: u8, lat: f64, lon: f64, speed: u8) -> Vec<u8> {
        let mut frame = vec![0x78, 0x78, 0x00, protocol];
        frame.extend_from_slice(&[24, 1, 15, 10, 30, 0]); // 2024-01-15 10:30:00
        frame.push(0x05); // gap: cantidad de satélites
        frame.extend_from_slice(&(((lat * 1_800_000.0) as u32).to_be_bytes()));
        frame.extend_from_slice(&(((lon * 1_800_000.0) as u32).to_be_bytes()));
        frame.push(speed);
        frame[2] = (frame.len() - 5) as u8;
        frame
    }

    #[test]
    fn test_decode_binary_location_frame() {
        let frame = location_frame(0x12, 9.0331, 38.7500, 45);
        let record = decode_binary_frame(&frame).expect("frame decodificable");

        assert_eq!(record.device_tag, None);
        assert!((record.latitude - 9.0331).abs() < 1e-4);
        assert!((record.longitude - 38.7500).abs() < 1e-4);
        assert_eq!(record.speed_kmh, 45.0);
        assert_eq!(
            record.device_time,
            chrono::Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_binary_rejects_unknown_protocol() {
        let frame = location_frame(0x99, 9.0331, 38.7500, 45);
        assert!(decode_binary_frame(&frame).is_none());
    }

    #[test]
    fn test_binary_rejects_frame_too_short_for_search() {
        // Trama mínima válida (5 bytes): protocolo reconocido pero sin
        // espacio para fecha-hora ni coordenadas
        let frame = [0x78, 0x78, 0x00, 0x10, 0x00];
        assert!(decode_binary_frame(&frame).is_none());
    }

    #[test]
    fn test_binary_clamps_garbage_datetime() {
        let mut frame = location_frame(0x22, 9.0, 38.7, 10);
        // Mes 13 y día 45: caen a 1; hora 99 se recorta a 23
        frame[5] = 13;
        frame[6] = 45;
        frame[7] = 99;
        let record = decode_binary_frame(&frame).expect("se decodifica con clamps");
        assert_eq!(
            record.device_time,
            chrono::Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_decode_text_line_with_imei() {
        let records =
            decode_text_chunk("862123456789012,2024-03-10T08:15:30Z,9.0341,38.7510,25.5\n");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.device_tag.as_deref(), Some("862123456789012"));
        assert_eq!(record.latitude, 9.0341);
        assert_eq!(record.longitude, 38.7510);
        assert_eq!(record.speed_kmh, 25.5);
        assert_eq!(
            record.device_time,
            chrono::Utc.with_ymd_and_hms(2024, 3, 10, 8, 15, 30).unwrap()
        );
    }

    #[test]
    fn test_decode_text_line_without_z_marker() {
        let records = decode_text_chunk("17,2024-03-10T08:15:30.250,9.0341,38.7510,0.0\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].device_tag.as_deref(), Some("17"));
    }

    #[test]
    fn test_text_discards_malformed_numeric_fields() {
        assert!(decode_text_chunk("17,2024-03-10T08:15:30Z,not-a-float,38.75,25.5\n").is_empty());
        assert!(decode_text_chunk("17,yesterday,9.03,38.75,25.5\n").is_empty());
    }

    #[test]
    fn test_text_requires_five_fields() {
        assert!(decode_text_chunk("17,2024-03-10T08:15:30Z,9.03,38.75\n").is_empty());
        assert!(decode_text_chunk("\n\n").is_empty());
    }

    #[test]
    fn test_text_multiple_lines_in_one_chunk() {
        let chunk = "17,2024-03-10T08:15:30Z,9.03,38.75,25.5\n\
                     garbage line\n\
                     18,2024-03-10T08:15:32Z,9.04,38.76,30.0\n";
        let records = decode_text_chunk(chunk);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].device_tag.as_deref(), Some("17"));
        assert_eq!(records[1].device_tag.as_deref(), Some("18"));
    }
}
