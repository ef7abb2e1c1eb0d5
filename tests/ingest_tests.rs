//! Tests de integración del pipeline de decodificación
//!
//! Cubren las propiedades del reensamblador y el decodificador sin
//! necesidad de sockets ni base de datos: el pipeline de decode es puro.

use vehicle_tracking::ingest::decoder::{decode_binary_frame, decode_text_chunk};
use vehicle_tracking::ingest::framing::FrameReassembler;
use vehicle_tracking::ingest::identity::{classify_tag, DeviceTag};

/// Trama binaria de localización bien formada: fecha-hora en el offset 4,
/// un byte de gap, coordenadas en punto fijo de minutos y velocidad
fn location_frame(lat: f64, lon: f64, speed: u8) -> Vec<u8> {
    let mut frame = vec![0x78, 0x78, 0x00, 0x12];
    frame.extend_from_slice(&[24, 3, 10, 8, 15, 30]);
    frame.push(0x07);
    frame.extend_from_slice(&((lat * 1_800_000.0) as u32).to_be_bytes());
    frame.extend_from_slice(&((lon * 1_800_000.0) as u32).to_be_bytes());
    frame.push(speed);
    frame[2] = (frame.len() - 5) as u8;
    frame
}

#[test]
fn test_resync_property_junk_then_frame() {
    // Para cualquier stream con una cabecera válida en el offset k
    // precedida de basura sin cabeceras: la trama correcta se emite tras
    // consumir exactamente los k bytes de basura, uno por uno
    let junk: Vec<u8> = vec![0x00, 0x13, 0x37, 0xAB, 0xCD, 0xEF, 0x42, 0x99, 0x11];
    let frame = location_frame(9.0331, 38.75, 40);

    let mut reassembler = FrameReassembler::new();

    // Sólo basura: no sale ninguna trama y el buffer retiene la cola
    // que aún no se pudo descartar (menos de 5 bytes inspeccionables)
    reassembler.extend(&junk);
    assert!(reassembler.next_frame().is_none());
    assert!(reassembler.buffered() < 5);

    // Al llegar la trama, el resto de la basura se descarta byte a byte
    // y la trama sale íntegra
    reassembler.extend(&frame);
    let extracted = reassembler.next_frame().expect("trama tras la basura");
    assert_eq!(extracted.as_ref(), frame.as_slice());
    assert_eq!(reassembler.buffered(), 0);
    assert!(reassembler.next_frame().is_none());
}

#[test]
fn test_frame_split_across_arbitrary_chunks() {
    // Los límites de chunk TCP no están alineados con las tramas
    let frame = location_frame(9.0341, 38.751, 25);
    let mut reassembler = FrameReassembler::new();

    for byte in &frame[..frame.len() - 1] {
        reassembler.extend(std::slice::from_ref(byte));
        assert!(reassembler.next_frame().is_none());
    }

    reassembler.extend(&frame[frame.len() - 1..]);
    let extracted = reassembler.next_frame().expect("trama completa byte a byte");
    let record = decode_binary_frame(&extracted).expect("decodificable");
    assert!((record.latitude - 9.0341).abs() < 1e-4);
    assert!((record.longitude - 38.751).abs() < 1e-4);
    assert_eq!(record.speed_kmh, 25.0);
    assert_eq!(record.device_tag, None);
}

#[test]
fn test_interleaved_junk_and_frames() {
    // Dos tramas válidas separadas por basura: ambas se recuperan
    let first = location_frame(9.0331, 38.750, 10);
    let second = location_frame(9.0371, 38.754, 55);

    let mut stream = first.clone();
    stream.extend_from_slice(&[0xDE, 0xAD, 0x00, 0x01]);
    stream.extend_from_slice(&second);

    let mut reassembler = FrameReassembler::new();
    reassembler.extend(&stream);

    let mut frames = Vec::new();
    while let Some(frame) = reassembler.next_frame() {
        frames.push(frame);
    }

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].as_ref(), first.as_slice());
    assert_eq!(frames[1].as_ref(), second.as_slice());
}

#[test]
fn test_text_and_binary_paths_share_a_connection() {
    // Firmware de formato mixto: una línea CSV y una trama binaria llegan
    // por la misma conexión; ambos caminos producen registro
    let csv_chunk = "862123456789012,2024-03-10T08:15:30Z,9.0341,38.7510,25.5\n";
    let records = decode_text_chunk(csv_chunk);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].device_tag.as_deref(), Some("862123456789012"));

    let frame = location_frame(9.0341, 38.751, 25);
    let record = decode_binary_frame(&frame).expect("binaria decodificable");
    assert_eq!(record.device_tag, None);
}

#[test]
fn test_identity_dual_mode_classification() {
    // Tag numérico: vehicle id directo, jamás se consulta la base
    assert_eq!(classify_tag("17"), DeviceTag::VehicleId(17));

    // Tag alfanumérico: IMEI a resolver contra vehicles
    assert_eq!(
        classify_tag("YTWL-CA10F"),
        DeviceTag::Imei("YTWL-CA10F".to_string())
    );

    // Resolver dos veces el mismo tag da el mismo resultado
    assert_eq!(classify_tag("17"), classify_tag("17"));
}

#[test]
fn test_malformed_inputs_never_panic() {
    // El decodificador devuelve "sin registro" para todo fallo
    assert!(decode_binary_frame(&[]).is_none());
    assert!(decode_binary_frame(&[0x78]).is_none());
    assert!(decode_binary_frame(&[0x78, 0x78, 0x00, 0x99, 0x00]).is_none());
    assert!(decode_text_chunk("").is_empty());
    assert!(decode_text_chunk(",,,,\n").is_empty());
    assert!(decode_text_chunk("17,not-a-date,9.0,38.7,1.0\n").is_empty());
}
