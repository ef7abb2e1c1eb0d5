//! Tests de integración del motor de segmentación
//!
//! Las propiedades de la partición viaje/parada y la agregación de
//! kilometraje sobre series sintéticas. El motor es puro: no hay base de
//! datos involucrada.

use chrono::{DateTime, TimeZone, Utc};

use vehicle_tracking::models::position::PositionSample;
use vehicle_tracking::models::trip::ParkingKind;
use vehicle_tracking::services::segmentation_service::{
    daily_mileage, detect_parking_events, detect_trips, segment_runs,
};
use vehicle_tracking::utils::geo::haversine_km;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap()
}

fn sample(offset_secs: i64, lat: f64, lon: f64, speed: f64) -> PositionSample {
    PositionSample {
        vehicle_id: 7,
        timestamp: t0() + chrono::Duration::seconds(offset_secs),
        latitude: lat,
        longitude: lon,
        speed,
    }
}

/// Serie sintética que alterna movimiento y parada varias veces
fn synthetic_series() -> Vec<PositionSample> {
    let speeds = [0.0, 0.4, 25.0, 45.0, 30.0, 0.8, 0.0, 0.2, 55.0, 60.0, 0.0];
    speeds
        .iter()
        .enumerate()
        .map(|(i, &speed)| sample(i as i64 * 120, 9.0 + i as f64 * 0.001, 38.7 + i as f64 * 0.001, speed))
        .collect()
}

#[test]
fn test_partition_covers_every_sample_exactly_once() {
    let series = synthetic_series();
    let runs = segment_runs(&series);

    // Cada muestra pertenece a exactamente un run maximal: concatenar los
    // rangos reconstruye la serie sin huecos ni solapes
    let mut next = 0;
    for pair in runs.windows(2) {
        assert_ne!(pair[0].moving, pair[1].moving, "runs adyacentes no maximales");
    }
    for run in &runs {
        assert_eq!(run.start, next);
        next = run.end + 1;
    }
    assert_eq!(next, series.len());

    // Viajes y paradas se construyen sobre la misma partición: los emitidos
    // y descartados juntos cubren los mismos runs
    let moving_runs = runs.iter().filter(|r| r.moving).count();
    let stopped_runs = runs.iter().filter(|r| !r.moving).count();
    assert_eq!(moving_runs, 2);
    assert_eq!(stopped_runs, 3);
}

#[test]
fn test_reference_scenario_single_trip() {
    let series = vec![
        sample(0, 9.0331, 38.7500, 0.0),
        sample(120, 9.0341, 38.7510, 25.5),
        sample(240, 9.0351, 38.7520, 45.0),
        sample(600, 9.0371, 38.7540, 0.0),
    ];

    let trips = detect_trips(&series);
    assert_eq!(trips.len(), 1);

    let trip = &trips[0];
    assert_eq!(trip.vehicle_id, 7);
    assert_eq!(trip.start_time, t0() + chrono::Duration::minutes(2));
    assert_eq!(trip.end_time, t0() + chrono::Duration::minutes(10));
    assert_eq!(trip.duration_minutes, 8);

    let expected_km = haversine_km(9.0331, 38.7500, 9.0341, 38.7510)
        + haversine_km(9.0341, 38.7510, 9.0351, 38.7520)
        + haversine_km(9.0351, 38.7520, 9.0371, 38.7540);
    assert!((trip.distance_km - expected_km).abs() < 1e-9);
    assert_eq!(trip.avg_speed_kmh, 35.25);
    assert_eq!(trip.max_speed_kmh, 45.0);
}

#[test]
fn test_stop_threshold_boundary_five_vs_four_minutes() {
    // Exactamente 5 minutos bajo el umbral: se emite
    let five_minutes = vec![
        sample(0, 9.0, 38.7, 0.9),
        sample(150, 9.0, 38.7, 0.9),
        sample(300, 9.0, 38.7, 0.9),
    ];
    let emitted = detect_parking_events(&five_minutes);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].kind, ParkingKind::Idling);

    // Cuatro minutos: no se emite
    let four_minutes = vec![
        sample(0, 9.0, 38.7, 0.9),
        sample(120, 9.0, 38.7, 0.9),
        sample(240, 9.0, 38.7, 0.9),
    ];
    assert!(detect_parking_events(&four_minutes).is_empty());
}

#[test]
fn test_idling_vs_parked_classification() {
    // 10 minutos detenido: ralentí
    let idling = vec![
        sample(0, 9.0, 38.7, 0.0),
        sample(600, 9.0, 38.7, 0.0),
    ];
    assert_eq!(detect_parking_events(&idling)[0].kind, ParkingKind::Idling);

    // 45 minutos detenido: estacionado
    let parked = vec![
        sample(0, 9.0, 38.7, 0.0),
        sample(2700, 9.0, 38.7, 0.0),
    ];
    assert_eq!(detect_parking_events(&parked)[0].kind, ParkingKind::Parked);
}

#[test]
fn test_mileage_non_negative_and_date_isolated() {
    // Una sola muestra en la fecha: 0 millas
    let single = vec![sample(0, 9.0, 38.7, 30.0)];
    let mileage = daily_mileage(&single);
    assert_eq!(mileage.len(), 1);
    assert_eq!(mileage[0].distance_miles, 0.0);

    // Muestras consecutivas en fechas distintas: la distancia nunca cruza
    // el límite de fecha aunque estén a minutos de distancia
    let crossing = vec![
        PositionSample {
            vehicle_id: 7,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 0).unwrap(),
            latitude: 9.0,
            longitude: 38.7,
            speed: 50.0,
        },
        PositionSample {
            vehicle_id: 7,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 11, 0, 1, 0).unwrap(),
            latitude: 9.05,
            longitude: 38.75,
            speed: 50.0,
        },
    ];
    let mileage = daily_mileage(&crossing);
    assert_eq!(mileage.len(), 2);
    for entry in &mileage {
        assert!(entry.distance_miles >= 0.0);
        assert_eq!(entry.distance_miles, 0.0);
    }
}

#[test]
fn test_short_moving_runs_are_discarded_not_merged() {
    // Dos runs en movimiento de 2 minutos separados por una parada: ninguno
    // llega al umbral y no se fusionan en un viaje
    let series = vec![
        sample(0, 9.000, 38.700, 0.0),
        sample(60, 9.001, 38.701, 30.0),
        sample(180, 9.002, 38.702, 0.0),
        sample(240, 9.003, 38.703, 30.0),
        sample(360, 9.004, 38.704, 0.0),
    ];
    assert!(detect_trips(&series).is_empty());
}
