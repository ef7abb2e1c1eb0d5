//! Motor de segmentación de trayectorias
//!
//! Tres algoritmos relacionados sobre una serie de posición ordenada y
//! filtrada de UN vehículo: detección de viajes, detección de
//! estacionamiento/ralentí y agregación de kilometraje diario.
//!
//! Los tres son funciones puras y reentrantes: recorren la serie completa
//! en cada llamada, no llevan estado incremental y pueden correr en
//! paralelo con la ingesta sin coordinación.

use std::collections::BTreeMap;

use crate::models::position::PositionSample;
use crate::models::trip::{DailyMileage, ParkingEvent, ParkingKind, Trip};
use crate::utils::geo::{haversine_km, km_to_miles, round2};

/// Umbral único de decisión movimiento/parada, en km/h
pub const SPEED_THRESHOLD_KMH: f64 = 1.0;

/// Duración mínima (minutos enteros) para emitir un viaje o una parada
pub const MIN_EVENT_MINUTES: i64 = 5;

/// A partir de esta duración una parada se clasifica como parked
pub const PARKED_MINUTES: i64 = 30;

/// Un run maximal de muestras consecutivas, todas en movimiento o todas
/// detenidas. `start`/`end` son índices inclusivos sobre la serie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub moving: bool,
    pub start: usize,
    pub end: usize,
}

/// Particionar la serie en runs maximales disjuntos.
///
/// Cada muestra pertenece a exactamente un run: en movimiento si su
/// velocidad supera el umbral, detenida en caso contrario. Los viajes y
/// las paradas se construyen sobre esta misma partición.
pub fn segment_runs(samples: &[PositionSample]) -> Vec<Run> {
    let mut runs = Vec::new();
    if samples.is_empty() {
        return runs;
    }

    let mut start = 0;
    let mut moving = samples[0].speed > SPEED_THRESHOLD_KMH;

    for (i, sample) in samples.iter().enumerate().skip(1) {
        let sample_moving = sample.speed > SPEED_THRESHOLD_KMH;
        if sample_moving != moving {
            runs.push(Run { moving, start, end: i - 1 });
            start = i;
            moving = sample_moving;
        }
    }
    runs.push(Run {
        moving,
        start,
        end: samples.len() - 1,
    });

    runs
}

/// Detección de viajes.
///
/// Un viaje arranca en la primera muestra con velocidad > 1.0 km/h tras una
/// muestra detenida (o al inicio de la serie) y termina en la primera
/// muestra <= 1.0 km/h (cuyo timestamp y posición cierran el viaje) o al
/// final de la serie. La distancia acumula todos los tramos que tocan el
/// run en movimiento: el tramo de entrada desde la muestra previa, los
/// tramos internos y el tramo de cierre hacia la muestra que lo termina.
/// Sólo se emiten viajes de al menos 5 minutos; los más cortos se
/// descartan por completo, sin fusionarse con vecinos.
pub fn detect_trips(samples: &[PositionSample]) -> Vec<Trip> {
    let mut trips = Vec::new();

    for run in segment_runs(samples).into_iter().filter(|r| r.moving) {
        let first = &samples[run.start];

        // La muestra que termina el run (si existe) cierra el viaje
        let end_idx = if run.end + 1 < samples.len() {
            run.end + 1
        } else {
            run.end
        };
        let last = &samples[end_idx];

        let duration_minutes = (last.timestamp - first.timestamp).num_minutes();
        if duration_minutes < MIN_EVENT_MINUTES {
            continue;
        }

        let leg_start = run.start.saturating_sub(1);
        let mut distance_km = 0.0;
        for k in leg_start..end_idx {
            distance_km += haversine_km(
                samples[k].latitude,
                samples[k].longitude,
                samples[k + 1].latitude,
                samples[k + 1].longitude,
            );
        }

        let mut max_speed = f64::MIN;
        let mut speed_sum = 0.0;
        for sample in &samples[run.start..=run.end] {
            max_speed = max_speed.max(sample.speed);
            speed_sum += sample.speed;
        }
        let avg_speed = speed_sum / (run.end - run.start + 1) as f64;

        trips.push(Trip {
            vehicle_id: first.vehicle_id,
            start_time: first.timestamp,
            end_time: last.timestamp,
            start_latitude: first.latitude,
            start_longitude: first.longitude,
            end_latitude: last.latitude,
            end_longitude: last.longitude,
            distance_km,
            distance_miles: km_to_miles(distance_km),
            avg_speed_kmh: round2(avg_speed),
            max_speed_kmh: round2(max_speed),
            duration_minutes,
        });
    }

    trips
}

/// Detección de estacionamiento / ralentí.
///
/// Algoritmo simétrico al de viajes: un run maximal por debajo del umbral.
/// La duración en minutos enteros clasifica: < 30 ralentí, >= 30
/// estacionado. Igual que con viajes, sólo se emiten runs de al menos 5
/// minutos, y la posición del evento es la de su primera muestra.
pub fn detect_parking_events(samples: &[PositionSample]) -> Vec<ParkingEvent> {
    let mut events = Vec::new();

    for run in segment_runs(samples).into_iter().filter(|r| !r.moving) {
        let first = &samples[run.start];
        let last = &samples[run.end];

        let duration_minutes = (last.timestamp - first.timestamp).num_minutes();
        if duration_minutes < MIN_EVENT_MINUTES {
            continue;
        }

        let kind = if duration_minutes < PARKED_MINUTES {
            ParkingKind::Idling
        } else {
            ParkingKind::Parked
        };

        events.push(ParkingEvent {
            vehicle_id: first.vehicle_id,
            start_time: first.timestamp,
            end_time: last.timestamp,
            latitude: first.latitude,
            longitude: first.longitude,
            duration_minutes,
            kind,
        });
    }

    events
}

/// Agregación de kilometraje diario.
///
/// Agrupa por fecha calendario (UTC) del timestamp. Un tramo entre muestras
/// consecutivas del mismo día sólo acumula distancia cuando la muestra
/// actual supera el umbral: el jitter GPS de un vehículo detenido no debe
/// sumar kilómetros. La primera muestra de cada fecha no aporta distancia
/// y los tramos nunca cruzan el límite de fecha.
pub fn daily_mileage(samples: &[PositionSample]) -> Vec<DailyMileage> {
    if samples.is_empty() {
        return Vec::new();
    }
    let vehicle_id = samples[0].vehicle_id;

    let mut totals: BTreeMap<chrono::NaiveDate, f64> = BTreeMap::new();

    for (i, sample) in samples.iter().enumerate() {
        let date = sample.timestamp.date_naive();
        let entry = totals.entry(date).or_insert(0.0);

        if i > 0 {
            let prev = &samples[i - 1];
            if prev.timestamp.date_naive() == date && sample.speed > SPEED_THRESHOLD_KMH {
                *entry += haversine_km(
                    prev.latitude,
                    prev.longitude,
                    sample.latitude,
                    sample.longitude,
                );
            }
        }
    }

    totals
        .into_iter()
        .map(|(date, km)| DailyMileage {
            vehicle_id,
            date,
            distance_miles: round2(km_to_miles(km)),
        })
        .collect()
}
