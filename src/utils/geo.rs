//! Utilidades geográficas
//!
//! Distancia gran-círculo entre muestras GPS y conversiones de unidades
//! usadas por el motor de segmentación.

/// Radio terrestre en kilómetros
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Factor de conversión kilómetros → millas
pub const KM_TO_MILES: f64 = 0.621371;

/// Distancia haversine entre dos coordenadas, en kilómetros
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Convertir kilómetros a millas
pub fn km_to_miles(km: f64) -> f64 {
    km * KM_TO_MILES
}

/// Redondear a 2 decimales
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero_distance() {
        let d = haversine_km(9.0331, 38.7500, 9.0331, 38.7500);
        assert!(d.abs() < 1e-12);
    }

    #[test]
    fn test_haversine_known_leg() {
        // Un paso de 0.001° en lat y lon cerca de Addis Abeba ≈ 156 metros
        let d = haversine_km(9.0331, 38.7500, 9.0341, 38.7510);
        assert!(d > 0.14 && d < 0.17, "distancia inesperada: {}", d);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = haversine_km(9.0331, 38.7500, 9.0371, 38.7540);
        let b = haversine_km(9.0371, 38.7540, 9.0331, 38.7500);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(35.255), 35.26);
        assert_eq!(round2(0.624_999), 0.62);
    }

    #[test]
    fn test_km_to_miles() {
        assert!((km_to_miles(1.0) - 0.621371).abs() < 1e-12);
    }
}
