//! Resolución de identidad de dispositivo
//!
//! Algunos firmwares legacy reportan el vehicle id crudo y otros el IMEI
//! del hardware, así que la resolución acepta ambos modos. Un tag no
//! resoluble descarta la muestra con un warning: nunca es un error que
//! tumbe la conexión.

use sqlx::PgPool;

use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppResult;

/// Un tag de dispositivo ya clasificado
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceTag {
    /// Entero positivo: se trata como vehicle id directo, sin lookup.
    /// La existencia no se verifica aquí; el storage es la fuente de verdad.
    VehicleId(i64),
    /// Cualquier otra cosa se trata como IMEI a resolver contra vehicles
    Imei(String),
}

/// Clasificar un identificador crudo de cualquiera de los dos caminos de
/// decodificación. Pura e idempotente.
pub fn classify_tag(raw: &str) -> DeviceTag {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(id) if id > 0 => DeviceTag::VehicleId(id),
        _ => DeviceTag::Imei(trimmed.to_string()),
    }
}

/// Resolver tags de dispositivo a entidades vehículo
pub struct IdentityResolver {
    vehicles: VehicleRepository,
}

impl IdentityResolver {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool),
        }
    }

    /// Resolver un tag crudo a un vehicle id.
    ///
    /// El camino numérico nunca consulta la base; el camino IMEI hace el
    /// lookup y devuelve None si no hay vehículo dueño (el caller descarta
    /// la muestra con warning y la ingesta continúa).
    pub async fn resolve(&self, raw: &str) -> AppResult<Option<i64>> {
        match classify_tag(raw) {
            DeviceTag::VehicleId(id) => Ok(Some(id)),
            DeviceTag::Imei(imei) => {
                let vehicle = self.vehicles.find_by_imei(&imei).await?;
                Ok(vehicle.map(|v| v.id))
            }
        }
    }
}
