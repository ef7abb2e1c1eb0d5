//! Conexión a PostgreSQL
//!
//! Handle de almacenamiento construido explícitamente e inyectado en cada
//! componente; las conexiones se adquieren por operación desde el pool y se
//! liberan en todos los caminos de salida.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::config::database::DatabaseConfig;

/// Wrapper del pool de conexiones a la base de datos
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Crear una conexión a partir de una configuración explícita
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let pool = config.create_pool().await?;

        // Verificar que la conexión funciona antes de arrancar el resto
        sqlx::query("SELECT 1").execute(&pool).await?;
        info!("✅ PostgreSQL conectado exitosamente");

        Ok(Self { pool })
    }

    /// Crear una conexión con la configuración por defecto (DATABASE_URL)
    pub async fn new_default() -> Result<Self> {
        Self::new(DatabaseConfig::default()).await
    }

    /// Obtener el pool subyacente
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
