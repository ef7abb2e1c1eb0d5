//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de
//! configuración del listener, la cola y el ejecutor de comandos.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub listen_host: String,
    pub listen_port: u16,
    pub redis_url: String,
    pub queue_name: String,
    pub command_delay_secs: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            listen_host: env::var("LISTEN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            listen_port: env::var("LISTEN_PORT")
                .unwrap_or_else(|_| "9000".to_string())
                .parse()
                .expect("LISTEN_PORT must be a valid port number"),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            queue_name: env::var("QUEUE_NAME").unwrap_or_else(|_| "gps_packets".to_string()),
            command_delay_secs: env::var("COMMAND_DELAY_SECS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .expect("COMMAND_DELAY_SECS must be a valid number"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección de escucha del listener GPS
    pub fn listener_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.listen_port)
    }
}
