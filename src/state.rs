//! Shared application state
//!
//! Este módulo define el estado compartido que se inyecta en el listener,
//! el consumidor y los controladores: pool de base de datos, configuración
//! y cliente de la cola, construidos explícitamente en el arranque.

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::queue::RedisQueue;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub queue: RedisQueue,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, queue: RedisQueue) -> Self {
        Self { pool, config, queue }
    }
}
