//! Listener TCP de telemetría
//!
//! Un worker por conexión aceptada; cada worker es dueño exclusivo de su
//! buffer de reensamblado. Los errores de decode e identidad se absorben
//! localmente: nunca terminan la conexión ni el listener.

use std::net::SocketAddr;

use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::decoder;
use super::framing::FrameReassembler;
use super::identity::IdentityResolver;
use crate::dto::telemetry_dto::TelemetryPacket;
use crate::queue::QueueOperations;
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Tamaño del buffer de lectura por conexión
const READ_BUFFER_SIZE: usize = 1024;

/// Aceptar conexiones de dispositivos hasta recibir la señal de apagado
pub async fn run(state: AppState, mut shutdown: watch::Receiver<bool>) -> AppResult<()> {
    let addr = state.config.listener_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("🛰️ GPS Listener escuchando en {}", addr);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = accepted?;
                debug!("📡 Conexión entrante de {}", peer);

                let state = state.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(state, socket, peer).await {
                        warn!("⚠️ Conexión {} terminada con error: {}", peer, e);
                    }
                });
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("🛑 GPS Listener apagándose");
                    return Ok(());
                }
            }
        }
    }
}

/// Worker de una conexión: leer chunks, extraer registros por ambos
/// caminos de decodificación y despacharlos hacia la cola.
async fn handle_connection(
    state: AppState,
    mut socket: TcpStream,
    peer: SocketAddr,
) -> AppResult<()> {
    let resolver = IdentityResolver::new(state.pool.clone());
    let mut reassembler = FrameReassembler::new();
    let mut buf = [0u8; READ_BUFFER_SIZE];

    loop {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            debug!("📴 Conexión {} cerrada por el dispositivo", peer);
            return Ok(());
        }
        let chunk = &buf[..n];

        let mut records = Vec::new();

        // Camino binario: reensamblar y extraer las tramas ya completas
        reassembler.extend(chunk);
        while let Some(frame) = reassembler.next_frame() {
            match decoder::decode_binary_frame(&frame) {
                Some(record) => records.push(record),
                None => debug!(
                    "🗑️ Trama binaria no decodificable de {} ({} bytes)",
                    peer,
                    frame.len()
                ),
            }
        }

        // Camino de texto: sobre el chunk crudo, independiente del buffer
        // binario. Ambos caminos pueden disparar sobre el mismo chunk:
        // tolerancia deliberada a firmwares de formato mixto.
        if let Ok(text) = std::str::from_utf8(chunk) {
            records.extend(decoder::decode_text_chunk(text));
        }

        for record in records {
            dispatch_record(&state, &resolver, record).await;
        }
    }
}

/// Resolver identidad y encolar un registro decodificado
async fn dispatch_record(
    state: &AppState,
    resolver: &IdentityResolver,
    record: decoder::TelemetryRecord,
) {
    let Some(tag) = record.device_tag.clone() else {
        warn!("⚠️ Registro binario sin identidad de dispositivo, descartado");
        return;
    };

    match resolver.resolve(&tag).await {
        Ok(Some(vehicle_id)) => {
            debug!(
                "📍 Vehículo {} @ ({:.4}, {:.4}) vel {:.1} km/h (hora dispositivo {})",
                vehicle_id, record.latitude, record.longitude, record.speed_kmh, record.device_time
            );
            let packet = TelemetryPacket::new(
                tag,
                record.latitude,
                record.longitude,
                record.speed_kmh,
                record.heading,
            );
            // push degradado: si la cola no está, la muestra se descarta
            state.queue.push_packet(&packet).await;
        }
        Ok(None) => {
            warn!("⚠️ Identidad no resuelta para tag '{}', muestra descartada", tag);
        }
        Err(e) => {
            error!("❌ Error resolviendo identidad de '{}': {}", tag, e);
        }
    }
}
