//! Reensamblador de tramas binarias
//!
//! Mantiene UN buffer creciente por conexión y extrae tramas completas de
//! un stream de bytes con límites de chunk arbitrarios. La
//! resincronización tras basura descarta exactamente un byte por
//! iteración, así una cabecera válida que empiece a mitad de buffer
//! siempre termina encontrándose.

use bytes::{Buf, Bytes, BytesMut};

/// Cabecera estándar de trama (paquetes cortos)
pub const FRAME_HEADER_STANDARD: [u8; 2] = [0x78, 0x78];

/// Cabecera extendida de trama (paquetes largos)
pub const FRAME_HEADER_EXTENDED: [u8; 2] = [0x79, 0x79];

/// Mínimo de bytes para poder inspeccionar cabecera + longitud + protocolo
const MIN_FRAME_LEN: usize = 5;

/// Buffer de reensamblado de una conexión
///
/// Propiedad exclusiva del worker de su conexión: no hay estado mutable
/// compartido entre conexiones en el camino de ingesta.
pub struct FrameReassembler {
    buffer: BytesMut,
}

impl FrameReassembler {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    /// Anexar un chunk recién recibido al buffer
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Bytes actualmente retenidos a la espera de una trama completa
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Extraer la siguiente trama completa, si el buffer ya la contiene.
    ///
    /// La longitud total de una trama es `length + 5`, con `length` en el
    /// offset 2. Una trama incompleta deja el buffer intacto hasta que
    /// lleguen más datos.
    pub fn next_frame(&mut self) -> Option<Bytes> {
        loop {
            if self.buffer.len() < MIN_FRAME_LEN {
                return None;
            }

            let header = [self.buffer[0], self.buffer[1]];
            if header != FRAME_HEADER_STANDARD && header != FRAME_HEADER_EXTENDED {
                // Resincronización: un byte por iteración, nunca más
                self.buffer.advance(1);
                continue;
            }

            let frame_len = self.buffer[2] as usize + MIN_FRAME_LEN;
            if self.buffer.len() < frame_len {
                // Trama incompleta: esperar más datos
                return None;
            }

            return Some(self.buffer.split_to(frame_len).freeze());
        }
    }
}

impl Default for FrameReassembler {
    fn default() -> Self {
        Self::new()
    }
}
