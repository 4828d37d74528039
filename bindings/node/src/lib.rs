mod error;
mod line;

pub use line::{close, open, read, set_blocking, write};

/// Bytes requested per `read(2)` while draining.
#[napi_derive::napi]
pub fn chunk_size() -> u32 {
    rawtty_line::CHUNK_SIZE as u32
}
