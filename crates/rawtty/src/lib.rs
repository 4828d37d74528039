//! Raw binary transport over serial lines.
//!
//! rawtty programs a character device into raw 8N1 mode and exposes open, close,
//! drain-read, and single-shot write over it.
//!
//! # Crate Structure
//!
//! - [`line`]: line discipline configuration, the [`SerialLine`](line::SerialLine)
//!   handle, and descriptor-level read/write primitives
//!
//! ```no_run
//! use rawtty::line::SerialLine;
//!
//! fn main() -> Result<(), rawtty::line::LineError> {
//!     let line = SerialLine::open("/dev/ttyUSB0")?;
//!     line.write("Kx")?;
//!     let reply = line.read();
//!     println!("{}", String::from_utf8_lossy(&reply));
//!     line.close();
//!     Ok(())
//! }
//! ```

/// Re-export line types.
pub mod line {
    pub use rawtty_line::*;
}
