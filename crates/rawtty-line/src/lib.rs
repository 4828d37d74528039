//! Raw serial lines over termios.
//!
//! Opens a character device, programs it into raw 8N1 mode with a VMIN/VTIME
//! timing pair, and exposes four primitives:
//! - open ([`SerialLine::open`])
//! - close ([`SerialLine::close`])
//! - read, which drains everything currently available ([`SerialLine::read`])
//! - write, a single unlooped `write(2)` ([`SerialLine::write`])
//!
//! The descriptor-level functions in [`io`] and [`termios`] take any [`AsFd`](std::os::fd::AsFd)
//! so callers that only hold an integer descriptor can reuse them.

pub mod baud;
pub mod config;
pub mod error;
pub mod timing;

#[cfg(unix)]
pub mod io;
#[cfg(unix)]
pub mod line;
#[cfg(unix)]
pub mod termios;

#[cfg(all(unix, any(test, feature = "testing")))]
#[doc(hidden)]
pub mod testpty;

pub use baud::BaudRate;
pub use config::{LineConfig, LineSettings};
pub use error::{LineError, Result};
pub use timing::{ReadMode, ReadTiming};

#[cfg(unix)]
pub use io::{Payload, CHUNK_SIZE};
#[cfg(unix)]
pub use line::{check_descriptor, SerialLine};
