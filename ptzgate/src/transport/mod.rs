//! Transport abstraction for the motor bus.
//!
//! The gateway only ever writes to the pan-tilt head — Pelco-D is
//! fire-and-forget here, nothing is read back. The composition root picks
//! the implementation: a real serial port on hardware, a logging stand-in
//! for `--dry-run`, a recording one in tests.

use crate::Result;

mod mock;
mod serial;

pub use mock::{MockTransport, NullTransport};
pub use serial::SerialTransport;

/// Write-only sink for encoded Pelco-D frames.
pub trait Transport: Send {
    /// Delivers one encoded frame to the motor bus.
    fn send(&mut self, frame: &[u8]) -> Result<()>;
}
