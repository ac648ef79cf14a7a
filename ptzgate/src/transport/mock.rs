//! Hardware-free transports.

use super::Transport;
use crate::Result;
use std::sync::{Arc, Mutex};

/// Records every frame for assertions in tests.
///
/// Clones share the same buffer, so a test can keep one handle while the
/// [`MotionController`][crate::MotionController] owns the other.
#[derive(Clone, Default)]
pub struct MockTransport {
    frames: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames sent so far, oldest first.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.frames.lock().unwrap().clone()
    }

    /// The most recently sent frame, if any.
    pub fn last_frame(&self) -> Option<Vec<u8>> {
        self.frames.lock().unwrap().last().cloned()
    }
}

impl Transport for MockTransport {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.frames.lock().unwrap().push(frame.to_vec());
        Ok(())
    }
}

/// Logs each frame and discards it. Used by `--dry-run`.
#[derive(Clone, Copy, Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        debug!("dry-run, dropping frame: {}", hex::encode(frame));
        Ok(())
    }
}
