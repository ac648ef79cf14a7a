//! The virtual VISCA camera.
//!
//! Controllers talk to this as if it were a camera; pan/tilt commands are
//! translated into Pelco-D motion, camera features the head does not have
//! (zoom, focus drive, position feedback) are answered with benign zeros
//! so off-the-shelf controllers keep working.

use crate::{motion::MotionController, Result};
use ptzgate_protocol::{
    command::{camera, pan_tilt, target},
    pelco::{speed_to_percent, PanTiltAction},
    CommandKind,
};

/// Camera-visible state. Position and zoom are unmodeled and always
/// report zero.
#[derive(Debug, Clone, Copy)]
pub struct CameraState {
    pub focus_mode: u8,
}

impl Default for CameraState {
    fn default() -> Self {
        Self { focus_mode: 2 }
    }
}

/// What the server should do after a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Command executed; reply with a bare completion.
    Completed,
    /// Inquiry executed; reply with a completion carrying this payload.
    Answer(Vec<u8>),
    /// Protocol violation; drop the datagram without replying.
    Ignored,
}

/// Maps VISCA commands onto camera state and pan-tilt motion.
///
/// Unrecognized `(target, subcommand)` combinations resolve to defaults —
/// a no-op for sets, a single zero byte for inquiries — never an error
/// reply; noisy and partial controllers are the norm, and rejecting their
/// chatter outright would break them.
pub struct PelcoCamera {
    state: CameraState,
    motion: MotionController,
}

impl PelcoCamera {
    pub fn new(motion: MotionController) -> Self {
        Self {
            state: CameraState::default(),
            motion,
        }
    }

    /// Routes one command to its handler.
    pub fn dispatch(
        &mut self,
        kind: CommandKind,
        target: u8,
        subcommand: u8,
        args: &[u8],
    ) -> Result<Dispatch> {
        trace!("dispatch {kind:?} {target:#x}/{subcommand:#x}: {}", hex::encode(args));

        match kind {
            CommandKind::Set => self.dispatch_set(target, subcommand, args),
            CommandKind::Inquiry => Ok(self.dispatch_inquiry(target, subcommand)),
        }
    }

    fn dispatch_set(&mut self, target: u8, subcommand: u8, args: &[u8]) -> Result<Dispatch> {
        match (target, subcommand) {
            (target::CAMERA, camera::FOCUS_MODE) => self.set_focus_mode(args),
            (target::CAMERA, camera::FOCUS_POSITION) | (target::CAMERA, camera::ZOOM_POSITION) => {
                // No focus or zoom actuator on the head.
                Ok(Dispatch::Completed)
            }
            (target::CAMERA, camera::PRESET) => self.preset(args),
            (target::PAN_TILT, pan_tilt::DRIVE) => self.drive(args),
            (target::PAN_TILT, pan_tilt::ABSOLUTE_POSITION) => self.absolute_position(args),
            (target::PAN_TILT, pan_tilt::HOME) => {
                self.motion.go_home()?;
                Ok(Dispatch::Completed)
            }
            _ => {
                debug!("unhandled set {target:#x}/{subcommand:#x}");
                Ok(Dispatch::Completed)
            }
        }
    }

    fn dispatch_inquiry(&self, target: u8, subcommand: u8) -> Dispatch {
        match (target, subcommand) {
            (target::CAMERA, camera::FOCUS_MODE) => Dispatch::Answer(vec![self.state.focus_mode]),
            (target::CAMERA, camera::FOCUS_POSITION) | (target::CAMERA, camera::ZOOM_POSITION) => {
                Dispatch::Answer(vec![0; 4])
            }
            (target::PAN_TILT, pan_tilt::POSITION) => {
                // Position feedback unimplemented: the Pelco-D bus is
                // write-only from here.
                Dispatch::Answer(vec![0; 8])
            }
            _ => {
                debug!("unhandled inquiry {target:#x}/{subcommand:#x}");
                Dispatch::Answer(vec![0])
            }
        }
    }

    fn set_focus_mode(&mut self, args: &[u8]) -> Result<Dispatch> {
        let &[mode, ..] = args else {
            warn!("focus mode set without a value");
            return Ok(Dispatch::Ignored);
        };

        self.state.focus_mode = mode;
        Ok(Dispatch::Completed)
    }

    /// Preset set/recall: `[opcode, index]` with opcode 1 = set,
    /// 2 = recall. VISCA presets are zero-based, Pelco-D's one-based.
    fn preset(&mut self, args: &[u8]) -> Result<Dispatch> {
        let &[opcode, index, ..] = args else {
            warn!("preset command with {} argument bytes", args.len());
            return Ok(Dispatch::Ignored);
        };

        let preset = index.wrapping_add(1);
        match opcode {
            1 => {
                debug!("set preset {preset}");
                self.motion.set_preset(preset)?;
            }
            2 => {
                debug!("recall preset {preset}");
                self.motion.go_to_preset(preset)?;
            }
            other => debug!("unhandled preset opcode {other}"),
        }

        Ok(Dispatch::Completed)
    }

    /// Continuous drive: `[pan_speed, tilt_speed, pan_dir, tilt_dir]`.
    fn drive(&mut self, args: &[u8]) -> Result<Dispatch> {
        let &[pan_speed, tilt_speed, pan, tilt, ..] = args else {
            warn!("drive command with {} argument bytes", args.len());
            return Ok(Dispatch::Ignored);
        };

        // VISCA direction codes are intrinsically bounded; a pair outside
        // the table means a broken controller, and there is no safe
        // direction to substitute. Drop it without replying.
        let Some(action) = PanTiltAction::from_visca(pan, tilt) else {
            warn!("invalid drive direction pair ({pan}, {tilt})");
            return Ok(Dispatch::Ignored);
        };

        debug!("drive {action:?}, speeds ({pan_speed}, {tilt_speed})");
        self.motion.drive(
            action,
            speed_to_percent(pan_speed),
            speed_to_percent(tilt_speed),
        )?;
        Ok(Dispatch::Completed)
    }

    /// Absolute position: `[pan_speed, tilt_speed, nibbles...]`.
    ///
    /// Sony documents five position nibbles per axis, PTZOptics four;
    /// both layouts are accepted, told apart by length. The head has no
    /// absolute-positioning actuator, but controllers use the zero
    /// coordinate as a home shortcut, so that one case moves.
    fn absolute_position(&mut self, args: &[u8]) -> Result<Dispatch> {
        let (pan, tilt) = if args.len() >= 12 {
            (nibble_value(&args[2..7]), nibble_value(&args[7..12]))
        } else if args.len() >= 10 {
            (nibble_value(&args[2..6]), nibble_value(&args[6..10]))
        } else {
            warn!("absolute position with {} argument bytes", args.len());
            return Ok(Dispatch::Ignored);
        };

        if pan == 0 && tilt == 0 {
            debug!("absolute zero, going home");
            self.motion.go_home()?;
        }

        Ok(Dispatch::Completed)
    }
}

/// Accumulates big-endian position nibbles into an axis value.
fn nibble_value(nibbles: &[u8]) -> u32 {
    nibbles
        .iter()
        .fold(0u32, |value, n| (value << 4) + u32::from(*n))
}
