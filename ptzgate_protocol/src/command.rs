//! Command sub-header.
//!
//! [`Command`][crate::PayloadType::Command] and
//! [`Inquiry`][crate::PayloadType::Inquiry] payloads start with a four-byte
//! sub-header addressing a unit, a target and a subcommand; the bytes after
//! it are handler-specific arguments.

use crate::{Error, Result};
use binrw::{binrw, BinRead};
use std::io::Cursor;

/// VISCA command targets.
pub mod target {
    pub const INTERFACE: u8 = 0x1;
    pub const CAMERA: u8 = 0x4;
    pub const PAN_TILT: u8 = 0x6;
}

/// Subcommands under [`target::CAMERA`].
pub mod camera {
    pub const FOCUS_MODE: u8 = 0x38;
    pub const PRESET: u8 = 0x3f;
    pub const ZOOM_POSITION: u8 = 0x47;
    pub const FOCUS_POSITION: u8 = 0x48;
}

/// Subcommands under [`target::PAN_TILT`].
pub mod pan_tilt {
    pub const DRIVE: u8 = 0x01;
    pub const ABSOLUTE_POSITION: u8 = 0x02;
    pub const HOME: u8 = 0x04;
    pub const POSITION: u8 = 0x12;
}

/// Whether a command mutates or queries.
///
/// On the wire this is the second sub-header byte: `1` is a set, anything
/// else is treated as an inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Set,
    Inquiry,
}

impl From<u8> for CommandKind {
    fn from(v: u8) -> Self {
        if v == 1 {
            Self::Set
        } else {
            Self::Inquiry
        }
    }
}

impl From<CommandKind> for u8 {
    fn from(v: CommandKind) -> Self {
        match v {
            CommandKind::Set => 1,
            CommandKind::Inquiry => 9,
        }
    }
}

/// The four-byte sub-header of a Command/Inquiry payload.
///
/// ## Format
///
/// * `u8`: unit address (`0x81` from most controllers; not interpreted)
/// * `u8`: [set or inquiry][CommandKind]
/// * `u8`: target (interface / camera / pan-tilt)
/// * `u8`: subcommand
#[binrw]
#[brw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHeader {
    pub unit: u8,
    #[br(map = |v: u8| CommandKind::from(v))]
    #[bw(map = |v: &CommandKind| u8::from(*v))]
    pub kind: CommandKind,
    pub target: u8,
    pub subcommand: u8,
}

impl CommandHeader {
    const LENGTH: usize = 4;

    /// Splits a Command/Inquiry payload into its sub-header and the
    /// argument bytes that follow it.
    pub fn split(payload: &[u8]) -> Result<(Self, &[u8])> {
        if payload.len() < Self::LENGTH {
            return Err(Error::TruncatedCommand);
        }

        let header = Self::read(&mut Cursor::new(&payload[..Self::LENGTH]))?;
        Ok((header, &payload[Self::LENGTH..]))
    }
}
