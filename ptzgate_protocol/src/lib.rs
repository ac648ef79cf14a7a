#![doc = include_str!("../README.md")]

#[macro_use]
extern crate tracing;

pub mod command;
mod error;
pub mod packet;
pub mod pelco;
pub mod reply;

pub use crate::{
    command::{CommandHeader, CommandKind},
    error::Error,
    packet::{PayloadType, ViscaPacket, NO_SEQUENCE},
    pelco::{PanTiltAction, PelcoFrame},
    reply::ReplyStatus,
};

/// Result type.
pub type Result<T = ()> = std::result::Result<T, Error>;
