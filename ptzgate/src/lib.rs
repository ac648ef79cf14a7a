#![doc = include_str!("../README.md")]

#[macro_use]
extern crate tracing;

mod camera;
mod error;
mod motion;
mod sequence;
mod server;
mod transport;
mod udp;

pub use {
    crate::{
        camera::{CameraState, Dispatch, PelcoCamera},
        error::Error,
        motion::MotionController,
        sequence::SequenceGuard,
        server::GatewayServer,
        transport::{MockTransport, NullTransport, SerialTransport, Transport},
        udp::{ViscaUdpChannel, VISCA_PORT},
    },
    ptzgate_protocol as protocol,
};

/// Result type.
pub type Result<T = ()> = std::result::Result<T, Error>;
