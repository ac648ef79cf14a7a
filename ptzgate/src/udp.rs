//! Datagram transport for the VISCA side.
//!
//! This typically operates over port 52381.

use crate::Result;
use binrw::BinWrite;
use ptzgate_protocol::ViscaPacket;
use std::{io::Cursor, net::SocketAddr};
use tokio::net::{ToSocketAddrs, UdpSocket};

/// The well-known VISCA-over-UDP port.
pub const VISCA_PORT: u16 = 52381;

pub struct ViscaUdpChannel {
    sock: UdpSocket,
}

impl ViscaUdpChannel {
    pub async fn bind<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let sock = UdpSocket::bind(addr).await?;
        Ok(Self { sock })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.sock.local_addr()?)
    }

    /// Receives one datagram and decodes it, remembering who sent it.
    ///
    /// Decoding fails soft: malformed input comes back as the sentinel
    /// packet, which the server loop skips.
    pub async fn recv(&self) -> Result<(ViscaPacket, SocketAddr)> {
        let mut b = [0u8; ViscaPacket::MAX_DATAGRAM];
        let (l, origin) = self.sock.recv_from(&mut b).await?;
        trace!("recv {origin}: {}", hex::encode(&b[..l]));

        Ok((ViscaPacket::from_datagram(&b[..l]), origin))
    }

    pub async fn send_to(&self, packet: &ViscaPacket, addr: SocketAddr) -> Result {
        let mut out = Cursor::new(Vec::new());
        packet.write(&mut out)?;
        let out = out.into_inner();
        trace!("send {addr}: {}", hex::encode(&out));
        self.sock.send_to(&out, addr).await?;
        Ok(())
    }
}
