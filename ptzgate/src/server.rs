//! The gateway server loop.

use crate::{
    camera::{Dispatch, PelcoCamera},
    sequence::SequenceGuard,
    udp::ViscaUdpChannel,
    Result,
};
use ptzgate_protocol::{reply, CommandHeader, PayloadType, ViscaPacket};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::ToSocketAddrs, select, sync::Notify, task::yield_now, time::timeout};

/// Owns the datagram socket and runs the receive/process/reply loop.
pub struct GatewayServer {
    channel: ViscaUdpChannel,
    guard: SequenceGuard,
    camera: PelcoCamera,
    shutdown: Arc<Notify>,
}

impl GatewayServer {
    /// Bound wait per poll of the socket.
    const POLL_TIMEOUT: Duration = Duration::from_secs(1);

    pub async fn bind<A: ToSocketAddrs>(addr: A, camera: PelcoCamera) -> Result<Self> {
        let channel = ViscaUdpChannel::bind(addr).await?;
        info!("listening on {}", channel.local_addr()?);

        Ok(Self {
            channel,
            guard: SequenceGuard::new(),
            camera,
            shutdown: Arc::new(Notify::new()),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.channel.local_addr()
    }

    /// Handle that stops [`serve`][Self::serve] at its next suspension
    /// point. The socket closes when the loop returns.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Runs the loop until shut down.
    ///
    /// One cooperative task: each accepted packet is processed to
    /// completion before the next poll, with a voluntary yield in
    /// between. No per-packet failure is fatal — errors are logged and
    /// the loop carries on. There is no backpressure: a controller that
    /// floods us just overwrites its own sequence record and loses
    /// duplicates to the guard.
    pub async fn serve(mut self) -> Result<()> {
        let shutdown = self.shutdown.clone();

        loop {
            select! {
                () = shutdown.notified() => {
                    info!("shutdown requested, closing socket");
                    return Ok(());
                }

                polled = timeout(Self::POLL_TIMEOUT, self.channel.recv()) => {
                    match polled {
                        // Nothing within the poll window.
                        Err(_) => continue,

                        Ok(Err(e)) => error!("socket receive error: {e}"),

                        Ok(Ok((pkt, origin))) => {
                            if let Err(e) = self.process(pkt, origin).await {
                                error!("error processing datagram from {origin}: {e}");
                            }
                            yield_now().await;
                        }
                    }
                }
            }
        }
    }

    async fn process(&mut self, pkt: ViscaPacket, origin: SocketAddr) -> Result<()> {
        if pkt.payload.is_empty() {
            // Sentinel from a malformed datagram, or a genuinely empty
            // envelope; either way there is nothing to do.
            return Ok(());
        }

        if !self.guard.accept(origin, &pkt) {
            return Ok(());
        }

        if !matches!(
            pkt.payload_type,
            PayloadType::Command | PayloadType::Inquiry
        ) {
            trace!("ignoring {:?} payload from {origin}", pkt.payload_type);
            return Ok(());
        }

        let (header, args) = match CommandHeader::split(&pkt.payload) {
            Ok(split) => split,
            Err(e) => {
                warn!("unusable command payload from {origin}: {e}");
                return Ok(());
            }
        };

        match self
            .camera
            .dispatch(header.kind, header.target, header.subcommand, args)?
        {
            Dispatch::Completed => self.send_reply(&pkt, origin, reply::completion(&[])).await,
            Dispatch::Answer(data) => {
                self.send_reply(&pkt, origin, reply::completion(&data)).await
            }
            Dispatch::Ignored => Ok(()),
        }
    }

    async fn send_reply(
        &mut self,
        request: &ViscaPacket,
        origin: SocketAddr,
        body: Vec<u8>,
    ) -> Result<()> {
        self.channel.send_to(&request.make_reply(body), origin).await
    }
}
