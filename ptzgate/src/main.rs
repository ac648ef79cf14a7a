use clap::Parser;
use ptzgate::{
    GatewayServer, MotionController, NullTransport, PelcoCamera, Result, SerialTransport,
    Transport,
};
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

/// VISCA-over-UDP to Pelco-D serial gateway.
#[derive(Debug, Parser)]
#[clap(verbatim_doc_comment)]
struct CliParser {
    /// UDP address to listen on for VISCA controllers.
    #[clap(short, long, default_value = "0.0.0.0:52381")]
    pub listen: String,

    /// Serial device the pan-tilt head is attached to.
    #[clap(short = 'p', long, default_value = "/dev/ttyUSB0")]
    pub serial_port: String,

    /// UART baud rate for the Pelco-D bus.
    #[clap(short, long, default_value_t = 2400)]
    pub baud: u32,

    /// Pelco-D device address of the head.
    #[clap(short, long, default_value_t = 1)]
    pub address: u8,

    /// Log Pelco-D frames instead of opening a serial port.
    #[clap(long)]
    pub dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .compact()
        .init();
    let opts = CliParser::parse();

    let transport: Box<dyn Transport> = if opts.dry_run {
        info!("dry run: frames will be logged, not sent");
        Box::new(NullTransport)
    } else {
        Box::new(SerialTransport::open(&opts.serial_port, opts.baud)?)
    };

    let mut motion = MotionController::new(transport, opts.address);
    // Reference the head against its zero preset before taking commands.
    motion.go_to_zero()?;

    let server = GatewayServer::bind(opts.listen.as_str(), PelcoCamera::new(motion)).await?;
    let shutdown = server.shutdown_handle();
    tokio::task::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => shutdown.notify_one(),
            Err(e) => error!("could not install the interrupt handler: {e}"),
        }
    });

    server.serve().await
}
