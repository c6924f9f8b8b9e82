//! Live decoder for yaw sensors on a SocketCAN interface.
//!
//! Reads frames until the socket fails, printing each decoded reading.
//! With `--feed-subaru` the Subaru keep-alive frame is transmitted in the
//! background so that sensor starts streaming.

#[cfg(target_os = "linux")]
mod listen {
    use std::io;

    use anyhow::{Context, Result};
    use can_tools::bus::{SocketCanSource, SocketCanWriter};
    use can_tools::{run, Dispatcher, JsonSink, KeepAliveFeeder, ReadingSink, TextSink};
    use clap::Parser;
    use strum::IntoEnumIterator;
    use tracing::{error, info, warn};
    use yaw_decode::Vendor;

    /// Default CAN interface
    const DEFAULT_INTERFACE: &str = "can0";

    /// CAN yaw sensor listener
    #[derive(Parser, Debug)]
    #[command(name = "listen_yaw")]
    #[command(about = "Decode yaw-rate sensor frames from a SocketCAN interface")]
    #[command(version)]
    struct Args {
        /// SocketCAN interface name
        #[arg(short, long, default_value = DEFAULT_INTERFACE)]
        interface: String,

        /// Only decode one sensor family (subaru, nissan, mercedes)
        #[arg(long)]
        vendor: Option<Vendor>,

        /// Hex-dump every received frame
        #[arg(long)]
        raw: bool,

        /// Emit JSON lines instead of text
        #[arg(long)]
        json: bool,

        /// Transmit the Subaru keep-alive frame while listening
        #[arg(long)]
        feed_subaru: bool,
    }

    pub fn main() -> Result<()> {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_target(false)
            .with_writer(io::stderr)
            .init();

        let args = Args::parse();

        info!("CAN yaw sensors on {}", args.interface);
        for vendor in Vendor::iter() {
            if args.vendor.is_some_and(|only| only != vendor) {
                continue;
            }
            let profile = vendor.profile();
            let ids: Vec<String> = profile
                .identifiers
                .iter()
                .map(|id| format!("0x{id:03X}"))
                .collect();
            info!(
                "{}: {} on {}",
                vendor,
                profile.part_numbers.join(", "),
                ids.join(", ")
            );
        }

        let mut source = SocketCanSource::open(&args.interface)?;

        let feeder = if args.feed_subaru {
            let keep_alive = Vendor::Subaru
                .profile()
                .keep_alive
                .context("Subaru profile has no keep-alive")?;
            let writer = SocketCanWriter::open(&args.interface)?;
            info!(
                "Feeding 0x{:03X} every {:?}",
                keep_alive.id, keep_alive.period
            );
            Some(KeepAliveFeeder::spawn(writer, keep_alive)?)
        } else {
            None
        };

        let out = io::stdout().lock();
        let mut sink: Box<dyn ReadingSink> = if args.json {
            Box::new(JsonSink::new(out))
        } else {
            Box::new(TextSink::new(out).hex_dump(args.raw))
        };

        let mut dispatcher = Dispatcher::with_filter(args.vendor);
        let result = run(&mut source, &mut dispatcher, sink.as_mut());

        if let Some(feeder) = feeder {
            match feeder.stop() {
                Ok(sent) => info!("Sent {} keep-alive frames", sent),
                Err(e) => warn!("Keep-alive feeder failed: {}", e),
            }
        }
        info!("{}", dispatcher.stats());

        if let Err(e) = &result {
            error!("Capture ended: {}", e);
        }
        result.with_context(|| format!("Reading from {} failed", args.interface))
    }
}

#[cfg(target_os = "linux")]
fn main() -> anyhow::Result<()> {
    listen::main()
}

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("listen_yaw requires Linux SocketCAN");
    std::process::exit(1);
}
