use std::net::IpAddr;

use clap::Parser;
use gpsd_state::{
    client::{Update, blocking::GpsdSession},
    protocol::request::StreamOptions,
    validity::ValidityFlags,
};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "127.0.0.1")]
    addr: IpAddr,
    #[arg(short, long, default_value = "2947")]
    port: u16,
    /// Ask for legacy comma-delimited reports instead of JSON
    #[arg(long)]
    legacy: bool,
    /// Also pass raw NMEA sentences through
    #[arg(long)]
    nmea: bool,
    /// Only watch this device
    #[arg(long)]
    device: Option<String>,
}

fn main() {
    let args = Args::parse();

    let mut session = GpsdSession::connect((args.addr, args.port)).unwrap();

    let mut opts = if args.legacy {
        StreamOptions::legacy()
    } else {
        StreamOptions::json()
    };
    opts = opts.nmea(args.nmea);
    if let Some(device) = &args.device {
        opts = opts.device(device);
    }
    session.stream(opts).unwrap();

    loop {
        match session.read() {
            Ok(Some(Update::State { report, state })) => {
                println!("-- {report:?}");
                if state.valid.contains(ValidityFlags::VERSION) {
                    if let Some(release) = state.version.as_ref().and_then(|v| v.release.as_ref()) {
                        println!("GPSD Version: {release}");
                    }
                }
                print!("{state}");
            }
            Ok(Some(Update::Raw(line))) => println!("{}", line.trim_end()),
            Ok(None) => {
                eprintln!("Stream ended unexpectedly");
                return;
            }
            Err(e) => eprintln!("Error decoding message: {e}"),
        }
    }
}
