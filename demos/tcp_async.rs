use std::net::IpAddr;

use clap::Parser;
use gpsd_state::{
    client::{GpsdSession, Update},
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
    /// Number of position fixes to print before closing the watch
    #[arg(short, long, default_value = "10")]
    count: usize,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut session = GpsdSession::connect((args.addr, args.port))
        .await
        .unwrap();
    session.stream(StreamOptions::json()).await.unwrap();

    let mut fixes = 0;
    while fixes < args.count {
        match session.read().await {
            Ok(Some(Update::State { state, .. })) => {
                if state.valid.contains(ValidityFlags::LATLON) {
                    if let (Some(lat), Some(lon)) = (state.fix.latitude, state.fix.longitude) {
                        println!(
                            "Current position: lat {lat:6.3}, lon {lon:6.3} ({} satellites used)",
                            state.satellites_used()
                        );
                        fixes += 1;
                    }
                }
            }
            Ok(Some(Update::Raw(_))) => { /* ignore passthrough */ }
            Ok(None) => {
                eprintln!("Stream ended unexpectedly");
                return;
            }
            Err(e) => eprintln!("Error decoding message: {e}"),
        }
    }

    session.close().await.unwrap();
}
