use clap::Parser;
use rplidar_driver::{run_driver, DriverConfig};
use std::path::PathBuf;
use tracing::{error, info};

/// Reads express scan data from an RPLIDAR and prints one JSON line per revolution.
#[derive(Parser)]
#[command(about = "LiDAR data receiver.", disable_version_flag = true)]
struct Args {
    /// The device path to a serial port
    port: String,
    /// JSON file with driver settings; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of scans to print before exiting
    #[arg(long, default_value_t = 10)]
    scans: usize,
}

fn load_config(path: Option<&PathBuf>) -> DriverConfig {
    let path = match path {
        Some(p) => p,
        None => return DriverConfig::default(),
    };
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref());

    let (driver_threads, output) = match run_driver(&args.port, &config) {
        Ok(t) => t,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    for _ in 0..args.scans {
        let scan = match output.scans.recv() {
            Ok(scan) => scan,
            Err(_) => break,
        };
        println!("{}", serde_json::to_string(&scan).unwrap());
    }

    info!(stats = ?driver_threads.stats(), "Done");
    drop(driver_threads);
}
