use std::path::PathBuf;

use clap::Parser;

use fsinfo_cli::{report, Client, Units};
use fsinfo_wire::endpoint;

/// fsinfo - show capacity of the filesystems holding the given paths
#[derive(Parser, Debug)]
#[command(name = "fsinfo")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Paths to report on
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Show sizes in bytes instead of gibibytes
    #[arg(long)]
    bytes: bool,

    /// Control channel socket (defaults to the service's endpoint)
    #[arg(long, env = "FSINFO_SOCKET")]
    socket: Option<PathBuf>,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // Help and version are not failures.
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let socket = args
        .socket
        .unwrap_or_else(endpoint::endpoint_from_env);
    let mut client = match Client::connect(&socket) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to open device: {}", e);
            std::process::exit(1);
        }
    };

    let units = if args.bytes {
        Units::Bytes
    } else {
        Units::Gibibytes
    };
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    if let Err(e) = report(
        &mut client,
        &args.paths,
        units,
        &mut stdout.lock(),
        &mut stderr.lock(),
    ) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
