use std::path::PathBuf;

use clap::Parser;
use nix::sys::signal::{SigSet, Signal};

use fsinfo_service::{ControlChannel, LifecycleManager, LocalRegistrar, ServiceConfig};
use fsinfo_sys::{CanonicalResolver, StatfsSource};

/// fsinfod - serve filesystem capacity queries over a local socket
#[derive(Parser, Debug)]
#[command(name = "fsinfod")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory the class directory is created in
    #[arg(long, env = "FSINFO_RUNTIME_DIR")]
    runtime_dir: Option<PathBuf>,

    /// Class directory name
    #[arg(long, env = "FSINFO_CLASS")]
    class: Option<String>,

    /// Endpoint name inside the class directory
    #[arg(long, env = "FSINFO_NAME")]
    name: Option<String>,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = ServiceConfig::default();
    if let Some(dir) = args.runtime_dir {
        config = config.with_runtime_dir(dir);
    }
    if let Some(class) = args.class {
        config = config.with_class(class);
    }
    if let Some(name) = args.name {
        config = config.with_name(name);
    }

    // Block before any thread is spawned so every thread inherits the mask
    // and the signals queue up for `wait` below.
    let mut signals = SigSet::empty();
    signals.add(Signal::SIGINT);
    signals.add(Signal::SIGTERM);
    if let Err(e) = signals.thread_block() {
        eprintln!("Error: failed to block signals: {}", e);
        std::process::exit(1);
    }

    let endpoint = config.endpoint_path();
    let channel = ControlChannel::new(CanonicalResolver, StatfsSource);
    let manager = LifecycleManager::new(LocalRegistrar::new(config, channel));

    if let Err(e) = manager.start() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    log::info!("serving on {}", endpoint.display());

    match signals.wait() {
        Ok(signal) => log::info!("received {}, shutting down", signal),
        Err(e) => log::error!("waiting for signals failed: {}", e),
    }

    if let Err(e) = manager.stop() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
