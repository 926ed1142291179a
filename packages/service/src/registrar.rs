//! Registration steps backed by a Unix domain socket.
//!
//! | step             | apply                                   | revert                    |
//! |------------------|-----------------------------------------|---------------------------|
//! | reserve identity | claim the endpoint in the identity table| release the claim         |
//! | attach device    | bind the staging socket, start serving  | stop serving, unlink it   |
//! | register class   | create `<runtime_dir>/<class>`          | remove it if we created it|
//! | create endpoint  | link staging socket to the endpoint     | unlink the endpoint       |
//!
//! Until the last step the socket only exists under a hidden staging name,
//! so no caller can reach a channel that is not fully registered.

use std::collections::BTreeMap;
use std::io;
use std::os::unix::fs::FileTypeExt;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use lazy_static::lazy_static;

use crate::lifecycle::{Registrar, Step};
use crate::server::Server;
use crate::{ControlChannel, ServiceConfig};

lazy_static! {
    /// Endpoint path -> minor number, for every identity reserved in this
    /// process.
    static ref IDENTITIES: Mutex<BTreeMap<PathBuf, u32>> = Mutex::new(BTreeMap::new());
}

fn reserve_identity(endpoint: PathBuf) -> io::Result<u32> {
    let mut table = IDENTITIES.lock().unwrap_or_else(PoisonError::into_inner);
    if table.contains_key(&endpoint) {
        return Err(io::Error::new(
            io::ErrorKind::AddrInUse,
            format!("{} is already registered", endpoint.display()),
        ));
    }
    let minor = (0u32..)
        .find(|candidate| !table.values().any(|used| used == candidate))
        .unwrap_or(u32::MAX);
    table.insert(endpoint, minor);
    Ok(minor)
}

fn release_identity(endpoint: &Path) -> io::Result<()> {
    let mut table = IDENTITIES.lock().unwrap_or_else(PoisonError::into_inner);
    match table.remove(endpoint) {
        Some(_) => Ok(()),
        None => Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} was not registered", endpoint.display()),
        )),
    }
}

/// Registers the control channel as a socket under the runtime directory.
pub struct LocalRegistrar {
    config: ServiceConfig,
    channel: Arc<ControlChannel>,
    minor: Option<u32>,
    server: Option<Server>,
    created_class_dir: bool,
}

impl LocalRegistrar {
    pub fn new(config: ServiceConfig, channel: ControlChannel) -> Self {
        Self {
            config,
            channel: Arc::new(channel),
            minor: None,
            server: None,
            created_class_dir: false,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The minor number held while the identity is reserved.
    pub fn minor(&self) -> Option<u32> {
        self.minor
    }

    fn reserve(&mut self) -> io::Result<()> {
        self.config.validate()?;
        let minor = reserve_identity(self.config.endpoint_path())?;
        log::debug!("reserved {} as minor {}", self.config.name, minor);
        self.minor = Some(minor);
        Ok(())
    }

    fn release(&mut self) -> io::Result<()> {
        self.minor = None;
        release_identity(&self.config.endpoint_path())
    }

    fn attach(&mut self) -> io::Result<()> {
        let server = Server::bind(&self.config.staging_path(), self.channel.clone())?;
        self.server = Some(server);
        Ok(())
    }

    fn detach(&mut self) -> io::Result<()> {
        match self.server.take() {
            Some(server) => server.shutdown(),
            None => Ok(()),
        }
    }

    fn register_class(&mut self) -> io::Result<()> {
        let dir = self.config.class_dir();
        match std::fs::create_dir(&dir) {
            Ok(()) => {
                self.created_class_dir = true;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => {
                self.created_class_dir = false;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn unregister_class(&mut self) -> io::Result<()> {
        if !std::mem::take(&mut self.created_class_dir) {
            return Ok(());
        }
        let dir = self.config.class_dir();
        // Other endpoints of the same class may still live here.
        if std::fs::read_dir(&dir)?.next().is_some() {
            log::debug!("leaving non-empty class directory {}", dir.display());
            return Ok(());
        }
        std::fs::remove_dir(&dir)
    }

    fn create_endpoint(&mut self) -> io::Result<()> {
        let endpoint = self.config.endpoint_path();
        if let Ok(meta) = std::fs::symlink_metadata(&endpoint) {
            // A socket nobody answers on is left over from a dead process.
            let stale = meta.file_type().is_socket()
                && matches!(
                    UnixStream::connect(&endpoint),
                    Err(ref e) if e.kind() == io::ErrorKind::ConnectionRefused
                );
            if !stale {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} is in use", endpoint.display()),
                ));
            }
            log::warn!("removing stale endpoint {}", endpoint.display());
            std::fs::remove_file(&endpoint)?;
        }
        std::fs::hard_link(self.config.staging_path(), &endpoint)?;
        log::info!("endpoint visible at {}", endpoint.display());
        Ok(())
    }

    fn remove_endpoint(&mut self) -> io::Result<()> {
        std::fs::remove_file(self.config.endpoint_path())
    }
}

impl Registrar for LocalRegistrar {
    fn apply(&mut self, step: Step) -> io::Result<()> {
        match step {
            Step::ReserveIdentity => self.reserve(),
            Step::AttachDevice => self.attach(),
            Step::RegisterClass => self.register_class(),
            Step::CreateEndpoint => self.create_endpoint(),
        }
    }

    fn revert(&mut self, step: Step) -> io::Result<()> {
        match step {
            Step::ReserveIdentity => self.release(),
            Step::AttachDevice => self.detach(),
            Step::RegisterClass => self.unregister_class(),
            Step::CreateEndpoint => self.remove_endpoint(),
        }
    }
}
