//! # fsinfo-service
//!
//! The control channel and everything needed to make it reachable.
//!
//! - [`ControlChannel`] validates caller memory, dispatches on the command
//!   selector and writes results back in one piece.
//! - [`Server`] carries fixed-size frames over a Unix domain socket.
//! - [`LifecycleManager`] registers the channel in four ordered steps and
//!   rolls back on failure. [`LocalRegistrar`] implements those steps under
//!   a runtime directory.
//!
//! ```rust,no_run
//! use fsinfo_service::{ControlChannel, LifecycleManager, LocalRegistrar, ServiceConfig};
//! use fsinfo_sys::{CanonicalResolver, StatfsSource};
//!
//! let channel = ControlChannel::new(CanonicalResolver, StatfsSource);
//! let manager = LifecycleManager::new(LocalRegistrar::new(ServiceConfig::from_env(), channel));
//! manager.start()?;
//! // ... serve until told to stop ...
//! manager.stop()?;
//! # Ok::<(), fsinfo_service::LifecycleError>(())
//! ```

mod channel;
mod config;
mod error;
mod lifecycle;
mod registrar;
mod server;

pub use channel::ControlChannel;
pub use config::{ServiceConfig, DEFAULT_CLASS, DEFAULT_NAME};
pub use error::{ChannelError, LifecycleError, Result};
pub use lifecycle::{ChannelState, LifecycleManager, Registrar, Step};
pub use registrar::LocalRegistrar;
pub use server::{serve_connection, Server, DEFAULT_MAX_CONNECTIONS};
