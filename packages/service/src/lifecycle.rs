//! Channel lifecycle: ordered registration with rollback.
//!
//! Bringing the channel up takes four registration steps. Either all of them
//! complete and the endpoint is visible, or every completed step is undone
//! in reverse order before `start` returns. Callers never observe a
//! half-registered channel.
//!
//! ```text
//! Uninitialized
//!   -> IdentityReserved   (reserve identity)
//!   -> DeviceAttached     (attach device)
//!   -> ClassRegistered    (register class)
//!   -> EndpointVisible    (create endpoint)
//! ```

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{LifecycleError, Result};

/// One registration step, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    ReserveIdentity,
    AttachDevice,
    RegisterClass,
    CreateEndpoint,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::ReserveIdentity,
        Step::AttachDevice,
        Step::RegisterClass,
        Step::CreateEndpoint,
    ];

    /// The state the channel is in once this step has completed.
    pub const fn reached(self) -> ChannelState {
        match self {
            Step::ReserveIdentity => ChannelState::IdentityReserved,
            Step::AttachDevice => ChannelState::DeviceAttached,
            Step::RegisterClass => ChannelState::ClassRegistered,
            Step::CreateEndpoint => ChannelState::EndpointVisible,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::ReserveIdentity => "reserve identity",
            Step::AttachDevice => "attach device",
            Step::RegisterClass => "register class",
            Step::CreateEndpoint => "create endpoint",
        };
        f.write_str(name)
    }
}

/// Where the channel is in its registration sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChannelState {
    Uninitialized,
    IdentityReserved,
    DeviceAttached,
    ClassRegistered,
    /// Fully registered; callers can reach the endpoint.
    EndpointVisible,
}

impl ChannelState {
    /// Steps completed to reach this state, in forward order.
    pub fn completed(self) -> &'static [Step] {
        let done = match self {
            ChannelState::Uninitialized => 0,
            ChannelState::IdentityReserved => 1,
            ChannelState::DeviceAttached => 2,
            ChannelState::ClassRegistered => 3,
            ChannelState::EndpointVisible => 4,
        };
        &Step::ALL[..done]
    }

    /// The state after undoing the most recent step.
    fn previous(self) -> ChannelState {
        match self {
            ChannelState::Uninitialized | ChannelState::IdentityReserved => {
                ChannelState::Uninitialized
            }
            ChannelState::DeviceAttached => ChannelState::IdentityReserved,
            ChannelState::ClassRegistered => ChannelState::DeviceAttached,
            ChannelState::EndpointVisible => ChannelState::ClassRegistered,
        }
    }
}

/// Performs and undoes the individual registration steps.
///
/// The manager guarantees `revert(step)` is only called after a successful
/// `apply(step)`, and always in reverse order of application.
pub trait Registrar: Send {
    fn apply(&mut self, step: Step) -> std::io::Result<()>;
    fn revert(&mut self, step: Step) -> std::io::Result<()>;
}

impl<T: Registrar + ?Sized> Registrar for Box<T> {
    fn apply(&mut self, step: Step) -> std::io::Result<()> {
        self.as_mut().apply(step)
    }

    fn revert(&mut self, step: Step) -> std::io::Result<()> {
        self.as_mut().revert(step)
    }
}

struct Inner<G> {
    state: ChannelState,
    registrar: G,
}

/// Owns the channel's registration state.
///
/// Create one per process and share it by reference. `start` and `stop`
/// are serialized against each other; queries never touch this object.
pub struct LifecycleManager<G: Registrar> {
    inner: Mutex<Inner<G>>,
}

impl<G: Registrar> LifecycleManager<G> {
    pub fn new(registrar: G) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: ChannelState::Uninitialized,
                registrar,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<G>> {
        // A panic mid-transition leaves the state pointing at the last
        // completed step, which is still accurate.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ChannelState {
        self.lock().state
    }

    pub fn is_visible(&self) -> bool {
        self.state() == ChannelState::EndpointVisible
    }

    /// Run every registration step. On failure, undo the completed ones in
    /// reverse order and return the failing step.
    pub fn start(&self) -> Result<()> {
        let mut inner = self.lock();
        if inner.state == ChannelState::EndpointVisible {
            log::debug!("channel already visible");
            return Ok(());
        }

        for step in Step::ALL {
            log::debug!("{}", step);
            if let Err(source) = inner.registrar.apply(step) {
                log::error!("failed to {}: {}", step, source);
                Self::unwind(&mut inner);
                return Err(LifecycleError { step, source });
            }
            inner.state = step.reached();
        }

        log::info!("channel registered");
        Ok(())
    }

    /// Undo every completed step, newest first.
    ///
    /// A step that fails to revert is logged and skipped; the rest still
    /// run. The first such failure is returned once teardown is complete.
    pub fn stop(&self) -> Result<()> {
        let mut inner = self.lock();
        if inner.state == ChannelState::Uninitialized {
            return Ok(());
        }
        let first_failure = Self::unwind(&mut inner);
        log::info!("channel unregistered");
        match first_failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn unwind(inner: &mut Inner<G>) -> Option<LifecycleError> {
        let mut first_failure = None;
        while let Some(&step) = inner.state.completed().last() {
            log::debug!("undo {}", step);
            if let Err(source) = inner.registrar.revert(step) {
                log::error!("failed to undo {}: {}", step, source);
                if first_failure.is_none() {
                    first_failure = Some(LifecycleError { step, source });
                }
            }
            inner.state = inner.state.previous();
        }
        first_failure
    }
}

impl<G: Registrar> Drop for LifecycleManager<G> {
    fn drop(&mut self) {
        if self.state() != ChannelState::Uninitialized {
            let _ = self.stop();
        }
    }
}
