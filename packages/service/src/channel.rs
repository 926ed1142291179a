//! The control channel: copy in, dispatch, copy out.

use fsinfo_core::{FsInfo, PathResolver, QueryHandler, StatisticsSource};
use fsinfo_wire::{CallerMemory, Command, FsInfoRecord, Status, RECORD_SIZE};

use crate::error::ChannelError;

type BoxedHandler = QueryHandler<Box<dyn PathResolver>, Box<dyn StatisticsSource>>;

/// Dispatches fixed-size requests from untrusted callers to the query
/// handler.
///
/// The channel keeps no mutable state: every call works on its own stack
/// copies of the request and response, so any number of threads may call
/// [`ControlChannel::call`] on one shared channel.
pub struct ControlChannel {
    handler: BoxedHandler,
}

impl ControlChannel {
    pub fn new<R, S>(resolver: R, source: S) -> Self
    where
        R: PathResolver + 'static,
        S: StatisticsSource + 'static,
    {
        let resolver: Box<dyn PathResolver> = Box::new(resolver);
        let source: Box<dyn StatisticsSource> = Box::new(source);
        Self {
            handler: QueryHandler::new(resolver, source),
        }
    }

    /// Handle one request.
    ///
    /// Caller memory is only written on success, in one piece. An unknown
    /// selector is rejected before the caller's memory is touched at all.
    pub fn call(
        &self,
        selector: u32,
        memory: &mut dyn CallerMemory,
    ) -> Result<FsInfo, ChannelError> {
        let command = Command::from_raw(selector).ok_or_else(|| {
            log::debug!("rejecting unknown selector {:#x}", selector);
            ChannelError::UnsupportedOperation { selector }
        })?;

        match command {
            Command::GetFsInfo => self.get_fs_info(memory),
        }
    }

    /// Like [`ControlChannel::call`], reduced to the wire status.
    pub fn call_status(&self, selector: u32, memory: &mut dyn CallerMemory) -> Status {
        match self.call(selector, memory) {
            Ok(_) => Status::Ok,
            Err(e) => e.status(),
        }
    }

    fn get_fs_info(&self, memory: &mut dyn CallerMemory) -> Result<FsInfo, ChannelError> {
        let mut request = [0u8; RECORD_SIZE];
        memory
            .copy_in(&mut request)
            .map_err(ChannelError::BoundaryFault)?;

        // Decoding forces termination of the path, whatever the caller sent.
        let path = FsInfoRecord::decode(&request).path;
        let info = self.handler.query(&path)?;

        let response = info.to_record(&path).encode();
        memory
            .copy_out(&response)
            .map_err(ChannelError::BoundaryFault)?;
        Ok(info)
    }
}
