//! Blocking client for the control channel socket.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use fsinfo_wire::{
    FsInfoRecord, RequestFrame, ResponseFrame, GET_FS_INFO, RESPONSE_FRAME_SIZE,
};

use crate::ClientError;

/// One open connection to the control channel.
///
/// Requests are answered in order, so a single connection serves any
/// number of queries.
pub struct Client<T = UnixStream> {
    stream: T,
}

impl Client {
    pub fn connect(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path).map_err(|source| ClientError::Connect {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("connected to {}", path.display());
        Ok(Self::new(stream))
    }
}

impl<T: Read + Write> Client<T> {
    pub fn new(stream: T) -> Self {
        Self { stream }
    }

    /// Send one raw request and wait for its response.
    pub fn call(
        &mut self,
        selector: u32,
        record: &FsInfoRecord,
    ) -> Result<ResponseFrame, ClientError> {
        let request = RequestFrame::new(selector, record.encode());
        self.stream.write_all(&request.encode())?;
        self.stream.flush()?;

        let mut raw = [0u8; RESPONSE_FRAME_SIZE];
        self.stream.read_exact(&mut raw)?;
        Ok(ResponseFrame::decode(&raw)?)
    }

    /// Capacity of the filesystem holding `path`.
    ///
    /// Paths longer than the record allows are truncated before sending.
    pub fn get_fs_info(&mut self, path: &[u8]) -> Result<FsInfoRecord, ClientError> {
        let response = self.call(GET_FS_INFO, &FsInfoRecord::request(path))?;
        match ClientError::from_status(response.status) {
            Some(e) => Err(e),
            None => Ok(FsInfoRecord::decode(&response.record)),
        }
    }
}
