//! Socket framing.
//!
//! Every frame is a 4-byte header followed by exactly one record, so both
//! sides always move a known number of bytes and never parse a length field.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{Status, WireError, RECORD_SIZE};

pub const REQUEST_FRAME_SIZE: usize = 4 + RECORD_SIZE;
pub const RESPONSE_FRAME_SIZE: usize = 4 + RECORD_SIZE;

/// Selector plus the caller's record.
#[derive(Clone)]
pub struct RequestFrame {
    pub selector: u32,
    pub record: [u8; RECORD_SIZE],
}

impl RequestFrame {
    pub fn new(selector: u32, record: [u8; RECORD_SIZE]) -> Self {
        Self { selector, record }
    }

    pub fn encode(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(REQUEST_FRAME_SIZE);
        out.put_u32_ne(self.selector);
        out.put_slice(&self.record);
        out.freeze()
    }

    pub fn decode(raw: &[u8; REQUEST_FRAME_SIZE]) -> Self {
        let mut input = &raw[..];
        let selector = input.get_u32_ne();
        let mut record = [0u8; RECORD_SIZE];
        input.copy_to_slice(&mut record);
        Self { selector, record }
    }
}

/// Status plus the record as the caller should now see it.
#[derive(Clone)]
pub struct ResponseFrame {
    pub status: Status,
    pub record: [u8; RECORD_SIZE],
}

impl ResponseFrame {
    pub fn new(status: Status, record: [u8; RECORD_SIZE]) -> Self {
        Self { status, record }
    }

    pub fn encode(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(RESPONSE_FRAME_SIZE);
        out.put_i32_ne(self.status.code());
        out.put_slice(&self.record);
        out.freeze()
    }

    pub fn decode(raw: &[u8; RESPONSE_FRAME_SIZE]) -> Result<Self, WireError> {
        let mut input = &raw[..];
        let status = Status::from_code(input.get_i32_ne())?;
        let mut record = [0u8; RECORD_SIZE];
        input.copy_to_slice(&mut record);
        Ok(Self { status, record })
    }
}
