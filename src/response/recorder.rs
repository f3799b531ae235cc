use crate::headers::Headers;
use crate::response::ResponseSink;
use crate::status::StatusCode;
use bytes::{Bytes, BytesMut};
use std::io;

/// In-memory sink. Only the first `commit_status` takes effect and snapshots
/// the headers that `result` reports.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    headers: Headers,
    status: Option<StatusCode>,
    snapshot: Option<Headers>,
    commit_calls: usize,
    body: BytesMut,
}

#[derive(Clone, Debug)]
pub struct RecordedResponse {
    pub status: StatusCode,
    pub headers: Headers,
    pub body: Bytes,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_committed(&self) -> bool {
        self.status.is_some()
    }

    /// How many times `commit_status` was called, including ignored calls.
    pub fn commit_calls(&self) -> usize {
        self.commit_calls
    }

    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn result(&self) -> RecordedResponse {
        RecordedResponse {
            status: self.status(),
            headers: self
                .snapshot
                .clone()
                .unwrap_or_else(|| self.headers.clone()),
            body: Bytes::copy_from_slice(&self.body),
        }
    }
}

impl ResponseSink for ResponseRecorder {
    fn headers(&mut self) -> &mut Headers {
        &mut self.headers
    }

    fn commit_status(&mut self, status: StatusCode) {
        self.commit_calls += 1;
        if self.status.is_some() {
            return;
        }

        self.status = Some(status);
        self.snapshot = Some(self.headers.clone());
    }

    fn write_body(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.is_committed() {
            self.commit_status(StatusCode::OK);
        }

        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}
