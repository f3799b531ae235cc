use crate::headers::Headers;
use crate::status::StatusCode;
use std::io;

mod recorder;
mod wire;
mod writer;

pub use recorder::*;
pub use wire::*;
pub use writer::*;

/// The transport-facing side of a response.
///
/// `commit_status` is one-shot: once a sink has committed, its status and
/// the headers it saw at that moment are final. Header changes made after
/// the commit may still be accepted by `headers` but need not reach the
/// peer.
pub trait ResponseSink {
    fn headers(&mut self) -> &mut Headers;

    fn commit_status(&mut self, status: StatusCode);

    /// Writes body bytes, committing first if nothing was committed yet.
    fn write_body(&mut self, buf: &[u8]) -> io::Result<usize>;
}

impl<S: ResponseSink + ?Sized> ResponseSink for &mut S {
    fn headers(&mut self) -> &mut Headers {
        (**self).headers()
    }

    fn commit_status(&mut self, status: StatusCode) {
        (**self).commit_status(status)
    }

    fn write_body(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write_body(buf)
    }
}

impl<S: ResponseSink + ?Sized> ResponseSink for Box<S> {
    fn headers(&mut self) -> &mut Headers {
        (**self).headers()
    }

    fn commit_status(&mut self, status: StatusCode) {
        (**self).commit_status(status)
    }

    fn write_body(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write_body(buf)
    }
}
