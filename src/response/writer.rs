use crate::headers::Headers;
use crate::response::ResponseSink;
use crate::status::StatusCode;
use std::io;
use tracing::{debug, trace};

/// Holds the status back until the first body write, then commits it on the
/// wrapped sink exactly once.
///
/// Changing the status after the first write is accepted but has no effect
/// on the response that was already committed.
#[derive(Debug)]
pub struct DeferredStatusWriter<'a, S: ResponseSink + ?Sized> {
    sink: &'a mut S,
    proposed: Option<StatusCode>,
    default_status: StatusCode,
    committed: bool,
}

impl<'a, S: ResponseSink + ?Sized> DeferredStatusWriter<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        DeferredStatusWriter {
            sink,
            proposed: None,
            default_status: StatusCode::OK,
            committed: false,
        }
    }

    pub fn with_default_status(mut self, status: StatusCode) -> Self {
        self.default_status = status;
        self
    }

    pub fn set_status(&mut self, status: StatusCode) {
        if self.committed {
            debug!(%status, "status change after commit has no effect");
        }
        self.proposed = Some(status);
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.proposed
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn headers(&mut self) -> &mut Headers {
        self.sink.headers()
    }

    pub fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.committed {
            let status = self.proposed.unwrap_or(self.default_status);
            trace!(%status, "committing deferred status");
            self.sink.commit_status(status);
            self.committed = true;
        }

        self.sink.write_body(buf)
    }
}

impl<S: ResponseSink + ?Sized> ResponseSink for DeferredStatusWriter<'_, S> {
    fn headers(&mut self) -> &mut Headers {
        DeferredStatusWriter::headers(self)
    }

    /// Only records the status; the commit still waits for the first write.
    fn commit_status(&mut self, status: StatusCode) {
        self.set_status(status)
    }

    fn write_body(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::DeferredStatusWriter;
    use crate::headers::Headers;
    use crate::response::{ResponseRecorder, ResponseSink};
    use crate::status::StatusCode;
    use std::io;
    use tracing_test::traced_test;

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).unwrap()
    }

    // status before header: the order that breaks with an eager commit
    fn encode<S: ResponseSink + ?Sized>(sink: &mut S, body: &[u8]) {
        sink.commit_status(StatusCode::INTERNAL_SERVER_ERROR);
        sink.headers().set("X-Foo", "foo");
        sink.write_body(body).unwrap();
    }

    #[test]
    fn test_headers_set_after_status_survive() {
        let mut recorder = ResponseRecorder::new();
        let mut writer = DeferredStatusWriter::new(&mut recorder);

        writer.set_status(StatusCode::BAD_REQUEST);
        writer.headers().set("X-Foo", "foo");
        assert!(!writer.is_committed());
        assert_eq!(writer.write(b"a").unwrap(), 1);
        assert!(writer.is_committed());

        let result = recorder.result();
        assert_eq!(result.status, StatusCode::BAD_REQUEST);
        assert_eq!(result.headers.get("X-Foo"), Some("foo"));
        assert_eq!(&result.body[..], b"a");
    }

    #[test]
    fn test_last_status_before_write_wins() {
        let mut recorder = ResponseRecorder::new();
        let mut writer = DeferredStatusWriter::new(&mut recorder);

        writer.set_status(StatusCode::BAD_REQUEST);
        writer.set_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        writer.write(b"body").unwrap();

        assert_eq!(recorder.result().status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_nothing_reaches_sink_before_write() {
        let mut recorder = ResponseRecorder::new();
        {
            let mut writer = DeferredStatusWriter::new(&mut recorder);
            writer.set_status(StatusCode::NOT_FOUND);
            writer.headers().set("x-foo", "foo");
        }

        assert_eq!(recorder.commit_calls(), 0);
        assert!(!recorder.is_committed());
        assert_eq!(recorder.headers().get("x-foo"), Some("foo"));
    }

    #[test]
    fn test_commits_once_across_writes() {
        let mut recorder = ResponseRecorder::new();
        let mut writer = DeferredStatusWriter::new(&mut recorder);

        writer.set_status(StatusCode::BAD_REQUEST);
        writer.write(b"a").unwrap();
        writer.set_status(status(999));
        writer.write(b"b").unwrap();
        assert_eq!(writer.status(), Some(status(999)));

        assert_eq!(recorder.commit_calls(), 1);
        let result = recorder.result();
        assert_eq!(result.status, StatusCode::BAD_REQUEST);
        assert_eq!(&result.body[..], b"ab");
    }

    #[test]
    fn test_late_header_mutation_is_permitted() {
        let mut recorder = ResponseRecorder::new();
        let mut writer = DeferredStatusWriter::new(&mut recorder);

        writer.write(b"a").unwrap();
        writer.headers().set("x-late", "1");
        assert_eq!(writer.headers().get("x-late"), Some("1"));

        let result = recorder.result();
        assert!(!result.headers.contains("x-late"));
    }

    #[test]
    fn test_default_status_without_proposal() {
        let mut recorder = ResponseRecorder::new();
        DeferredStatusWriter::new(&mut recorder).write(b"ok").unwrap();
        assert_eq!(recorder.result().status, StatusCode::OK);

        let mut recorder = ResponseRecorder::new();
        DeferredStatusWriter::new(&mut recorder)
            .with_default_status(StatusCode::ACCEPTED)
            .write(b"ok")
            .unwrap();
        assert_eq!(recorder.result().status, StatusCode::ACCEPTED);
    }

    #[test]
    fn test_empty_write_still_commits() {
        let mut recorder = ResponseRecorder::new();
        let mut writer = DeferredStatusWriter::new(&mut recorder);

        writer.set_status(StatusCode::NO_CONTENT);
        assert_eq!(writer.write(b"").unwrap(), 0);

        assert_eq!(recorder.commit_calls(), 1);
        assert_eq!(recorder.result().status, StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_out_of_range_status_passes_through() {
        let mut recorder = ResponseRecorder::new();
        let mut writer = DeferredStatusWriter::new(&mut recorder);

        writer.set_status(status(999));
        writer.write(b"x").unwrap();

        assert_eq!(recorder.result().status.as_u16(), 999);
    }

    #[test]
    fn test_encoder_through_sink_trait() {
        let mut recorder = ResponseRecorder::new();
        let mut writer = DeferredStatusWriter::new(&mut recorder);

        writer.set_status(StatusCode::BAD_REQUEST);
        encode(&mut writer, b"a");

        let result = recorder.result();
        assert_eq!(result.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(result.headers.get("x-foo"), Some("foo"));
    }

    #[test]
    fn test_layered_writers_commit_once() {
        let mut recorder = ResponseRecorder::new();
        let mut inner = DeferredStatusWriter::new(&mut recorder);
        let mut outer = DeferredStatusWriter::new(&mut inner);

        outer.set_status(StatusCode::CONFLICT);
        outer.headers().set("x-layer", "outer");
        outer.write(b"a").unwrap();
        outer.write(b"b").unwrap();
        assert_eq!(outer.status(), Some(StatusCode::CONFLICT));

        assert_eq!(recorder.commit_calls(), 1);
        let result = recorder.result();
        assert_eq!(result.status, StatusCode::CONFLICT);
        assert_eq!(result.headers.get("x-layer"), Some("outer"));
        assert_eq!(&result.body[..], b"ab");
    }

    struct Closed {
        headers: Headers,
        commits: usize,
    }

    impl ResponseSink for Closed {
        fn headers(&mut self) -> &mut Headers {
            &mut self.headers
        }

        fn commit_status(&mut self, _status: StatusCode) {
            self.commits += 1;
        }

        fn write_body(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "connection closed"))
        }
    }

    #[test]
    fn test_write_errors_are_returned_verbatim() {
        let mut sink = Closed {
            headers: Headers::new(),
            commits: 0,
        };
        let mut writer = DeferredStatusWriter::new(&mut sink);

        let error = writer.write(b"a").unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(error.to_string(), "connection closed");

        // no retry and no second commit
        let error = writer.write(b"a").unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(sink.commits, 1);
    }

    #[test]
    #[traced_test]
    fn test_logs_ignored_status_change() {
        let mut recorder = ResponseRecorder::new();
        let mut writer = DeferredStatusWriter::new(&mut recorder);

        writer.set_status(StatusCode::BAD_REQUEST);
        assert!(!logs_contain("has no effect"));

        writer.write(b"a").unwrap();
        writer.set_status(StatusCode::OK);
        assert!(logs_contain("status change after commit has no effect"));
    }
}
